//! Kanga Climb - A charge-and-jump vertical climbing platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, physics, collisions, progression)
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Session configuration (canvas, world height, seed)
//!
//! Rendering, input wiring, asset loading and screen switching live outside
//! this crate. They read `sim::GameState` and feed `sim::Intent`s back in.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// World layout constants
pub mod consts {
    /// Fixed simulation step (one display refresh at 60 Hz)
    pub const SIM_TICK_MS: u64 = 16;

    /// Edge length of one platform tile block
    pub const BLOCK_SIZE: f32 = 32.0;

    /// Ground platform height in blocks
    pub const GROUND_BLOCKS_HEIGHT: u32 = 3;

    /// First band sits this far above the canvas bottom
    pub const FIRST_BAND_OFFSET: f32 = 300.0;
    /// Vertical distance between bands, drawn uniformly from this range
    pub const BAND_STEP_MIN: f32 = 110.0;
    pub const BAND_STEP_MAX: f32 = 150.0;

    /// Platform footprint choices (in blocks)
    pub const PLATFORM_BLOCKS_WIDTH: [u32; 2] = [3, 4];
    pub const PLATFORM_BLOCKS_HEIGHT: [u32; 2] = [1, 2];

    /// Share of the canvas width platforms are placed in (centered)
    pub const CORRIDOR_FRACTION: f32 = 0.4;
    /// Minimum horizontal separation between neighbouring platforms
    pub const MIN_PLATFORM_SPACING: f32 = BLOCK_SIZE * 2.0;
    /// Rejection-sampling budget per platform
    pub const PLACEMENT_ATTEMPTS: u32 = 50;

    /// Band heights below these get the rock / clean tile sets
    pub const ROCK_BAND_HEIGHT: f32 = -1000.0;
    pub const CLEAN_BAND_HEIGHT: f32 = -2000.0;

    /// Victory platform footprint (in blocks)
    pub const VICTORY_BLOCKS_WIDTH: u32 = 6;
    pub const VICTORY_BLOCKS_HEIGHT: u32 = 2;

    /// Collectible size and gap above its platform
    pub const ITEM_SIZE: f32 = 40.0;
    pub const ITEM_FLOAT_GAP: f32 = 5.0;

    /// Number of bush sprite variants
    pub const BUSH_VARIANTS: u8 = 9;
}
