//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, time comes in as an explicit `now_ms`
//! - Seeded RNG only
//! - Stable iteration order (platform generation order)
//! - No rendering, input or audio dependencies

pub mod collision;
pub mod physics;
pub mod progression;
pub mod rect;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use collision::{LandingEvent, resolve};
pub use physics::{Actor, BodyState, HeldControls, Intent, Launch};
pub use progression::RunSummary;
pub use rect::Rect;
pub use state::{
    CollectibleItem, GameEvent, GamePhase, GameState, Platform, PlatformKind, ProgressionState,
    TrashKind, World,
};
pub use tick::{TickInput, tick};
pub use worldgen::generate_world;
