//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::Actor;
use super::rect::Rect;
use super::worldgen::generate_world;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Instructions screen
    HowToPlay,
    /// Active climb
    Playing,
    /// Run lost (fell too far)
    GameOver,
    /// Reached the victory platform
    Victory,
}

impl GamePhase {
    /// Run ended, only a reset leaves this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Platform tile set, picked by band height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Full-width floor (drawn with trash tiles)
    Ground,
    Trash,
    Rock,
    Clean,
    /// Goal platform at the top of the world
    Victory,
}

/// Collectible sprite variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrashKind {
    Bag,
    Bottle,
    Box,
    Broke,
    Can,
    Cup,
    Glass,
    Paper,
    Pizza,
}

impl TrashKind {
    pub const ALL: [TrashKind; 9] = [
        TrashKind::Bag,
        TrashKind::Bottle,
        TrashKind::Box,
        TrashKind::Broke,
        TrashKind::Can,
        TrashKind::Cup,
        TrashKind::Glass,
        TrashKind::Paper,
        TrashKind::Pizza,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrashKind::Bag => "bag",
            TrashKind::Bottle => "bottle",
            TrashKind::Box => "box",
            TrashKind::Broke => "broke",
            TrashKind::Can => "can",
            TrashKind::Cup => "cup",
            TrashKind::Glass => "glass",
            TrashKind::Paper => "paper",
            TrashKind::Pizza => "pizza",
        }
    }
}

/// A block-built platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub blocks_width: u32,
    pub blocks_height: u32,
    pub kind: PlatformKind,
    /// Set on the first landing (one-shot health bonus)
    pub landed: bool,
    /// Decorative bush variant (1-based), if any
    pub bush: Option<u8>,
    /// Generation band, `None` for the ground and victory platforms
    pub band: Option<u32>,
}

impl Platform {
    /// Platform with its top-left corner at (x, y) made of `blocks_width` x `blocks_height` tiles
    pub fn from_blocks(x: f32, y: f32, blocks_width: u32, blocks_height: u32, kind: PlatformKind) -> Self {
        Self {
            rect: Rect::new(
                x,
                y,
                blocks_width as f32 * BLOCK_SIZE,
                blocks_height as f32 * BLOCK_SIZE,
            ),
            blocks_width,
            blocks_height,
            kind,
            landed: false,
            bush: None,
            band: None,
        }
    }
}

/// A one-shot pickup floating above a platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleItem {
    pub rect: Rect,
    pub kind: TrashKind,
    pub collected: bool,
    /// Index of the platform it sits on
    pub platform: usize,
}

impl CollectibleItem {
    /// Item centered on `platform`, floating just above its top
    pub fn above(platform: &Platform, platform_index: usize, kind: TrashKind) -> Self {
        let rect = Rect::new(
            platform.rect.center_x() - ITEM_SIZE / 2.0,
            platform.rect.top() - ITEM_SIZE - ITEM_FLOAT_GAP,
            ITEM_SIZE,
            ITEM_SIZE,
        );
        Self {
            rect,
            kind,
            collected: false,
            platform: platform_index,
        }
    }
}

/// Static level layout for one playthrough
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// The victory platform sits at `y = -world_height`
    pub world_height: f32,
    /// Bottom-to-top generation order: ground first, victory last
    pub platforms: Vec<Platform>,
    pub items: Vec<CollectibleItem>,
    /// Platforms placed after the retry budget ran out (spacing not guaranteed)
    pub relaxed_placements: Vec<usize>,
}

impl World {
    pub fn victory(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.kind == PlatformKind::Victory)
    }

    /// Items still waiting to be picked up
    pub fn remaining_items(&self) -> usize {
        self.items.iter().filter(|i| !i.collected).count()
    }
}

/// Score, health and camera for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    pub score: u64,
    pub health: u32,
    /// Smoothed vertical camera translation (presentation only)
    pub camera_offset: f32,
    pub phase: GamePhase,
    /// Actor spawn y, the zero of the height scale
    pub starting_y: f32,
}

impl ProgressionState {
    pub fn new(starting_y: f32, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            health: tuning.max_health,
            camera_offset: 0.0,
            phase: GamePhase::Menu,
            starting_y,
        }
    }
}

/// Notifications for the UI, audio and effects collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
    },
    Jumped {
        velocity: Vec2,
        power: f32,
        auto_release: bool,
    },
    Landed {
        platform: usize,
        kind: PlatformKind,
        first_landing: bool,
        /// Momentum high enough for the heavy landing effect
        heavy: bool,
    },
    HealthRestored {
        health: u32,
    },
    ItemCollected {
        item: usize,
        kind: TrashKind,
        score: u64,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Seed the world RNG started from
    pub seed: u64,
    rng: Pcg32,
    /// Simulation ticks in the current run
    pub time_ticks: u64,
    pub actor: Actor,
    pub world: World,
    pub progression: ProgressionState,
}

impl GameState {
    /// New session on the menu, seeded from the settings (random when unset)
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::with_seed(settings, seed)
    }

    /// New session on the menu with an explicit world seed
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = generate_world(
            &mut rng,
            settings.canvas_width,
            settings.canvas_height,
            settings.world_height,
        );
        let actor = Actor::spawn(settings.canvas_width, settings.canvas_height, &settings.tuning);
        let progression = ProgressionState::new(actor.pos.y, &settings.tuning);

        Self {
            settings,
            seed,
            rng,
            time_ticks: 0,
            actor,
            world,
            progression,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.settings.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.progression.phase
    }

    /// Replace the world with a freshly generated one
    pub fn regenerate_world(&mut self) {
        self.world = generate_world(
            &mut self.rng,
            self.settings.canvas_width,
            self.settings.canvas_height,
            self.settings.world_height,
        );
    }

    /// Put a fresh actor back at the spawn point
    pub fn reset_actor(&mut self) {
        self.actor = Actor::spawn(
            self.settings.canvas_width,
            self.settings.canvas_height,
            &self.settings.tuning,
        );
        self.progression.starting_y = self.actor.pos.y;
        self.time_ticks = 0;
    }
}
