//! Data-driven game balance
//!
//! Every number that shapes how the climb feels. Values are per simulation
//! tick (one tick per rendered frame) unless the name says otherwise.

use serde::{Deserialize, Serialize};

/// Gameplay constants, all defaulted so a partial JSON file is valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor ===
    pub actor_width: f32,
    pub actor_height: f32,
    /// Spawn point sits this far above the canvas bottom (also height 0)
    pub spawn_offset: f32,
    pub walk_speed: f32,

    // === Charge & launch ===
    pub max_jump_power: f32,
    pub max_charge_ms: u64,
    /// Extra hold time after a full charge before the jump fires by itself
    pub auto_release_grace_ms: u64,
    /// Jump power right after the charge starts
    pub charge_floor: f32,
    pub launch_horizontal: f32,
    pub launch_vertical: f32,
    /// Vertical launch scale is `vertical_base + ratio * vertical_charge_share`
    pub vertical_base: f32,
    pub vertical_charge_share: f32,
    /// Residual |vx| below this is zeroed while charging
    pub charge_deadzone: f32,

    // === Flight ===
    pub gravity: f32,
    pub air_drag: f32,
    pub momentum_decay: f32,
    pub momentum_floor: f32,
    /// Momentum above this makes a landing "heavy"
    pub heavy_landing_momentum: f32,

    // === Collision ===
    /// Max penetration into a platform top that still counts as a landing
    pub landing_tolerance: f32,
    /// Distance from a platform edge where falling actors get pushed off
    pub edge_zone: f32,
    pub edge_slide_speed: f32,
    /// Max gap between feet and platform top that still counts as standing
    pub ground_contact_epsilon: f32,

    // === Progression ===
    pub max_health: u32,
    pub first_landing_bonus: u32,
    pub item_score: u64,
    /// World units per height unit shown to the player
    pub height_scale: f32,
    /// Falling this many height units below the peak ends the run
    pub fall_limit: f32,
    /// Peak height that must be passed before the fall limit applies
    pub fall_grace_height: f32,
    /// Absolute y below which the actor is lost
    pub pit_y: f32,

    // === Camera ===
    pub camera_lead: f32,
    pub camera_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            actor_width: 64.0,
            actor_height: 64.0,
            spawn_offset: 180.0,
            walk_speed: 2.0,

            max_jump_power: 20.0,
            max_charge_ms: 1500,
            auto_release_grace_ms: 1000,
            charge_floor: 5.0,
            launch_horizontal: 0.3,
            launch_vertical: 1.0,
            vertical_base: 0.8,
            vertical_charge_share: 0.2,
            charge_deadzone: 3.0,

            gravity: 0.5,
            air_drag: 0.98,
            momentum_decay: 0.95,
            momentum_floor: 0.1,
            heavy_landing_momentum: 5.0,

            landing_tolerance: 10.0,
            edge_zone: 5.0,
            edge_slide_speed: 2.0,
            ground_contact_epsilon: 0.5,

            max_health: 100,
            first_landing_bonus: 2,
            item_score: 10,
            height_scale: 10.0,
            fall_limit: 200.0,
            fall_grace_height: 20.0,
            pit_y: 800.0,

            camera_lead: 400.0,
            camera_smoothing: 0.1,
        }
    }
}

impl Tuning {
    /// Charge held long enough to fire on its own
    pub fn auto_release_ms(&self) -> u64 {
        self.max_charge_ms + self.auto_release_grace_ms
    }

    /// Charge progress in [0, 1] after `elapsed_ms` of holding
    pub fn charge_progress(&self, elapsed_ms: u64) -> f32 {
        if self.max_charge_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f32 / self.max_charge_ms as f32).min(1.0)
    }

    /// Accumulated jump power after `elapsed_ms` of holding.
    ///
    /// Quadratic in progress so short taps give disproportionately weak jumps.
    pub fn charge_power(&self, elapsed_ms: u64) -> f32 {
        let progress = self.charge_progress(elapsed_ms);
        (self.max_jump_power * progress * progress).min(self.max_jump_power)
    }
}
