//! Actor kinematics: charge, launch and free flight
//!
//! The actor is always in exactly one `BodyState`. Horizontal velocity is only
//! writable from the grounded states; once a jump starts the trajectory is
//! committed and only gravity and air drag act on it until the next landing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

/// Movement state of the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    /// Standing on a platform, free to walk
    Idle,
    /// Standing on a platform, building up jump power since `started_ms`
    Charging { started_ms: u64 },
    /// In the air (jumping, falling or walked off an edge)
    Airborne,
}

/// Discrete, edge-triggered player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    ChargeStart,
    ChargeRelease,
    MoveLeftStart,
    MoveLeftStop,
    MoveRightStart,
    MoveRightStop,
}

/// Which intents are currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldControls {
    pub charge: bool,
    pub left: bool,
    pub right: bool,
}

/// A jump that just left the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: Vec2,
    /// Jump power accumulated before release
    pub power: f32,
    /// Charge progress in [0, 1] at release
    pub charge_ratio: f32,
    /// Fired by the hold timeout rather than a release intent
    pub auto_release: bool,
}

/// The player-controlled climber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Best height reached this run (never decreases)
    pub max_height: f32,
    vel: Vec2,
    state: BodyState,
    facing_left: bool,
    jump_power: f32,
    /// |vx| at launch, decaying while grounded (landing effects only)
    momentum: f32,
    held: HeldControls,
}

impl Actor {
    /// Spawn centered horizontally, `spawn_offset` above the canvas bottom
    pub fn spawn(canvas_width: f32, canvas_height: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                canvas_width / 2.0 - tuning.actor_width / 2.0,
                canvas_height - tuning.spawn_offset,
            ),
            size: Vec2::new(tuning.actor_width, tuning.actor_height),
            max_height: 0.0,
            vel: Vec2::ZERO,
            // Dropped in slightly above the ground, so start falling
            state: BodyState::Airborne,
            facing_left: false,
            jump_power: 0.0,
            momentum: 0.0,
            held: HeldControls::default(),
        }
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn on_ground(&self) -> bool {
        !matches!(self.state, BodyState::Airborne)
    }

    pub fn charging(&self) -> bool {
        matches!(self.state, BodyState::Charging { .. })
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn jump_power(&self) -> f32 {
        self.jump_power
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn held(&self) -> HeldControls {
        self.held
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Jump power as a fraction of the maximum (for the power bar)
    pub fn power_fraction(&self, tuning: &Tuning) -> f32 {
        if tuning.max_jump_power > 0.0 {
            (self.jump_power / tuning.max_jump_power).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Charge progress in [0, 1], zero when not charging
    pub fn charge_progress(&self, now_ms: u64, tuning: &Tuning) -> f32 {
        match self.state {
            BodyState::Charging { started_ms } => {
                tuning.charge_progress(now_ms.saturating_sub(started_ms))
            }
            _ => 0.0,
        }
    }

    /// Apply one input intent. Returns the launch if it fired a jump.
    pub fn apply_intent(&mut self, intent: Intent, now_ms: u64, tuning: &Tuning) -> Option<Launch> {
        match intent {
            Intent::ChargeStart => {
                self.held.charge = true;
                if self.state == BodyState::Idle {
                    self.begin_charge(now_ms, tuning);
                }
                None
            }
            Intent::ChargeRelease => {
                self.held.charge = false;
                if self.charging() {
                    Some(self.launch(now_ms, tuning, false))
                } else {
                    None
                }
            }
            Intent::MoveLeftStart => {
                self.press_direction(true);
                None
            }
            Intent::MoveRightStart => {
                self.press_direction(false);
                None
            }
            Intent::MoveLeftStop => {
                self.held.left = false;
                None
            }
            Intent::MoveRightStop => {
                self.held.right = false;
                None
            }
        }
    }

    fn press_direction(&mut self, left: bool) {
        match self.state {
            // Aim the jump without moving
            BodyState::Charging { .. } => self.facing_left = left,
            BodyState::Idle => {
                self.set_walk_flag(left);
                self.facing_left = left;
            }
            // Remembered for the landing, facing stays committed
            BodyState::Airborne => self.set_walk_flag(left),
        }
    }

    fn set_walk_flag(&mut self, left: bool) {
        if left {
            self.held.left = true;
        } else {
            self.held.right = true;
        }
    }

    fn begin_charge(&mut self, now_ms: u64, tuning: &Tuning) {
        self.state = BodyState::Charging { started_ms: now_ms };
        self.jump_power = tuning.charge_floor;
        self.vel.x = 0.0;
        self.held.left = false;
        self.held.right = false;
    }

    /// Commit the trajectory from the accumulated charge
    fn launch(&mut self, now_ms: u64, tuning: &Tuning, auto_release: bool) -> Launch {
        let started_ms = match self.state {
            BodyState::Charging { started_ms } => started_ms,
            _ => now_ms,
        };
        let charge_ratio = tuning.charge_progress(now_ms.saturating_sub(started_ms));
        let power = self.jump_power;
        let direction = if self.facing_left { -1.0 } else { 1.0 };

        self.vel = Vec2::new(
            direction * power * tuning.launch_horizontal * charge_ratio,
            -power
                * tuning.launch_vertical
                * (tuning.vertical_base + charge_ratio * tuning.vertical_charge_share),
        );
        self.momentum = self.vel.x.abs();
        self.jump_power = 0.0;
        self.state = BodyState::Airborne;

        Launch {
            velocity: self.vel,
            power,
            charge_ratio,
            auto_release,
        }
    }

    /// Advance one fixed step. Returns the launch if the charge timed out.
    pub fn integrate(&mut self, now_ms: u64, canvas_width: f32, tuning: &Tuning) -> Option<Launch> {
        let mut launch = None;

        match self.state {
            BodyState::Charging { started_ms } => {
                let elapsed = now_ms.saturating_sub(started_ms);
                if elapsed > tuning.auto_release_ms() {
                    log::debug!("Charge held {}ms, auto-releasing", elapsed);
                    launch = Some(self.launch(now_ms, tuning, true));
                } else {
                    self.jump_power = tuning.charge_power(elapsed);
                    if self.vel.x != 0.0 && self.vel.x.abs() < tuning.charge_deadzone {
                        self.vel.x = 0.0;
                    }
                }
            }
            BodyState::Idle => {
                // Immediate-response walking, no acceleration ramp
                self.vel.x = if self.held.left {
                    self.facing_left = true;
                    -tuning.walk_speed
                } else if self.held.right {
                    self.facing_left = false;
                    tuning.walk_speed
                } else {
                    0.0
                };
            }
            BodyState::Airborne => {}
        }

        if self.state == BodyState::Airborne {
            self.vel.y += tuning.gravity;
            self.vel.x *= tuning.air_drag;
        }

        self.pos += self.vel;
        let max_x = (canvas_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);

        if self.on_ground() && self.momentum > 0.0 {
            self.momentum *= tuning.momentum_decay;
            if self.momentum < tuning.momentum_floor {
                self.momentum = 0.0;
            }
        }

        launch
    }

    /// Put the feet on a platform top. Returns the momentum at impact.
    ///
    /// Lands straight into a new charge when the charge intent is still held.
    pub fn land(&mut self, platform_top: f32, now_ms: u64, tuning: &Tuning) -> f32 {
        self.pos.y = platform_top - self.size.y;
        self.vel.y = 0.0;
        self.state = BodyState::Idle;
        if self.held.charge {
            self.begin_charge(now_ms, tuning);
        }
        self.momentum
    }

    /// Lost ground contact without jumping (walked off an edge)
    pub fn leave_ground(&mut self) {
        if self.on_ground() {
            self.jump_power = 0.0;
            self.state = BodyState::Airborne;
        }
    }

    /// Edge slide-off push from the collision resolver.
    ///
    /// The only horizontal write allowed while airborne.
    pub fn apply_edge_slide(&mut self, vx: f32) {
        if self.state == BodyState::Airborne {
            self.vel.x = vx;
        }
    }
}
