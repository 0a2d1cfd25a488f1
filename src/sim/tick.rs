//! Fixed timestep simulation tick
//!
//! Core game loop that advances the climb deterministically, plus the
//! session transitions that start, leave and restart a run.

use super::collision::resolve;
use super::physics::{Intent, Launch};
use super::progression::RunSummary;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Edge-triggered control changes since the last tick, in arrival order
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn with(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }
}

fn jumped(launch: Launch) -> GameEvent {
    log::debug!(
        "Jump: power {:.1} ratio {:.2} velocity ({:.2}, {:.2}){}",
        launch.power,
        launch.charge_ratio,
        launch.velocity.x,
        launch.velocity.y,
        if launch.auto_release { " [auto]" } else { "" }
    );
    GameEvent::Jumped {
        velocity: launch.velocity,
        power: launch.power,
        auto_release: launch.auto_release,
    }
}

/// Advance the game state by one fixed timestep
///
/// `now_ms` is the monotonic clock reading for this tick. Does nothing unless
/// a run is in progress.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.progression.phase != GamePhase::Playing {
        return events;
    }

    let tuning = &state.settings.tuning;
    let canvas_width = state.settings.canvas_width;

    // Input
    for &intent in &input.intents {
        if let Some(launch) = state.actor.apply_intent(intent, now_ms, tuning) {
            events.push(jumped(launch));
        }
    }

    // Physics
    if let Some(launch) = state.actor.integrate(now_ms, canvas_width, tuning) {
        events.push(jumped(launch));
    }

    // Collisions
    if let Some(landing) = resolve(&mut state.actor, &state.world.platforms, now_ms, tuning) {
        state
            .progression
            .record_landing(&mut state.world, &landing, tuning, &mut events);
    }

    // Progression
    let body = state.actor.rect();
    state
        .progression
        .collect_items(&body, &mut state.world.items, tuning, &mut events);
    state.progression.update_max_height(&mut state.actor, tuning);
    state.progression.update_camera(&state.actor, tuning);
    state.progression.check_defeat(&state.actor, tuning, &mut events);

    state.time_ticks += 1;
    events
}

impl GameState {
    /// Menu → instructions
    pub fn show_how_to_play(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.progression.phase {
            GamePhase::Menu => self.progression.set_phase(GamePhase::HowToPlay, &mut events),
            phase => log::debug!("Ignoring how-to-play request in {:?}", phase),
        }
        events
    }

    /// Instructions or an active run → menu (the run is abandoned, not reset)
    pub fn back_to_menu(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.progression.phase {
            GamePhase::HowToPlay | GamePhase::Playing => {
                self.progression.set_phase(GamePhase::Menu, &mut events)
            }
            phase => log::debug!("Ignoring back-to-menu request in {:?}", phase),
        }
        events
    }

    /// Begin a run: fresh actor, zero score, new world
    pub fn start_game(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !matches!(self.progression.phase, GamePhase::Menu | GamePhase::HowToPlay) {
            log::debug!("Ignoring start request in {:?}", self.progression.phase);
            return events;
        }
        self.reset_actor();
        self.progression.score = 0;
        self.regenerate_world();
        self.progression.set_phase(GamePhase::Playing, &mut events);
        events
    }

    /// Leave a finished run for the menu with everything reset
    pub fn reset_game(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.progression.phase.is_terminal() {
            log::debug!("Ignoring reset request in {:?}", self.progression.phase);
            return events;
        }
        self.reset_actor();
        self.progression.health = self.settings.tuning.max_health;
        self.progression.camera_offset = 0.0;
        self.progression.score = 0;
        self.regenerate_world();
        self.progression.set_phase(GamePhase::Menu, &mut events);
        events
    }

    /// Restart straight into a new run after game over or victory
    pub fn play_again(&mut self) -> Vec<GameEvent> {
        let mut events = self.reset_game();
        if events.is_empty() {
            return events;
        }
        events.extend(self.start_game());
        events
    }

    /// Score, height and progress for the end-of-run screens
    pub fn summary(&self) -> RunSummary {
        self.progression
            .summary(&self.actor, &self.world, &self.settings.tuning)
    }

    /// Charge meter fill (0..1) for the power bar
    pub fn charge_progress(&self, now_ms: u64) -> f32 {
        self.actor.charge_progress(now_ms, &self.settings.tuning)
    }
}
