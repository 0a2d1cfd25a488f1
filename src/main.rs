//! Kanga Climb headless driver
//!
//! Loads settings, plays one run with a search-based autopilot against a fake
//! monotonic clock and prints the run summary as JSON.
//!
//! Usage: `kanga-climb [settings.json]`

use serde::Serialize;

use kanga_climb::Settings;
use kanga_climb::consts::SIM_TICK_MS;
use kanga_climb::sim::{GameEvent, GamePhase, GameState, Intent, RunSummary, TickInput, tick};

/// Give up after this many moves
const MAX_MOVES: u32 = 400;
/// Give up after this many moves in a row without climbing
const MAX_STALLS: u32 = 25;
/// Ticks to wait for touchdown after a release
const MAX_FLIGHT_TICKS: u32 = 600;

const HOLD_TIMES_MS: [u64; 8] = [150, 300, 450, 600, 800, 1000, 1250, 1500];
const WALK_TIMES_MS: [u64; 3] = [0, 160, 400];

/// One autopilot move: optional walk, then a charged jump
#[derive(Debug, Clone, Copy)]
struct Plan {
    walk_left: bool,
    walk_ms: u64,
    face_left: bool,
    hold_ms: u64,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    moves: u32,
    ticks: u64,
    jumps: u32,
    items: u32,
    items_left: usize,
    summary: RunSummary,
}

/// Session plus the fake clock driving it
#[derive(Clone)]
struct Driver {
    state: GameState,
    now_ms: u64,
    jumps: u32,
    items: u32,
}

impl Driver {
    fn step(&mut self, intents: &[Intent]) {
        self.now_ms += SIM_TICK_MS;
        let events = tick(&mut self.state, &TickInput::with(intents.iter().copied()), self.now_ms);
        for event in events {
            match event {
                GameEvent::Jumped { .. } => self.jumps += 1,
                GameEvent::ItemCollected { .. } => self.items += 1,
                _ => {}
            }
        }
    }

    fn playing(&self) -> bool {
        self.state.phase() == GamePhase::Playing
    }

    fn walk(&mut self, left: bool, ms: u64) {
        if ms == 0 {
            return;
        }
        let (start, stop) = if left {
            (Intent::MoveLeftStart, Intent::MoveLeftStop)
        } else {
            (Intent::MoveRightStart, Intent::MoveRightStop)
        };
        let until = self.now_ms + ms;
        self.step(&[start]);
        while self.now_ms < until && self.playing() {
            self.step(&[]);
        }
        self.step(&[stop]);
        self.wait_for_ground();
    }

    fn jump(&mut self, face_left: bool, hold_ms: u64) {
        // Tap the direction to set facing without walking, then charge
        let aim = if face_left {
            [Intent::MoveLeftStart, Intent::MoveLeftStop, Intent::ChargeStart]
        } else {
            [Intent::MoveRightStart, Intent::MoveRightStop, Intent::ChargeStart]
        };
        let release_at = self.now_ms + SIM_TICK_MS + hold_ms;
        self.step(&aim);
        while self.now_ms + SIM_TICK_MS < release_at && self.playing() {
            self.step(&[]);
        }
        self.step(&[Intent::ChargeRelease]);
        self.wait_for_ground();
    }

    fn wait_for_ground(&mut self) {
        for _ in 0..MAX_FLIGHT_TICKS {
            if !self.playing() || self.state.actor.on_ground() {
                return;
            }
            self.step(&[]);
        }
    }

    fn run(&mut self, plan: Plan) {
        self.walk(plan.walk_left, plan.walk_ms);
        if self.playing() {
            self.jump(plan.face_left, plan.hold_ms);
        }
    }

    /// Higher is better, `None` for a lost run
    fn rating(&self) -> Option<f32> {
        match self.state.phase() {
            GamePhase::Victory => Some(f32::MAX),
            GamePhase::Playing if self.state.actor.on_ground() => {
                Some(-self.state.actor.pos.y + self.state.progression.score as f32 * 0.1)
            }
            _ => None,
        }
    }
}

fn candidate_plans() -> Vec<Plan> {
    let mut plans = Vec::new();
    for &walk_ms in &WALK_TIMES_MS {
        for walk_left in [false, true] {
            if walk_ms == 0 && walk_left {
                continue;
            }
            for face_left in [false, true] {
                for &hold_ms in &HOLD_TIMES_MS {
                    plans.push(Plan {
                        walk_left,
                        walk_ms,
                        face_left,
                        hold_ms,
                    });
                }
            }
        }
    }
    plans
}

/// Try every plan on a copy of the session and keep the best outcome
fn best_plan(driver: &Driver, plans: &[Plan]) -> Option<(Plan, f32)> {
    plans
        .iter()
        .filter_map(|&plan| {
            let mut trial = driver.clone();
            trial.run(plan);
            trial.rating().map(|rating| (plan, rating))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Kanga Climb (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut driver = Driver {
        state: GameState::new(settings),
        now_ms: 0,
        jumps: 0,
        items: 0,
    };
    log::info!(
        "Seed {} with {} platforms",
        driver.state.seed,
        driver.state.world.platforms.len()
    );
    driver.state.start_game();
    driver.wait_for_ground();

    let plans = candidate_plans();
    let mut moves = 0;
    let mut stalls = 0;
    while driver.playing() && moves < MAX_MOVES && stalls < MAX_STALLS {
        let before = driver.state.actor.max_height;
        match best_plan(&driver, &plans) {
            Some((plan, _)) => driver.run(plan),
            None => {
                log::warn!("Every move loses the run, taking a small hop");
                driver.run(Plan {
                    walk_left: false,
                    walk_ms: 0,
                    face_left: false,
                    hold_ms: HOLD_TIMES_MS[0],
                });
            }
        }
        moves += 1;
        if driver.state.actor.max_height > before {
            stalls = 0;
        } else {
            stalls += 1;
        }
        log::debug!(
            "Move {}: height {:.0}, score {}",
            moves,
            driver.state.actor.max_height,
            driver.state.progression.score
        );
    }

    if driver.playing() {
        log::info!("Autopilot stuck after {} moves", moves);
    }

    let report = Report {
        seed: driver.state.seed,
        moves,
        ticks: driver.state.time_ticks,
        jumps: driver.jumps,
        items: driver.items,
        items_left: driver.state.world.remaining_items(),
        summary: driver.state.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
