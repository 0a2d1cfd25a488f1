//! Score, health, height and win/loss bookkeeping
//!
//! Runs after collision resolution each tick. Victory and defeat are normal
//! phase transitions reported as `GameEvent::PhaseChanged`.

use serde::{Deserialize, Serialize};

use super::collision::LandingEvent;
use super::physics::Actor;
use super::rect::Rect;
use super::state::{CollectibleItem, GameEvent, GamePhase, PlatformKind, ProgressionState, World};
use crate::tuning::Tuning;

/// End-of-run numbers for the summary screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub phase: GamePhase,
    pub score: u64,
    /// Best height in display units (floored)
    pub height: u32,
    /// Share of the climb completed, 0-100
    pub progress_percent: u32,
}

impl ProgressionState {
    /// Move to `phase`, recording the transition
    pub fn set_phase(&mut self, phase: GamePhase, events: &mut Vec<GameEvent>) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    /// Height of a y position in display units (negative below the spawn point)
    pub fn height_at(&self, y: f32, tuning: &Tuning) -> f32 {
        (self.starting_y - y) / tuning.height_scale
    }

    /// Apply a landing: one-shot health bonus, victory check
    pub fn record_landing(
        &mut self,
        world: &mut World,
        landing: &LandingEvent,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        let heavy = landing.impact > tuning.heavy_landing_momentum;
        log::debug!(
            "Landed on platform {} ({:?}), first={} impact={:.2}",
            landing.platform,
            landing.kind,
            landing.first_landing,
            landing.impact
        );
        events.push(GameEvent::Landed {
            platform: landing.platform,
            kind: landing.kind,
            first_landing: landing.first_landing,
            heavy,
        });

        if let Some(platform) = world.platforms.get_mut(landing.platform) {
            if !platform.landed {
                platform.landed = true;
                self.health = (self.health + tuning.first_landing_bonus).min(tuning.max_health);
                events.push(GameEvent::HealthRestored {
                    health: self.health,
                });
            }
        }

        if landing.kind == PlatformKind::Victory {
            self.set_phase(GamePhase::Victory, events);
        }
    }

    /// Pick up every uncollected item the body overlaps. Returns how many.
    pub fn collect_items(
        &mut self,
        body: &Rect,
        items: &mut [CollectibleItem],
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        let mut collected = 0;
        for (index, item) in items.iter_mut().enumerate() {
            if item.collected || !body.intersects(&item.rect) {
                continue;
            }
            item.collected = true;
            self.score += tuning.item_score;
            collected += 1;
            log::debug!("Collected {}! Score: {}", item.kind.name(), self.score);
            events.push(GameEvent::ItemCollected {
                item: index,
                kind: item.kind,
                score: self.score,
            });
        }
        collected
    }

    /// Raise the actor's best height if it climbed higher
    pub fn update_max_height(&self, actor: &mut Actor, tuning: &Tuning) {
        let current = self.height_at(actor.pos.y, tuning).max(0.0);
        actor.max_height = actor.max_height.max(current);
    }

    /// Ease the camera toward keeping the actor `camera_lead` below the top
    pub fn update_camera(&mut self, actor: &Actor, tuning: &Tuning) {
        let target = -actor.pos.y + tuning.camera_lead;
        self.camera_offset += (target - self.camera_offset) * tuning.camera_smoothing;
    }

    /// Has the actor fallen out of the run?
    ///
    /// Either it dropped `fall_limit` below a peak above `fall_grace_height`,
    /// or it went below the pit line.
    pub fn is_defeated(&self, actor: &Actor, tuning: &Tuning) -> bool {
        let current = self.height_at(actor.pos.y, tuning);
        let fell_off_progress =
            actor.max_height > tuning.fall_grace_height && actor.max_height - current > tuning.fall_limit;
        fell_off_progress || actor.pos.y > tuning.pit_y
    }

    /// Move to game over if the actor is lost. Returns true on defeat.
    pub fn check_defeat(&mut self, actor: &Actor, tuning: &Tuning, events: &mut Vec<GameEvent>) -> bool {
        if self.phase != GamePhase::Playing || !self.is_defeated(actor, tuning) {
            return false;
        }
        log::info!(
            "Fell at y={:.0} (best height {:.0}), game over",
            actor.pos.y,
            actor.max_height
        );
        self.set_phase(GamePhase::GameOver, events);
        true
    }

    /// Numbers for the game over / victory screens
    pub fn summary(&self, actor: &Actor, world: &World, tuning: &Tuning) -> RunSummary {
        let top_height = world.world_height / tuning.height_scale;
        let height = if self.phase == GamePhase::Victory {
            top_height
        } else {
            actor.max_height
        }
        .floor();
        let progress = if top_height > 0.0 {
            (height / top_height * 100.0).floor().min(100.0)
        } else {
            100.0
        };

        RunSummary {
            phase: self.phase,
            score: self.score,
            height: height.max(0.0) as u32,
            progress_percent: progress.max(0.0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Platform, TrashKind};

    fn playing(tuning: &Tuning) -> ProgressionState {
        let mut progression = ProgressionState::new(420.0, tuning);
        progression.phase = GamePhase::Playing;
        progression
    }

    fn one_platform_world(kind: PlatformKind) -> World {
        let platform = Platform::from_blocks(300.0, 200.0, 4, 1, kind);
        let item = CollectibleItem::above(&platform, 0, TrashKind::Can);
        World {
            canvas_width: 800.0,
            canvas_height: 600.0,
            world_height: 3000.0,
            platforms: vec![platform],
            items: vec![item],
            relaxed_placements: Vec::new(),
        }
    }

    fn landing(kind: PlatformKind, first_landing: bool) -> LandingEvent {
        LandingEvent {
            platform: 0,
            kind,
            first_landing,
            impact: 0.0,
        }
    }

    #[test]
    fn test_first_landing_bonus_once() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        progression.health = 50;
        let mut world = one_platform_world(PlatformKind::Trash);
        let mut events = Vec::new();

        progression.record_landing(&mut world, &landing(PlatformKind::Trash, true), &tuning, &mut events);
        assert_eq!(progression.health, 52);
        assert!(world.platforms[0].landed);

        progression.record_landing(&mut world, &landing(PlatformKind::Trash, false), &tuning, &mut events);
        assert_eq!(progression.health, 52);
        let restored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::HealthRestored { .. }))
            .count();
        assert_eq!(restored, 1);
    }

    #[test]
    fn test_health_capped() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        progression.health = 99;
        let mut world = one_platform_world(PlatformKind::Rock);
        let mut events = Vec::new();

        progression.record_landing(&mut world, &landing(PlatformKind::Rock, true), &tuning, &mut events);
        assert_eq!(progression.health, 100);
    }

    #[test]
    fn test_victory_landing_ends_run() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut world = one_platform_world(PlatformKind::Victory);
        let mut events = Vec::new();

        progression.record_landing(&mut world, &landing(PlatformKind::Victory, true), &tuning, &mut events);
        assert_eq!(progression.phase, GamePhase::Victory);
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::Victory,
        }));
    }

    #[test]
    fn test_collect_items_is_one_shot() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut world = one_platform_world(PlatformKind::Trash);
        let mut events = Vec::new();
        let body = Rect::new(330.0, 136.0, 64.0, 64.0);

        assert_eq!(progression.collect_items(&body, &mut world.items, &tuning, &mut events), 1);
        assert_eq!(progression.score, 10);
        assert!(world.items[0].collected);

        assert_eq!(progression.collect_items(&body, &mut world.items, &tuning, &mut events), 0);
        assert_eq!(progression.score, 10);
    }

    #[test]
    fn test_collecting_every_item_scores_each_platform() {
        use crate::sim::worldgen::generate_world;
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut world = generate_world(&mut rng, 800.0, 600.0, 3000.0);
        let mut events = Vec::new();

        let bodies: Vec<Rect> = world.items.iter().map(|i| i.rect).collect();
        for body in &bodies {
            progression.collect_items(body, &mut world.items, &tuning, &mut events);
        }
        let expected = 10 * (world.platforms.len() as u64 - 1);
        assert_eq!(progression.score, expected);
        assert_eq!(world.remaining_items(), 0);

        // Everything already picked up: a second sweep scores nothing
        for body in &bodies {
            assert_eq!(progression.collect_items(body, &mut world.items, &tuning, &mut events), 0);
        }
        assert_eq!(progression.score, expected);
    }

    #[test]
    fn test_max_height_is_monotonic() {
        let tuning = Tuning::default();
        let progression = playing(&tuning);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);

        actor.pos.y = 170.0;
        progression.update_max_height(&mut actor, &tuning);
        assert_eq!(actor.max_height, 25.0);

        actor.pos.y = 400.0;
        progression.update_max_height(&mut actor, &tuning);
        assert_eq!(actor.max_height, 25.0);

        // Below the spawn point counts as zero
        let mut fresh = Actor::spawn(800.0, 600.0, &tuning);
        fresh.pos.y = 500.0;
        progression.update_max_height(&mut fresh, &tuning);
        assert_eq!(fresh.max_height, 0.0);
    }

    #[test]
    fn test_fell_off_progress() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);
        actor.max_height = 25.0;
        let mut events = Vec::new();

        // Height -175: 200 below the peak exactly, not yet over
        actor.pos.y = 2170.0;
        assert!(progression.height_at(actor.pos.y, &tuning) == -175.0);
        let tuning_no_pit = Tuning {
            pit_y: f32::MAX,
            ..Tuning::default()
        };
        assert!(!progression.check_defeat(&actor, &tuning_no_pit, &mut events));

        actor.pos.y = 2180.0;
        assert!(progression.check_defeat(&actor, &tuning_no_pit, &mut events));
        assert_eq!(progression.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_low_peak_is_exempt() {
        let tuning = Tuning {
            pit_y: f32::MAX,
            ..Tuning::default()
        };
        let progression = playing(&tuning);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);
        actor.max_height = 20.0;
        actor.pos.y = 5000.0;
        assert!(!progression.is_defeated(&actor, &tuning));
    }

    #[test]
    fn test_pit_defeat_regardless_of_history() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);
        let mut events = Vec::new();

        actor.pos.y = 800.0;
        assert!(!progression.check_defeat(&actor, &tuning, &mut events));
        actor.pos.y = 801.0;
        assert!(progression.check_defeat(&actor, &tuning, &mut events));
    }

    #[test]
    fn test_camera_eases_toward_target() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);
        actor.pos.y = 300.0;
        progression.update_camera(&actor, &tuning);
        assert!((progression.camera_offset - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_summary_progress() {
        let tuning = Tuning::default();
        let mut progression = playing(&tuning);
        let world = one_platform_world(PlatformKind::Trash);
        let mut actor = Actor::spawn(800.0, 600.0, &tuning);
        actor.max_height = 75.9;
        progression.score = 40;

        let summary = progression.summary(&actor, &world, &tuning);
        assert_eq!(summary.height, 75);
        assert_eq!(summary.progress_percent, 25);
        assert_eq!(summary.score, 40);

        progression.phase = GamePhase::Victory;
        let summary = progression.summary(&actor, &world, &tuning);
        assert_eq!(summary.height, 300);
        assert_eq!(summary.progress_percent, 100);
    }
}
