//! Collision detection and response against the platform list
//!
//! Landings are only recognised on a platform's top surface. Actors that
//! brush past a platform's side while falling get nudged off its edge rather
//! than resting on a corner.

use serde::{Deserialize, Serialize};

use super::physics::Actor;
use super::rect::Rect;
use super::state::{Platform, PlatformKind};
use crate::tuning::Tuning;

/// A resolved top-surface landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingEvent {
    /// Index into the world's platform list
    pub platform: usize,
    pub kind: PlatformKind,
    /// The platform had never been landed on before
    pub first_landing: bool,
    /// Actor momentum at touchdown
    pub impact: f32,
}

/// Check whether a falling body qualifies as landing on `platform`'s top
///
/// The body must be moving down, its top edge above the platform top, and its
/// feet less than `tolerance` into the platform.
pub fn is_top_landing(body: &Rect, vy: f32, platform: &Rect, tolerance: f32) -> bool {
    vy > 0.0 && body.top() < platform.top() && body.bottom() - platform.top() < tolerance
}

/// Direction (-1 / +1) to slide a body off `platform`'s edge, if its center
/// is within `edge_zone` of either edge
pub fn edge_slide_direction(body: &Rect, platform: &Rect, edge_zone: f32) -> Option<f32> {
    let center = body.center_x();
    if center < platform.left() + edge_zone || center > platform.right() - edge_zone {
        Some(if center < platform.center_x() { -1.0 } else { 1.0 })
    } else {
        None
    }
}

/// Is a body standing on any platform top (within `epsilon`)?
pub fn is_supported(body: &Rect, platforms: &[Platform], epsilon: f32) -> bool {
    platforms.iter().any(|p| {
        body.overlaps_horizontally(&p.rect) && (body.bottom() - p.rect.top()).abs() <= epsilon
    })
}

/// Resolve the actor against every platform for one tick
///
/// Platforms are visited in generation order and the first qualifying landing
/// wins. Overlaps that do not qualify are each checked for the edge slide.
pub fn resolve(
    actor: &mut Actor,
    platforms: &[Platform],
    now_ms: u64,
    tuning: &Tuning,
) -> Option<LandingEvent> {
    if actor.on_ground() {
        if is_supported(&actor.rect(), platforms, tuning.ground_contact_epsilon) {
            return None;
        }
        log::debug!("Walked off a platform edge at x={:.1}", actor.pos.x);
        actor.leave_ground();
    }

    let mut landing = None;

    for (index, platform) in platforms.iter().enumerate() {
        let body = actor.rect();
        if !body.intersects(&platform.rect) {
            continue;
        }

        let vy = actor.vel().y;
        if landing.is_none() && is_top_landing(&body, vy, &platform.rect, tuning.landing_tolerance)
        {
            let impact = actor.land(platform.rect.top(), now_ms, tuning);
            landing = Some(LandingEvent {
                platform: index,
                kind: platform.kind,
                first_landing: !platform.landed,
                impact,
            });
        } else if vy > 0.0 {
            if let Some(direction) = edge_slide_direction(&body, &platform.rect, tuning.edge_zone) {
                actor.apply_edge_slide(direction * tuning.edge_slide_speed);
            }
        }
    }

    landing
}
