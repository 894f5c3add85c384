//! Per-tick NPC state machine.
//!
//! Priority order each tick: an interaction pause freezes the NPC
//! entirely; otherwise a patrol with segments advances (waiting at
//! waypoints, walking segments, snapping exactly onto endpoints);
//! otherwise the NPC falls back to an idle wander. The collision volume
//! is derived from the freshly-updated position wherever it is consumed,
//! so it never lags the motion.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

use super::schedule::{build_segments, world_speed, Schedule, Segment};

/// Patrol progress: the derived segments plus a cursor into them.
/// An empty segment list means "no patrol" and the NPC wanders instead.
#[derive(Component, Debug, Clone)]
pub struct Patrol {
    pub segments: Vec<Segment>,
    pub index: usize,
    /// Seconds spent walking the current segment.
    pub elapsed: f32,
    /// Seconds left dwelling at the last-reached waypoint.
    pub wait_left: f32,
    /// World units per second; also scales the wander drift.
    pub speed: f32,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            index: 0,
            elapsed: 0.0,
            wait_left: 0.0,
            speed: 60.0,
        }
    }
}

impl Patrol {
    /// Adopt a schedule, anchoring relative waypoints at `origin` (the
    /// NPC's position right now). A schedule with no waypoints at all is
    /// ignored; one lone waypoint still sets the speed but produces no
    /// segments, leaving the NPC in wander.
    pub fn assign(&mut self, schedule: &Schedule, origin: Vec2) {
        if schedule.waypoints.is_empty() {
            return;
        }
        self.speed = world_speed(schedule.speed);
        self.segments = build_segments(schedule, origin, self.speed);
        self.index = 0;
        self.elapsed = 0.0;
        self.wait_left = schedule.waypoints[0].wait / TICK_RATE;
    }

    pub fn is_patrolling(&self) -> bool {
        !self.segments.is_empty()
    }

    fn advance_segment(&mut self) {
        // Wraps modulo the segment count whether or not the schedule
        // loops; a non-looping patrol re-walks from its first waypoint.
        self.index = (self.index + 1) % self.segments.len();
        self.elapsed = 0.0;
    }
}

/// Idle drift used when no patrol is active: hold a direction for a
/// randomized interval, then re-roll.
#[derive(Component, Debug, Clone, Default)]
pub struct WanderAi {
    pub dir: Vec2,
    pub elapsed: f32,
    pub duration: f32,
}

/// Countdown started by a successful interaction. While positive, the NPC
/// does not move at all.
#[derive(Component, Debug, Clone, Default)]
pub struct InteractionPause {
    pub remaining: f32,
}

/// Advance a patrol by `dt`, mutating `pos` in place.
///
/// Waiting burns the dwell timer first. A zero-duration segment is an
/// instantaneous jump straight into its wait. Arrival snaps the position
/// exactly onto the segment endpoint — never the overshot interpolation —
/// so repeated traversals accumulate no drift.
pub fn advance_patrol(patrol: &mut Patrol, pos: &mut Vec2, dt: f32) {
    if patrol.segments.is_empty() {
        return;
    }

    if patrol.wait_left > 0.0 {
        patrol.wait_left = (patrol.wait_left - dt).max(0.0);
        return;
    }

    let seg = patrol.segments[patrol.index];

    if seg.duration <= 1e-6 {
        *pos = seg.end;
        patrol.wait_left = seg.wait_after;
        patrol.advance_segment();
        return;
    }

    patrol.elapsed += dt;
    let t = patrol.elapsed / seg.duration;

    if t >= 1.0 {
        *pos = seg.end;
        patrol.wait_left = seg.wait_after;
        patrol.advance_segment();
    } else {
        *pos = seg.start.lerp(seg.end, t);
    }
}

/// Advance the idle wander by `dt`: re-roll a random unit direction every
/// 0.75–2.25 seconds and drift at a quarter of the patrol speed.
pub fn wander_step(
    wander: &mut WanderAi,
    pos: &mut Vec2,
    speed: f32,
    dt: f32,
    rng: &mut impl Rng,
) {
    wander.elapsed += dt;
    if wander.elapsed >= wander.duration {
        wander.elapsed = 0.0;
        wander.duration = rng.gen_range(0.75_f32..2.25_f32);
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        wander.dir = Vec2::new(angle.cos(), angle.sin());
    }
    *pos += wander.dir * (speed * 0.25 * dt);
}

/// System: tick every live NPC once, in place.
pub fn update_npcs(
    time: Res<Time>,
    mut query: Query<
        (
            &mut Transform,
            &mut Patrol,
            &mut WanderAi,
            &mut InteractionPause,
        ),
        With<Npc>,
    >,
) {
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();

    for (mut transform, mut patrol, mut wander, mut pause) in query.iter_mut() {
        if pause.remaining > 0.0 {
            pause.remaining = (pause.remaining - dt).max(0.0);
            continue;
        }

        let mut pos = transform.translation.truncate();

        if patrol.is_patrolling() {
            advance_patrol(&mut patrol, &mut pos, dt);
        } else {
            let speed = patrol.speed;
            wander_step(&mut wander, &mut pos, speed, dt, &mut rng);
            // Keep wanderers inside the world.
            pos.x = pos.x.clamp(0.0, WORLD_W);
            pos.y = pos.y.clamp(0.0, WORLD_H);
        }

        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }
}
