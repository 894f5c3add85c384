//! Waypoint schedules: the authored patrol format and its derived,
//! time-parameterized segments.
//!
//! Schedules arrive as loose JSON documents (`assets/npcs/schedules/`).
//! Normalization is total: any field that is missing or the wrong type
//! collapses to a default, so a garbage document yields a well-formed
//! (possibly empty) schedule rather than an error.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::TICK_RATE;

/// Default authored speed when a schedule supplies none: 0.4 units/tick,
/// i.e. 24 units/sec once normalized.
pub const DEFAULT_SCHEDULE_SPEED: f32 = 0.4;

/// An authored point in a patrol, plus how many ticks to dwell there
/// before departing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub wait: f32,
}

/// The authored patrol document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Close the patrol back to the first waypoint and repeat forever.
    #[serde(rename = "loop", default)]
    pub looped: bool,
    /// Authored speed; see [`world_speed`] for interpretation.
    pub speed: f32,
    /// Waypoint coordinates are offsets from the NPC's position at
    /// assignment time rather than absolute world positions.
    #[serde(default)]
    pub relative: bool,
    pub waypoints: Vec<Waypoint>,
}

/// A straight-line traversal between two consecutive waypoints, with its
/// duration precomputed from distance and speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    /// Seconds to traverse; 0 for coincident endpoints (instant jump).
    pub duration: f32,
    /// Seconds to dwell at `end` after arriving.
    pub wait_after: f32,
}

/// Coerce a loose JSON document into a well-formed schedule. Never fails:
/// missing/mistyped numbers become 0 (waypoint fields) or the default
/// speed, flags default to false, and a missing waypoint array becomes
/// an empty one.
pub fn normalize_schedule(raw: &Value) -> Schedule {
    let looped = raw.get("loop").and_then(Value::as_bool).unwrap_or(false);
    let relative = raw.get("relative").and_then(Value::as_bool).unwrap_or(false);

    let speed = match raw.get("speed").and_then(Value::as_f64) {
        Some(s) if s != 0.0 => s as f32,
        _ => DEFAULT_SCHEDULE_SPEED,
    };

    let waypoints = raw
        .get("waypoints")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|w| Waypoint {
                    x: num_or_zero(w.get("x")),
                    y: num_or_zero(w.get("y")),
                    wait: num_or_zero(w.get("wait")),
                })
                .collect()
        })
        .unwrap_or_default();

    Schedule {
        looped,
        speed,
        relative,
        waypoints,
    }
}

fn num_or_zero(v: Option<&Value>) -> f32 {
    v.and_then(Value::as_f64).unwrap_or(0.0) as f32
}

/// Convert an authored speed into world units per second.
///
/// Authoring convention carried over from the original data: a value of
/// 5 or less is units-per-tick and gets upscaled by the tick rate; larger
/// values are already units-per-second. Either way the result is clamped
/// to at least 1 unit/sec so a patrol can never stall.
pub fn world_speed(authored: f32) -> f32 {
    let speed = if authored <= 5.0 {
        authored * TICK_RATE
    } else {
        authored
    };
    speed.max(1.0)
}

/// Build the traversal segments for a schedule.
///
/// Relative schedules are anchored here, once: every waypoint is offset by
/// `origin` (the NPC's position at assignment time), so later movement
/// never re-anchors the path. Fewer than two waypoints produce no
/// segments; a looped schedule gains one closing segment from the last
/// waypoint back to the first. `speed` is in world units per second.
pub fn build_segments(schedule: &Schedule, origin: Vec2, speed: f32) -> Vec<Segment> {
    if schedule.waypoints.len() < 2 {
        return Vec::new();
    }

    let offset = if schedule.relative { origin } else { Vec2::ZERO };
    let at = |wp: &Waypoint| Vec2::new(wp.x, wp.y) + offset;

    let make = |a: &Waypoint, b: &Waypoint| {
        let start = at(a);
        let end = at(b);
        Segment {
            start,
            end,
            duration: start.distance(end) / speed,
            wait_after: b.wait / TICK_RATE,
        }
    };

    let mut segments: Vec<Segment> = schedule
        .waypoints
        .windows(2)
        .map(|pair| make(&pair[0], &pair[1]))
        .collect();

    if schedule.looped {
        if let (Some(last), Some(first)) = (schedule.waypoints.last(), schedule.waypoints.first())
        {
            segments.push(make(last, first));
        }
    }

    segments
}
