//! Asynchronous schedule attachment.
//!
//! Every NPC gets one independent fetch task at spawn; the task's
//! completion races the game loop by design. Until it lands the NPC
//! simply wanders — `PendingSchedule` is the explicit "not yet ready"
//! state. A missing or unreadable document leaves the NPC wandering
//! forever; that is logged and never fatal, and one NPC's failure cannot
//! affect its siblings. There are no timeouts and nothing to cancel.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::tasks::futures_lite::future;
use bevy::tasks::{IoTaskPool, Task};
use thiserror::Error;

use crate::shared::*;

use super::movement::Patrol;
use super::schedule::{normalize_schedule, Schedule};

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The document could not be fetched at all (missing file, I/O
    /// failure, unsupported platform).
    #[error("schedule unreadable: {0}")]
    Unavailable(String),
    /// The document was fetched but is not JSON. Field-level garbage
    /// inside valid JSON is *not* an error; normalization absorbs it.
    #[error("schedule JSON malformed: {0}")]
    Malformed(String),
}

/// In-flight schedule fetch for one NPC.
#[derive(Component)]
pub struct PendingSchedule(pub Task<Result<Schedule, ScheduleError>>);

/// Where an NPC's schedule document lives, by id.
pub fn schedule_path(npc_id: &str) -> PathBuf {
    Path::new("assets")
        .join("npcs")
        .join("schedules")
        .join(format!("{npc_id}.json"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_schedule_file(path: &Path) -> Result<Schedule, ScheduleError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| ScheduleError::Unavailable(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| ScheduleError::Malformed(e.to_string()))?;
    Ok(normalize_schedule(&value))
}

#[cfg(target_arch = "wasm32")]
pub fn load_schedule_file(_path: &Path) -> Result<Schedule, ScheduleError> {
    Err(ScheduleError::Unavailable(
        "no filesystem on this platform".into(),
    ))
}

/// Kick off the fetch for one NPC. The returned component is attached to
/// the entity and polled by [`poll_pending_schedules`].
pub fn begin_schedule_fetch(npc_id: &str) -> PendingSchedule {
    let path = schedule_path(npc_id);
    let task = IoTaskPool::get().spawn(async move { load_schedule_file(&path) });
    PendingSchedule(task)
}

/// System: apply any fetch tasks that have completed since last frame.
pub fn poll_pending_schedules(
    mut commands: Commands,
    mut query: Query<(Entity, &Npc, &Transform, &mut Patrol, &mut PendingSchedule)>,
) {
    for (entity, npc, transform, mut patrol, mut pending) in query.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut pending.0)) else {
            continue;
        };

        match result {
            Ok(schedule) if !schedule.waypoints.is_empty() => {
                patrol.assign(&schedule, transform.translation.truncate());
                info!(
                    "[Npc] schedule attached to '{}' ({} waypoints)",
                    npc.id,
                    schedule.waypoints.len()
                );
            }
            Ok(_) => {
                warn!("[Npc] schedule for '{}' has no waypoints; idling", npc.id);
            }
            Err(err) => {
                warn!("[Npc] no schedule for '{}': {err}; idling", npc.id);
            }
        }

        commands.entity(entity).remove::<PendingSchedule>();
    }
}
