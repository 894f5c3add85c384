//! NPC domain plugin for Emberhollow.
//!
//! Owns the waypoint-patrol state machine, the spawn-order roster, the
//! player push-out resolver, right-click interaction, and the async
//! schedule attachment. Communicates with other domains only through
//! shared resources and events.

use bevy::prelude::*;

use crate::shared::*;

pub mod collision;
pub mod interaction;
pub mod loader;
pub mod movement;
pub mod schedule;
pub mod spawning;

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NpcRoster>();

        // Spawn NPCs when entering Playing; bulk-clear on world reset.
        app.add_systems(OnEnter(GameState::Playing), spawning::spawn_world_npcs);
        app.add_systems(OnEnter(GameState::Loading), spawning::despawn_all_npcs);

        app.add_systems(
            Update,
            (
                // Apply schedule fetches that completed since last frame
                loader::poll_pending_schedules,
                // Advance every NPC's state machine once per tick
                movement::update_npcs,
                // Route right-click events to the roster
                interaction::handle_npc_interaction,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
