//! Player domain plugin for Emberhollow.
//!
//! Movement with axis-separated blocking, stamina, camera follow/zoom,
//! and the mouse/keyboard bindings that feed placement and interaction
//! events into the other domains.

use bevy::prelude::*;

use crate::shared::*;

pub mod camera;
pub mod input;
pub mod movement;
pub mod spawn;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerStamina>();
        app.init_resource::<SelectedBlock>();
        app.init_resource::<camera::CameraZoom>();

        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);
        app.add_systems(OnEnter(GameState::Loading), spawn::despawn_player);

        app.add_systems(
            Update,
            (
                input::mouse_actions,
                input::block_selection,
                input::reset_world_key,
                movement::player_movement,
                camera::camera_zoom,
                camera::camera_follow_player.after(movement::player_movement),
            )
                .run_if(in_state(GameState::Playing)),
        );

        // Pause toggles from either side of the pause boundary.
        app.add_systems(
            Update,
            input::toggle_pause
                .run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
        );
    }
}

/// Which block kind the next left-click will place.
#[derive(Resource, Debug)]
pub struct SelectedBlock(pub BlockKind);

impl Default for SelectedBlock {
    fn default() -> Self {
        Self(BlockKind::Fence)
    }
}
