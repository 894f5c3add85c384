//! Mouse and keyboard bindings.
//!
//! Left click places the selected block at the cursor, right click
//! interacts with NPCs, X removes the block under the cursor, 1/2 switch
//! the selected block, Escape toggles pause, F5 resets the world.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::shared::*;

use super::SelectedBlock;

/// Cursor position in world coordinates, if the cursor is over the window.
fn cursor_world_pos(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

/// System: translate clicks at the cursor into domain events.
pub fn mouse_actions(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    selected: Res<SelectedBlock>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut place_writer: EventWriter<PlaceBlockEvent>,
    mut remove_writer: EventWriter<RemoveBlockEvent>,
    mut interact_writer: EventWriter<NpcInteractEvent>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(world_pos) = cursor_world_pos(window, camera, camera_transform) else {
        return;
    };

    if mouse.just_pressed(MouseButton::Left) {
        place_writer.send(PlaceBlockEvent {
            kind_id: selected.0.id().to_string(),
            world_pos,
        });
    }

    if mouse.just_pressed(MouseButton::Right) {
        interact_writer.send(NpcInteractEvent { world_pos });
    }

    if keyboard.just_pressed(KeyCode::KeyX) {
        remove_writer.send(RemoveBlockEvent { world_pos });
    }
}

/// System: number keys pick the block to place.
pub fn block_selection(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut selected: ResMut<SelectedBlock>,
    mut dialogue: ResMut<CurrentDialogue>,
    player: Query<&Transform, With<Player>>,
) {
    let picked = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(BlockKind::Fence)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(BlockKind::Campfire)
    } else {
        None
    };

    if let Some(kind) = picked {
        selected.0 = kind;
        let anchor = player
            .get_single()
            .map(|t| t.translation.truncate())
            .unwrap_or_default();
        dialogue.show(format!("{} selected", kind.display_name()), 60, anchor);
    }
}

/// System: Escape toggles between Playing and Paused.
pub fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    match state.get() {
        GameState::Playing => next_state.set(GameState::Paused),
        GameState::Paused => next_state.set(GameState::Playing),
        GameState::Loading => {}
    }
}

/// System: F5 tears the world down and rebuilds it from scratch by
/// bouncing through Loading.
pub fn reset_world_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        info!("[Player] world reset requested");
        next_state.set(GameState::Loading);
    }
}
