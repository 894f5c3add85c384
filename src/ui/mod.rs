//! UI domain plugin: renders the shared dialogue bubble.

use bevy::prelude::*;

use crate::shared::GameState;

mod dialogue_bubble;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                dialogue_bubble::tick_dialogue,
                dialogue_bubble::render_dialogue,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
