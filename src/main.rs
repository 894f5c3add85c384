mod geometry;
mod npcs;
mod player;
mod shared;
mod ui;
mod world;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Emberhollow".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<CurrentDialogue>()
        // Events
        .add_event::<PlaceBlockEvent>()
        .add_event::<RemoveBlockEvent>()
        .add_event::<NpcInteractEvent>()
        // Domain plugins
        .add_plugins(player::PlayerPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        // World reset bounces through Loading; nothing else to load,
        // since block kinds and NPC definitions are compile-time data.
        .add_systems(OnEnter(GameState::Loading), finish_loading)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(WORLD_W / 2.0, WORLD_H / 2.0, 0.0)
            .with_scale(Vec3::new(1.0 / DEFAULT_ZOOM, 1.0 / DEFAULT_ZOOM, 1.0)),
    ));
}

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}
