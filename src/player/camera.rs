//! Camera follow and zoom.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

use crate::shared::*;

/// Current zoom factor (screen pixels per world unit).
#[derive(Resource, Debug)]
pub struct CameraZoom(pub f32);

impl Default for CameraZoom {
    fn default() -> Self {
        Self(DEFAULT_ZOOM)
    }
}

/// System: ease the camera toward the player, clamped so the view never
/// leaves the world.
pub fn camera_follow_player(
    time: Res<Time>,
    zoom: Res<CameraZoom>,
    player: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player_transform) = player.get_single() else {
        return;
    };
    let Ok(mut cam_transform) = cameras.get_single_mut() else {
        return;
    };

    let half_w = SCREEN_WIDTH / zoom.0 / 2.0;
    let half_h = SCREEN_HEIGHT / zoom.0 / 2.0;

    let target = Vec2::new(
        clamp_axis(player_transform.translation.x, half_w, WORLD_W),
        clamp_axis(player_transform.translation.y, half_h, WORLD_H),
    );

    // Exponential ease, compensated so the feel is frame-rate independent.
    let t = (CAM_EASE * time.delta_secs() * TICK_RATE).min(1.0);
    cam_transform.translation.x += (target.x - cam_transform.translation.x) * t;
    cam_transform.translation.y += (target.y - cam_transform.translation.y) * t;
}

fn clamp_axis(value: f32, half_view: f32, world_extent: f32) -> f32 {
    if half_view * 2.0 >= world_extent {
        world_extent / 2.0
    } else {
        value.clamp(half_view, world_extent - half_view)
    }
}

/// System: mouse wheel zooms between [`ZOOM_MIN`] and [`ZOOM_MAX`].
pub fn camera_zoom(
    mut wheel: EventReader<MouseWheel>,
    mut zoom: ResMut<CameraZoom>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let mut changed = false;
    for event in wheel.read() {
        if event.y != 0.0 {
            zoom.0 = (zoom.0 + event.y.signum() * ZOOM_SPEED).clamp(ZOOM_MIN, ZOOM_MAX);
            changed = true;
        }
    }
    if changed {
        if let Ok(mut cam_transform) = cameras.get_single_mut() {
            cam_transform.scale = Vec3::new(1.0 / zoom.0, 1.0 / zoom.0, 1.0);
        }
    }
}
