//! Player spawn and reset.

use bevy::prelude::*;

use crate::shared::*;

pub fn spawn_player(mut commands: Commands, existing: Query<Entity, With<Player>>) {
    // Skip if already spawned (e.g. resuming from pause).
    if !existing.is_empty() {
        return;
    }

    commands.spawn((
        Player,
        PlayerMovement::default(),
        PlayerHitbox::default(),
        Sprite {
            color: Color::srgb(0.9, 0.85, 0.6),
            custom_size: Some(Vec2::new(12.0, 16.0)),
            ..default()
        },
        Transform::from_xyz(WORLD_W / 2.0, WORLD_H / 2.0, Z_ENTITY_BASE + 1.0),
    ));

    info!("[Player] spawned at world center");
}

pub fn despawn_player(
    mut commands: Commands,
    query: Query<Entity, With<Player>>,
    mut stamina: ResMut<PlayerStamina>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    stamina.current = STAMINA_MAX;
}
