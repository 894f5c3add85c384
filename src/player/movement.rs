//! Core player movement — reads WASD / arrow keys, applies velocity with
//! axis-separated blocking so the player slides along walls, then lets
//! the NPC roster map the proposed position to a corrected one.
//!
//! The NPC resolver is the only thing that ever adjusts the player's
//! position from outside; input and blocking happen entirely here.

use bevy::prelude::*;

use crate::geometry::{rects_overlap, Rect};
use crate::npcs::collision::resolve_player_collision;
use crate::shared::*;

pub fn player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    objects: Res<WorldObjects>,
    trees: Res<Trees>,
    roster: Res<NpcRoster>,
    mut stamina: ResMut<PlayerStamina>,
    npc_query: Query<(&NpcBody, &Transform), (With<Npc>, Without<Player>)>,
    mut player_query: Query<(&mut Transform, &mut PlayerMovement, &PlayerHitbox), With<Player>>,
) {
    let Ok((mut transform, mut movement, hitbox)) = player_query.get_single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }

    let exhausted = stamina.current < STAMINA_MIN_TO_MOVE;

    if dir != Vec2::ZERO && !exhausted {
        movement.is_moving = true;

        // Normalise so diagonal speed equals cardinal speed.
        let delta = dir.normalize() * movement.speed * dt;
        let current = transform.translation.truncate();

        // Axis-separated collision so the player can slide along walls.
        let can_move_x = !is_blocked(
            Vec2::new(current.x + delta.x, current.y),
            hitbox,
            &objects,
            &trees,
        );
        let can_move_y = !is_blocked(
            Vec2::new(current.x, current.y + delta.y),
            hitbox,
            &objects,
            &trees,
        );

        let mut proposed = current;
        if can_move_x {
            proposed.x += delta.x;
        }
        if can_move_y {
            proposed.y += delta.y;
        }

        // NPC push-out: proposed position in, corrected position out.
        let npcs = roster.entities.iter().filter_map(|&entity| {
            npc_query
                .get(entity)
                .ok()
                .map(|(body, t)| (body, t.translation.truncate()))
        });
        let corrected = resolve_player_collision(proposed, hitbox, npcs);

        transform.translation.x = corrected.x.clamp(0.0, WORLD_W);
        transform.translation.y = corrected.y.clamp(0.0, WORLD_H);
    } else {
        movement.is_moving = false;
    }

    if movement.is_moving {
        stamina.current = (stamina.current - STAMINA_DRAIN_PER_SEC * dt).max(0.0);
    } else {
        stamina.current = (stamina.current + STAMINA_REGEN_PER_SEC * dt).min(STAMINA_MAX);
    }
}

/// Whether a player at `pos` would intersect any solid block's collision
/// box or any tree trunk.
pub fn is_blocked(pos: Vec2, hitbox: &PlayerHitbox, objects: &WorldObjects, trees: &Trees) -> bool {
    let player_rect = hitbox.rect(pos);

    for block in &objects.blocks {
        if !block.kind.solid() {
            continue;
        }
        let rect = block
            .kind
            .collision_box(block.x, block.y)
            .unwrap_or(Rect::new(block.x, block.y, TILE_SIZE, TILE_SIZE));
        if rects_overlap(player_rect, rect) {
            return true;
        }
    }

    for &base in &trees.positions {
        for rect in tree_collision_boxes(base) {
            if rects_overlap(player_rect, rect) {
                return true;
            }
        }
    }

    false
}
