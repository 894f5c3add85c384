//! Player-versus-roster collision resolution.
//!
//! The game loop hands in a *proposed* player position and gets back a
//! *corrected* one; nothing else about the player is touched. Each
//! overlapping NPC contributes a minimal-translation push-out, and the
//! corrections accumulate additively against the original proposed box.
//! There is no iterative constraint solving, so a dense cluster of NPCs
//! can over- or under-correct; NPC density is low enough that this never
//! matters in practice.

use bevy::prelude::*;

use crate::geometry::{resolve_aabb_overlap, resolve_circle_overlap};
use crate::shared::*;

/// Resolve the proposed player position against every NPC volume, in
/// roster order. Circle NPCs push along the center-to-center vector
/// (treating the player box as a circle of its smaller half-extent);
/// square and triangle NPCs push as AABBs along the least-penetration
/// axis.
pub fn resolve_player_collision<'a>(
    proposed: Vec2,
    hitbox: &PlayerHitbox,
    npcs: impl Iterator<Item = (&'a NpcBody, Vec2)>,
) -> Vec2 {
    let player_rect = hitbox.rect(proposed);
    let player_center = player_rect.center();
    let mut corrected = proposed;

    for (body, npc_pos) in npcs {
        match body.shape {
            CollisionShape::Circle => {
                if let Some(push) =
                    resolve_circle_overlap(player_center, hitbox.radius(), npc_pos, body.radius())
                {
                    corrected += push;
                }
            }
            CollisionShape::Square | CollisionShape::Triangle => {
                if let Some(push) =
                    resolve_aabb_overlap(player_rect, body.collision_rect(npc_pos))
                {
                    corrected += push;
                }
            }
        }
    }

    corrected
}
