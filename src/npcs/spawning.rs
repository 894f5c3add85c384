//! NPC spawning: instantiate the world's NPCs and keep the roster in
//! spawn order.

use bevy::prelude::*;

use crate::shared::*;

use super::interaction::NpcDialogue;
use super::loader::begin_schedule_fetch;
use super::movement::{InteractionPause, Patrol, WanderAi};

/// Static spawn table for the world's NPCs. Schedules are fetched by id
/// from `assets/npcs/schedules/<id>.json` after spawn.
pub struct NpcSpawnDef {
    pub id: &'static str,
    pub name: &'static str,
    pub x: f32,
    pub y: f32,
    pub shape: CollisionShape,
    pub dialogue: &'static [&'static str],
}

pub const WORLD_NPCS: &[NpcSpawnDef] = &[
    NpcSpawnDef {
        id: "bob",
        name: "Bob",
        x: 300.0,
        y: 300.0,
        shape: CollisionShape::Triangle,
        dialogue: &["Hey there!", "Nice weather!"],
    },
    NpcSpawnDef {
        id: "alice",
        name: "Alice",
        x: 340.0,
        y: 300.0,
        shape: CollisionShape::Square,
        dialogue: &["I'm a square NPC!"],
    },
    NpcSpawnDef {
        id: "orb",
        name: "Orb",
        x: 380.0,
        y: 300.0,
        shape: CollisionShape::Circle,
        dialogue: &["I'm a round guy."],
    },
    NpcSpawnDef {
        id: "wren",
        name: "Wren",
        x: 520.0,
        y: 420.0,
        shape: CollisionShape::Square,
        dialogue: &[
            "The fences keep the campfires honest.",
            "Don't build two fires too close together.",
        ],
    },
];

/// Placeholder sprite tint per collision shape.
pub fn npc_color(shape: CollisionShape) -> Color {
    match shape {
        CollisionShape::Square => Color::srgb(0.27, 0.67, 1.0),
        CollisionShape::Circle => Color::srgb(0.4, 0.85, 0.5),
        CollisionShape::Triangle => Color::srgb(0.95, 0.65, 0.3),
    }
}

/// System: on entering Playing, spawn every NPC in table order and begin
/// its schedule fetch. Roster order is spawn order; the z offset stacks
/// later entries on top when sprites overlap.
pub fn spawn_world_npcs(mut commands: Commands, mut roster: ResMut<NpcRoster>) {
    // Skip if already populated (e.g. resuming from pause).
    if !roster.entities.is_empty() {
        return;
    }

    for (i, def) in WORLD_NPCS.iter().enumerate() {
        let entity = commands
            .spawn((
                Npc {
                    id: def.id.to_string(),
                    name: def.name.to_string(),
                },
                NpcBody {
                    size: 16.0,
                    shape: def.shape,
                },
                NpcDialogue {
                    lines: def.dialogue.iter().map(|s| s.to_string()).collect(),
                    cursor: 0,
                },
                Patrol::default(),
                WanderAi::default(),
                InteractionPause::default(),
                begin_schedule_fetch(def.id),
                Sprite {
                    color: npc_color(def.shape),
                    custom_size: Some(Vec2::splat(16.0)),
                    ..default()
                },
                Transform::from_xyz(def.x, def.y, Z_ENTITY_BASE + i as f32 * 0.01),
            ))
            .id();

        // Floating name tag above the sprite.
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                Text2d::new(def.name),
                TextFont {
                    font_size: 5.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 14.0, 0.1),
            ));
        });

        roster.entities.push(entity);
    }

    info!("[Npc] spawned {} NPCs", roster.entities.len());
}

/// System: bulk-clear the roster when the world resets. All-or-nothing —
/// there is no partial teardown.
pub fn despawn_all_npcs(mut commands: Commands, mut roster: ResMut<NpcRoster>) {
    let count = roster.entities.len();
    for entity in roster.entities.drain(..) {
        commands.entity(entity).despawn_recursive();
    }
    if count > 0 {
        info!("[Npc] all {count} NPCs removed from world");
    }
}
