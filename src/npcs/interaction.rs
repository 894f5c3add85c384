//! Right-click interaction: hit-test the roster, range-check against the
//! player, pause the NPC, and emit a dialogue line into the shared bubble.

use bevy::prelude::*;

use crate::shared::*;

use super::movement::InteractionPause;

/// How long an NPC dialogue bubble stays up, in frames.
pub const NPC_DIALOGUE_FRAMES: u32 = 180;

/// An NPC's dialogue lines plus a cursor that cycles through them,
/// wrapping at the end.
#[derive(Component, Debug, Clone, Default)]
pub struct NpcDialogue {
    pub lines: Vec<String>,
    pub cursor: usize,
}

impl NpcDialogue {
    /// Next line in rotation, or a canned greeting when the NPC has no
    /// authored dialogue.
    pub fn next_line(&mut self, name: &str) -> String {
        if self.lines.is_empty() {
            return format!("Hi, I'm {name}!");
        }
        let line = self.lines[self.cursor % self.lines.len()].clone();
        self.cursor = (self.cursor + 1) % self.lines.len();
        line
    }
}

/// First NPC (in the given order) whose collision volume contains the
/// point. Circle NPCs use true circular containment; everything else uses
/// the bounding box.
pub fn hit_test<'a>(
    point: Vec2,
    npcs: impl Iterator<Item = (Entity, &'a NpcBody, Vec2)>,
) -> Option<Entity> {
    for (entity, body, pos) in npcs {
        if body.contains_point(pos, point) {
            return Some(entity);
        }
    }
    None
}

/// System: route right-click events to the roster.
///
/// A click that lands on an NPC farther than [`NPC_INTERACT_RANGE`] from
/// the player is ignored outright: no pause, no dialogue.
pub fn handle_npc_interaction(
    mut events: EventReader<NpcInteractEvent>,
    roster: Res<NpcRoster>,
    player_query: Query<&Transform, With<Player>>,
    mut npc_query: Query<
        (
            &Npc,
            &NpcBody,
            &Transform,
            &mut NpcDialogue,
            &mut InteractionPause,
        ),
        Without<Player>,
    >,
    mut dialogue: ResMut<CurrentDialogue>,
) {
    for event in events.read() {
        let hit = hit_test(
            event.world_pos,
            roster.entities.iter().filter_map(|&entity| {
                npc_query
                    .get(entity)
                    .ok()
                    .map(|(_, body, transform, _, _)| {
                        (entity, body, transform.translation.truncate())
                    })
            }),
        );
        let Some(entity) = hit else {
            continue;
        };

        let Ok(player_transform) = player_query.get_single() else {
            continue;
        };
        let player_pos = player_transform.translation.truncate();

        let Ok((npc, _, transform, mut npc_dialogue, mut pause)) = npc_query.get_mut(entity)
        else {
            continue;
        };
        let npc_pos = transform.translation.truncate();

        if npc_pos.distance(player_pos) > NPC_INTERACT_RANGE {
            continue;
        }

        pause.remaining = NPC_INTERACT_PAUSE_SECS;
        let text = npc_dialogue.next_line(&npc.name);
        info!("[Npc] {} says: {}", npc.name, text);
        dialogue.show(text, NPC_DIALOGUE_FRAMES, npc_pos);
    }
}
