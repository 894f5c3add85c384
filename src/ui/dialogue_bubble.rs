//! The single on-screen speech bubble.
//!
//! The rest of the game only ever writes `CurrentDialogue`; this module
//! owns displaying it and expiring it by frame count.

use bevy::prelude::*;

use crate::shared::*;

/// Marker for the one floating bubble text entity.
#[derive(Component, Debug)]
pub struct DialogueBubbleText;

/// System: advance the bubble's frame counter and clear it once it has
/// outlived its duration.
pub fn tick_dialogue(mut dialogue: ResMut<CurrentDialogue>) {
    advance_bubble(&mut dialogue);
}

fn advance_bubble(dialogue: &mut CurrentDialogue) {
    let expired = match dialogue.0.as_mut() {
        Some(bubble) => {
            bubble.frame += 1;
            bubble.frame >= bubble.duration
        }
        None => false,
    };
    if expired {
        dialogue.0 = None;
    }
}

/// System: keep the floating text entity in sync with the slot.
pub fn render_dialogue(
    mut commands: Commands,
    dialogue: Res<CurrentDialogue>,
    mut existing: Query<(Entity, &mut Text2d, &mut Transform), With<DialogueBubbleText>>,
) {
    match (&dialogue.0, existing.get_single_mut()) {
        (Some(bubble), Ok((_, mut text, mut transform))) => {
            if text.0 != bubble.text {
                text.0 = bubble.text.clone();
            }
            transform.translation =
                Vec3::new(bubble.anchor.x, bubble.anchor.y + 18.0, Z_BUBBLE);
        }
        (Some(bubble), Err(_)) => {
            commands.spawn((
                DialogueBubbleText,
                Text2d::new(bubble.text.clone()),
                TextFont {
                    font_size: 6.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 0.9)),
                Transform::from_xyz(bubble.anchor.x, bubble.anchor.y + 18.0, Z_BUBBLE),
            ));
        }
        (None, Ok((entity, _, _))) => {
            commands.entity(entity).despawn();
        }
        (None, Err(_)) => {}
    }
}
