//! World domain plugin for Emberhollow.
//!
//! Responsible for:
//! - The placed-block list and its placement/removal validation
//! - Fence auto-tiling from live neighbor occupancy
//! - Static tree obstacles
//! - The ground backdrop and block sprites (atlas when available,
//!   colored placeholder otherwise)

use bevy::prelude::*;

use crate::shared::*;

pub mod autotile;
pub mod blocks;
pub mod placement;

use autotile::{fence_atlas_index, neighbor_mask};
use placement::{place_block_at, remove_block_at, PlacementError};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldObjects>()
            .init_resource::<Trees>()
            .init_resource::<BlockAtlases>()
            .add_systems(OnEnter(GameState::Playing), setup_world)
            .add_systems(OnEnter(GameState::Loading), reset_world)
            .add_systems(
                Update,
                (
                    handle_place_block,
                    handle_remove_block,
                    refresh_block_sprites,
                    flicker_campfires,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES & COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// Caches tileset atlas handles for placed blocks. Loaded lazily on first
/// use; until then (or if the files are missing) block sprites stay as
/// colored rectangles.
#[derive(Resource, Default)]
pub struct BlockAtlases {
    pub loaded: bool,
    pub fences_image: Handle<Image>,
    pub fences_layout: Handle<TextureAtlasLayout>,
    pub campfire_image: Handle<Image>,
}

/// Loads block atlas assets on first use. Subsequent calls are no-ops.
pub fn ensure_block_atlases_loaded(
    asset_server: &AssetServer,
    layouts: &mut Assets<TextureAtlasLayout>,
    atlases: &mut BlockAtlases,
) {
    if atlases.loaded {
        return;
    }

    // fences.png: 64x64px -> 16x16 tiles, 4 columns x 4 rows
    atlases.fences_image = asset_server.load("tilesets/fences.png");
    atlases.fences_layout = layouts.add(TextureAtlasLayout::from_grid(
        UVec2::new(16, 16),
        4,
        4,
        None,
        None,
    ));

    // campfire.png: static 16x16 base
    atlases.campfire_image = asset_server.load("sprites/campfire.png");

    atlases.loaded = true;
}

/// Sprite entity for one placed block; `x`/`y` mirror the block's cell so
/// removal and auto-tiling can find it.
#[derive(Component, Debug, Clone, Copy)]
pub struct BlockSprite {
    pub kind: BlockKind,
    pub x: f32,
    pub y: f32,
}

/// Marker for tree sprite entities.
#[derive(Component, Debug)]
pub struct TreeSprite;

/// Marker for the ground backdrop.
#[derive(Component, Debug)]
pub struct WorldBackdrop;

/// Feedback bubble durations, in frames.
const PLACE_FEEDBACK_FRAMES: u32 = 100;
const OCCUPIED_FEEDBACK_FRAMES: u32 = 80;

/// Fixed tree positions (base corners, tile-aligned).
const TREE_SPOTS: &[(f32, f32)] = &[
    (96.0, 96.0),
    (400.0, 160.0),
    (192.0, 480.0),
    (704.0, 240.0),
    (608.0, 496.0),
    (128.0, 352.0),
];

// ═══════════════════════════════════════════════════════════════════════
// SETUP / RESET
// ═══════════════════════════════════════════════════════════════════════

/// System: spawn the backdrop and trees when entering Playing.
pub fn setup_world(
    mut commands: Commands,
    mut trees: ResMut<Trees>,
    existing: Query<Entity, With<WorldBackdrop>>,
) {
    // Skip if already set up (e.g. resuming from pause).
    if !existing.is_empty() {
        return;
    }

    commands.spawn((
        WorldBackdrop,
        Sprite {
            color: Color::srgb(0.3, 0.5, 0.25),
            custom_size: Some(Vec2::new(WORLD_W, WORLD_H)),
            ..default()
        },
        Transform::from_xyz(WORLD_W / 2.0, WORLD_H / 2.0, Z_GROUND),
    ));

    for &(x, y) in TREE_SPOTS {
        trees.positions.push(Vec2::new(x, y));

        let size = Vec2::new(
            TREE_TILE_WIDTH as f32 * TILE_SIZE,
            TREE_TILE_HEIGHT as f32 * TILE_SIZE,
        );
        commands.spawn((
            TreeSprite,
            Sprite {
                color: Color::srgb(0.15, 0.4, 0.15),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(x + size.x / 2.0, y + size.y / 2.0, Z_BLOCKS + 0.5),
        ));
    }

    info!("[World] world ready: {} trees", trees.positions.len());
}

/// System: clear all world content on reset (re-entering Loading).
pub fn reset_world(
    mut commands: Commands,
    mut objects: ResMut<WorldObjects>,
    mut trees: ResMut<Trees>,
    sprites: Query<
        Entity,
        Or<(With<BlockSprite>, With<TreeSprite>, With<WorldBackdrop>)>,
    >,
) {
    objects.blocks.clear();
    trees.positions.clear();
    for entity in sprites.iter() {
        commands.entity(entity).despawn();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLACEMENT / REMOVAL
// ═══════════════════════════════════════════════════════════════════════

/// System: validate placement requests and spawn sprites for accepted
/// blocks. Every outcome feeds the dialogue bubble.
pub fn handle_place_block(
    mut commands: Commands,
    mut events: EventReader<PlaceBlockEvent>,
    mut objects: ResMut<WorldObjects>,
    mut dialogue: ResMut<CurrentDialogue>,
) {
    for event in events.read() {
        match place_block_at(&event.kind_id, event.world_pos, &mut objects) {
            Ok(block) => {
                let center = Vec2::new(block.x + TILE_SIZE / 2.0, block.y + TILE_SIZE / 2.0);
                commands.spawn((
                    BlockSprite {
                        kind: block.kind,
                        x: block.x,
                        y: block.y,
                    },
                    Sprite {
                        color: block.kind.color(),
                        custom_size: Some(Vec2::splat(TILE_SIZE)),
                        ..default()
                    },
                    Transform::from_xyz(center.x, center.y, Z_BLOCKS),
                ));
                info!("[World] placed {} at ({}, {})", block.kind.id(), block.x, block.y);
                dialogue.show(
                    format!("{} placed", block.kind.id()),
                    PLACE_FEEDBACK_FRAMES,
                    center,
                );
            }
            Err(err) => {
                match &err {
                    PlacementError::UnknownBlock(_) => warn!("[World] {err}"),
                    _ => info!("[World] placement refused: {err}"),
                }
                let frames = if err == PlacementError::CellOccupied {
                    OCCUPIED_FEEDBACK_FRAMES
                } else {
                    PLACE_FEEDBACK_FRAMES
                };
                dialogue.show(err.to_string(), frames, event.world_pos);
            }
        }
    }
}

/// System: remove the block under a removal request and despawn its sprite.
pub fn handle_remove_block(
    mut commands: Commands,
    mut events: EventReader<RemoveBlockEvent>,
    mut objects: ResMut<WorldObjects>,
    mut dialogue: ResMut<CurrentDialogue>,
    sprites: Query<(Entity, &BlockSprite)>,
) {
    for event in events.read() {
        let Some(removed) = remove_block_at(event.world_pos, &mut objects) else {
            continue;
        };

        for (entity, sprite) in sprites.iter() {
            if sprite.x == removed.x && sprite.y == removed.y {
                commands.entity(entity).despawn();
                break;
            }
        }

        info!("[World] removed {} at ({}, {})", removed.kind.id(), removed.x, removed.y);
        dialogue.show(
            format!("{} removed", removed.kind.id()),
            OCCUPIED_FEEDBACK_FRAMES,
            Vec2::new(removed.x + TILE_SIZE / 2.0, removed.y + TILE_SIZE / 2.0),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DRAWING
// ═══════════════════════════════════════════════════════════════════════

/// System: keep block sprites current.
///
/// Fences re-derive their atlas cell from their neighbor mask every
/// frame on purpose — the mask is a pure function of live occupancy, so
/// placements and removals are reflected immediately with no cached
/// adjacency to invalidate. Sprites only switch from the colored
/// placeholder to the tileset once that texture has actually loaded.
pub fn refresh_block_sprites(
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut atlases: ResMut<BlockAtlases>,
    objects: Res<WorldObjects>,
    mut query: Query<(&BlockSprite, &mut Sprite)>,
) {
    ensure_block_atlases_loaded(&asset_server, &mut layouts, &mut atlases);

    let fences_ready = asset_server.is_loaded_with_dependencies(&atlases.fences_image);
    let campfire_ready = asset_server.is_loaded_with_dependencies(&atlases.campfire_image);

    for (marker, mut sprite) in query.iter_mut() {
        match marker.kind {
            BlockKind::Fence => {
                if !fences_ready {
                    continue;
                }
                let mask = neighbor_mask(&objects, BlockKind::Fence, marker.x, marker.y);
                let index = fence_atlas_index(mask);

                match sprite.texture_atlas.as_mut() {
                    Some(atlas) => atlas.index = index,
                    None => {
                        let mut atlas_sprite = Sprite::from_atlas_image(
                            atlases.fences_image.clone(),
                            TextureAtlas {
                                layout: atlases.fences_layout.clone(),
                                index,
                            },
                        );
                        atlas_sprite.custom_size = Some(Vec2::splat(TILE_SIZE));
                        *sprite = atlas_sprite;
                    }
                }
            }
            BlockKind::Campfire => {
                if campfire_ready && sprite.image != atlases.campfire_image {
                    sprite.image = atlases.campfire_image.clone();
                    sprite.color = Color::WHITE;
                    sprite.custom_size = Some(Vec2::splat(TILE_SIZE));
                }
            }
        }
    }
}

/// System: flicker campfire sprites by modulating alpha.
pub fn flicker_campfires(time: Res<Time>, mut query: Query<(&BlockSprite, &mut Sprite)>) {
    let t = time.elapsed_secs();
    for (marker, mut sprite) in query.iter_mut() {
        if marker.kind == BlockKind::Campfire {
            let alpha = (0.9 + (t * 10.0).sin() * 0.25).clamp(0.0, 1.0);
            sprite.color = sprite.color.with_alpha(alpha);
        }
    }
}
