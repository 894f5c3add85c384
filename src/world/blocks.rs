//! Block capability table.
//!
//! `BlockKind` (declared in `shared`) is a closed enum, so every
//! capability here is a total function: adding a block kind forces a
//! decision for solidity, collision box, and placement rules at compile
//! time instead of sprinkling optional callbacks.

use bevy::prelude::*;

use crate::geometry::Rect;
use crate::shared::*;

/// Minimum spacing between campfires, in tiles.
pub const CAMPFIRE_MIN_SPACING_TILES: f32 = 5.0;

impl BlockKind {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "fence" => Some(BlockKind::Fence),
            "campfire" => Some(BlockKind::Campfire),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            BlockKind::Fence => "fence",
            BlockKind::Campfire => "campfire",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BlockKind::Fence => "Wood Fence",
            BlockKind::Campfire => "Campfire",
        }
    }

    /// Whether this block obstructs movement.
    pub fn solid(self) -> bool {
        true
    }

    /// Collision box for a block placed at cell corner `(x, y)`. `None`
    /// would mean the full tile blocks; both current kinds override with
    /// something smaller so the player can brush past their edges.
    pub fn collision_box(self, x: f32, y: f32) -> Option<Rect> {
        match self {
            BlockKind::Fence => {
                // Narrow post: about a third of the tile wide, most of it tall.
                let w = TILE_SIZE * 0.33;
                let h = TILE_SIZE * 0.9;
                Some(Rect::new(x + (TILE_SIZE - w) / 2.0, y, w, h))
            }
            BlockKind::Campfire => Some(Rect::new(x + 4.0, y, 8.0, 8.0)),
        }
    }

    /// Kind-specific placement rule, checked after occupancy. The `Err`
    /// string is the user-facing rejection reason.
    pub fn can_place(self, objects: &WorldObjects, x: f32, y: f32) -> Result<(), &'static str> {
        match self {
            BlockKind::Fence => Ok(()),
            BlockKind::Campfire => {
                // Squared distance against every existing campfire, not
                // just neighbors.
                let min_dist = CAMPFIRE_MIN_SPACING_TILES * TILE_SIZE;
                let min_dist_sq = min_dist * min_dist;
                for b in &objects.blocks {
                    if b.kind == BlockKind::Campfire {
                        let dx = b.x - x;
                        let dy = b.y - y;
                        if dx * dx + dy * dy < min_dist_sq {
                            return Err("Too close to another campfire.");
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Placeholder sprite tint when the tileset atlas isn't available.
    pub fn color(self) -> Color {
        match self {
            BlockKind::Fence => Color::srgb(0.55, 0.4, 0.2),
            BlockKind::Campfire => Color::srgb(0.95, 0.55, 0.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rects_overlap;

    #[test]
    fn ids_round_trip() {
        for kind in [BlockKind::Fence, BlockKind::Campfire] {
            assert_eq!(BlockKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(BlockKind::from_id("lava"), None);
    }

    #[test]
    fn fence_post_is_narrower_than_its_tile() {
        let post = BlockKind::Fence.collision_box(32.0, 48.0).unwrap();
        let tile = Rect::new(32.0, 48.0, TILE_SIZE, TILE_SIZE);
        assert!(post.w < tile.w);
        assert!(post.x > tile.x && post.max_x() < tile.max_x());
        assert!(rects_overlap(post, tile));
    }

    #[test]
    fn campfire_spacing_rejects_inside_five_tiles() {
        let mut objects = WorldObjects::default();
        objects.blocks.push(PlacedBlock {
            kind: BlockKind::Campfire,
            x: 96.0,
            y: 96.0,
        });

        // 4 tiles away: too close.
        let err = BlockKind::Campfire
            .can_place(&objects, 96.0, 96.0 + 4.0 * TILE_SIZE)
            .unwrap_err();
        assert_eq!(err, "Too close to another campfire.");

        // Exactly 5 tiles away: allowed (strict less-than threshold).
        assert!(BlockKind::Campfire
            .can_place(&objects, 96.0, 96.0 + 5.0 * TILE_SIZE)
            .is_ok());

        // 6 tiles away: clearly fine.
        assert!(BlockKind::Campfire
            .can_place(&objects, 96.0, 96.0 + 6.0 * TILE_SIZE)
            .is_ok());
    }

    #[test]
    fn campfire_spacing_ignores_other_kinds() {
        let mut objects = WorldObjects::default();
        objects.blocks.push(PlacedBlock {
            kind: BlockKind::Fence,
            x: 96.0,
            y: 96.0,
        });
        assert!(BlockKind::Campfire.can_place(&objects, 112.0, 96.0).is_ok());
    }
}
