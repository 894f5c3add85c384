//! Connector auto-tiling.
//!
//! A fence's sprite variant depends only on which of its four adjacent
//! cells hold another fence. The 4-bit mask is recomputed from live
//! occupancy every frame — there is no cached adjacency state, so the
//! visuals always reflect the latest placements and removals.

use crate::shared::*;

pub const MASK_UP: u8 = 1;
pub const MASK_RIGHT: u8 = 2;
pub const MASK_DOWN: u8 = 4;
pub const MASK_LEFT: u8 = 8;

/// Neighbor mask for a block of `kind` at cell corner `(x, y)`: a bit per
/// adjacent cell holding a block of the same kind.
pub fn neighbor_mask(objects: &WorldObjects, kind: BlockKind, x: f32, y: f32) -> u8 {
    let ts = TILE_SIZE;
    let mut mask = 0;
    if objects.kind_at(kind, x, y + ts) {
        mask |= MASK_UP;
    }
    if objects.kind_at(kind, x + ts, y) {
        mask |= MASK_RIGHT;
    }
    if objects.kind_at(kind, x, y - ts) {
        mask |= MASK_DOWN;
    }
    if objects.kind_at(kind, x - ts, y) {
        mask |= MASK_LEFT;
    }
    mask
}

/// Atlas cell for the isolated (no-neighbor) fence post.
pub const FENCE_ISOLATED: usize = 12;

// fences.png is 4 columns × 4 rows of 16×16 cells; index = row * 4 + col.
// One entry per neighbor mask, U=1 R=2 D=4 L=8.
const FENCE_ATLAS: [usize; 16] = [
    FENCE_ISOLATED, // 0b0000: isolated post
    13,             // 0b0001: U — bottom cap
    4,              // 0b0010: R — left cap
    8,              // 0b0011: U+R corner
    1,              // 0b0100: D — top cap
    9,              // 0b0101: U+D vertical run
    0,              // 0b0110: R+D corner
    2,              // 0b0111: U+R+D tee
    6,              // 0b1000: L — right cap
    11,             // 0b1001: U+L corner
    5,              // 0b1010: L+R horizontal run
    10,             // 0b1011: U+L+R tee
    3,              // 0b1100: D+L corner
    14,             // 0b1101: U+D+L tee
    7,              // 0b1110: R+D+L tee
    15,             // 0b1111: cross
];

/// Atlas cell for a fence with the given neighbor mask. Masks without a
/// table entry fall back to the isolated post.
pub fn fence_atlas_index(mask: u8) -> usize {
    FENCE_ATLAS
        .get(mask as usize)
        .copied()
        .unwrap_or(FENCE_ISOLATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence_at(objects: &mut WorldObjects, x: f32, y: f32) {
        objects.blocks.push(PlacedBlock {
            kind: BlockKind::Fence,
            x,
            y,
        });
    }

    #[test]
    fn isolated_fence_has_empty_mask() {
        let mut objects = WorldObjects::default();
        fence_at(&mut objects, 160.0, 160.0);
        assert_eq!(neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0), 0);
    }

    #[test]
    fn east_neighbor_sets_only_the_right_bit() {
        let mut objects = WorldObjects::default();
        fence_at(&mut objects, 160.0, 160.0);

        let before = neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0);
        fence_at(&mut objects, 160.0 + TILE_SIZE, 160.0);
        let after = neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0);

        assert_eq!(after ^ before, MASK_RIGHT);
    }

    #[test]
    fn mask_is_local_to_adjacent_cells() {
        let mut objects = WorldObjects::default();
        fence_at(&mut objects, 160.0, 160.0);
        fence_at(&mut objects, 320.0, 320.0);

        // A far-away fence cannot affect this cell's mask.
        assert_eq!(neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0), 0);
    }

    #[test]
    fn other_kinds_do_not_connect() {
        let mut objects = WorldObjects::default();
        fence_at(&mut objects, 160.0, 160.0);
        objects.blocks.push(PlacedBlock {
            kind: BlockKind::Campfire,
            x: 160.0 + TILE_SIZE,
            y: 160.0,
        });
        assert_eq!(neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0), 0);
    }

    #[test]
    fn full_cross_sets_all_bits() {
        let mut objects = WorldObjects::default();
        fence_at(&mut objects, 160.0, 160.0);
        fence_at(&mut objects, 160.0, 160.0 + TILE_SIZE);
        fence_at(&mut objects, 160.0, 160.0 - TILE_SIZE);
        fence_at(&mut objects, 160.0 + TILE_SIZE, 160.0);
        fence_at(&mut objects, 160.0 - TILE_SIZE, 160.0);
        assert_eq!(
            neighbor_mask(&objects, BlockKind::Fence, 160.0, 160.0),
            MASK_UP | MASK_RIGHT | MASK_DOWN | MASK_LEFT
        );
    }

    #[test]
    fn every_mask_maps_to_a_distinct_atlas_cell() {
        let mut seen = [false; 16];
        for mask in 0u8..16 {
            let idx = fence_atlas_index(mask);
            assert!(idx < 16, "atlas index out of the 4×4 sheet");
            assert!(!seen[idx], "atlas cell reused for mask {mask}");
            seen[idx] = true;
        }
    }

    #[test]
    fn out_of_range_mask_falls_back_to_isolated() {
        assert_eq!(fence_atlas_index(200), FENCE_ISOLATED);
    }
}
