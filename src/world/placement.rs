//! Block placement validation.
//!
//! `place_block_at` is the only way blocks enter the world, which is what
//! upholds the one-object-per-cell invariant. Every failure aborts before
//! any mutation; the error's `Display` text doubles as the user-facing
//! feedback line.

use bevy::prelude::*;
use thiserror::Error;

use crate::shared::*;

/// Why a placement was refused. Ordered by the validation steps: id
/// lookup, occupancy, then the kind's own rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Block \"{0}\" not found.")]
    UnknownBlock(String),
    #[error("Block already exists here.")]
    CellOccupied,
    #[error("{0}")]
    Rejected(&'static str),
}

/// Snap a world position down to the corner of its containing tile cell.
pub fn snap_to_cell(p: Vec2) -> Vec2 {
    Vec2::new(
        (p.x / TILE_SIZE).floor() * TILE_SIZE,
        (p.y / TILE_SIZE).floor() * TILE_SIZE,
    )
}

/// Validate and append a block at the cell containing `world_pos`.
///
/// Steps, any of which aborts with no world mutation:
/// 1. resolve the block id,
/// 2. snap to the containing cell,
/// 3. reject if *any* block already occupies that cell,
/// 4. ask the kind's own placement rule,
/// 5. append.
pub fn place_block_at(
    id: &str,
    world_pos: Vec2,
    objects: &mut WorldObjects,
) -> Result<PlacedBlock, PlacementError> {
    let kind = BlockKind::from_id(id).ok_or_else(|| PlacementError::UnknownBlock(id.to_string()))?;

    let cell = snap_to_cell(world_pos);

    if objects.occupied(cell.x, cell.y) {
        return Err(PlacementError::CellOccupied);
    }

    kind.can_place(objects, cell.x, cell.y)
        .map_err(PlacementError::Rejected)?;

    let block = PlacedBlock {
        kind,
        x: cell.x,
        y: cell.y,
    };
    objects.blocks.push(block);
    Ok(block)
}

/// Remove whatever block occupies the cell containing `world_pos`.
pub fn remove_block_at(world_pos: Vec2, objects: &mut WorldObjects) -> Option<PlacedBlock> {
    let cell = snap_to_cell(world_pos);
    let idx = objects
        .blocks
        .iter()
        .position(|b| b.x == cell.x && b.y == cell.y)?;
    Some(objects.blocks.remove(idx))
}
