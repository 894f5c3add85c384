//! Shared components, resources, events, and states for Emberhollow.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;

use crate::geometry::Rect;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

#[derive(Component, Debug, Clone)]
pub struct PlayerMovement {
    pub speed: f32,
    pub is_moving: bool,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            speed: 120.0,
            is_moving: false,
        }
    }
}

/// The player's collision footprint, centered on the entity position and
/// shifted by `off_y` toward the feet.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerHitbox {
    pub w: f32,
    pub h: f32,
    pub off_y: f32,
}

impl Default for PlayerHitbox {
    fn default() -> Self {
        Self {
            w: 12.0,
            h: 12.0,
            off_y: -2.0,
        }
    }
}

impl PlayerHitbox {
    pub fn rect(&self, pos: Vec2) -> Rect {
        Rect::new(
            pos.x - self.w / 2.0,
            pos.y - self.h / 2.0 + self.off_y,
            self.w,
            self.h,
        )
    }

    /// Radius used when the hitbox collides against circular volumes.
    pub fn radius(&self) -> f32 {
        self.w.min(self.h) / 2.0
    }
}

/// Stamina pool. Movement drains it; standing still restores it. Below
/// [`STAMINA_MIN_TO_MOVE`] the player is too exhausted to walk.
#[derive(Resource, Debug, Clone)]
pub struct PlayerStamina {
    pub current: f32,
}

impl Default for PlayerStamina {
    fn default() -> Self {
        Self {
            current: STAMINA_MAX,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NPCs
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub id: String,
    pub name: String,
}

/// Shape of an NPC's collision volume.
///
/// `Triangle` renders as a triangle but collides as its bounding box — a
/// deliberate simplification carried over from the original product, not
/// a bug. Only `Circle` gets true circular containment and push-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionShape {
    Square,
    Circle,
    Triangle,
}

/// An NPC's collision volume: a square/circle of half-extent `size / 2`,
/// derived fresh from the entity position wherever it is needed.
#[derive(Component, Debug, Clone, Copy)]
pub struct NpcBody {
    pub size: f32,
    pub shape: CollisionShape,
}

impl Default for NpcBody {
    fn default() -> Self {
        Self {
            size: 16.0,
            shape: CollisionShape::Square,
        }
    }
}

impl NpcBody {
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn collision_rect(&self, pos: Vec2) -> Rect {
        Rect::from_center(pos, self.size, self.size)
    }

    /// Point containment for hit testing. Circles use true circular
    /// containment; everything else uses the (inclusive) bounding box.
    pub fn contains_point(&self, pos: Vec2, point: Vec2) -> bool {
        match self.shape {
            CollisionShape::Circle => pos.distance_squared(point) <= self.radius() * self.radius(),
            _ => self.collision_rect(pos).contains(point),
        }
    }
}

/// Live NPC entities in spawn order. Spawn order is the only ordering the
/// game observes: hit tests scan it front to back, and draw z-order stacks
/// later entries on top.
#[derive(Resource, Debug, Default)]
pub struct NpcRoster {
    pub entities: Vec<Entity>,
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD OBJECTS — placed blocks and trees
// ═══════════════════════════════════════════════════════════════════════

/// Every placeable block kind in the game.
///
/// A closed enum instead of the usual bag of optional callbacks: each
/// capability (solidity, collision box, placement rule) is a total method
/// in `world::blocks`, so adding a kind forces every consumer to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Fence,
    Campfire,
}

/// A block that has been placed into the world, snapped to its tile cell.
/// `x`/`y` are the cell's minimum corner and are always exact multiples of
/// [`TILE_SIZE`], which is what makes the `==` occupancy comparison sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub x: f32,
    pub y: f32,
}

/// All placed blocks, in placement order. At most one block occupies a
/// cell — enforced by the placement validator, not by this container.
#[derive(Resource, Debug, Default)]
pub struct WorldObjects {
    pub blocks: Vec<PlacedBlock>,
}

impl WorldObjects {
    pub fn occupied(&self, x: f32, y: f32) -> bool {
        self.blocks.iter().any(|b| b.x == x && b.y == y)
    }

    pub fn kind_at(&self, kind: BlockKind, x: f32, y: f32) -> bool {
        self.blocks
            .iter()
            .any(|b| b.kind == kind && b.x == x && b.y == y)
    }
}

/// Static tree obstacles: base (minimum) corner of each tree's footprint.
#[derive(Resource, Debug, Default)]
pub struct Trees {
    pub positions: Vec<Vec2>,
}

/// Collision boxes for a tree at `base`. Trees are drawn 3×6 tiles tall
/// but only block at the trunk: a root slab plus the trunk tile above it.
pub fn tree_collision_boxes(base: Vec2) -> [Rect; 2] {
    [
        Rect::new(base.x + TILE_SIZE * 0.5, base.y, TILE_SIZE * 2.0, TILE_SIZE * 0.5),
        Rect::new(base.x + TILE_SIZE, base.y, TILE_SIZE, TILE_SIZE),
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// DIALOGUE SINK
// ═══════════════════════════════════════════════════════════════════════

/// The one on-screen speech bubble. NPC interaction and placement feedback
/// both write here; the UI layer renders it and expires it by frame count.
#[derive(Debug, Clone)]
pub struct DialogueBubble {
    pub text: String,
    pub frame: u32,
    pub duration: u32,
    pub anchor: Vec2,
}

#[derive(Resource, Debug, Default)]
pub struct CurrentDialogue(pub Option<DialogueBubble>);

impl CurrentDialogue {
    /// Replace whatever is showing with a new bubble.
    pub fn show(&mut self, text: impl Into<String>, duration: u32, anchor: Vec2) {
        self.0 = Some(DialogueBubble {
            text: text.into(),
            frame: 0,
            duration,
            anchor,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Request to place a block at a world position (pre-snap).
#[derive(Event, Debug, Clone)]
pub struct PlaceBlockEvent {
    pub kind_id: String,
    pub world_pos: Vec2,
}

/// Request to remove whatever block occupies the cell containing a world
/// position.
#[derive(Event, Debug, Clone)]
pub struct RemoveBlockEvent {
    pub world_pos: Vec2,
}

/// Right-click interaction at a world position, routed to the NPC roster.
#[derive(Event, Debug, Clone)]
pub struct NpcInteractEvent {
    pub world_pos: Vec2,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Grid unit shared by placement, collision, and auto-tiling.
pub const TILE_SIZE: f32 = 16.0;
/// Nominal simulation ticks per second; converts authored tick counts
/// (waypoint waits, dialogue durations) into seconds.
pub const TICK_RATE: f32 = 60.0;

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 640.0;

pub const WORLD_TILES_W: i32 = 60;
pub const WORLD_TILES_H: i32 = 40;
pub const WORLD_W: f32 = WORLD_TILES_W as f32 * TILE_SIZE;
pub const WORLD_H: f32 = WORLD_TILES_H as f32 * TILE_SIZE;

pub const CAM_EASE: f32 = 0.08;
pub const ZOOM_MIN: f32 = 1.75;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_SPEED: f32 = 0.2;
pub const DEFAULT_ZOOM: f32 = 2.25;

pub const STAMINA_MAX: f32 = 100.0;
pub const STAMINA_DRAIN_PER_SEC: f32 = 0.1;
pub const STAMINA_REGEN_PER_SEC: f32 = 0.05;
pub const STAMINA_MIN_TO_MOVE: f32 = 6.0;

pub const NPC_INTERACT_RANGE: f32 = 20.0;
pub const NPC_INTERACT_PAUSE_SECS: f32 = 5.0;

pub const TREE_TILE_WIDTH: i32 = 3;
pub const TREE_TILE_HEIGHT: i32 = 6;

pub const Z_GROUND: f32 = 0.0;
pub const Z_BLOCKS: f32 = 1.0;
pub const Z_ENTITY_BASE: f32 = 2.0;
pub const Z_BUBBLE: f32 = 10.0;
