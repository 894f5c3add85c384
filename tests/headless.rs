//! Headless integration tests for Emberhollow.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping all rendering), and verify that the core
//! loops — NPC patrols, schedule attachment, placement validation, and
//! interaction — work correctly.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use emberhollow::npcs::interaction::{handle_npc_interaction, NpcDialogue};
use emberhollow::npcs::loader::{begin_schedule_fetch, poll_pending_schedules, PendingSchedule};
use emberhollow::npcs::movement::{update_npcs, InteractionPause, Patrol, WanderAi};
use emberhollow::npcs::spawning::{despawn_all_npcs, spawn_world_npcs, WORLD_NPCS};
use emberhollow::player::movement::player_movement;
use emberhollow::shared::*;
use emberhollow::world::{
    handle_place_block, handle_remove_block, reset_world, setup_world,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events
/// registered but NO rendering, windowing, or asset loading. Systems are
/// added per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.init_state::<GameState>();

    app.init_resource::<CurrentDialogue>()
        .init_resource::<WorldObjects>()
        .init_resource::<Trees>()
        .init_resource::<NpcRoster>()
        .init_resource::<PlayerStamina>();

    app.add_event::<PlaceBlockEvent>()
        .add_event::<RemoveBlockEvent>()
        .add_event::<NpcInteractEvent>();

    app
}

/// Transitions the test app to Playing state and ticks once to process it.
fn enter_playing_state(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
}

/// Spawns a bare square NPC (no sprite, no pending fetch) and registers
/// it in the roster.
fn spawn_test_npc(app: &mut App, id: &str, name: &str, pos: Vec2, lines: &[&str]) -> Entity {
    let entity = app
        .world_mut()
        .spawn((
            Npc {
                id: id.to_string(),
                name: name.to_string(),
            },
            NpcBody {
                size: 16.0,
                shape: CollisionShape::Square,
            },
            NpcDialogue {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                cursor: 0,
            },
            Patrol::default(),
            WanderAi::default(),
            InteractionPause::default(),
            Transform::from_xyz(pos.x, pos.y, 0.0),
        ))
        .id();
    app.world_mut()
        .resource_mut::<NpcRoster>()
        .entities
        .push(entity);
    entity
}

fn dialogue_text(app: &App) -> Option<String> {
    app.world()
        .resource::<CurrentDialogue>()
        .0
        .as_ref()
        .map(|b| b.text.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Boot smoke — world and NPCs spawn, systems tick without panic
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_smoke() {
    let mut app = build_test_app();

    app.add_systems(OnEnter(GameState::Playing), (spawn_world_npcs, setup_world));
    app.add_systems(OnEnter(GameState::Loading), (despawn_all_npcs, reset_world));
    app.add_systems(
        Update,
        (
            poll_pending_schedules,
            update_npcs,
            handle_npc_interaction,
            handle_place_block,
            handle_remove_block,
        )
            .run_if(in_state(GameState::Playing)),
    );

    app.update(); // initial Loading OnEnter
    enter_playing_state(&mut app);

    let roster_len = app.world().resource::<NpcRoster>().entities.len();
    assert_eq!(roster_len, WORLD_NPCS.len(), "every defined NPC spawns");

    let tree_count = app.world().resource::<Trees>().positions.len();
    assert!(tree_count > 0, "world setup plants trees");

    // Smoke: run a small frame budget in Playing without panic.
    for _ in 0..120 {
        app.update();
    }

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(state.get(), &GameState::Playing);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Placement events mutate the world and emit feedback
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_place_block_event_snaps_and_gives_feedback() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_place_block.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    app.world_mut().send_event(PlaceBlockEvent {
        kind_id: "fence".to_string(),
        world_pos: Vec2::new(100.0, 100.0),
    });
    app.update();

    let objects = app.world().resource::<WorldObjects>();
    assert_eq!(objects.blocks.len(), 1);
    assert!(objects.occupied(96.0, 96.0), "snapped down to the tile corner");

    assert_eq!(dialogue_text(&app).as_deref(), Some("fence placed"));
}

#[test]
fn test_occupied_cell_rejects_with_feedback() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_place_block.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    for _ in 0..2 {
        app.world_mut().send_event(PlaceBlockEvent {
            kind_id: "fence".to_string(),
            world_pos: Vec2::new(100.0, 100.0),
        });
        app.update();
    }

    let objects = app.world().resource::<WorldObjects>();
    assert_eq!(objects.blocks.len(), 1, "second placement aborted");
    assert_eq!(
        dialogue_text(&app).as_deref(),
        Some("Block already exists here.")
    );
}

#[test]
fn test_unknown_block_rejects_without_mutation() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_place_block.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    app.world_mut().send_event(PlaceBlockEvent {
        kind_id: "lava".to_string(),
        world_pos: Vec2::new(100.0, 100.0),
    });
    app.update();

    assert!(app.world().resource::<WorldObjects>().blocks.is_empty());
    assert_eq!(
        dialogue_text(&app).as_deref(),
        Some("Block \"lava\" not found.")
    );
}

#[test]
fn test_campfire_spacing_through_events() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_place_block.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    let send = |app: &mut App, pos: Vec2| {
        app.world_mut().send_event(PlaceBlockEvent {
            kind_id: "campfire".to_string(),
            world_pos: pos,
        });
        app.update();
    };

    send(&mut app, Vec2::new(100.0, 100.0));
    // Within the 5-tile minimum: rejected.
    send(&mut app, Vec2::new(100.0, 100.0 + 4.0 * TILE_SIZE));
    assert_eq!(app.world().resource::<WorldObjects>().blocks.len(), 1);
    assert_eq!(
        dialogue_text(&app).as_deref(),
        Some("Too close to another campfire.")
    );

    // Outside it: accepted.
    send(&mut app, Vec2::new(100.0, 100.0 + 6.0 * TILE_SIZE));
    assert_eq!(app.world().resource::<WorldObjects>().blocks.len(), 2);
}

#[test]
fn test_remove_block_event_frees_the_cell() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        (handle_place_block, handle_remove_block).run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    app.world_mut().send_event(PlaceBlockEvent {
        kind_id: "fence".to_string(),
        world_pos: Vec2::new(64.0, 64.0),
    });
    app.update();
    assert_eq!(app.world().resource::<WorldObjects>().blocks.len(), 1);

    app.world_mut().send_event(RemoveBlockEvent {
        world_pos: Vec2::new(70.0, 70.0),
    });
    app.update();
    assert!(app.world().resource::<WorldObjects>().blocks.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: NPC interaction — range gate, pause, dialogue cycling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_interaction_in_range_pauses_and_speaks() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_npc_interaction.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    let npc = spawn_test_npc(
        &mut app,
        "bob",
        "Bob",
        Vec2::new(300.0, 300.0),
        &["Hey there!", "Nice weather!"],
    );
    app.world_mut()
        .spawn((Player, Transform::from_xyz(300.0, 290.0, 0.0)));

    app.world_mut().send_event(NpcInteractEvent {
        world_pos: Vec2::new(300.0, 300.0),
    });
    app.update();

    let pause = app.world().entity(npc).get::<InteractionPause>().unwrap();
    assert_eq!(pause.remaining, NPC_INTERACT_PAUSE_SECS);
    assert_eq!(dialogue_text(&app).as_deref(), Some("Hey there!"));

    // Second click cycles to the next line.
    app.world_mut().send_event(NpcInteractEvent {
        world_pos: Vec2::new(300.0, 300.0),
    });
    app.update();
    assert_eq!(dialogue_text(&app).as_deref(), Some("Nice weather!"));

    // Third wraps back around.
    app.world_mut().send_event(NpcInteractEvent {
        world_pos: Vec2::new(300.0, 300.0),
    });
    app.update();
    assert_eq!(dialogue_text(&app).as_deref(), Some("Hey there!"));
}

#[test]
fn test_interaction_out_of_range_is_ignored() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        handle_npc_interaction.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    let npc = spawn_test_npc(
        &mut app,
        "bob",
        "Bob",
        Vec2::new(300.0, 300.0),
        &["Hey there!"],
    );
    // Player well outside the 20-unit interaction radius.
    app.world_mut()
        .spawn((Player, Transform::from_xyz(400.0, 300.0, 0.0)));

    app.world_mut().send_event(NpcInteractEvent {
        world_pos: Vec2::new(300.0, 300.0),
    });
    app.update();

    let pause = app.world().entity(npc).get::<InteractionPause>().unwrap();
    assert_eq!(pause.remaining, 0.0, "no state change at all");
    assert!(dialogue_text(&app).is_none());
}

#[test]
fn test_paused_npc_does_not_move() {
    let mut app = build_test_app();
    app.add_systems(Update, update_npcs.run_if(in_state(GameState::Playing)));
    enter_playing_state(&mut app);

    let npc = spawn_test_npc(&mut app, "bob", "Bob", Vec2::new(300.0, 300.0), &[]);
    app.world_mut()
        .entity_mut(npc)
        .get_mut::<InteractionPause>()
        .unwrap()
        .remaining = 100.0;

    for _ in 0..30 {
        app.update();
    }

    let transform = app.world().entity(npc).get::<Transform>().unwrap();
    assert_eq!(transform.translation.truncate(), Vec2::new(300.0, 300.0));

    let pause = app.world().entity(npc).get::<InteractionPause>().unwrap();
    assert!(pause.remaining < 100.0, "cooldown is draining");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Async schedule attachment races the loop and lands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_schedule_attaches_asynchronously() {
    let mut app = build_test_app();
    app.add_systems(Update, poll_pending_schedules);

    let pending = begin_schedule_fetch("bob");
    let npc = app
        .world_mut()
        .spawn((
            Npc {
                id: "bob".to_string(),
                name: "Bob".to_string(),
            },
            Patrol::default(),
            Transform::from_xyz(300.0, 300.0, 0.0),
            pending,
        ))
        .id();

    assert!(
        !app.world()
            .entity(npc)
            .get::<Patrol>()
            .unwrap()
            .is_patrolling(),
        "not yet ready: NPC starts schedule-less"
    );

    let mut attempts = 0;
    loop {
        app.update();
        if app
            .world()
            .entity(npc)
            .get::<Patrol>()
            .unwrap()
            .is_patrolling()
        {
            break;
        }
        attempts += 1;
        assert!(attempts < 500, "schedule fetch never completed");
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    let patrol = app.world().entity(npc).get::<Patrol>().unwrap();
    // bob.json: 4 waypoints, looped -> 4 segments; speed 1 unit/tick -> 60/sec.
    assert_eq!(patrol.segments.len(), 4);
    assert_eq!(patrol.speed, 60.0);
    assert!(
        app.world().entity(npc).get::<PendingSchedule>().is_none(),
        "fetch state removed once applied"
    );
}

#[test]
fn test_missing_schedule_degrades_to_wander() {
    let mut app = build_test_app();
    app.add_systems(Update, poll_pending_schedules);

    // No orb.json on disk, by design.
    let pending = begin_schedule_fetch("orb");
    let npc = app
        .world_mut()
        .spawn((
            Npc {
                id: "orb".to_string(),
                name: "Orb".to_string(),
            },
            Patrol::default(),
            Transform::from_xyz(380.0, 300.0, 0.0),
            pending,
        ))
        .id();

    let mut attempts = 0;
    while app.world().entity(npc).get::<PendingSchedule>().is_some() {
        app.update();
        attempts += 1;
        assert!(attempts < 500, "fetch task never resolved");
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    assert!(
        !app.world()
            .entity(npc)
            .get::<Patrol>()
            .unwrap()
            .is_patrolling(),
        "missing schedule leaves the NPC in wander permanently"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Player movement — exhaustion floor and stamina regen
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_exhausted_player_cannot_move_and_recovers() {
    let mut app = build_test_app();
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_systems(
        Update,
        player_movement.run_if(in_state(GameState::Playing)),
    );
    enter_playing_state(&mut app);

    app.world_mut().spawn((
        Player,
        PlayerMovement::default(),
        PlayerHitbox::default(),
        Transform::from_xyz(480.0, 320.0, 0.0),
    ));
    app.world_mut().resource_mut::<PlayerStamina>().current = 3.0;

    // Hold W while exhausted.
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyW);

    for _ in 0..20 {
        // Real time drives Time<Virtual> here; make sure some passes.
        std::thread::sleep(std::time::Duration::from_millis(1));
        app.update();
    }

    let mut query = app.world_mut().query_filtered::<&Transform, With<Player>>();
    let transform = query.single(app.world());
    assert_eq!(
        transform.translation.truncate(),
        Vec2::new(480.0, 320.0),
        "below the stamina floor the player stays put"
    );

    let stamina = app.world().resource::<PlayerStamina>();
    assert!(stamina.current > 3.0, "idle frames restore stamina");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: World reset bulk-clears and respawns
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_world_reset_clears_roster_and_blocks() {
    let mut app = build_test_app();
    app.add_systems(OnEnter(GameState::Playing), (spawn_world_npcs, setup_world));
    app.add_systems(OnEnter(GameState::Loading), (despawn_all_npcs, reset_world));
    app.add_systems(
        Update,
        handle_place_block.run_if(in_state(GameState::Playing)),
    );

    app.update(); // initial Loading
    enter_playing_state(&mut app);
    assert_eq!(
        app.world().resource::<NpcRoster>().entities.len(),
        WORLD_NPCS.len()
    );

    app.world_mut().send_event(PlaceBlockEvent {
        kind_id: "fence".to_string(),
        world_pos: Vec2::new(100.0, 100.0),
    });
    app.update();
    assert_eq!(app.world().resource::<WorldObjects>().blocks.len(), 1);

    // Reset: bounce through Loading.
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Loading);
    app.update();

    assert!(app.world().resource::<NpcRoster>().entities.is_empty());
    assert!(app.world().resource::<WorldObjects>().blocks.is_empty());
    assert!(app.world().resource::<Trees>().positions.is_empty());

    // Re-entering Playing rebuilds the world from scratch.
    enter_playing_state(&mut app);
    assert_eq!(
        app.world().resource::<NpcRoster>().entities.len(),
        WORLD_NPCS.len()
    );
}
