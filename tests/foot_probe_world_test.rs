//! End-to-end foot probing against Rapier3D ground geometry.
//! Each test builds a small Z-up world, spawns the default character
//! (reference plane at Z=0, feet at Y=+12 right / Y=-12 left) and ticks it.
//!
//! Run with: cargo test --test foot_probe_world_test -- --nocapture

use footprint::config::{CharacterConfig, FootPrintConfig, GroundBox, PathConfig, SceneConfig};
use footprint::game::debug_draw::DebugPrimitive;
use footprint::game::{DebugRecorder, FootCharacter, PhysicsWorld, Scene};

const CHARACTER_ID: u64 = 100;
const TOL: f32 = 1e-3;

// ---------------------------------------------------------------------------
// Shared setup
// ---------------------------------------------------------------------------

/// Ground slab whose top face sits at `top_z`, covering one side of the Y axis.
fn half_slab(world: &mut PhysicsWorld, id: u64, positive_y: bool, top_z: f32) {
    let center_y = if positive_y { 250.0 } else { -250.0 };
    world.add_ground_box(id, [0.0, center_y, top_z - 10.0], [500.0, 250.0, 10.0]);
}

fn spawn(world: &mut PhysicsWorld, footprint: FootPrintConfig) -> FootCharacter {
    let character = FootCharacter::spawn(world, CHARACTER_ID, &CharacterConfig::default(), &footprint);
    world.update_queries();
    character
}

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < TOL,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

// ===========================================================================
// Single contact
// ===========================================================================
#[test]
fn test_right_foot_only_grounded() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -5.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());

    let tick = character.tick(&world, &mut ()).unwrap();
    println!("single contact: {:?}", tick.state);

    assert!(tick.foot.results.right.is_some());
    assert!(tick.foot.results.left.is_none());
    assert_close(tick.state.foot_offset_right.z, -5.0, "right offset");
    assert_eq!(tick.state.foot_offset_right.x, 0.0);
    assert_eq!(tick.state.foot_offset_right.y, 0.0);
    assert_eq!(tick.state.foot_offset_left.z, 0.0);
    assert_eq!(tick.state.pelvis_offset, 0.0);
}

// ===========================================================================
// Double contact tie-break
// ===========================================================================
#[test]
fn test_right_upper_drops_pelvis_to_left() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -3.0);
    half_slab(&mut world, 2, false, -7.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());

    let state = character.tick(&world, &mut ()).unwrap().state;
    assert_close(state.pelvis_offset, -7.0, "pelvis");
    assert_close(state.foot_offset_right.z, -3.0, "right offset");
    assert_eq!(state.foot_offset_left.z, 0.0);
}

#[test]
fn test_left_upper_drops_pelvis_to_right() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -7.0);
    half_slab(&mut world, 2, false, -3.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());

    let state = character.tick(&world, &mut ()).unwrap().state;
    assert_close(state.pelvis_offset, -7.0, "pelvis");
    assert_close(state.foot_offset_left.z, -3.0, "left offset");
    assert_eq!(state.foot_offset_right.z, 0.0);
}

#[test]
fn test_step_under_right_foot() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, 20.0);
    half_slab(&mut world, 2, false, 0.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());

    let state = character.tick(&world, &mut ()).unwrap().state;
    assert_close(state.foot_offset_right.z, 20.0, "right offset");
    assert_close(state.pelvis_offset, 0.0, "pelvis");
    assert_eq!(state.foot_offset_left.z, 0.0);
}

// ===========================================================================
// No contact and stale values
// ===========================================================================
#[test]
fn test_airborne_keeps_last_pelvis() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -3.0);
    half_slab(&mut world, 2, false, -7.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());
    character.tick(&world, &mut ()).unwrap();

    // Lift the character well above the probe range
    world.set_character_position(CHARACTER_ID, [0.0, 0.0, 400.0]);
    world.update_queries();
    let tick = character.tick(&world, &mut ()).unwrap();

    assert!(tick.foot.results.right.is_none());
    assert!(tick.foot.results.left.is_none());
    assert_eq!(tick.state.foot_offset_right.z, 0.0);
    assert_eq!(tick.state.foot_offset_left.z, 0.0);
    assert_close(tick.state.pelvis_offset, -7.0, "stale pelvis");
}

#[test]
fn test_disabled_probing_freezes_state() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -3.0);
    half_slab(&mut world, 2, false, -7.0);
    let mut character = spawn(&mut world, FootPrintConfig::default());
    let enabled = character.tick(&world, &mut ()).unwrap().state;

    character.probe.set_enabled(false);
    world.remove_ground(2);
    world.update_queries();

    for _ in 0..3 {
        let tick = character.tick(&world, &mut ()).unwrap();
        assert!(!tick.foot.applied);
        assert_eq!(tick.state, enabled);
    }

    character.probe.set_enabled(true);
    let state = character.tick(&world, &mut ()).unwrap().state;
    assert_close(state.foot_offset_right.z, -3.0, "right offset after re-enable");
    assert_eq!(state.foot_offset_left.z, 0.0);
}

// ===========================================================================
// Probes ignore the socket height
// ===========================================================================
#[test]
fn test_lifted_foot_still_probes_from_reference_plane() {
    let mut world = PhysicsWorld::new();
    half_slab(&mut world, 1, true, -5.0);
    half_slab(&mut world, 2, false, -5.0);

    let character_config = CharacterConfig {
        // Right foot raised mid-stride
        right_foot: [0.0, 12.0, -30.0],
        ..CharacterConfig::default()
    };
    let mut character = FootCharacter::spawn(
        &mut world,
        CHARACTER_ID,
        &character_config,
        &FootPrintConfig::default(),
    );
    world.update_queries();

    let mut recorder = DebugRecorder::default();
    let tick = character.tick(&world, &mut recorder).unwrap();
    assert_eq!(tick.foot.segments.right.start.z, 40.0);
    assert_eq!(tick.foot.segments.right.end.z, -40.0);
    assert_close(tick.state.pelvis_offset, -5.0, "pelvis");

    let right_point = recorder.primitives.iter().find_map(|p| match p {
        DebugPrimitive::Point { position, .. } => Some(*position),
        _ => None,
    });
    assert_eq!(right_point, Some([0.0, 12.0, 66.0]), "point marker stays at the socket");
}

// ===========================================================================
// Scene walk
// ===========================================================================
#[test]
fn test_scene_walk_onto_step() {
    let config = SceneConfig {
        name: "walk".to_string(),
        footprint: FootPrintConfig::default(),
        character: CharacterConfig::default(),
        ground: vec![
            GroundBox {
                center: [0.0, 0.0, -10.0],
                half_extents: [500.0, 500.0, 10.0],
            },
            GroundBox {
                center: [0.0, 150.0, 5.0],
                half_extents: [500.0, 140.0, 10.0],
            },
        ],
        // Trigger volume over the step edge; foot traces pass through it
        sensors: vec![GroundBox {
            center: [0.0, 0.0, 40.0],
            half_extents: [100.0, 30.0, 40.0],
        }],
        path: PathConfig {
            waypoints: vec![[0.0, -50.0, 96.0], [0.0, 50.0, 96.0]],
            step: 10.0,
            face_travel: false,
        },
    };
    assert!(config.validate().is_ok());

    let mut scene = Scene::from_config(&config);
    let reports = scene.run(11, &mut ()).unwrap();
    for r in &reports {
        println!("{:?}", r);
    }

    // Both feet on the floor before the step
    let first = &reports[0];
    assert_eq!(first.position, [0.0, -50.0, 96.0]);
    assert!(first.foot_offset_right[2].abs() < TOL);
    assert!(first.pelvis.abs() < TOL);

    // Y=0: right foot (Y=12) on the step top (Z=15), left on the floor
    let straddle = &reports[5];
    assert_eq!(straddle.position[1], 0.0);
    assert!((straddle.foot_offset_right[2] - 15.0).abs() < TOL, "{:?}", straddle);
    assert_eq!(straddle.foot_offset_left[2], 0.0);
    assert!(straddle.pelvis.abs() < TOL);

    // Y=50: both feet on the step, pelvis follows it
    let last = &reports[10];
    assert!((last.pelvis - 15.0).abs() < TOL, "{:?}", last);
    assert_eq!(last.foot_offset_right[2], 0.0);
}

#[test]
fn test_report_serializes_to_json() {
    let mut scene = Scene::from_config(&SceneConfig::sample());
    let reports = scene.run(1, &mut ()).unwrap();
    let json = serde_json::to_value(&reports[0]).unwrap();
    assert_eq!(json["tick"], 0);
    assert_eq!(json["right_grounded"], true);
    assert!(json["foot_offset_right"].is_array());
}
