//! Round scenarios driven through the public tick API.
//!
//! Each test builds a round from a fixed seed, feeds frames through `tick`
//! and checks the resulting state the way a renderer would see it.

use ancient_warriors::core::constants::{GROUND_SIZE, PICKUP_RADIUS};
use ancient_warriors::game::events::GameEventData;
use ancient_warriors::game::platform::recompute_completion;
use ancient_warriors::game::snapshot::FrameSnapshot;
use ancient_warriors::{
    tick, Camera, Command, Direction, GameConfig, GamePhase, HeldKeys, InputFrame, PlatformId,
    Round, Vector3,
};

const SEED: u64 = 0x5EED;

fn setup() -> (Round, Camera, GameConfig) {
    let config = GameConfig::deterministic();
    (Round::new(SEED, config.round_secs), Camera::new(), config)
}

fn idle(round: &mut Round, camera: &mut Camera, config: &GameConfig, delta_ms: u32) {
    tick(round, camera, &InputFrame::new(), delta_ms, config);
}

#[test]
fn restart_resets_everything_but_the_camera() {
    let (mut round, mut camera, config) = setup();

    // Mess the round up
    let walk = InputFrame::with_held(HeldKeys::new().with(Direction::Right));
    for _ in 0..50 {
        tick(&mut round, &mut camera, &walk, 16, &config);
    }
    for c in round.collectibles.iter_mut().take(3) {
        c.collected = true;
    }
    idle(&mut round, &mut camera, &config, 16);
    assert!(round.platform(PlatformId::P0).animation_active);
    round.clock.remaining_secs = 0;
    round.phase = GamePhase::GameOver;
    camera.drag(30, 0);

    let result = tick(&mut round, &mut camera, &InputFrame::with_command(Command::Restart), 16, &config);

    assert!(result.phase_changed);
    assert_eq!(round.phase, GamePhase::Playing);
    assert_eq!(round.clock.remaining_secs, 120);
    assert_eq!(round.collected_count(), 0);
    assert!(round.platforms.iter().all(|p| !p.all_collected && !p.animation_active));
    assert_eq!(round.player.position, Vector3::new(0.0, 0.5, 0.0));
    assert_eq!(round.player.facing_degrees(), 0.0);
    assert_eq!(camera.yaw_deg, 15.0);
}

#[test]
fn out_of_bounds_step_leaves_player_in_place() {
    let (mut round, mut camera, config) = setup();
    round.player.position = Vector3::new(-GROUND_SIZE + 1.5, 0.5, 0.0);

    let left = InputFrame::with_held(HeldKeys::new().with(Direction::Left));

    // -48.5 -> -48.8 is inside
    tick(&mut round, &mut camera, &left, 16, &config);
    assert!((round.player.position.x + 48.8).abs() < 1e-4);

    // -48.8 -> -49.1 is outside: rejected whole, facing still updates
    round.player.facing = Direction::Right;
    let before = round.player.position;
    tick(&mut round, &mut camera, &left, 16, &config);
    assert_eq!(round.player.position, before);
    assert_eq!(round.player.facing, Direction::Left);

    // Reaching x = -GROUND_SIZE is rejected as well
    round.player.position = Vector3::new(-GROUND_SIZE + 0.3, 0.5, 0.0);
    tick(&mut round, &mut camera, &left, 16, &config);
    assert_eq!(round.player.position.x, -GROUND_SIZE + 0.3);
}

#[test]
fn pickup_radius_is_strict() {
    let (mut round, mut camera, config) = setup();
    let target = round.collectibles[0].position;

    round.player.position = Vector3::new(target.x, target.y, target.z + PICKUP_RADIUS);
    idle(&mut round, &mut camera, &config, 16);
    assert!(!round.collectibles[0].collected);

    round.player.position = Vector3::new(target.x, target.y, target.z + 1.49);
    let result = tick(&mut round, &mut camera, &InputFrame::new(), 16, &config);
    assert!(round.collectibles[0].collected);
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::CollectiblePicked { collectible_id: 0, .. })));
}

#[test]
fn completing_every_platform_wins_on_the_same_tick() {
    let (mut round, mut camera, config) = setup();
    for c in round.collectibles.iter_mut() {
        c.collected = true;
    }

    // Completion step on its own
    let mut direct = round.clone();
    assert_eq!(recompute_completion(&mut direct).len(), 4);
    assert!(direct.platforms.iter().all(|p| p.all_collected && p.animation_active));

    // Through the tick
    let result = tick(&mut round, &mut camera, &InputFrame::new(), 16, &config);

    assert!(result.phase_changed);
    assert_eq!(round.phase, GamePhase::Win);
    assert!(round.platforms.iter().all(|p| p.all_collected && p.animation_active));

    let completed = result
        .events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::PlatformCompleted { .. }))
        .count();
    assert_eq!(completed, 4);
    assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::RoundWon { .. })));

    // Win is not terminal for movement, and does not fire twice
    let walk = InputFrame::with_held(HeldKeys::new().with(Direction::Back));
    let result = tick(&mut round, &mut camera, &walk, 16, &config);
    assert_eq!(round.phase, GamePhase::Win);
    assert!(!result.phase_changed);
    assert!(round.player.position.z > 0.0);

    // The clock stops once won
    let remaining = round.clock.remaining_secs;
    idle(&mut round, &mut camera, &config, 5000);
    assert_eq!(round.clock.remaining_secs, remaining);
}

#[test]
fn timer_runs_out_after_120_seconds() {
    let (mut round, mut camera, config) = setup();

    for call in 1..=119 {
        idle(&mut round, &mut camera, &config, 1000);
        assert_eq!(round.phase, GamePhase::Playing, "call {}", call);
        assert_eq!(round.clock.remaining_secs, 120 - call);
    }

    let result = tick(&mut round, &mut camera, &InputFrame::new(), 1000, &config);
    assert_eq!(round.phase, GamePhase::GameOver);
    assert_eq!(round.clock.remaining_secs, 0);
    assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::TimeExpired { .. })));

    // Nothing moves after time is up
    let walk = InputFrame::with_held(HeldKeys::new().with(Direction::Forward));
    tick(&mut round, &mut camera, &walk, 1000, &config);
    assert_eq!(round.player.position, Vector3::new(0.0, 0.5, 0.0));
    assert_eq!(round.clock.remaining_secs, 0);
}

#[test]
fn paused_animation_keeps_its_value() {
    let (mut round, mut camera, config) = setup();
    round.platform_mut(PlatformId::P0).animation_active = true;

    // Lantern: 4 per tick
    for _ in 0..25 {
        idle(&mut round, &mut camera, &config, 16);
    }
    assert_eq!(round.platform(PlatformId::P0).animation_value, 100.0);

    round.platform_mut(PlatformId::P0).animation_active = false;
    for _ in 0..40 {
        idle(&mut round, &mut camera, &config, 16);
    }
    assert_eq!(round.platform(PlatformId::P0).animation_value, 100.0);

    // Resumes from where it stopped
    round.platform_mut(PlatformId::P0).animation_active = true;
    idle(&mut round, &mut camera, &config, 16);
    assert_eq!(round.platform(PlatformId::P0).animation_value, 104.0);
}

#[test]
fn toggle_command_respects_completion() {
    let (mut round, mut camera, config) = setup();
    let toggle = InputFrame::with_command(Command::ToggleAnimation(PlatformId::P3));

    let result = tick(&mut round, &mut camera, &toggle, 16, &config);
    assert!(!round.platform(PlatformId::P3).animation_active);
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::AnimationLocked { platform: PlatformId::P3, .. })));

    for c in round.collectibles.iter_mut().filter(|c| c.platform == PlatformId::P3) {
        c.collected = true;
    }
    idle(&mut round, &mut camera, &config, 16);
    assert!(round.platform(PlatformId::P3).animation_active);

    tick(&mut round, &mut camera, &toggle, 16, &config);
    assert!(!round.platform(PlatformId::P3).animation_active);
    tick(&mut round, &mut camera, &toggle, 16, &config);
    assert!(round.platform(PlatformId::P3).animation_active);
}

#[test]
fn snapshot_reflects_the_tick() {
    let (mut round, mut camera, config) = setup();
    let frame = InputFrame {
        held: HeldKeys::new().with(Direction::Forward),
        commands: vec![Command::SelectCamera(ancient_warriors::CameraMode::Top)],
    };
    tick(&mut round, &mut camera, &frame, 16, &config);

    let snapshot = FrameSnapshot::capture(&round, &camera);
    assert_eq!(snapshot.player_facing_deg, 180.0);
    assert_eq!(snapshot.camera.eye.y, 40.0);
    assert_eq!(snapshot.camera.eye.x, snapshot.player_position.x);
    assert_eq!(snapshot.collectibles.len(), 12);
    assert_eq!(snapshot.collectible_spin, 1.0);
}
