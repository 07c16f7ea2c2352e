//! Round Simulation Tick
//!
//! One call advances the round by one frame. Given the same seed, reseed
//! policy and input stream the round goes through the same states.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::constants::{GAME_TIME_SECS, GROUND_SIZE, PICKUP_RADIUS, PLAYER_SPEED};
use crate::core::hash::StateHash;
use crate::core::rng::seed_from_clock;
use crate::game::animation::advance_animations;
use crate::game::camera::Camera;
use crate::game::clock::ClockStep;
use crate::game::collectible::check_pickups;
use crate::game::events::GameEvent;
use crate::game::input::{Command, InputFrame, InputRecording};
use crate::game::movement::apply_movement;
use crate::game::platform::{check_win, recompute_completion, toggle_animation};
use crate::game::state::{GamePhase, Round};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Where a restarted round gets its seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReseedPolicy {
    /// Fresh seed from the wall clock
    #[default]
    WallClock,
    /// Next value of the current round's RNG (replayable)
    Chained,
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Arena too small to leave a walkable area
    #[error("arena half extent {0} leaves no walkable area")]
    ArenaTooSmall(f32),

    /// Arena does not reach the platforms
    #[error("arena half extent {0} does not contain the platforms")]
    ArenaExcludesPlatforms(f32),

    /// Non-positive or non-finite speed
    #[error("player speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    /// Zero-length round
    #[error("round length must be at least one second")]
    ZeroRoundLength,

    /// Non-positive or non-finite pickup radius
    #[error("pickup radius must be positive and finite, got {0}")]
    InvalidPickupRadius(f32),
}

/// Configuration for round simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Arena half extent; the walkable area stops one unit short of it
    pub arena_half_extent: f32,
    /// Displacement per tick per held direction
    pub player_speed: f32,
    /// Round length in seconds
    pub round_secs: u32,
    /// Pickup radius (strict)
    pub pickup_radius: f32,
    /// Seed source on restart
    pub reseed: ReseedPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_half_extent: GROUND_SIZE,
            player_speed: PLAYER_SPEED,
            round_secs: GAME_TIME_SECS,
            pickup_radius: PICKUP_RADIUS,
            reseed: ReseedPolicy::WallClock,
        }
    }
}

/// Outermost platform edge from the arena centre.
const PLATFORM_REACH: f32 = 17.5;

impl GameConfig {
    /// Default config with replayable restarts.
    pub fn deterministic() -> Self {
        Self {
            reseed: ReseedPolicy::Chained,
            ..Self::default()
        }
    }

    /// Check the config describes a playable round.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_half_extent.is_finite() && self.arena_half_extent > 1.0) {
            return Err(ConfigError::ArenaTooSmall(self.arena_half_extent));
        }
        if self.arena_half_extent - 1.0 < PLATFORM_REACH {
            return Err(ConfigError::ArenaExcludesPlatforms(self.arena_half_extent));
        }
        if !(self.player_speed.is_finite() && self.player_speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.player_speed));
        }
        if self.round_secs == 0 {
            return Err(ConfigError::ZeroRoundLength);
        }
        if !(self.pickup_radius.is_finite() && self.pickup_radius > 0.0) {
            return Err(ConfigError::InvalidPickupRadius(self.pickup_radius));
        }
        Ok(())
    }

    /// Seed for the next round under this config's policy.
    pub fn next_seed(&self, round: &mut Round) -> u64 {
        match self.reseed {
            ReseedPolicy::WallClock => seed_from_clock(),
            ReseedPolicy::Chained => round.rng.next_u64(),
        }
    }
}

// =============================================================================
// TICK
// =============================================================================

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the phase differs from the start of the tick
    pub phase_changed: bool,
    /// A quit command arrived
    pub quit_requested: bool,
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `round` - The round state (will be mutated)
/// * `camera` - Camera state; survives restarts
/// * `frame` - Held keys and one-shot commands for this tick
/// * `delta_ms` - Measured time since the previous tick; only the clock uses it
/// * `config` - Round configuration
pub fn tick(
    round: &mut Round,
    camera: &mut Camera,
    frame: &InputFrame,
    delta_ms: u32,
    config: &GameConfig,
) -> TickResult {
    let mut result = TickResult::default();
    let start_phase = round.phase;

    // 0. Advance tick counter
    round.tick += 1;

    // 1. One-shot commands
    let restarted = apply_commands(round, camera, &frame.commands, config, &mut result);

    // 2. Clock (a restart zeroes this tick's elapsed time)
    let delta_ms = if restarted { 0 } else { delta_ms };
    update_clock(round, delta_ms);

    // 3. Animations
    advance_animations(round);

    if round.phase.allows_movement() {
        // 4. Movement
        apply_movement(round, frame.held, config.player_speed, config.arena_half_extent);

        // 5. Pickups
        check_pickups(round, config.pickup_radius);

        // 6. Platform completion
        recompute_completion(round);

        // 7. Win check
        check_win(round);
    }

    result.phase_changed = restarted || round.phase != start_phase;
    result.events = round.take_events();

    result
}

/// Apply one-shot commands in arrival order. Returns true if the round restarted.
fn apply_commands(
    round: &mut Round,
    camera: &mut Camera,
    commands: &[Command],
    config: &GameConfig,
    result: &mut TickResult,
) -> bool {
    let mut restarted = false;

    for command in commands {
        match *command {
            Command::Restart => {
                let previous_phase = round.phase;
                let seed = config.next_seed(round);
                let carried = round.take_events();

                round.restart(seed);
                round.pending_events = carried;

                info!("Round restarted (seed {})", seed);
                round.push_event(GameEvent::round_restarted(round.tick, previous_phase, seed));
                restarted = true;
            }
            Command::SelectCamera(mode) => {
                let old_mode = camera.mode;
                camera.select(mode);
                if old_mode != mode {
                    round.push_event(GameEvent::camera_mode_changed(round.tick, old_mode, mode));
                }
            }
            Command::ToggleAnimation(id) => {
                toggle_animation(round, id);
            }
            Command::Drag { dx, dy } => camera.drag(dx, dy),
            Command::Scroll(steps) => camera.scroll(steps),
            Command::Quit => result.quit_requested = true,
        }
    }

    restarted
}

/// Feed measured time to the countdown while playing.
fn update_clock(round: &mut Round, delta_ms: u32) {
    if round.phase != GamePhase::Playing {
        return;
    }

    match round.clock.advance(delta_ms) {
        ClockStep::Idle => {}
        ClockStep::SecondElapsed => {
            let remaining = round.clock.remaining_secs;
            debug!("{} left", round.clock.format_mmss());
            round.push_event(GameEvent::second_elapsed(round.tick, remaining));
        }
        ClockStep::Expired => {
            round.phase = GamePhase::GameOver;
            let collected = round.collected_count() as u32;
            info!("Time up! Collected {}/{}", collected, round.total_count());
            round.push_event(GameEvent::second_elapsed(round.tick, 0));
            round.push_event(GameEvent::time_expired(round.tick, collected));
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a recording from its seed at a fixed frame time.
///
/// Returns the final round, its state hash and every event. Restarts inside
/// the recording only reproduce under `ReseedPolicy::Chained`.
pub fn replay_round(
    recording: &InputRecording,
    delta_ms: u32,
    config: &GameConfig,
) -> (Round, StateHash, Vec<GameEvent>) {
    let mut round = Round::new(recording.rng_seed, config.round_secs);
    let mut camera = Camera::new();
    let mut all_events = Vec::new();

    for (_, frame) in recording.replay_iter(0) {
        let result = tick(&mut round, &mut camera, &frame, delta_ms, config);
        all_events.extend(result.events);

        if result.quit_requested {
            break;
        }
    }

    let hash = round.compute_hash();
    (round, hash, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vector3;
    use crate::game::camera::CameraMode;
    use crate::game::events::GameEventData;
    use crate::game::input::{Direction, HeldKeys};
    use crate::game::state::PlatformId;

    fn setup() -> (Round, Camera, GameConfig) {
        let config = GameConfig::deterministic();
        (Round::new(12345, config.round_secs), Camera::new(), config)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::deterministic().reseed, ReseedPolicy::Chained);
    }

    #[test]
    fn test_config_rejects_nonsense() {
        let bad = GameConfig { player_speed: 0.0, ..GameConfig::default() };
        assert_eq!(bad.validate(), Err(ConfigError::InvalidSpeed(0.0)));

        let bad = GameConfig { round_secs: 0, ..GameConfig::default() };
        assert_eq!(bad.validate(), Err(ConfigError::ZeroRoundLength));

        let bad = GameConfig { arena_half_extent: 10.0, ..GameConfig::default() };
        assert_eq!(bad.validate(), Err(ConfigError::ArenaExcludesPlatforms(10.0)));

        let bad = GameConfig { pickup_radius: f32::NAN, ..GameConfig::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidPickupRadius(_))));
    }

    #[test]
    fn test_tick_determinism() {
        let (mut round1, mut camera1, config) = setup();
        let (mut round2, mut camera2, _) = setup();

        let frame = InputFrame::with_held(HeldKeys::new().with(Direction::Left).with(Direction::Forward));
        for _ in 0..200 {
            tick(&mut round1, &mut camera1, &frame, 16, &config);
            tick(&mut round2, &mut camera2, &frame, 16, &config);
        }

        assert_eq!(round1.tick, 200);
        assert_eq!(round1.compute_hash(), round2.compute_hash());
    }

    #[test]
    fn test_movement_uses_ticks_not_time() {
        let (mut round, mut camera, config) = setup();
        let frame = InputFrame::with_held(HeldKeys::new().with(Direction::Right));

        tick(&mut round, &mut camera, &frame, 16, &config);
        tick(&mut round, &mut camera, &frame, 400, &config);

        assert!((round.player.position.x - 0.6).abs() < 1e-6);
        assert_eq!(round.player.facing_degrees(), 270.0);
    }

    #[test]
    fn test_game_over_freezes_movement() {
        let (mut round, mut camera, config) = setup();
        round.clock.remaining_secs = 1;

        let frame = InputFrame::with_held(HeldKeys::new().with(Direction::Back));
        let result = tick(&mut round, &mut camera, &frame, 1000, &config);

        assert!(result.phase_changed);
        assert_eq!(round.phase, GamePhase::GameOver);
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::TimeExpired { .. })));
        assert_eq!(round.player.position, Vector3::new(0.0, 0.5, 0.0));

        tick(&mut round, &mut camera, &frame, 1000, &config);
        assert_eq!(round.player.position, Vector3::new(0.0, 0.5, 0.0));
        assert_eq!(round.clock.remaining_secs, 0);
    }

    #[test]
    fn test_restart_command() {
        let (mut round, mut camera, config) = setup();
        round.phase = GamePhase::GameOver;
        round.clock.remaining_secs = 0;
        round.clock.accumulator_ms = 700;
        camera.select(CameraMode::Top);

        let result = tick(&mut round, &mut camera, &InputFrame::with_command(Command::Restart), 900, &config);

        assert!(result.phase_changed);
        assert_eq!(round.phase, GamePhase::Playing);
        assert_eq!(round.clock.remaining_secs, 120);
        assert_eq!(round.clock.accumulator_ms, 0);
        assert_ne!(round.rng_seed, 12345);
        // Camera is not part of the round
        assert_eq!(camera.mode, CameraMode::Top);
        assert!(matches!(
            result.events[0].data,
            GameEventData::RoundRestarted { previous_phase: GamePhase::GameOver, .. }
        ));
    }

    #[test]
    fn test_chained_restart_is_reproducible() {
        let (mut round1, mut camera1, config) = setup();
        let (mut round2, mut camera2, _) = setup();
        let restart = InputFrame::with_command(Command::Restart);

        tick(&mut round1, &mut camera1, &restart, 16, &config);
        tick(&mut round2, &mut camera2, &restart, 16, &config);

        assert_eq!(round1.rng_seed, round2.rng_seed);
        assert_eq!(round1.compute_hash(), round2.compute_hash());
    }

    #[test]
    fn test_commands_in_any_phase() {
        let (mut round, mut camera, config) = setup();
        round.phase = GamePhase::GameOver;

        let frame = InputFrame {
            held: HeldKeys::NONE,
            commands: vec![
                Command::SelectCamera(CameraMode::Side),
                Command::ToggleAnimation(PlatformId::P1),
                Command::Quit,
            ],
        };
        let result = tick(&mut round, &mut camera, &frame, 16, &config);

        assert!(result.quit_requested);
        assert_eq!(camera.mode, CameraMode::Side);
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::AnimationLocked { .. })));
        assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::CameraModeChanged { .. })));
    }

    #[test]
    fn test_replay_determinism() {
        let config = GameConfig::deterministic();
        let mut recording = InputRecording::new(99999);

        for t in 0..300u32 {
            let direction = Direction::ALL[(t / 40) as usize % 4];
            let mut frame = InputFrame::with_held(HeldKeys::new().with(direction));
            if t == 150 {
                frame.commands.push(Command::Restart);
            }
            recording.record(t, &frame);
        }

        let (round1, hash1, events1) = replay_round(&recording, 16, &config);
        let (round2, hash2, events2) = replay_round(&recording, 16, &config);

        assert_eq!(hash1, hash2);
        assert_eq!(events1.len(), events2.len());
        assert_eq!(round1.player.position, round2.player.position);
        // Ticks since the restart on frame 150
        assert_eq!(round1.tick, 149);
    }
}
