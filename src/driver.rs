//! Game Loop Driver
//!
//! Owns a round and its camera, pulls one `InputFrame` per frame from an
//! `InputSource`, ticks, and hands the frame's snapshot to a `FrameSink`.
//! Real-time runs pace frames with a tokio interval and measure the delta;
//! headless runs use a fixed delta as fast as possible.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::hash::StateHash;
use crate::core::vec3::Vector3;
use crate::game::events::GameEvent;
use crate::game::input::{parse_line, Command, Direction, HeldKeys, InputFrame, InputRecording, KeyAction};
use crate::game::snapshot::FrameSnapshot;
use crate::game::state::{GamePhase, PlatformId, Round};
use crate::game::tick::{tick, ConfigError, GameConfig};
use crate::game::camera::Camera;

/// Driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Invalid game configuration
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    /// Output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tick rate outside 1..=1000 Hz
    #[error("Tick rate must be 1-1000 Hz, got {0}")]
    InvalidTickRate(u32),
}

// =============================================================================
// COLLABORATOR TRAITS
// =============================================================================

/// Supplies one frame of input per tick.
pub trait InputSource {
    /// Input for the next tick, or `None` when the source is exhausted.
    fn poll(&mut self, round: &Round) -> Option<InputFrame>;
}

/// Consumes one snapshot per frame.
pub trait FrameSink {
    /// Present a frame and the events that produced it.
    fn present(&mut self, snapshot: &FrameSnapshot, events: &[GameEvent]) -> Result<(), DriverError>;
}

// =============================================================================
// GAME LOOP
// =============================================================================

/// Why a step ended the loop, if it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep going
    Continue,
    /// Quit command received
    Quit,
    /// Input source ran dry
    Exhausted,
}

/// Final state of a run.
#[derive(Clone, Debug)]
pub struct LoopSummary {
    /// Frames stepped
    pub frames: u32,
    /// Events seen
    pub events: usize,
    /// Phase at exit
    pub phase: GamePhase,
    /// Collectibles picked up at exit
    pub collected: usize,
    /// State hash at exit
    pub hash: StateHash,
}

/// Entry-point loop state.
pub struct GameLoop {
    round: Round,
    camera: Camera,
    config: GameConfig,
    recording: Option<InputRecording>,
    frames: u32,
    events: usize,
}

impl GameLoop {
    /// Create a loop over a fresh round.
    pub fn new(seed: u64, config: GameConfig) -> Result<Self, DriverError> {
        config.validate()?;
        Ok(Self {
            round: Round::new(seed, config.round_secs),
            camera: Camera::new(),
            config,
            recording: None,
            frames: 0,
            events: 0,
        })
    }

    /// Record every frame's input from now on.
    pub fn with_recording(mut self) -> Self {
        self.recording = Some(InputRecording::new(self.round.rng_seed));
        self
    }

    /// Current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Current camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Frames stepped so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Take the recording, if recording was enabled.
    pub fn take_recording(&mut self) -> Option<InputRecording> {
        self.recording.take()
    }

    /// Run one frame.
    pub fn step<I, S>(&mut self, input: &mut I, sink: &mut S, delta_ms: u32) -> Result<StepOutcome, DriverError>
    where
        I: InputSource + ?Sized,
        S: FrameSink + ?Sized,
    {
        let Some(frame) = input.poll(&self.round) else {
            return Ok(StepOutcome::Exhausted);
        };

        if let Some(recording) = self.recording.as_mut() {
            recording.record(self.frames, &frame);
        }
        self.frames += 1;

        let result = tick(&mut self.round, &mut self.camera, &frame, delta_ms, &self.config);
        self.events += result.events.len();

        if result.phase_changed {
            debug!(phase = ?self.round.phase, "phase changed");
        }

        let snapshot = FrameSnapshot::capture(&self.round, &self.camera);
        sink.present(&snapshot, &result.events)?;

        Ok(if result.quit_requested {
            StepOutcome::Quit
        } else {
            StepOutcome::Continue
        })
    }

    /// Summarize the current state.
    pub fn summary(&self) -> LoopSummary {
        LoopSummary {
            frames: self.frames,
            events: self.events,
            phase: self.round.phase,
            collected: self.round.collected_count(),
            hash: self.round.compute_hash(),
        }
    }
}

/// Step with a fixed delta until quit, exhaustion or `max_frames`.
pub fn run_headless<I, S>(
    game: &mut GameLoop,
    input: &mut I,
    sink: &mut S,
    delta_ms: u32,
    max_frames: u32,
) -> Result<LoopSummary, DriverError>
where
    I: InputSource + ?Sized,
    S: FrameSink + ?Sized,
{
    while game.frames() < max_frames {
        if game.step(input, sink, delta_ms)? != StepOutcome::Continue {
            break;
        }
    }
    Ok(game.summary())
}

/// Step at `tick_rate` Hz with measured deltas until quit, exhaustion or `max_frames`.
pub async fn run_realtime<I, S>(
    game: &mut GameLoop,
    input: &mut I,
    sink: &mut S,
    tick_rate: u32,
    max_frames: u32,
) -> Result<LoopSummary, DriverError>
where
    I: InputSource + ?Sized,
    S: FrameSink + ?Sized,
{
    if !(1..=1000).contains(&tick_rate) {
        return Err(DriverError::InvalidTickRate(tick_rate));
    }

    let tick_duration = Duration::from_micros(1_000_000 / tick_rate as u64);
    let mut tick_interval = interval(tick_duration);
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Running at {} Hz", tick_rate);

    // First interval tick completes immediately
    tick_interval.tick().await;
    let mut last = Instant::now();

    while game.frames() < max_frames {
        tick_interval.tick().await;

        let now = Instant::now();
        let delta_ms = now.duration_since(last).as_millis().min(u32::MAX as u128) as u32;
        last = now;

        if game.step(input, sink, delta_ms)? != StepOutcome::Continue {
            break;
        }
    }

    Ok(game.summary())
}

// =============================================================================
// INPUT SOURCES
// =============================================================================

/// Distance per axis below which the autopilot stops correcting.
const AUTOPILOT_DEADZONE: f32 = 0.2;

/// Scripted player: walks to the nearest collectible until none remain,
/// toggles one finished platform, then quits after a pause.
pub struct Autopilot {
    toggled: bool,
    linger: u32,
}

impl Autopilot {
    /// Create an autopilot that quits `linger` frames after finishing.
    pub fn new(linger: u32) -> Self {
        Self { toggled: false, linger }
    }

    fn steer(from: Vector3, to: Vector3) -> HeldKeys {
        let (dx, dz) = from.planar_offset_to(to);
        let mut held = HeldKeys::new();
        if dz < -AUTOPILOT_DEADZONE {
            held.insert(Direction::Forward);
        } else if dz > AUTOPILOT_DEADZONE {
            held.insert(Direction::Back);
        }
        if dx < -AUTOPILOT_DEADZONE {
            held.insert(Direction::Left);
        } else if dx > AUTOPILOT_DEADZONE {
            held.insert(Direction::Right);
        }
        held
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, round: &Round) -> Option<InputFrame> {
        match round.phase {
            GamePhase::GameOver => return Some(InputFrame::with_command(Command::Quit)),
            GamePhase::Win => {
                if !self.toggled {
                    self.toggled = true;
                    return Some(InputFrame::with_command(Command::ToggleAnimation(PlatformId::P0)));
                }
                if self.linger == 0 {
                    return Some(InputFrame::with_command(Command::Quit));
                }
                self.linger -= 1;
                return Some(InputFrame::new());
            }
            GamePhase::Playing => {}
        }

        let player = round.player.position;
        let target = round
            .uncollected()
            .min_by(|a, b| {
                player
                    .distance_squared(a.position)
                    .total_cmp(&player.distance_squared(b.position))
            })
            .map(|c| c.position);

        Some(match target {
            Some(target) => InputFrame::with_held(Self::steer(player, target)),
            None => InputFrame::new(),
        })
    }
}

/// Plays back a recording frame by frame.
pub struct ReplayInput {
    recording: InputRecording,
    frame: u32,
}

impl ReplayInput {
    /// Start at the first recorded frame.
    pub fn new(recording: InputRecording) -> Self {
        Self { recording, frame: 0 }
    }
}

impl InputSource for ReplayInput {
    fn poll(&mut self, _round: &Round) -> Option<InputFrame> {
        if self.frame > self.recording.end_tick {
            return None;
        }
        let frame = self.recording.input_at(self.frame);
        self.frame += 1;
        Some(frame)
    }
}

/// Frames a movement key stays held after one terminal keypress.
pub const TERMINAL_HOLD_FRAMES: u32 = 12;

/// Line-based keyboard input.
///
/// Each line is parsed into key actions. A terminal reports presses, not
/// releases, so a movement key stays held for `TERMINAL_HOLD_FRAMES`.
pub struct TerminalInput {
    rx: mpsc::UnboundedReceiver<Vec<KeyAction>>,
    hold: [u32; 4],
}

impl TerminalInput {
    /// Read stdin on a runtime task. Must be called inside a tokio runtime.
    pub fn spawn_stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match parse_line(&line) {
                    Ok(actions) => {
                        if tx.send(actions).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("{}", e),
                }
            }
            // EOF quits
            let _ = tx.send(vec![KeyAction::Command(Command::Quit)]);
        });

        Self::from_receiver(rx)
    }

    /// Use an existing channel of parsed actions.
    pub fn from_receiver(rx: mpsc::UnboundedReceiver<Vec<KeyAction>>) -> Self {
        Self { rx, hold: [0; 4] }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, _round: &Round) -> Option<InputFrame> {
        let mut frame = InputFrame::new();

        while let Ok(actions) = self.rx.try_recv() {
            for action in actions {
                match action {
                    KeyAction::Move(direction) => self.hold[direction as usize] = TERMINAL_HOLD_FRAMES,
                    KeyAction::Command(command) => frame.commands.push(command),
                }
            }
        }

        for direction in Direction::ALL {
            let remaining = &mut self.hold[direction as usize];
            if *remaining > 0 {
                frame.held.insert(direction);
                *remaining -= 1;
            }
        }

        Some(frame)
    }
}

// =============================================================================
// FRAME SINKS
// =============================================================================

/// Logs a HUD line periodically and on every phase-changing event.
pub struct LogSink {
    every: u32,
    frames: u32,
}

impl LogSink {
    /// Log every `every` frames (at least 1).
    pub fn new(every: u32) -> Self {
        Self { every: every.max(1), frames: 0 }
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, snapshot: &FrameSnapshot, events: &[GameEvent]) -> Result<(), DriverError> {
        self.frames += 1;
        if self.frames % self.every == 0 || events.iter().any(GameEvent::is_outcome) {
            info!("{}", snapshot.hud_line());
        }
        Ok(())
    }
}

/// Writes one JSON snapshot per frame.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonSink<W> {
    fn present(&mut self, snapshot: &FrameSnapshot, _events: &[GameEvent]) -> Result<(), DriverError> {
        let line = snapshot.to_json()?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }
}

/// Discards frames.
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _snapshot: &FrameSnapshot, _events: &[GameEvent]) -> Result<(), DriverError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tick::replay_round;

    fn demo_loop(seed: u64) -> GameLoop {
        GameLoop::new(seed, GameConfig::deterministic()).unwrap().with_recording()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig { round_secs: 0, ..GameConfig::default() };
        assert!(matches!(GameLoop::new(1, config), Err(DriverError::Config(_))));
    }

    #[test]
    fn test_autopilot_wins() {
        let mut game = demo_loop(2024);
        let summary = run_headless(&mut game, &mut Autopilot::new(30), &mut NullSink, 16, 20_000).unwrap();

        assert_eq!(summary.phase, GamePhase::Win);
        assert_eq!(summary.collected, 12);
        // Toggled off after the auto-enable
        assert!(!game.round().platform(PlatformId::P0).animation_active);
        assert!(game.round().platform(PlatformId::P1).animation_active);
    }

    #[test]
    fn test_recording_replays_to_same_hash() {
        let mut game = demo_loop(77);
        let summary = run_headless(&mut game, &mut Autopilot::new(10), &mut NullSink, 16, 20_000).unwrap();
        let recording = game.take_recording().unwrap();

        let (_, hash, _) = replay_round(&recording, 16, &GameConfig::deterministic());
        assert_eq!(hash, summary.hash);

        let mut replayed = GameLoop::new(77, GameConfig::deterministic()).unwrap();
        let replay_summary =
            run_headless(&mut replayed, &mut ReplayInput::new(recording), &mut NullSink, 16, u32::MAX).unwrap();
        assert_eq!(replay_summary.hash, summary.hash);
        assert_eq!(replay_summary.frames, summary.frames);
    }

    #[test]
    fn test_max_frames_stops() {
        let mut game = demo_loop(5);
        let summary = run_headless(&mut game, &mut Autopilot::new(0), &mut NullSink, 16, 10).unwrap();
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.phase, GamePhase::Playing);
    }

    #[test]
    fn test_terminal_input_holds_moves() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut input = TerminalInput::from_receiver(rx);
        let round = Round::default();

        tx.send(vec![KeyAction::Move(Direction::Left), KeyAction::Command(Command::Restart)]).unwrap();

        let first = input.poll(&round).unwrap();
        assert!(first.held.contains(Direction::Left));
        assert_eq!(first.commands, vec![Command::Restart]);

        for _ in 1..TERMINAL_HOLD_FRAMES {
            let frame = input.poll(&round).unwrap();
            assert!(frame.held.contains(Direction::Left));
            assert!(frame.commands.is_empty());
        }
        assert!(input.poll(&round).unwrap().is_idle());
    }

    #[test]
    fn test_json_sink_writes_lines() {
        let mut game = demo_loop(9);
        let mut sink = JsonSink::new(Vec::new());
        run_headless(&mut game, &mut Autopilot::new(0), &mut sink, 16, 3).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 3);
        for line in out.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["total"], 12);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_measures_delta() {
        let mut game = demo_loop(3);
        let summary = run_realtime(&mut game, &mut Autopilot::new(0), &mut NullSink, 50, 60)
            .await
            .unwrap();

        assert_eq!(summary.frames, 60);
        assert!(game.round().clock.remaining_secs < 120);
    }

    #[tokio::test]
    async fn test_realtime_rejects_bad_rate() {
        let mut game = demo_loop(3);
        let err = run_realtime(&mut game, &mut Autopilot::new(0), &mut NullSink, 0, 1).await;
        assert!(matches!(err, Err(DriverError::InvalidTickRate(0))));
    }
}
