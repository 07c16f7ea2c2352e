//! Ancient Warriors
//!
//! Runs a round of the game-state core without a renderer: an autopilot
//! demo with replay verification, interactive terminal play, or a replayed
//! recording. Frames go to the log as HUD lines, or to stdout as JSON.
//!
//! # Usage
//!
//! ```bash
//! ancient-warriors --seed 42
//! ancient-warriors --mode play --json
//! ancient-warriors --mode replay --realtime --tick-rate 30
//! ```

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ancient_warriors::{
    VERSION, TICK_RATE,
    core::rng::seed_from_clock,
    driver::{
        run_headless, run_realtime, Autopilot, FrameSink, GameLoop, InputSource, JsonSink,
        LogSink, LoopSummary, NullSink, ReplayInput, TerminalInput,
    },
    game::tick::{replay_round, GameConfig},
};

/// Frames the autopilot waits after finishing before it quits.
const DEMO_LINGER_FRAMES: u32 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Autopilot plays one round, then the recording is replayed and checked
    Demo,
    /// Keyboard lines from stdin (w/a/s/d, z/x/c/v, 0-3, r, esc)
    Play,
    /// Autopilot round recorded silently, then presented from the recording
    Replay,
}

#[derive(Parser)]
#[command(name = "ancient-warriors")]
#[command(author, version, about = "Ancient Warriors - collectible-gathering game core")]
struct Args {
    /// Round seed (defaults to the wall clock)
    #[arg(long)]
    seed: Option<u64>,

    /// What to run
    #[arg(long, value_enum, default_value = "demo")]
    mode: Mode,

    /// Pace frames in real time instead of running flat out (play always does)
    #[arg(long)]
    realtime: bool,

    /// Frames per second
    #[arg(long, default_value_t = TICK_RATE)]
    tick_rate: u32,

    /// Write one JSON snapshot per frame to stdout; logs go to stderr
    #[arg(long)]
    json: bool,

    /// Stop after this many frames
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,
}

impl Args {
    fn frame_ms(&self) -> u32 {
        (1000 / self.tick_rate.max(1)).max(1)
    }

    fn sink(&self) -> Box<dyn FrameSink> {
        if self.json {
            Box::new(JsonSink::new(std::io::stdout()))
        } else {
            Box::new(LogSink::new(self.tick_rate))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.tick_rate == 0 || args.tick_rate > 1000 {
        bail!("--tick-rate must be 1-1000, got {}", args.tick_rate);
    }

    let seed = args.seed.unwrap_or_else(seed_from_clock);

    info!("Ancient Warriors v{}", VERSION);
    info!("Seed: {}", seed);
    info!("Tick Rate: {} Hz", args.tick_rate);

    match args.mode {
        Mode::Demo => demo(&args, seed).await,
        Mode::Play => play(&args, seed).await,
        Mode::Replay => replay(&args, seed).await,
    }
}

/// Step a loop headless or in real time, per the arguments.
async fn drive(
    args: &Args,
    game: &mut GameLoop,
    input: &mut dyn InputSource,
    sink: &mut dyn FrameSink,
    realtime: bool,
) -> Result<LoopSummary> {
    let summary = if realtime {
        run_realtime(game, input, sink, args.tick_rate, args.max_ticks).await?
    } else {
        run_headless(game, input, sink, args.frame_ms(), args.max_ticks)?
    };
    Ok(summary)
}

fn report(summary: &LoopSummary) {
    info!("=== Round Results ===");
    info!("Frames: {}", summary.frames);
    info!("Phase: {:?}", summary.phase);
    info!("Collected: {}", summary.collected);
    info!("Events: {}", summary.events);
    info!("Final State Hash: {}", hex::encode(summary.hash));
}

/// Autopilot round, then a replay from the recording with hash comparison.
async fn demo(args: &Args, seed: u64) -> Result<()> {
    info!("=== Starting Demo Round ===");

    let config = GameConfig::deterministic();
    let mut game = GameLoop::new(seed, config.clone())?.with_recording();
    let mut sink = args.sink();

    let summary = drive(args, &mut game, &mut Autopilot::new(DEMO_LINGER_FRAMES), sink.as_mut(), args.realtime).await?;
    report(&summary);

    let Some(recording) = game.take_recording() else {
        bail!("demo round was not recorded");
    };
    info!(
        "Recorded {} frames ({} key changes, {} commands)",
        summary.frames,
        recording.delta_count(),
        recording.command_count()
    );

    info!("=== Verifying Replay ===");
    if args.realtime {
        warn!("Real-time deltas are not replayable; expect a hash mismatch");
    }
    let (_, replay_hash, _) = replay_round(&recording, args.frame_ms(), &config);
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if replay_hash == summary.hash {
        info!("REPLAY VERIFIED: Hashes match!");
    } else {
        warn!("REPLAY MISMATCH: Hashes differ!");
    }
    Ok(())
}

/// Interactive round from stdin.
async fn play(args: &Args, seed: u64) -> Result<()> {
    info!("=== Play ===");
    info!("Type keys and press enter: w/a/s/d move, z/x/c/v toggle, 0-3 camera, r restart, esc quit");

    let mut game = GameLoop::new(seed, GameConfig::default())?;
    let mut input = TerminalInput::spawn_stdin();
    let mut sink = args.sink();

    let summary = drive(args, &mut game, &mut input, sink.as_mut(), true).await?;
    report(&summary);
    Ok(())
}

/// Silent autopilot round, presented again from its recording.
async fn replay(args: &Args, seed: u64) -> Result<()> {
    let config = GameConfig::deterministic();

    let mut recorder = GameLoop::new(seed, config.clone())?.with_recording();
    let recorded = run_headless(
        &mut recorder,
        &mut Autopilot::new(DEMO_LINGER_FRAMES),
        &mut NullSink,
        args.frame_ms(),
        args.max_ticks,
    )?;
    let Some(recording) = recorder.take_recording() else {
        bail!("round was not recorded");
    };

    info!("=== Replaying {} frames ===", recorded.frames);
    let mut game = GameLoop::new(seed, config)?;
    let mut sink = args.sink();
    let summary = drive(args, &mut game, &mut ReplayInput::new(recording), sink.as_mut(), args.realtime).await?;
    report(&summary);
    Ok(())
}
