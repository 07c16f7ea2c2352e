//! # Ancient Warriors
//!
//! Game-state core for Ancient Warriors, a 3D collectible-gathering game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ANCIENT WARRIORS                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── vec3.rs     - 3D vector and RGB color                   │
//! │  ├── constants.rs- Arena, round and camera tuning            │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Round simulation                          │
//! │  ├── input.rs    - Input intents, key mapping, recordings    │
//! │  ├── state.rs    - Round, platforms, collectibles, player    │
//! │  ├── tick.rs     - Per-frame simulation loop                 │
//! │  ├── clock.rs    - Round countdown                           │
//! │  ├── movement.rs - Bounded player movement                   │
//! │  ├── collectible.rs - Spawning and pickup                    │
//! │  ├── platform.rs - Completion and animation toggles          │
//! │  ├── animation.rs- Animation driver                          │
//! │  ├── pose.rs     - Decoration transforms                     │
//! │  ├── camera.rs   - Camera controller                         │
//! │  └── snapshot.rs - Renderer view of a frame                  │
//! │                                                              │
//! │  driver.rs       - Game loop, input sources, frame sinks     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! A round is built from a 64-bit seed and advanced one frame per `tick`.
//! Movement and animation step a fixed amount per tick; only the countdown
//! reads the measured frame time. Given the same seed, frame times and
//! inputs, a round reaches the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod driver;

// Re-export commonly used types
pub use crate::core::vec3::{Color, Vector3};
pub use crate::core::rng::DeterministicRng;
pub use game::input::{Command, Direction, HeldKeys, InputFrame, InputRecording};
pub use game::state::{GamePhase, PlatformId, Round};
pub use game::camera::{Camera, CameraMode};
pub use game::tick::{tick, GameConfig, TickResult};
pub use driver::{GameLoop, DriverError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target frame rate (Hz)
pub const TICK_RATE: u32 = 60;
