//! Game Logic Module
//!
//! All round simulation code. Seeded and frame-driven: the same seed and
//! input stream replay to the same state hash.
//!
//! ## Module Structure
//!
//! - `input`: Logical input intents, key mapping, recordings
//! - `state`: Round aggregate, platforms, collectibles, player
//! - `tick`: Per-frame simulation loop and configuration
//! - `clock`: Round countdown
//! - `movement`: Bounded player translation
//! - `collectible`: Collectible spawning and pickup
//! - `platform`: Platform layout, completion, animation toggles
//! - `animation`: Per-tick animation advance
//! - `pose`: Stateless decoration transforms for renderers
//! - `camera`: Camera modes and free orbit
//! - `snapshot`: Per-frame renderer view
//! - `events`: Game events for logging and replay verification

pub mod input;
pub mod state;
pub mod tick;
pub mod clock;
pub mod movement;
pub mod collectible;
pub mod platform;
pub mod animation;
pub mod pose;
pub mod camera;
pub mod snapshot;
pub mod events;

// Re-export key types
pub use input::{Command, Direction, HeldKeys, InputFrame, InputRecording, KeyAction};
pub use state::{AnimationKind, Collectible, GamePhase, Platform, PlatformId, Player, Round};
pub use tick::{tick, replay_round, ConfigError, GameConfig, ReseedPolicy, TickResult};
pub use clock::{ClockStep, GameClock};
pub use platform::ToggleOutcome;
pub use pose::{decoration_pose, DecorationPose};
pub use camera::{Camera, CameraMode, CameraView};
pub use snapshot::FrameSnapshot;
pub use events::{GameEvent, GameEventData};
