//! Input Intents and Recording
//!
//! Logical input for one tick: the set of held movement directions plus
//! one-shot commands. Raw keys are mapped here once, so the simulation
//! never sees key codes.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec3::Vector3;
use crate::game::camera::CameraMode;
use crate::game::state::PlatformId;

// =============================================================================
// DIRECTIONS
// =============================================================================

/// Logical movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Direction {
    /// W / Up arrow: toward -Z
    Forward = 0,
    /// S / Down arrow: toward +Z
    #[default]
    Back = 1,
    /// A / Left arrow: toward -X
    Left = 2,
    /// D / Right arrow: toward +X
    Right = 3,
}

impl Direction {
    /// All directions in the order movement applies them.
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    /// Facing heading (degrees about +Y) the avatar takes when moving this way.
    #[inline]
    pub fn heading_degrees(self) -> f32 {
        match self {
            Direction::Forward => 180.0,
            Direction::Back => 0.0,
            Direction::Left => 90.0,
            Direction::Right => 270.0,
        }
    }

    /// Per-tick displacement for this direction.
    #[inline]
    pub fn step(self, speed: f32) -> Vector3 {
        match self {
            Direction::Forward => Vector3::new(0.0, 0.0, -speed),
            Direction::Back => Vector3::new(0.0, 0.0, speed),
            Direction::Left => Vector3::new(-speed, 0.0, 0.0),
            Direction::Right => Vector3::new(speed, 0.0, 0.0),
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of held movement directions (packed bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    /// Nothing held.
    pub const NONE: HeldKeys = HeldKeys(0);

    /// Create an empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Builder-style insert.
    pub fn with(mut self, direction: Direction) -> Self {
        self.insert(direction);
        self
    }

    /// Mark a direction as held.
    #[inline]
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Release a direction.
    #[inline]
    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Check if a direction is held.
    #[inline]
    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Check if nothing is held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Held directions, in Forward, Back, Left, Right order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |d| self.contains(*d))
    }

    /// Candidate position after stepping `origin` along every held direction,
    /// plus the last applied heading.
    ///
    /// Steps are applied one at a time in iteration order. Returns `None`
    /// when nothing is held.
    pub fn step_from(&self, origin: Vector3, speed: f32) -> Option<(Vector3, Direction)> {
        let mut last = None;
        let mut candidate = origin;
        for direction in self.iter() {
            candidate = candidate.add(direction.step(speed));
            last = Some(direction);
        }
        last.map(|direction| (candidate, direction))
    }
}

impl FromIterator<Direction> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter().fold(HeldKeys::new(), HeldKeys::with)
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// One-shot command delivered alongside a tick's held keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Switch camera mode (keys 0-3)
    SelectCamera(CameraMode),
    /// Toggle a completed platform's animation (Z/X/C/V)
    ToggleAnimation(PlatformId),
    /// Rebuild the round from scratch (R)
    Restart,
    /// Leave the game loop (ESC)
    Quit,
    /// Mouse drag in pixels while the button is held
    Drag {
        /// Horizontal pixels (positive = right)
        dx: i32,
        /// Vertical pixels (positive = down)
        dy: i32,
    },
    /// Scroll wheel steps (+1 = toward the player, -1 = away)
    Scroll(i8),
}

/// Input for a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Movement directions held during this tick
    pub held: HeldKeys,
    /// Commands to apply at the start of this tick
    pub commands: Vec<Command>,
}

impl InputFrame {
    /// Create an idle frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame with held movement only.
    pub fn with_held(held: HeldKeys) -> Self {
        Self {
            held,
            commands: Vec::new(),
        }
    }

    /// Create a frame carrying a single command.
    pub fn with_command(command: Command) -> Self {
        Self {
            held: HeldKeys::NONE,
            commands: vec![command],
        }
    }

    /// Check if this frame does nothing.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.held.is_empty() && self.commands.is_empty()
    }
}

// =============================================================================
// KEY MAPPING
// =============================================================================

/// Input mapping errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Key has no binding.
    #[error("unmapped key {0:?}")]
    UnmappedKey(char),

    /// Token has no binding.
    #[error("unrecognised input {0:?}")]
    UnknownToken(String),

    /// Camera index outside 0-3.
    #[error("camera mode {0} out of range (0-3)")]
    CameraOutOfRange(u8),

    /// Platform index outside 0-3.
    #[error("platform {0} out of range (0-3)")]
    PlatformOutOfRange(u8),

    /// Malformed numeric argument.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// Non-character keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialKey {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// What a key press means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Hold a movement direction while the key is down
    Move(Direction),
    /// Fire a one-shot command on press
    Command(Command),
}

/// Escape key as delivered by terminals.
pub const ESCAPE: char = '\u{1b}';

/// Map a character key to its action.
pub fn map_key(key: char) -> Result<KeyAction, InputError> {
    let action = match key.to_ascii_lowercase() {
        'w' => KeyAction::Move(Direction::Forward),
        's' => KeyAction::Move(Direction::Back),
        'a' => KeyAction::Move(Direction::Left),
        'd' => KeyAction::Move(Direction::Right),
        'r' => KeyAction::Command(Command::Restart),
        ESCAPE => KeyAction::Command(Command::Quit),
        'z' => KeyAction::Command(Command::ToggleAnimation(PlatformId::P0)),
        'x' => KeyAction::Command(Command::ToggleAnimation(PlatformId::P1)),
        'c' => KeyAction::Command(Command::ToggleAnimation(PlatformId::P2)),
        'v' => KeyAction::Command(Command::ToggleAnimation(PlatformId::P3)),
        digit @ '0'..='9' => {
            let index = digit as u8 - b'0';
            let mode = CameraMode::from_index(index)
                .ok_or(InputError::CameraOutOfRange(index))?;
            KeyAction::Command(Command::SelectCamera(mode))
        }
        _ => return Err(InputError::UnmappedKey(key)),
    };
    Ok(action)
}

/// Map an arrow key to its direction.
pub fn map_special(key: SpecialKey) -> Direction {
    match key {
        SpecialKey::Up => Direction::Forward,
        SpecialKey::Down => Direction::Back,
        SpecialKey::Left => Direction::Left,
        SpecialKey::Right => Direction::Right,
    }
}

/// Parse one line of typed input into key actions.
///
/// Accepts single-character keys (`w`, `1`, `z`, ...), arrow names
/// (`up`, `down`, `left`, `right`), `esc`/`quit`, `toggle <0-3>`,
/// `camera <0-3>`, `drag <dx> <dy>`, `zoom in` and `zoom out`.
pub fn parse_line(line: &str) -> Result<Vec<KeyAction>, InputError> {
    let mut actions = Vec::new();
    let mut tokens = line.split_whitespace();

    while let Some(token) = tokens.next() {
        let lower = token.to_ascii_lowercase();
        let action = match lower.as_str() {
            "up" => KeyAction::Move(map_special(SpecialKey::Up)),
            "down" => KeyAction::Move(map_special(SpecialKey::Down)),
            "left" => KeyAction::Move(map_special(SpecialKey::Left)),
            "right" => KeyAction::Move(map_special(SpecialKey::Right)),
            "esc" | "quit" => KeyAction::Command(Command::Quit),
            "toggle" => {
                let index = parse_index(tokens.next())?;
                let platform = PlatformId::from_index(index)
                    .ok_or(InputError::PlatformOutOfRange(index))?;
                KeyAction::Command(Command::ToggleAnimation(platform))
            }
            "camera" => {
                let index = parse_index(tokens.next())?;
                let mode = CameraMode::from_index(index)
                    .ok_or(InputError::CameraOutOfRange(index))?;
                KeyAction::Command(Command::SelectCamera(mode))
            }
            "drag" => {
                let dx = parse_number(tokens.next())?;
                let dy = parse_number(tokens.next())?;
                KeyAction::Command(Command::Drag { dx, dy })
            }
            "zoom" => match tokens.next().map(str::to_ascii_lowercase).as_deref() {
                Some("in") => KeyAction::Command(Command::Scroll(1)),
                Some("out") => KeyAction::Command(Command::Scroll(-1)),
                other => {
                    return Err(InputError::UnknownToken(format!("zoom {}", other.unwrap_or_default())))
                }
            },
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) => map_key(key)?,
                    _ => return Err(InputError::UnknownToken(token.to_string())),
                }
            }
        };
        actions.push(action);
    }

    Ok(actions)
}

fn parse_index(token: Option<&str>) -> Result<u8, InputError> {
    let token = token.unwrap_or("");
    token
        .parse()
        .map_err(|_| InputError::InvalidNumber(token.to_string()))
}

fn parse_number(token: Option<&str>) -> Result<i32, InputError> {
    let token = token.unwrap_or("");
    token
        .parse()
        .map_err(|_| InputError::InvalidNumber(token.to_string()))
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Change in held keys starting at a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDelta {
    /// Tick when this held state began
    pub tick: u32,
    /// The held state from then on
    pub held: HeldKeys,
}

/// Delta-compressed input log for one round.
///
/// Held keys are stored only when they change; commands are stored with the
/// exact tick they fired on, so replay never repeats a one-shot command.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// RNG seed the round started from
    pub rng_seed: u64,

    /// Last recorded tick
    pub end_tick: u32,

    held: Vec<HeldDelta>,

    commands: Vec<(u32, Command)>,

    #[serde(skip)]
    last_held: HeldKeys,
}

impl InputRecording {
    /// Create an empty recording for a round seed.
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            end_tick: 0,
            held: Vec::with_capacity(256),
            commands: Vec::new(),
            last_held: HeldKeys::NONE,
        }
    }

    /// Record the input used for a tick.
    pub fn record(&mut self, tick: u32, frame: &InputFrame) {
        self.end_tick = tick;

        if frame.held != self.last_held {
            self.held.push(HeldDelta { tick, held: frame.held });
            self.last_held = frame.held;
        }

        for command in &frame.commands {
            self.commands.push((tick, *command));
        }
    }

    /// Reconstruct the input for a tick.
    pub fn input_at(&self, tick: u32) -> InputFrame {
        let idx = self.held.partition_point(|d| d.tick <= tick);
        let held = if idx == 0 {
            HeldKeys::NONE
        } else {
            self.held[idx - 1].held
        };

        let start = self.commands.partition_point(|(t, _)| *t < tick);
        let commands = self.commands[start..]
            .iter()
            .take_while(|(t, _)| *t == tick)
            .map(|(_, c)| *c)
            .collect();

        InputFrame { held, commands }
    }

    /// Number of held-key changes stored.
    pub fn delta_count(&self) -> usize {
        self.held.len()
    }

    /// Number of commands stored.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Iterate inputs tick by tick from `first_tick` through `end_tick`.
    pub fn replay_iter(&self, first_tick: u32) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_tick: first_tick,
        }
    }
}

/// Iterator for replaying a recording tick-by-tick.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_tick: u32,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.recording.end_tick {
            return None;
        }
        let tick = self.current_tick;
        self.current_tick += 1;
        Some((tick, self.recording.input_at(tick)))
    }
}

// =============================================================================
// TESTS
// =============================================================================
