//! Round State Definitions
//!
//! All state types for one round: platforms, collectibles, the player, the
//! countdown clock and the phase. `Round` is the single owned aggregate the
//! tick mutates and the renderer reads.

use serde::{Serialize, Deserialize};

use crate::core::constants::{PLAYER_SPAWN, TOTAL_COLLECTIBLES};
use crate::core::vec3::{Color, Vector3};
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::clock::GameClock;
use crate::game::collectible::spawn_collectibles;
use crate::game::events::GameEvent;
use crate::game::input::Direction;
use crate::game::platform::spawn_platforms;

// =============================================================================
// PLATFORM ID
// =============================================================================

/// Typed platform index (0-3). Out-of-range platforms are unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlatformId {
    /// North-west platform (Lantern)
    P0 = 0,
    /// North-east platform (Pagoda)
    P1 = 1,
    /// South-west platform (Statue)
    P2 = 2,
    /// South-east platform (Weapon rack)
    P3 = 3,
}

impl PlatformId {
    /// All platforms in index order.
    pub const ALL: [PlatformId; 4] = [
        PlatformId::P0,
        PlatformId::P1,
        PlatformId::P2,
        PlatformId::P3,
    ];

    /// Get from index.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(PlatformId::P0),
            1 => Some(PlatformId::P1),
            2 => Some(PlatformId::P2),
            3 => Some(PlatformId::P3),
            _ => None,
        }
    }

    /// Array index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based label used in HUD and log lines.
    #[inline]
    pub fn label(self) -> u8 {
        self as u8 + 1
    }
}

// =============================================================================
// ANIMATION KIND
// =============================================================================

/// Decoration on top of each platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimationKind {
    /// Spinning, bobbing lantern
    Lantern = 0,
    /// Breathing pagoda
    Pagoda = 1,
    /// Orbiting statue
    Statue = 2,
    /// Swinging, color-cycling weapon rack
    WeaponRack = 3,
}

impl AnimationKind {
    /// Animation value advance per tick.
    #[inline]
    pub fn speed(self) -> f32 {
        match self {
            AnimationKind::Lantern => 4.0,
            AnimationKind::Pagoda => 2.5,
            AnimationKind::Statue => 3.5,
            AnimationKind::WeaponRack => 2.0,
        }
    }
}

// =============================================================================
// COLLECTIBLE
// =============================================================================

/// A pickup clustered around one platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Index in the round's collectible list
    pub id: u32,
    /// World position
    pub position: Vector3,
    /// Has the player picked this up?
    pub collected: bool,
    /// Platform this collectible counts toward
    pub platform: PlatformId,
}

impl Collectible {
    /// Create an uncollected collectible.
    pub fn new(id: u32, position: Vector3, platform: PlatformId) -> Self {
        Self {
            id,
            position,
            collected: false,
            platform,
        }
    }
}

// =============================================================================
// PLATFORM
// =============================================================================

/// One of the four themed platforms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform index
    pub id: PlatformId,
    /// Centre of the platform block
    pub position: Vector3,
    /// Block extents
    pub size: Vector3,
    /// Base color
    pub color: Color,
    /// Every collectible of this platform is collected
    pub all_collected: bool,
    /// Decoration is animating
    pub animation_active: bool,
    /// Animation phase in (0, 360]; frozen while inactive
    pub animation_value: f32,
    /// Which decoration sits on top
    pub kind: AnimationKind,
}

impl Platform {
    /// Create an incomplete, idle platform.
    pub fn new(
        id: PlatformId,
        position: Vector3,
        size: Vector3,
        color: Color,
        kind: AnimationKind,
    ) -> Self {
        Self {
            id,
            position,
            size,
            color,
            all_collected: false,
            animation_active: false,
            animation_value: 0.0,
            kind,
        }
    }

    /// Height of the platform's top surface.
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// The player-controlled avatar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// World position
    pub position: Vector3,
    /// Last applied movement direction; its heading is the avatar's facing
    pub facing: Direction,
    /// Accepted moves this round
    pub steps: u32,
}

impl Player {
    /// Create a player at the spawn point, facing the default heading.
    pub fn spawn() -> Self {
        Self {
            position: PLAYER_SPAWN,
            facing: Direction::default(),
            steps: 0,
        }
    }

    /// Facing rotation about +Y in degrees (0, 90, 180 or 270).
    #[inline]
    pub fn facing_degrees(&self) -> f32 {
        self.facing.heading_degrees()
    }
}

// =============================================================================
// GAME PHASE
// =============================================================================

/// Round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum GamePhase {
    /// Clock running, everything live
    #[default]
    Playing = 0,
    /// All platforms complete; the player can keep moving
    Win = 1,
    /// Clock ran out; only restart leaves this phase
    GameOver = 2,
}

impl GamePhase {
    /// Can the player move and pick things up in this phase?
    #[inline]
    pub fn allows_movement(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Win)
    }
}

// =============================================================================
// ROUND
// =============================================================================

/// Complete state of one round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    /// Ticks since the round was (re)built
    pub tick: u32,

    /// Current phase
    pub phase: GamePhase,

    /// Seed this round was built from
    pub rng_seed: u64,

    /// RNG state
    #[serde(skip)]
    pub rng: DeterministicRng,

    /// The four platforms, indexed by `PlatformId`
    pub platforms: Vec<Platform>,

    /// All collectibles, grouped by platform in index order
    pub collectibles: Vec<Collectible>,

    /// The avatar
    pub player: Player,

    /// Countdown
    pub clock: GameClock,

    /// Global collectible spin in (0, 360]
    pub collectible_spin: f32,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl Round {
    /// Build a fresh round from a seed.
    pub fn new(rng_seed: u64, round_secs: u32) -> Self {
        let mut rng = DeterministicRng::new(rng_seed);
        let platforms = spawn_platforms();
        let collectibles = spawn_collectibles(&platforms, &mut rng);

        Self {
            tick: 0,
            phase: GamePhase::Playing,
            rng_seed,
            rng,
            platforms,
            collectibles,
            player: Player::spawn(),
            clock: GameClock::new(round_secs),
            collectible_spin: 0.0,
            pending_events: Vec::new(),
        }
    }

    /// Discard everything and rebuild from a new seed.
    pub fn restart(&mut self, rng_seed: u64) {
        let round_secs = self.clock.total_secs;
        *self = Self::new(rng_seed, round_secs);
    }

    /// Get a platform.
    #[inline]
    pub fn platform(&self, id: PlatformId) -> &Platform {
        &self.platforms[id.index()]
    }

    /// Get a platform mutably.
    #[inline]
    pub fn platform_mut(&mut self, id: PlatformId) -> &mut Platform {
        &mut self.platforms[id.index()]
    }

    /// Collectibles belonging to one platform.
    pub fn collectibles_of(&self, id: PlatformId) -> impl Iterator<Item = &Collectible> + '_ {
        self.collectibles.iter().filter(move |c| c.platform == id)
    }

    /// Collectibles still on the field.
    pub fn uncollected(&self) -> impl Iterator<Item = &Collectible> + '_ {
        self.collectibles.iter().filter(|c| !c.collected)
    }

    /// Number of collectibles picked up.
    pub fn collected_count(&self) -> usize {
        self.collectibles.iter().filter(|c| c.collected).count()
    }

    /// Number of collectibles in the round.
    pub fn total_count(&self) -> usize {
        self.collectibles.len()
    }

    /// Check if every platform is complete.
    pub fn all_platforms_complete(&self) -> bool {
        self.platforms.iter().all(|p| p.all_collected)
    }

    /// Check if the round can no longer progress.
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher: &mut StateHasher| {
            hasher.update_u8(self.phase as u8);
            hasher.update_u32(self.clock.remaining_secs);
            hasher.update_u32(self.clock.accumulator_ms);

            hasher.update_vec3(self.player.position);
            hasher.update_u8(self.player.facing as u8);

            for platform in &self.platforms {
                hasher.update_u8(platform.id as u8);
                hasher.update_bool(platform.all_collected);
                hasher.update_bool(platform.animation_active);
                hasher.update_f32(platform.animation_value);
            }

            for collectible in &self.collectibles {
                hasher.update_u32(collectible.id);
                hasher.update_vec3(collectible.position);
                hasher.update_bool(collectible.collected);
            }

            hasher.update_f32(self.collectible_spin);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new(0, crate::core::constants::GAME_TIME_SECS)
    }
}

// Counts are fixed for the life of the process
const _: () = assert!(TOTAL_COLLECTIBLES == 12);

// =============================================================================
// TESTS
// =============================================================================
