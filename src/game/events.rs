//! Game Events
//!
//! Events generated during a tick, for logging, renderers and replay checks.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Vector3;
use crate::game::camera::CameraMode;
use crate::game::state::{GamePhase, PlatformId};

/// Priority for event processing order.
///
/// Lower value = processed first. Mirrors the order of tick phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// One-shot commands (restart, toggles, camera)
    Command = 0,
    /// Countdown steps
    Clock = 1,
    /// Pickups
    Pickup = 2,
    /// Platform completion
    Completion = 3,
    /// Win / game over
    Outcome = 4,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player picked up a collectible
    CollectiblePicked {
        /// Collectible index
        collectible_id: u32,
        /// Platform it counts toward
        platform: PlatformId,
        /// Where it was
        position: Vector3,
    },

    /// Last collectible of a platform was picked up; its animation auto-enabled
    PlatformCompleted {
        /// Completed platform
        platform: PlatformId,
    },

    /// Player toggled a completed platform's animation
    AnimationToggled {
        /// Toggled platform
        platform: PlatformId,
        /// New `animation_active`
        active: bool,
    },

    /// Toggle refused: the platform still has collectibles on the field
    AnimationLocked {
        /// Refused platform
        platform: PlatformId,
        /// How many of its collectibles remain
        remaining: u32,
    },

    /// Countdown dropped by one second
    SecondElapsed {
        /// Seconds left after the step
        remaining_secs: u32,
    },

    /// All platforms complete while playing
    RoundWon {
        /// Seconds left on the clock
        remaining_secs: u32,
    },

    /// Countdown reached zero
    TimeExpired {
        /// Collectibles picked up before time ran out
        collected: u32,
    },

    /// Round rebuilt from scratch
    RoundRestarted {
        /// Phase before the restart
        previous_phase: GamePhase,
        /// Seed of the new round
        rng_seed: u64,
    },

    /// Camera mode switched
    CameraModeChanged {
        /// Previous mode
        old_mode: CameraMode,
        /// New mode
        new_mode: CameraMode,
    },
}

impl GameEventData {
    /// Priority bucket of this event.
    pub fn priority(&self) -> EventPriority {
        match self {
            GameEventData::AnimationToggled { .. }
            | GameEventData::AnimationLocked { .. }
            | GameEventData::RoundRestarted { .. }
            | GameEventData::CameraModeChanged { .. } => EventPriority::Command,
            GameEventData::SecondElapsed { .. } => EventPriority::Clock,
            GameEventData::CollectiblePicked { .. } => EventPriority::Pickup,
            GameEventData::PlatformCompleted { .. } => EventPriority::Completion,
            GameEventData::RoundWon { .. } | GameEventData::TimeExpired { .. } => {
                EventPriority::Outcome
            }
        }
    }

    /// Platform involved, if any.
    pub fn platform(&self) -> Option<PlatformId> {
        match self {
            GameEventData::CollectiblePicked { platform, .. }
            | GameEventData::PlatformCompleted { platform }
            | GameEventData::AnimationToggled { platform, .. }
            | GameEventData::AnimationLocked { platform, .. } => Some(*platform),
            _ => None,
        }
    }
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self {
            tick,
            priority: data.priority(),
            data,
        }
    }

    /// Create collectible picked event.
    pub fn collectible_picked(
        tick: u32,
        collectible_id: u32,
        platform: PlatformId,
        position: Vector3,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::CollectiblePicked {
                collectible_id,
                platform,
                position,
            },
        )
    }

    /// Create platform completed event.
    pub fn platform_completed(tick: u32, platform: PlatformId) -> Self {
        Self::new(tick, GameEventData::PlatformCompleted { platform })
    }

    /// Create animation toggled event.
    pub fn animation_toggled(tick: u32, platform: PlatformId, active: bool) -> Self {
        Self::new(tick, GameEventData::AnimationToggled { platform, active })
    }

    /// Create animation locked event.
    pub fn animation_locked(tick: u32, platform: PlatformId, remaining: u32) -> Self {
        Self::new(tick, GameEventData::AnimationLocked { platform, remaining })
    }

    /// Create second elapsed event.
    pub fn second_elapsed(tick: u32, remaining_secs: u32) -> Self {
        Self::new(tick, GameEventData::SecondElapsed { remaining_secs })
    }

    /// Create round won event.
    pub fn round_won(tick: u32, remaining_secs: u32) -> Self {
        Self::new(tick, GameEventData::RoundWon { remaining_secs })
    }

    /// Create time expired event.
    pub fn time_expired(tick: u32, collected: u32) -> Self {
        Self::new(tick, GameEventData::TimeExpired { collected })
    }

    /// Create round restarted event.
    pub fn round_restarted(tick: u32, previous_phase: GamePhase, rng_seed: u64) -> Self {
        Self::new(
            tick,
            GameEventData::RoundRestarted {
                previous_phase,
                rng_seed,
            },
        )
    }

    /// Create camera mode changed event.
    pub fn camera_mode_changed(tick: u32, old_mode: CameraMode, new_mode: CameraMode) -> Self {
        Self::new(tick, GameEventData::CameraModeChanged { old_mode, new_mode })
    }

    /// Check if this event ends play (win or time up).
    pub fn is_outcome(&self) -> bool {
        self.priority == EventPriority::Outcome
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.priority == other.priority
            && self.data.platform() == other.data.platform()
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority, then platform
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
            .then(self.data.platform().cmp(&other.data.platform()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ordering() {
        let pick = GameEvent::collectible_picked(10, 0, PlatformId::P1, Vector3::ZERO);
        let done = GameEvent::platform_completed(10, PlatformId::P0);
        let toggle = GameEvent::animation_toggled(10, PlatformId::P3, true);
        let later = GameEvent::second_elapsed(11, 100);

        // Same tick: commands before pickups before completion
        assert!(toggle < pick);
        assert!(pick < done);
        assert!(done < later);

        let mut events = vec![later.clone(), done.clone(), pick.clone(), toggle.clone()];
        events.sort();
        assert_eq!(events, vec![toggle, pick, done, later]);
    }

    #[test]
    fn test_outcome_events() {
        assert!(GameEvent::round_won(5, 90).is_outcome());
        assert!(GameEvent::time_expired(5, 7).is_outcome());
        assert!(!GameEvent::second_elapsed(5, 7).is_outcome());
    }

    #[test]
    fn test_event_serializes() {
        let event = GameEvent::animation_locked(3, PlatformId::P2, 2);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("AnimationLocked"));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, event.data);
    }
}
