//! Player movement.
//!
//! Axis-aligned translation inside the walls. A step that would leave the
//! walkable square is dropped whole; there is no sliding along walls.

#[cfg(feature = "debug-tracing")]
use tracing::debug;

use crate::core::constants::walkable_limit;
use crate::core::vec3::Vector3;
use crate::game::input::HeldKeys;
use crate::game::state::Round;

/// What a movement update did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing held
    Idle,
    /// Position replaced by the candidate
    Moved,
    /// Candidate outside the walls; position unchanged
    Blocked,
}

/// Check if a position lies inside the walkable square.
#[inline]
pub fn in_bounds(position: Vector3, half_extent: f32) -> bool {
    let limit = walkable_limit(half_extent);
    (-limit..=limit).contains(&position.x) && (-limit..=limit).contains(&position.z)
}

/// Step the player along every held direction.
///
/// Facing follows the last applied direction even when the step is blocked.
/// Callers gate this on the round phase.
pub fn apply_movement(round: &mut Round, held: HeldKeys, speed: f32, half_extent: f32) -> MoveOutcome {
    let player = &mut round.player;
    let Some((candidate, facing)) = held.step_from(player.position, speed) else {
        return MoveOutcome::Idle;
    };

    player.facing = facing;

    if !in_bounds(candidate, half_extent) {
        return MoveOutcome::Blocked;
    }

    player.position = candidate;
    player.steps += 1;

    #[cfg(feature = "debug-tracing")]
    if player.steps % 30 == 0 {
        debug!("Player moved to {}", player.position);
    }

    MoveOutcome::Moved
}
