//! Animation Driver
//!
//! Steps decoration phases and the collectible spin by a fixed amount per
//! tick. Frame time does not enter here.

use crate::core::constants::{ANIMATION_WRAP, COLLECTIBLE_SPIN_SPEED};
use crate::game::state::{GamePhase, Round};

/// Wrap a phase that passed 360 back into range.
#[inline]
fn wrap(value: f32) -> f32 {
    if value > ANIMATION_WRAP {
        value - ANIMATION_WRAP
    } else {
        value
    }
}

/// Advance every active platform's animation and the collectible spin.
///
/// Inactive platforms keep their value. Nothing moves once the round is over.
pub fn advance_animations(round: &mut Round) {
    if round.phase == GamePhase::GameOver {
        return;
    }

    round.collectible_spin = wrap(round.collectible_spin + COLLECTIBLE_SPIN_SPEED);

    for platform in round.platforms.iter_mut().filter(|p| p.animation_active) {
        platform.animation_value = wrap(platform.animation_value + platform.kind.speed());
    }
}
