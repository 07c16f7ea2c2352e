//! Platform Mechanics
//!
//! Fixed platform layout, completion tracking and the animation toggle.
//! Platforms sit at fixed positions near the arena corners; each unlocks its
//! decoration once all of its collectibles are picked up.

use tracing::info;

use crate::core::vec3::{Color, Vector3};
use crate::game::events::GameEvent;
use crate::game::state::{AnimationKind, GamePhase, Platform, PlatformId, Round};

/// Block extents shared by every platform.
pub const PLATFORM_SIZE: Vector3 = Vector3::new(5.0, 1.0, 5.0);

/// Fixed layout: position, base color and decoration per platform.
const PLATFORM_LAYOUT: [(Vector3, Color, AnimationKind); 4] = [
    (Vector3::new(-15.0, 0.5, -15.0), Color::new(0.8, 0.2, 0.2), AnimationKind::Lantern),    // red, north-west
    (Vector3::new(15.0, 0.5, -15.0), Color::new(0.2, 0.8, 0.2), AnimationKind::Pagoda),      // green, north-east
    (Vector3::new(-15.0, 0.5, 15.0), Color::new(0.2, 0.2, 0.8), AnimationKind::Statue),      // blue, south-west
    (Vector3::new(15.0, 0.5, 15.0), Color::new(0.8, 0.8, 0.2), AnimationKind::WeaponRack),   // yellow, south-east
];

/// Build the four platforms in index order.
pub fn spawn_platforms() -> Vec<Platform> {
    PlatformId::ALL
        .iter()
        .map(|&id| {
            let (position, color, kind) = PLATFORM_LAYOUT[id.index()];
            Platform::new(id, position, PLATFORM_SIZE, color, kind)
        })
        .collect()
}

/// Result of an animation toggle request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Animation now running
    Enabled,
    /// Animation now paused (value frozen)
    Disabled,
    /// Platform not complete; nothing changed
    Locked,
}

/// Recompute `all_collected` for every platform.
///
/// A platform flipping from incomplete to complete has its animation
/// switched on. Platforms that were already complete keep the player's
/// toggle. Returns the platforms that completed in this call.
pub fn recompute_completion(round: &mut Round) -> Vec<PlatformId> {
    let tick = round.tick;
    let mut completed = Vec::new();

    for id in PlatformId::ALL {
        let all_collected = round.collectibles_of(id).all(|c| c.collected);
        let platform = round.platform_mut(id);

        if all_collected && !platform.all_collected {
            platform.animation_active = true;
            completed.push(id);
        }
        platform.all_collected = all_collected;
    }

    for &id in &completed {
        info!("Platform {} completed. Animation auto-enabled.", id.label());
        round.push_event(GameEvent::platform_completed(tick, id));
    }

    completed
}

/// Flip a platform's animation, if the platform is complete.
///
/// A locked platform is reported through the log and an event, never an error.
pub fn toggle_animation(round: &mut Round, id: PlatformId) -> ToggleOutcome {
    let tick = round.tick;

    if !round.platform(id).all_collected {
        let remaining = round.collectibles_of(id).filter(|c| !c.collected).count() as u32;
        info!("P{} not complete yet ({} left)", id.label(), remaining);
        round.push_event(GameEvent::animation_locked(tick, id, remaining));
        return ToggleOutcome::Locked;
    }

    let platform = round.platform_mut(id);
    platform.animation_active = !platform.animation_active;
    let active = platform.animation_active;

    info!("P{} animation {}", id.label(), if active { "on" } else { "off" });
    round.push_event(GameEvent::animation_toggled(tick, id, active));

    if active {
        ToggleOutcome::Enabled
    } else {
        ToggleOutcome::Disabled
    }
}

/// Move to `Win` when every platform is complete.
///
/// Only fires from `Playing`; a won round stays won. Returns true on the
/// transition.
pub fn check_win(round: &mut Round) -> bool {
    if round.phase != GamePhase::Playing || !round.all_platforms_complete() {
        return false;
    }

    round.phase = GamePhase::Win;
    let remaining = round.clock.remaining_secs;
    info!("All platforms complete with {} left. Round won!", round.clock.format_mmss());
    round.push_event(GameEvent::round_won(round.tick, remaining));
    true
}
