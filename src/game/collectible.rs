//! Collectible spawning and pickup.

use tracing::debug;

use crate::core::constants::{
    COLLECTIBLES_PER_PLATFORM, COLLECTIBLE_GRID_STEP, COLLECTIBLE_HOVER,
};
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Vector3;
use crate::game::events::GameEvent;
use crate::game::state::{Collectible, Platform, Round};

/// Scatter collectibles around each platform.
///
/// Each lands on a 3x3 grid (step 1.5) centred on its platform, hovering
/// above the top surface. The x offset is drawn before the z offset.
/// Two collectibles of one platform may share a cell.
pub fn spawn_collectibles(platforms: &[Platform], rng: &mut DeterministicRng) -> Vec<Collectible> {
    let mut collectibles = Vec::with_capacity(platforms.len() * COLLECTIBLES_PER_PLATFORM);

    for platform in platforms {
        let height = platform.top() + COLLECTIBLE_HOVER;
        for _ in 0..COLLECTIBLES_PER_PLATFORM {
            let dx = rng.next_grid_cell() as f32 * COLLECTIBLE_GRID_STEP;
            let dz = rng.next_grid_cell() as f32 * COLLECTIBLE_GRID_STEP;
            let position = Vector3::new(
                platform.position.x + dx,
                height,
                platform.position.z + dz,
            );
            let id = collectibles.len() as u32;
            collectibles.push(Collectible::new(id, position, platform.id));
        }
    }

    collectibles
}

/// Collect every uncollected item strictly within `radius` of the player.
///
/// Distance is full 3D. Returns the number picked up.
pub fn check_pickups(round: &mut Round, radius: f32) -> usize {
    let tick = round.tick;
    let player = round.player.position;
    let radius_sq = radius * radius;
    let mut events = Vec::new();

    for collectible in round.collectibles.iter_mut().filter(|c| !c.collected) {
        if player.distance_squared(collectible.position) < radius_sq {
            collectible.collected = true;
            debug!(
                "Collected #{} for P{} at {}",
                collectible.id,
                collectible.platform.label(),
                collectible.position
            );
            events.push(GameEvent::collectible_picked(
                tick,
                collectible.id,
                collectible.platform,
                collectible.position,
            ));
        }
    }

    let picked = events.len();
    round.pending_events.extend(events);
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{GAME_TIME_SECS, PICKUP_RADIUS};
    use crate::game::platform::spawn_platforms;
    use crate::game::state::PlatformId;

    #[test]
    fn test_spawn_on_grid_around_platform() {
        let platforms = spawn_platforms();
        let mut rng = DeterministicRng::new(9001);
        let collectibles = spawn_collectibles(&platforms, &mut rng);

        assert_eq!(collectibles.len(), 12);
        for (i, c) in collectibles.iter().enumerate() {
            assert_eq!(c.id, i as u32);
            assert_eq!(c.platform.index(), i / 3);
            assert!(!c.collected);

            let platform = &platforms[c.platform.index()];
            assert_eq!(c.position.y, 1.6);
            for offset in [c.position.x - platform.position.x, c.position.z - platform.position.z] {
                assert!([-1.5, 0.0, 1.5].contains(&offset), "offset {}", offset);
            }
        }
    }

    #[test]
    fn test_spawn_draw_order() {
        let platforms = spawn_platforms();
        let mut rng = DeterministicRng::new(3);
        let collectibles = spawn_collectibles(&platforms, &mut rng);

        let mut check = DeterministicRng::new(3);
        let dx = check.next_grid_cell() as f32 * 1.5;
        let dz = check.next_grid_cell() as f32 * 1.5;
        assert_eq!(collectibles[0].position.x, -15.0 + dx);
        assert_eq!(collectibles[0].position.z, -15.0 + dz);
    }

    #[test]
    fn test_pickup_is_strict() {
        let mut round = Round::new(1, GAME_TIME_SECS);
        let target = round.collectibles[0].position;

        // Exactly on the radius: stays
        round.player.position = Vector3::new(target.x + PICKUP_RADIUS, target.y, target.z);
        assert_eq!(check_pickups(&mut round, PICKUP_RADIUS), 0);
        assert!(!round.collectibles[0].collected);

        round.player.position = Vector3::new(target.x + 1.49, target.y, target.z);
        assert!(check_pickups(&mut round, PICKUP_RADIUS) >= 1);
        assert!(round.collectibles[0].collected);

        // Idempotent
        let events = round.take_events().len();
        assert_eq!(check_pickups(&mut round, PICKUP_RADIUS), 0);
        assert!(events >= 1);
    }

    #[test]
    fn test_pickup_uses_height() {
        let mut round = Round::new(1, GAME_TIME_SECS);
        let target = round.collectibles[0].position;

        // Standing on the ground under a collectible at y=1.6: 1.1 apart
        round.player.position = Vector3::new(target.x, 0.5, target.z);
        check_pickups(&mut round, PICKUP_RADIUS);
        assert!(round.collectibles[0].collected);

        round.player.position = Vector3::new(0.0, 0.5, 0.0);
        let before = round.collected_count();
        check_pickups(&mut round, PICKUP_RADIUS);
        assert_eq!(round.collected_count(), before);
        assert!(round.collectibles_of(PlatformId::P3).all(|c| !c.collected));
    }
}
