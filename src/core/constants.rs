//! Game Constants
//!
//! Fixed tuning values for the arena, the player, the round timer and the
//! cameras. These are compile-time constants; `GameConfig` starts from them.

use super::vec3::Vector3;

// =============================================================================
// ARENA
// =============================================================================

/// Arena half-extent (the ground spans -50..+50 on x and z)
pub const GROUND_SIZE: f32 = 50.0;

/// Height of the arena walls
pub const WALL_HEIGHT: f32 = 10.0;

/// Distance the player keeps from the arena edge
pub const WALL_MARGIN: f32 = 1.0;

// =============================================================================
// PLAYER
// =============================================================================

/// Player displacement per tick along each held direction
pub const PLAYER_SPEED: f32 = 0.3;

/// Player spawn position
pub const PLAYER_SPAWN: Vector3 = Vector3::new(0.0, 0.5, 0.0);

// =============================================================================
// ROUND
// =============================================================================

/// Round duration in seconds
pub const GAME_TIME_SECS: u32 = 120;

/// Milliseconds per countdown step
pub const SECOND_MS: u32 = 1000;

/// Target tick interval in milliseconds (~60 Hz)
pub const TICK_INTERVAL_MS: u32 = 16;

// =============================================================================
// PLATFORMS & COLLECTIBLES
// =============================================================================

/// Number of themed platforms
pub const PLATFORM_COUNT: usize = 4;

/// Collectibles spawned around each platform
pub const COLLECTIBLES_PER_PLATFORM: usize = 3;

/// Total collectibles in a round
pub const TOTAL_COLLECTIBLES: usize = PLATFORM_COUNT * COLLECTIBLES_PER_PLATFORM;

/// Pickup radius (strict: distance must be below this)
pub const PICKUP_RADIUS: f32 = 1.5;

/// Grid step for collectible offsets around a platform centre
pub const COLLECTIBLE_GRID_STEP: f32 = 1.5;

/// Height of a collectible above its platform's top surface
pub const COLLECTIBLE_HOVER: f32 = 0.6;

/// Animation values wrap once they pass this
pub const ANIMATION_WRAP: f32 = 360.0;

/// Collectible spin per tick
pub const COLLECTIBLE_SPIN_SPEED: f32 = 1.0;

// =============================================================================
// CAMERA
// =============================================================================

/// Eye height of the top-down camera
pub const TOP_VIEW_HEIGHT: f32 = 40.0;

/// Distance of the side and front cameras from the arena centre line
pub const AXIS_VIEW_DISTANCE: f32 = 40.0;

/// Eye and target height of the side and front cameras
pub const AXIS_VIEW_HEIGHT: f32 = 10.0;

/// Degrees of yaw/pitch per pixel of mouse drag
pub const DRAG_SENSITIVITY: f32 = 0.5;

/// Distance change per scroll step
pub const ZOOM_STEP: f32 = 2.0;

/// Closest free-orbit distance
pub const MIN_CAMERA_DISTANCE: f32 = 5.0;

/// Farthest free-orbit distance
pub const MAX_CAMERA_DISTANCE: f32 = 60.0;

/// Pitch limit (both directions) in degrees
pub const PITCH_LIMIT: f32 = 89.0;

/// Initial free-orbit yaw in degrees
pub const DEFAULT_YAW: f32 = 0.0;

/// Initial free-orbit pitch in degrees
pub const DEFAULT_PITCH: f32 = 30.0;

/// Initial free-orbit distance
pub const DEFAULT_CAMERA_DISTANCE: f32 = 35.0;

/// Inner edge of the walkable area on x and z.
#[inline]
pub fn walkable_limit(half_extent: f32) -> f32 {
    half_extent - WALL_MARGIN
}
