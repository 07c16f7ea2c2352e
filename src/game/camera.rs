//! Camera Controller
//!
//! Turns the camera mode (and, in free mode, the orbit parameters) into an
//! eye/target/up triple each frame. Orbit parameters persist across mode
//! switches; only free mode accepts drag and scroll.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::constants::{
    AXIS_VIEW_DISTANCE, AXIS_VIEW_HEIGHT, DEFAULT_CAMERA_DISTANCE, DEFAULT_PITCH,
    DEFAULT_YAW, DRAG_SENSITIVITY, MAX_CAMERA_DISTANCE, MIN_CAMERA_DISTANCE,
    PITCH_LIMIT, TOP_VIEW_HEIGHT, ZOOM_STEP,
};
use crate::core::vec3::Vector3;

/// Camera mode, selected with keys 0-3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum CameraMode {
    /// Mouse-controlled orbit around the player
    #[default]
    Free = 0,
    /// Straight down onto the player
    Top = 1,
    /// From +X toward the arena centre line
    Side = 2,
    /// From +Z toward the arena centre line
    Front = 3,
}

impl CameraMode {
    /// Get mode from key index (0-3).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(CameraMode::Free),
            1 => Some(CameraMode::Top),
            2 => Some(CameraMode::Side),
            3 => Some(CameraMode::Front),
            _ => None,
        }
    }
}

/// View transform handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Eye position
    pub eye: Vector3,
    /// Look-at point
    pub target: Vector3,
    /// Up vector
    pub up: Vector3,
}

/// Camera state: mode plus free-orbit parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Active mode
    pub mode: CameraMode,
    /// Orbit yaw about +Y, degrees
    pub yaw_deg: f32,
    /// Orbit elevation, degrees, within ±PITCH_LIMIT
    pub pitch_deg: f32,
    /// Orbit distance, within [MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE]
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            mode: CameraMode::Free,
            yaw_deg: DEFAULT_YAW,
            pitch_deg: DEFAULT_PITCH,
            distance: DEFAULT_CAMERA_DISTANCE,
        }
    }
}

impl Camera {
    /// Create a free camera at the default orbit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch mode. Orbit parameters are kept.
    pub fn select(&mut self, mode: CameraMode) {
        if self.mode != mode {
            debug!(?mode, "camera mode changed");
        }
        self.mode = mode;
    }

    /// Apply a mouse drag. Ignored outside free mode.
    pub fn drag(&mut self, dx: i32, dy: i32) {
        if self.mode != CameraMode::Free {
            return;
        }
        self.yaw_deg += dx as f32 * DRAG_SENSITIVITY;
        self.pitch_deg = (self.pitch_deg + dy as f32 * DRAG_SENSITIVITY)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply scroll steps (+1 zooms in, -1 zooms out). Ignored outside free mode.
    pub fn scroll(&mut self, steps: i8) {
        if self.mode != CameraMode::Free {
            return;
        }
        self.distance = (self.distance - steps as f32 * ZOOM_STEP)
            .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
    }

    /// Compute this frame's view for a player position.
    pub fn view(&self, player: Vector3) -> CameraView {
        match self.mode {
            CameraMode::Top => CameraView {
                eye: Vector3::new(player.x, TOP_VIEW_HEIGHT, player.z),
                target: Vector3::new(player.x, 0.0, player.z),
                up: Vector3::FORWARD,
            },
            CameraMode::Side => CameraView {
                eye: Vector3::new(AXIS_VIEW_DISTANCE, AXIS_VIEW_HEIGHT, player.z),
                target: Vector3::new(0.0, AXIS_VIEW_HEIGHT, player.z),
                up: Vector3::UP,
            },
            CameraMode::Front => CameraView {
                eye: Vector3::new(player.x, AXIS_VIEW_HEIGHT, AXIS_VIEW_DISTANCE),
                target: Vector3::new(player.x, AXIS_VIEW_HEIGHT, 0.0),
                up: Vector3::UP,
            },
            CameraMode::Free => CameraView {
                eye: player.add(self.orbit_offset()),
                target: player,
                up: Vector3::UP,
            },
        }
    }

    /// Spherical-to-Cartesian offset of the free-orbit eye from its target.
    pub fn orbit_offset(&self) -> Vector3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        Vector3::new(
            self.distance * yaw.sin() * pitch.cos(),
            self.distance * pitch.sin(),
            self.distance * yaw.cos() * pitch.cos(),
        )
    }
}
