//! Frame snapshot.
//!
//! Everything a renderer reads once per frame, copied out of the round so
//! the renderer never touches simulation state.

use serde::{Serialize, Deserialize};

use crate::core::vec3::{Color, Vector3};
use crate::game::camera::{Camera, CameraMode, CameraView};
use crate::game::pose::{platform_pose, DecorationPose};
use crate::game::state::{AnimationKind, GamePhase, PlatformId, Round};

/// Renderer view of one platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    /// Platform index
    pub id: PlatformId,
    /// Centre of the block
    pub position: Vector3,
    /// Block extents
    pub size: Vector3,
    /// Base color
    pub color: Color,
    /// All collectibles picked up
    pub all_collected: bool,
    /// Decoration animating
    pub animation_active: bool,
    /// Animation phase
    pub animation_value: f32,
    /// Decoration kind
    pub kind: AnimationKind,
    /// Decoration transform derived from the above
    pub pose: DecorationPose,
}

/// Everything drawn in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Round tick
    pub tick: u32,
    /// Phase
    pub phase: GamePhase,
    /// Player position
    pub player_position: Vector3,
    /// Player facing, degrees about +Y
    pub player_facing_deg: f32,
    /// Active camera mode
    pub camera_mode: CameraMode,
    /// Camera transform
    pub camera: CameraView,
    /// Platforms in index order
    pub platforms: Vec<PlatformView>,
    /// Positions of collectibles still on the field
    pub collectibles: Vec<Vector3>,
    /// Spin applied to every collectible, degrees
    pub collectible_spin: f32,
    /// Seconds left
    pub remaining_secs: u32,
    /// `m:ss`
    pub timer_text: String,
    /// Collectibles picked up
    pub collected: u32,
    /// Collectibles in the round
    pub total: u32,
}

impl FrameSnapshot {
    /// Capture the current frame.
    pub fn capture(round: &Round, camera: &Camera) -> Self {
        let platforms = round
            .platforms
            .iter()
            .map(|p| PlatformView {
                id: p.id,
                position: p.position,
                size: p.size,
                color: p.color,
                all_collected: p.all_collected,
                animation_active: p.animation_active,
                animation_value: p.animation_value,
                kind: p.kind,
                pose: platform_pose(p),
            })
            .collect();

        Self {
            tick: round.tick,
            phase: round.phase,
            player_position: round.player.position,
            player_facing_deg: round.player.facing_degrees(),
            camera_mode: camera.mode,
            camera: camera.view(round.player.position),
            platforms,
            collectibles: round.uncollected().map(|c| c.position).collect(),
            collectible_spin: round.collectible_spin,
            remaining_secs: round.clock.remaining_secs,
            timer_text: round.clock.format_mmss(),
            collected: round.collected_count() as u32,
            total: round.total_count() as u32,
        }
    }

    /// One-line HUD text.
    pub fn hud_line(&self) -> String {
        let status = match self.phase {
            GamePhase::Playing => "",
            GamePhase::Win => " | YOU WIN!",
            GamePhase::GameOver => " | GAME OVER (R to restart)",
        };
        format!(
            "Time {} | Collected {}/{} | Player {}{}",
            self.timer_text, self.collected, self.total, self.player_position, status
        )
    }

    /// Serialize as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
