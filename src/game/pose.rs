//! Decoration poses.
//!
//! Stateless mapping from `(kind, animation_value)` to the transform a
//! renderer applies to a platform's decoration. The simulation never reads
//! these; it only advances `animation_value`.

use serde::{Serialize, Deserialize};

use crate::core::vec3::{Color, Vector3};
use crate::game::state::{AnimationKind, Platform};

/// Height of the lantern's anchor above its platform centre.
const LANTERN_ANCHOR: f32 = 3.0;

/// Height of every other decoration's anchor above its platform centre.
const DECORATION_ANCHOR: f32 = 2.0;

/// Statue orbit radius around its anchor.
const STATUE_ORBIT: f32 = 0.6;

/// Weapon color while the rack is idle.
pub const WEAPON_REST_COLOR: Color = Color::new(0.7, 0.7, 0.8);

/// Transform for one decoration, relative to its platform centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecorationPose {
    /// Anchor offset from the platform centre
    pub offset: Vector3,
    /// Rotation about +Y, degrees
    pub yaw_deg: f32,
    /// Rotation about +Z, degrees
    pub roll_deg: f32,
    /// Non-uniform scale
    pub scale: Vector3,
    /// Extra sword swing away from the resting 30 degrees
    pub swing_deg: f32,
    /// Weapon tint (rack only)
    pub tint: Option<Color>,
}

impl DecorationPose {
    fn rest(kind: AnimationKind) -> Self {
        let anchor = match kind {
            AnimationKind::Lantern => LANTERN_ANCHOR,
            _ => DECORATION_ANCHOR,
        };
        Self {
            offset: Vector3::new(0.0, anchor, 0.0),
            yaw_deg: 0.0,
            roll_deg: 0.0,
            scale: Vector3::ONE,
            swing_deg: 0.0,
            tint: match kind {
                AnimationKind::WeaponRack => Some(WEAPON_REST_COLOR),
                _ => None,
            },
        }
    }
}

/// Pose for a decoration at `value`. Inactive decorations sit at rest.
pub fn decoration_pose(kind: AnimationKind, value: f32, active: bool) -> DecorationPose {
    let mut pose = DecorationPose::rest(kind);
    if !active {
        return pose;
    }

    match kind {
        AnimationKind::Lantern => {
            pose.yaw_deg = value * 3.0;
            pose.offset.y += 0.25 * (value * 0.05).sin();
        }
        AnimationKind::Pagoda => {
            pose.scale = Vector3::new(
                1.0 + 0.35 * (value * 0.035).sin(),
                1.0 + 0.15 * (value * 0.04 + 1.0).sin(),
                1.0 + 0.25 * (value * 0.03 + 2.0).sin(),
            );
            pose.roll_deg = (value * 0.015).sin() * 6.0;
        }
        AnimationKind::Statue => {
            let angle = value.to_radians();
            pose.offset = Vector3::new(
                STATUE_ORBIT * (angle * 0.6).cos(),
                DECORATION_ANCHOR + 0.6 * (angle * 1.2).sin(),
                STATUE_ORBIT * (angle * 0.6).sin(),
            );
            pose.yaw_deg = (value * 0.2) % 360.0;
        }
        AnimationKind::WeaponRack => {
            pose.swing_deg = (value * 0.06).sin() * 25.0;
            let channel = |phase: f32| 0.4 + 0.6 * (value * 0.03 + phase).sin().abs();
            pose.tint = Some(Color::new(channel(0.0), channel(2.0), channel(4.0)));
        }
    }

    pose
}

/// Pose for a platform's decoration in its current state.
pub fn platform_pose(platform: &Platform) -> DecorationPose {
    decoration_pose(platform.kind, platform.animation_value, platform.animation_active)
}
