// core/pose.rs

// Planar pose and velocity command types shared by the tracker, the motion
// patterns and the ROS bridge.

use nalgebra::{Isometry2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Wraps any angle into `(-PI, PI]`.
///
/// A single `rem_euclid` keeps the result deterministic for large inputs,
/// where repeated `±TAU` steps would accumulate rounding error.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    // rem_euclid yields [0, TAU); shift so PI maps to PI and -PI maps to PI.
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Position and heading of the controlled body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Heading in radians, normalized to `(-PI, PI]`
    pub heading: f64,
}

impl Pose2D {
    /// Builds a pose, normalizing the heading.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose2D {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    /// Position as a vector.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_to(&self, other: &Pose2D) -> f64 {
        (other.position() - self.position()).norm()
    }
}

impl From<Isometry2<f64>> for Pose2D {
    fn from(iso: Isometry2<f64>) -> Self {
        Pose2D::new(
            iso.translation.vector.x,
            iso.translation.vector.y,
            iso.rotation.angle(),
        )
    }
}

impl From<Pose2D> for Isometry2<f64> {
    fn from(pose: Pose2D) -> Self {
        Isometry2::new(pose.position(), pose.heading)
    }
}

/// Velocity command for a differential-drive body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityCommand {
    /// Forward velocity (units/s)
    pub linear: f64,
    /// Turn rate (rad/s)
    pub angular: f64,
}

impl VelocityCommand {
    /// The command that leaves the body stationary.
    pub const ZERO: VelocityCommand = VelocityCommand {
        linear: 0.0,
        angular: 0.0,
    };

    /// Builds a command from linear and angular components.
    pub fn new(linear: f64, angular: f64) -> Self {
        VelocityCommand { linear, angular }
    }

    /// True when both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.linear == 0.0 && self.angular == 0.0
    }
}
