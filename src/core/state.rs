// core/state.rs

// Goal, feedback and outcome records plus the tracker's session phases.
// The phase machine is Idle -> Tracking -> {Succeeded, Cancelled, Aborted},
// and every terminal phase falls straight back to Idle.

use super::pose::Pose2D;
use serde::{Deserialize, Serialize};

/// A single requested destination pose and cruise speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Target X position
    pub target_x: f64,
    /// Target Y position
    pub target_y: f64,
    /// Heading to hold once the position is reached
    pub target_heading: f64,
    /// Upper bound on forward speed, must be positive
    pub cruise_speed: f64,
}

impl Goal {
    /// Builds a goal.
    pub fn new(target_x: f64, target_y: f64, target_heading: f64, cruise_speed: f64) -> Self {
        Goal {
            target_x,
            target_y,
            target_heading,
            cruise_speed,
        }
    }

    /// Target expressed as a pose.
    pub fn target_pose(&self) -> Pose2D {
        Pose2D::new(self.target_x, self.target_y, self.target_heading)
    }
}

/// Periodic progress report emitted while a goal is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Pose the report was computed from
    pub pose: Pose2D,
    /// Straight-line distance still to cover
    pub distance_remaining: f64,
}

/// Why a session was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// No pose sample arrived before the configured wait expired
    NoPoseAvailable,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AbortReason::NoPoseAvailable => write!(f, "no pose available"),
        }
    }
}

/// Terminal result of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Goal reached; carries the distance left at the final tick
    Succeeded {
        /// Distance from the goal position when tolerance was met
        final_distance: f64,
    },
    /// Stopped on request
    Cancelled,
    /// Stopped because the session could not continue
    Aborted(AbortReason),
}

impl Outcome {
    /// True only for `Succeeded`.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Outcome::Succeeded { final_distance } => {
                write!(f, "succeeded ({:.3} from goal)", final_distance)
            }
            Outcome::Cancelled => write!(f, "cancelled"),
            Outcome::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

/// Observable phase of a tracker. Terminal phases are reported through
/// [`Outcome`] and leave the tracker `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No goal, awaiting start
    Idle,
    /// Driving toward the active goal
    Tracking,
}
