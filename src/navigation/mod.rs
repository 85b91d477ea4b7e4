//! Navigation for the turtle
//!
//! This module holds the goal-tracking controller, the control loop that
//! runs it against a pose source and velocity sink, and the open-loop
//! motion patterns used by the publisher node.

mod controller;
mod patterns;
mod server;

pub use controller::*;
pub use patterns::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning and limits for the goal tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance under which the position counts as reached
    pub distance_tolerance: f64,
    /// Heading error under which the final alignment counts as reached
    pub angle_tolerance: f64,
    /// Proportional gain steering toward the goal position
    pub kp_turn: f64,
    /// Proportional gain for the final heading alignment
    pub kp_align: f64,
    /// Minimum time between feedback reports (seconds)
    pub feedback_period: f64,
    /// Control loop period (seconds)
    pub control_period: f64,
    /// How long to wait for a first pose before aborting (seconds)
    pub pose_timeout: Option<f64>,
    /// Optional symmetric clamp on the angular command
    pub max_angular: Option<f64>,
    /// Goals outside this rectangle are rejected
    pub workspace: Option<Workspace>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            distance_tolerance: 0.1,
            angle_tolerance: 0.05,
            kp_turn: 2.0,
            kp_align: 1.5,
            feedback_period: 0.5,
            control_period: 0.05,
            pose_timeout: None,
            max_angular: None,
            workspace: None,
        }
    }
}

impl TrackerConfig {
    /// Feedback period as a duration.
    pub fn feedback_interval(&self) -> Duration {
        seconds(self.feedback_period)
    }

    /// Control period as a duration.
    pub fn control_interval(&self) -> Duration {
        seconds(self.control_period)
    }

    /// First-pose wait as a duration, if one is configured.
    pub fn pose_wait(&self) -> Option<Duration> {
        self.pose_timeout.map(seconds)
    }
}

/// Converts seconds to a duration without panicking: negative and NaN map
/// to zero, values past `Duration::MAX` (including infinity) saturate.
pub fn seconds(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Axis-aligned rectangle bounding acceptable goal positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Lower X bound
    pub min_x: f64,
    /// Upper X bound
    pub max_x: f64,
    /// Lower Y bound
    pub min_y: f64,
    /// Upper Y bound
    pub max_y: f64,
}

impl Workspace {
    /// The turtlesim window: 0 to 11.088 on both axes.
    pub fn turtlesim() -> Self {
        Workspace {
            min_x: 0.0,
            max_x: crate::sim::WORLD_SIZE,
            min_y: 0.0,
            max_y: crate::sim::WORLD_SIZE,
        }
    }

    /// True when the point lies inside or on the boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}
