//! Turtle Motion - goal tracking and motion patterns for a turtlesim robot
//!
//! This library provides the control logic behind the turtle tutorials:
//! a goal tracker that drives to a pose and reports progress, the control
//! loop that runs it against a pose source and velocity sink, open-loop
//! motion patterns, and a kinematic simulator standing in for turtlesim.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod core;
pub mod navigation;
pub mod ros_interface;
pub mod sim;

// Re-export commonly used items for easier access
pub use crate::core::{AbortReason, Feedback, Goal, Mode, Outcome, Pose2D, VelocityCommand};
pub use navigation::{
    CancelHandle, Clock, GoalServer, GoalTracker, Pattern, PatternConfig, PatternGenerator,
    SystemClock, TrackerConfig, TrackerError, Workspace,
};
pub use ros_interface::{PoseSource, RosConfig, RosError, VelocitySink};
pub use sim::Turtlesim;

use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Goal tracker tuning
    pub tracker: TrackerConfig,
    /// ROS 2 configuration
    pub ros: RosConfig,
    /// Motion pattern parameters
    pub pattern: PatternConfig,
}

impl TurtleConfig {
    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, TurtleError> {
        let config: TurtleConfig =
            serde_yaml::from_str(text).map_err(|e| TurtleError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TurtleError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TurtleError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Self::from_yaml_str(&text)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> Result<String, TurtleError> {
        serde_yaml::to_string(self).map_err(|e| TurtleError::ConfigError(e.to_string()))
    }

    /// Rejects settings the control loop cannot run with.
    pub fn validate(&self) -> Result<(), TurtleError> {
        let t = &self.tracker;
        let positive = [
            ("tracker.distance_tolerance", t.distance_tolerance),
            ("tracker.angle_tolerance", t.angle_tolerance),
            ("tracker.control_period", t.control_period),
            ("pattern.publish_period", self.pattern.publish_period),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TurtleError::ConfigError(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(t.feedback_period.is_finite() && t.feedback_period >= 0.0) {
            return Err(TurtleError::ConfigError(format!(
                "tracker.feedback_period must not be negative, got {}",
                t.feedback_period
            )));
        }
        if let Some(timeout) = t.pose_timeout {
            if !(timeout.is_finite() && timeout >= 0.0) {
                return Err(TurtleError::ConfigError(format!(
                    "tracker.pose_timeout must not be negative, got {}",
                    timeout
                )));
            }
        }
        let durations = [
            ("tracker.control_period", Some(t.control_period)),
            ("tracker.feedback_period", Some(t.feedback_period)),
            ("tracker.pose_timeout", t.pose_timeout),
            ("pattern.publish_period", Some(self.pattern.publish_period)),
        ];
        for (name, value) in durations {
            if let Some(secs) = value {
                Duration::try_from_secs_f64(secs).map_err(|e| {
                    TurtleError::ConfigError(format!("{} = {}: {}", name, secs, e))
                })?;
            }
        }
        let ranges = [
            ("pattern.random_linear", self.pattern.random_linear),
            ("pattern.random_angular", self.pattern.random_angular),
        ];
        for (name, (low, high)) in ranges {
            if !(low <= high && (high - low).is_finite()) {
                return Err(TurtleError::ConfigError(format!(
                    "{} must be a finite [low, high] range, got [{}, {}]",
                    name, low, high
                )));
            }
        }
        if let Some(w) = &t.workspace {
            if w.min_x > w.max_x || w.min_y > w.max_y {
                return Err(TurtleError::ConfigError(format!(
                    "tracker.workspace is empty: {:?}",
                    w
                )));
            }
        }
        Ok(())
    }
}

/// Top-level error type
#[derive(Debug)]
pub enum TurtleError {
    /// Goal tracking error
    TrackerError(TrackerError),
    /// ROS interface error
    RosError(RosError),
    /// Configuration error
    ConfigError(String),
    /// Invalid command-line usage
    UsageError(String),
}

impl std::fmt::Display for TurtleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TurtleError::TrackerError(e) => write!(f, "Tracker error: {}", e),
            TurtleError::RosError(e) => write!(f, "ROS error: {}", e),
            TurtleError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TurtleError::UsageError(msg) => write!(f, "Usage error: {}", msg),
        }
    }
}

impl std::error::Error for TurtleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurtleError::TrackerError(e) => Some(e),
            TurtleError::RosError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TrackerError> for TurtleError {
    fn from(e: TrackerError) -> Self {
        TurtleError::TrackerError(e)
    }
}

impl From<RosError> for TurtleError {
    fn from(e: RosError) -> Self {
        TurtleError::RosError(e)
    }
}
