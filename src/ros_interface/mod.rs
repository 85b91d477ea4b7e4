//! ROS 2 interface for the turtle
//!
//! This module defines the seams between the controller and the middleware:
//! - `PoseSource`: latest pose sample, possibly stale
//! - `VelocitySink`: fire-and-forget velocity commands
//! - the `MoveTurtle` action record shared with action clients
//!
//! With the `ros2` feature the same seams are backed by r2r topics.

mod action;
mod publisher;
mod subscriber;

#[cfg(feature = "ros2")]
mod bridge;

pub use action::*;
pub use publisher::*;
pub use subscriber::*;

#[cfg(feature = "ros2")]
pub use bridge::*;

use crate::core::{Pose2D, VelocityCommand};
use serde::{Deserialize, Serialize};

/// Source of the most recent pose estimate
pub trait PoseSource {
    /// Latest sample, or `None` if nothing has arrived yet.
    fn latest_pose(&self) -> Option<Pose2D>;
}

/// Consumer of velocity commands, one per control tick
pub trait VelocitySink {
    /// Sends a command. Delivery is not acknowledged.
    fn send(&mut self, command: VelocityCommand) -> Result<(), RosError>;
}

impl<T: PoseSource + ?Sized> PoseSource for &T {
    fn latest_pose(&self) -> Option<Pose2D> {
        (**self).latest_pose()
    }
}

impl<T: VelocitySink + ?Sized> VelocitySink for Box<T> {
    fn send(&mut self, command: VelocityCommand) -> Result<(), RosError> {
        (**self).send(command)
    }
}

/// ROS 2 node and topic settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Node name
    pub node_name: String,
    /// Topic carrying turtlesim poses
    pub pose_topic: String,
    /// Topic receiving velocity commands
    pub cmd_vel_topic: String,
    /// QoS history depth
    pub qos_depth: usize,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            node_name: "turtle_motion".to_string(),
            pose_topic: "/turtle1/pose".to_string(),
            cmd_vel_topic: "/turtle1/cmd_vel".to_string(),
            qos_depth: 10,
        }
    }
}

/// ROS error types
#[derive(Debug)]
pub enum RosError {
    /// ROS initialization error
    InitError(String),
    /// Publishing error
    PublishError(String),
    /// Subscription error
    SubscribeError(String),
    /// Message conversion error
    ConversionError(String),
}

impl std::fmt::Display for RosError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RosError::InitError(msg) => write!(f, "ROS init error: {}", msg),
            RosError::PublishError(msg) => write!(f, "Publish error: {}", msg),
            RosError::SubscribeError(msg) => write!(f, "Subscribe error: {}", msg),
            RosError::ConversionError(msg) => write!(f, "Conversion error: {}", msg),
        }
    }
}

impl std::error::Error for RosError {}
