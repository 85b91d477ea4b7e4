// src/ros_interface/publisher.rs
// Channel-backed velocity sink for running without a live ROS graph.

use super::{RosError, VelocitySink};
use crate::core::VelocityCommand;
use std::sync::mpsc::Sender;

/// Forwards commands over a channel; the receiver side plays the topic.
pub struct ChannelSink {
    sender: Sender<VelocityCommand>,
}

impl ChannelSink {
    /// Wraps the sending half of a channel.
    pub fn new(sender: Sender<VelocityCommand>) -> Self {
        ChannelSink { sender }
    }
}

impl VelocitySink for ChannelSink {
    fn send(&mut self, command: VelocityCommand) -> Result<(), RosError> {
        self.sender
            .send(command)
            .map_err(|e| RosError::PublishError(e.to_string()))
    }
}
