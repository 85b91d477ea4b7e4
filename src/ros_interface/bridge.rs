// src/ros_interface/bridge.rs
// r2r-backed pose source, velocity sink and clock for a live turtlesim.
// Only built with the `ros2` feature.

use super::{LatestPose, RosConfig, RosError, VelocitySink};
use crate::core::{Pose2D, VelocityCommand};
use crate::navigation::Clock;
use futures::executor::LocalPool;
use futures::future;
use futures::stream::StreamExt;
use futures::task::LocalSpawnExt;
use log::info;
use r2r::QosProfile;
use r2r::geometry_msgs::msg::{Twist, Vector3};
use r2r::turtlesim::msg::Pose as TurtlePose;
use std::time::{Duration, Instant};

/// Converts a turtlesim pose message.
pub fn pose_from_msg(msg: &TurtlePose) -> Pose2D {
    Pose2D::new(f64::from(msg.x), f64::from(msg.y), f64::from(msg.theta))
}

/// Converts a command to a `Twist` in the turtle's frame.
pub fn twist_from_command(command: &VelocityCommand) -> Twist {
    Twist {
        linear: Vector3 {
            x: command.linear,
            y: 0.0,
            z: 0.0,
        },
        angular: Vector3 {
            x: 0.0,
            y: 0.0,
            z: command.angular,
        },
    }
}

/// Node with a pose subscription and a `cmd_vel` publisher
pub struct TurtleBridge {
    node: r2r::Node,
    pool: LocalPool,
    pose: LatestPose,
    publisher: r2r::Publisher<Twist>,
}

impl TurtleBridge {
    /// Creates the node, subscribes to poses and advertises `cmd_vel`.
    pub fn new(config: &RosConfig) -> Result<Self, RosError> {
        let ctx = r2r::Context::create().map_err(|e| RosError::InitError(e.to_string()))?;
        let mut node = r2r::Node::create(ctx, &config.node_name, "")
            .map_err(|e| RosError::InitError(e.to_string()))?;

        let poses = node
            .subscribe::<TurtlePose>(&config.pose_topic, QosProfile::default().keep_last(config.qos_depth))
            .map_err(|e| RosError::SubscribeError(e.to_string()))?;
        let pose = LatestPose::new();
        let writer = pose.clone();

        let pool = LocalPool::new();
        pool.spawner()
            .spawn_local(poses.for_each(move |msg| {
                writer.update(pose_from_msg(&msg));
                future::ready(())
            }))
            .map_err(|e| RosError::SubscribeError(e.to_string()))?;

        let publisher = node
            .create_publisher::<Twist>(&config.cmd_vel_topic, QosProfile::default().keep_last(config.qos_depth))
            .map_err(|e| RosError::InitError(e.to_string()))?;

        info!(
            "Node '{}' subscribed to {} and publishing to {}",
            config.node_name, config.pose_topic, config.cmd_vel_topic
        );
        Ok(TurtleBridge {
            node,
            pool,
            pose,
            publisher,
        })
    }

    /// Splits into the collaborators a `GoalServer` needs.
    pub fn split(self) -> (LatestPose, TwistSink, RosClock) {
        (
            self.pose,
            TwistSink {
                publisher: self.publisher,
            },
            RosClock {
                node: self.node,
                pool: self.pool,
                origin: Instant::now(),
            },
        )
    }
}

/// Publishes commands as `geometry_msgs/Twist`
pub struct TwistSink {
    publisher: r2r::Publisher<Twist>,
}

impl VelocitySink for TwistSink {
    fn send(&mut self, command: VelocityCommand) -> Result<(), RosError> {
        self.publisher
            .publish(&twist_from_command(&command))
            .map_err(|e| RosError::PublishError(e.to_string()))
    }
}

/// Wall clock whose sleep spins the node, delivering pose callbacks
pub struct RosClock {
    node: r2r::Node,
    pool: LocalPool,
    origin: Instant,
}

impl Clock for RosClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, period: Duration) {
        let deadline = Instant::now() + period;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            self.node.spin_once(left);
            self.pool.run_until_stalled();
            if left.is_zero() || Instant::now() >= deadline {
                break;
            }
        }
    }
}
