//! Kinematic stand-in for the turtlesim node
//!
//! Integrates unicycle motion from the last velocity command over simulated
//! time and clamps the turtle to the window, so the goal server can run
//! without a ROS graph.

use crate::core::{Pose2D, VelocityCommand};
use crate::navigation::Clock;
use crate::ros_interface::{PoseSource, RosError, VelocitySink};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Side length of the turtlesim window.
pub const WORLD_SIZE: f64 = 11.088_889;

/// Where turtlesim spawns `turtle1`.
pub const SPAWN: Pose2D = Pose2D {
    x: WORLD_SIZE / 2.0,
    y: WORLD_SIZE / 2.0,
    heading: 0.0,
};

// Integration step used when a sleep spans several of them.
const MAX_STEP: f64 = 0.01;

#[derive(Debug)]
struct TurtleState {
    pose: Pose2D,
    command: VelocityCommand,
    elapsed: Duration,
    commands_received: u64,
}

impl TurtleState {
    fn advance(&mut self, period: Duration) {
        let mut remaining = period.as_secs_f64();
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP);
            let heading = self.pose.heading;
            let x = self.pose.x + self.command.linear * heading.cos() * dt;
            let y = self.pose.y + self.command.linear * heading.sin() * dt;
            self.pose = Pose2D::new(
                x.clamp(0.0, WORLD_SIZE),
                y.clamp(0.0, WORLD_SIZE),
                heading + self.command.angular * dt,
            );
            remaining -= dt;
        }
        self.elapsed += period;
    }
}

/// Simulated turtle shared by its pose source, velocity sink and clock
#[derive(Debug, Clone)]
pub struct Turtlesim {
    state: Arc<Mutex<TurtleState>>,
}

impl Turtlesim {
    /// Spawns a turtle at `pose`, at rest.
    pub fn new(pose: Pose2D) -> Self {
        Turtlesim {
            state: Arc::new(Mutex::new(TurtleState {
                pose,
                command: VelocityCommand::ZERO,
                elapsed: Duration::ZERO,
                commands_received: 0,
            })),
        }
    }

    /// Current true pose.
    pub fn pose(&self) -> Pose2D {
        self.lock().pose
    }

    /// Command the turtle is currently executing.
    pub fn current_command(&self) -> VelocityCommand {
        self.lock().command
    }

    /// Number of commands received.
    pub fn commands_received(&self) -> u64 {
        self.lock().commands_received
    }

    /// Pose source reading this turtle.
    pub fn pose_source(&self) -> SimPose {
        SimPose { sim: self.clone() }
    }

    /// Velocity sink driving this turtle.
    pub fn velocity_sink(&self) -> SimCmdVel {
        SimCmdVel { sim: self.clone() }
    }

    /// Clock whose `sleep` advances this turtle.
    pub fn clock(&self) -> SimClock {
        SimClock { sim: self.clone() }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TurtleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Turtlesim {
    fn default() -> Self {
        Turtlesim::new(SPAWN)
    }
}

/// Pose source over a simulated turtle
#[derive(Debug, Clone)]
pub struct SimPose {
    sim: Turtlesim,
}

impl PoseSource for SimPose {
    fn latest_pose(&self) -> Option<Pose2D> {
        Some(self.sim.pose())
    }
}

/// Velocity sink over a simulated turtle
#[derive(Debug, Clone)]
pub struct SimCmdVel {
    sim: Turtlesim,
}

impl VelocitySink for SimCmdVel {
    fn send(&mut self, command: VelocityCommand) -> Result<(), RosError> {
        let mut state = self.sim.lock();
        state.command = command;
        state.commands_received += 1;
        Ok(())
    }
}

/// Simulated time; sleeping integrates the turtle's motion
#[derive(Debug, Clone)]
pub struct SimClock {
    sim: Turtlesim,
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        self.sim.lock().elapsed
    }

    fn sleep(&mut self, period: Duration) {
        self.sim.lock().advance(period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drives_forward_along_heading() {
        let sim = Turtlesim::new(Pose2D::new(1.0, 1.0, 0.0));
        sim.velocity_sink().send(VelocityCommand::new(1.0, 0.0)).unwrap();
        sim.clock().sleep(Duration::from_secs(2));
        let pose = sim.pose();
        assert!((pose.x - 3.0).abs() < 1e-9);
        assert!((pose.y - 1.0).abs() < 1e-9);
        assert_eq!(sim.clock().now(), Duration::from_secs(2));
    }

    #[test]
    fn stays_inside_the_window() {
        let sim = Turtlesim::new(Pose2D::new(10.5, 5.0, 0.0));
        sim.velocity_sink().send(VelocityCommand::new(2.0, 0.0)).unwrap();
        sim.clock().sleep(Duration::from_secs(5));
        assert!((sim.pose().x - WORLD_SIZE).abs() < 1e-9);
    }

    #[test]
    fn turning_in_place_keeps_position() {
        let sim = Turtlesim::default();
        sim.velocity_sink().send(VelocityCommand::new(0.0, 1.0)).unwrap();
        sim.clock().sleep(Duration::from_millis(500));
        let pose = sim.pose();
        assert_eq!((pose.x, pose.y), (SPAWN.x, SPAWN.y));
        assert!((pose.heading - 0.5).abs() < 1e-9);
        assert_eq!(sim.commands_received(), 1);
    }
}
