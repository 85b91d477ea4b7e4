// src/navigation/server.rs
// Runs a GoalTracker at a fixed period against injected collaborators: a pose
// source, a velocity sink and a clock. Nothing here is process-global.

use super::{CancelHandle, GoalTracker, TrackerConfig, TrackerError};
use crate::core::{Feedback, Goal, Outcome};
use crate::ros_interface::{PoseSource, VelocitySink};
use log::{debug, error};
use std::time::{Duration, Instant};

/// Time base for the control loop
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Yields until roughly `period` has passed.
    fn sleep(&mut self, period: Duration);
}

/// Wall clock backed by `Instant` and `thread::sleep`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at zero.
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}

/// Accepts goals and drives them to a terminal outcome
pub struct GoalServer<P, S, C> {
    tracker: GoalTracker,
    poses: P,
    sink: S,
    clock: C,
    publish_failures: u64,
}

impl<P: PoseSource, S: VelocitySink, C: Clock> GoalServer<P, S, C> {
    /// Builds a server around its collaborators.
    pub fn new(config: TrackerConfig, poses: P, sink: S, clock: C) -> Self {
        GoalServer {
            tracker: GoalTracker::new(config),
            poses,
            sink,
            clock,
            publish_failures: 0,
        }
    }

    /// Underlying tracker.
    pub fn tracker(&self) -> &GoalTracker {
        &self.tracker
    }

    /// Publish errors seen so far; the loop keeps going after each one.
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures
    }

    /// Accepts a goal. Fails with `AlreadyActive` while another goal runs.
    pub fn accept(&mut self, goal: Goal) -> Result<CancelHandle, TrackerError> {
        let now = self.clock.now();
        self.tracker.start(goal, now)
    }

    /// Requests cancellation of the active goal.
    pub fn cancel(&self) {
        self.tracker.cancel();
    }

    /// Ticks the accepted goal until it terminates.
    ///
    /// Every tick's command goes to the sink, including the final zero
    /// command. Feedback is passed to `on_feedback` as it becomes due.
    pub fn run<F>(&mut self, mut on_feedback: F) -> Result<Outcome, TrackerError>
    where
        F: FnMut(&Feedback),
    {
        let period = self.tracker.config().control_interval();
        loop {
            let now = self.clock.now();
            let output = self.tracker.tick(self.poses.latest_pose(), now)?;
            self.publish(output.command);

            if let Some(feedback) = &output.feedback {
                debug!(
                    "Feedback: pose=({:.3}, {:.3}, {:.3}) remaining={:.3}",
                    feedback.pose.x, feedback.pose.y, feedback.pose.heading, feedback.distance_remaining
                );
                on_feedback(feedback);
            }
            if let Some(outcome) = output.outcome {
                return Ok(outcome);
            }
            self.clock.sleep(period);
        }
    }

    /// `accept` followed by `run`.
    pub fn execute<F>(&mut self, goal: Goal, on_feedback: F) -> Result<Outcome, TrackerError>
    where
        F: FnMut(&Feedback),
    {
        self.accept(goal)?;
        self.run(on_feedback)
    }

    /// Gives the collaborators back.
    pub fn into_parts(self) -> (P, S, C) {
        (self.poses, self.sink, self.clock)
    }

    fn publish(&mut self, command: crate::core::VelocityCommand) {
        if let Err(e) = self.sink.send(command) {
            self.publish_failures += 1;
            error!("Failed to publish command: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_moves_forward_when_sleeping() {
        let mut clock = SystemClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.now() - before >= Duration::from_millis(5));
    }
}
