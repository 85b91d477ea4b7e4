// src/navigation/controller.rs
// Goal tracker: steers toward a target position, then aligns to the target
// heading, reporting progress and honouring cancellation.

use super::TrackerConfig;
use crate::core::{normalize_angle, AbortReason, Feedback, Goal, Mode, Outcome, Pose2D, VelocityCommand};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Errors surfaced by the tracker to its caller
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// A goal is already being tracked
    AlreadyActive,
    /// `tick` was called with no active goal
    NotTracking,
    /// Goal position lies outside the configured workspace
    GoalOutOfBounds {
        /// Requested X
        x: f64,
        /// Requested Y
        y: f64,
    },
    /// Goal fields are not usable (non-finite, non-positive speed)
    InvalidGoal(String),
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TrackerError::AlreadyActive => write!(f, "a goal is already active"),
            TrackerError::NotTracking => write!(f, "no goal is being tracked"),
            TrackerError::GoalOutOfBounds { x, y } => {
                write!(f, "goal ({}, {}) is outside the workspace", x, y)
            }
            TrackerError::InvalidGoal(msg) => write!(f, "invalid goal: {}", msg),
        }
    }
}

impl std::error::Error for TrackerError {}

/// Cancellation flag for one tracking session.
///
/// Clones share the flag, so a handle can be moved to another thread or an
/// asynchronous callback. The tracker reads the flag once per tick.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests cancellation. Repeated calls have no further effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Result of one control step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Command to send this step
    pub command: VelocityCommand,
    /// Progress report, if one was due
    pub feedback: Option<Feedback>,
    /// Terminal outcome, if the session ended on this step
    pub outcome: Option<Outcome>,
}

impl TickOutput {
    fn hold() -> Self {
        TickOutput {
            command: VelocityCommand::ZERO,
            feedback: None,
            outcome: None,
        }
    }
}

struct Session {
    goal: Goal,
    cancel: CancelHandle,
    started_at: Duration,
    last_feedback_at: Option<Duration>,
}

impl Session {
    fn take_feedback_slot(&mut self, now: Duration, period: Duration) -> bool {
        let due = match self.last_feedback_at {
            None => true,
            Some(last) => now.saturating_sub(last) >= period,
        };
        if due {
            self.last_feedback_at = Some(now);
        }
        due
    }
}

/// Single-goal position and heading controller
pub struct GoalTracker {
    config: TrackerConfig,
    session: Option<Session>,
    last_pose: Option<Pose2D>,
}

impl GoalTracker {
    /// Creates an idle tracker.
    pub fn new(config: TrackerConfig) -> Self {
        GoalTracker {
            config,
            session: None,
            last_pose: None,
        }
    }

    /// Tracker tuning.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current phase.
    pub fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Tracking
        } else {
            Mode::Idle
        }
    }

    /// The goal being tracked, if any.
    pub fn active_goal(&self) -> Option<Goal> {
        self.session.as_ref().map(|s| s.goal)
    }

    /// Most recent pose sample, possibly stale.
    pub fn last_pose(&self) -> Option<Pose2D> {
        self.last_pose
    }

    /// Records a pose sample without stepping the controller.
    pub fn observe_pose(&mut self, pose: Pose2D) {
        if self.last_pose.is_none() {
            debug!("First pose received: {:?}", pose);
        }
        self.last_pose = Some(pose);
    }

    /// Accepts a goal and starts tracking it.
    ///
    /// `now` is the time base later passed to [`GoalTracker::tick`]; it anchors
    /// the first-pose wait. If no pose has been observed yet the tracker stays
    /// in `Tracking` and commands zero velocity until one arrives.
    pub fn start(&mut self, goal: Goal, now: Duration) -> Result<CancelHandle, TrackerError> {
        if let Some(active) = &self.session {
            warn!(
                "Rejecting goal {:?}: still tracking {:?}",
                goal, active.goal
            );
            return Err(TrackerError::AlreadyActive);
        }
        self.validate(&goal)?;

        let cancel = CancelHandle::default();
        self.session = Some(Session {
            goal,
            cancel: cancel.clone(),
            started_at: now,
            last_feedback_at: None,
        });
        info!(
            "Tracking goal x={:.3} y={:.3} heading={:.3} speed={:.3}{}",
            goal.target_x,
            goal.target_y,
            goal.target_heading,
            goal.cruise_speed,
            if self.last_pose.is_some() { "" } else { " (waiting for pose)" }
        );
        Ok(cancel)
    }

    /// Requests cancellation of the active goal; a no-op when idle.
    pub fn cancel(&self) {
        if let Some(session) = &self.session {
            session.cancel.cancel();
        }
    }

    /// Runs one control step.
    ///
    /// `current_pose` replaces the stored sample when present; otherwise the
    /// last known pose is reused. Any step that ends the session commands
    /// zero velocity.
    pub fn tick(&mut self, current_pose: Option<Pose2D>, now: Duration) -> Result<TickOutput, TrackerError> {
        if let Some(pose) = current_pose {
            self.observe_pose(pose);
        }
        let feedback_period = self.config.feedback_interval();
        let last_pose = self.last_pose;

        let session = self.session.as_mut().ok_or(TrackerError::NotTracking)?;

        if session.cancel.is_cancelled() {
            return Ok(self.finish(Outcome::Cancelled, None));
        }

        let pose = match last_pose {
            Some(pose) => pose,
            None => {
                let waited = now.saturating_sub(session.started_at);
                if self.config.pose_wait().is_some_and(|limit| waited >= limit) {
                    return Ok(self.finish(Outcome::Aborted(AbortReason::NoPoseAvailable), None));
                }
                return Ok(TickOutput::hold());
            }
        };

        let goal = session.goal;
        let displacement = nalgebra::Vector2::new(goal.target_x, goal.target_y) - pose.position();
        let distance = displacement.norm();
        let feedback = session
            .take_feedback_slot(now, feedback_period)
            .then_some(Feedback {
                pose,
                distance_remaining: distance,
            });

        if distance > self.config.distance_tolerance {
            let heading_to_target = displacement.y.atan2(displacement.x);
            let heading_error = normalize_angle(heading_to_target - pose.heading);
            let command = VelocityCommand::new(
                goal.cruise_speed.min(distance),
                self.clamp_angular(self.config.kp_turn * heading_error),
            );
            return Ok(TickOutput {
                command,
                feedback,
                outcome: None,
            });
        }

        let final_heading_error = normalize_angle(goal.target_heading - pose.heading);
        if final_heading_error.abs() > self.config.angle_tolerance {
            let command = VelocityCommand::new(
                0.0,
                self.clamp_angular(self.config.kp_align * final_heading_error),
            );
            return Ok(TickOutput {
                command,
                feedback,
                outcome: None,
            });
        }

        Ok(self.finish(
            Outcome::Succeeded {
                final_distance: distance,
            },
            feedback,
        ))
    }

    fn finish(&mut self, outcome: Outcome, feedback: Option<Feedback>) -> TickOutput {
        self.session = None;
        match outcome {
            Outcome::Succeeded { .. } => info!("Goal {}", outcome),
            _ => warn!("Goal {}", outcome),
        }
        TickOutput {
            command: VelocityCommand::ZERO,
            feedback,
            outcome: Some(outcome),
        }
    }

    fn clamp_angular(&self, angular: f64) -> f64 {
        match self.config.max_angular {
            Some(limit) => angular.clamp(-limit.abs(), limit.abs()),
            None => angular,
        }
    }

    fn validate(&self, goal: &Goal) -> Result<(), TrackerError> {
        let fields = [goal.target_x, goal.target_y, goal.target_heading, goal.cruise_speed];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(TrackerError::InvalidGoal("fields must be finite".to_string()));
        }
        if goal.cruise_speed <= 0.0 {
            return Err(TrackerError::InvalidGoal(format!(
                "cruise speed must be positive, got {}",
                goal.cruise_speed
            )));
        }
        if let Some(workspace) = &self.config.workspace {
            if !workspace.contains(goal.target_x, goal.target_y) {
                warn!("Rejecting goal outside workspace: {:?}", goal);
                return Err(TrackerError::GoalOutOfBounds {
                    x: goal.target_x,
                    y: goal.target_y,
                });
            }
        }
        Ok(())
    }
}
