// core/mod.rs

// Data model shared across the crate: poses, velocity commands, goals,
// feedback and terminal outcomes.

pub mod pose;
pub mod state;

pub use pose::{normalize_angle, Pose2D, VelocityCommand};
pub use state::{AbortReason, Feedback, Goal, Mode, Outcome};
