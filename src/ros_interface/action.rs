// src/ros_interface/action.rs
// The MoveTurtle action interface: the `.action` definition text and the
// goal/result/feedback records exchanged with action clients.

use super::RosError;
use crate::core::{Feedback, Goal, Outcome, Pose2D};
use serde::{Deserialize, Serialize};

/// Definition shipped in `action/MoveTurtle.action`.
pub const MOVE_TURTLE_ACTION: &str = include_str!("../../action/MoveTurtle.action");

const SECTION_SEPARATOR: &str = "---";

/// One `type name` line of an interface definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Primitive type, e.g. `float32`
    pub ty: String,
    /// Field name
    pub name: String,
}

/// Parsed `.action` file: goal, result and feedback sections in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefinition {
    /// Goal fields
    pub goal: Vec<Field>,
    /// Result fields
    pub result: Vec<Field>,
    /// Feedback fields
    pub feedback: Vec<Field>,
}

impl ActionDefinition {
    /// Parses an action definition. `#` starts a comment and blank lines are
    /// skipped; exactly three sections separated by `---` are required.
    pub fn parse(text: &str) -> Result<Self, RosError> {
        let mut sections: Vec<Vec<Field>> = vec![Vec::new()];
        for (number, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            if line == SECTION_SEPARATOR {
                sections.push(Vec::new());
                continue;
            }
            let mut parts = line.split_whitespace();
            let (Some(ty), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(RosError::ConversionError(format!(
                    "line {}: expected '<type> <name>', got '{}'",
                    number + 1,
                    line
                )));
            };
            if let Some(current) = sections.last_mut() {
                current.push(Field {
                    ty: ty.to_string(),
                    name: name.to_string(),
                });
            }
        }

        let count = sections.len();
        let mut sections = sections.into_iter();
        match (sections.next(), sections.next(), sections.next(), sections.next()) {
            (Some(goal), Some(result), Some(feedback), None) => Ok(ActionDefinition {
                goal,
                result,
                feedback,
            }),
            _ => Err(RosError::ConversionError(format!(
                "expected 3 sections separated by '{}', found {}",
                SECTION_SEPARATOR, count
            ))),
        }
    }

    /// Renders the definition without comments.
    pub fn render(&self) -> String {
        let section = |fields: &[Field]| {
            fields
                .iter()
                .map(|f| format!("{} {}\n", f.ty, f.name))
                .collect::<String>()
        };
        format!(
            "{}{sep}\n{}{sep}\n{}",
            section(&self.goal),
            section(&self.result),
            section(&self.feedback),
            sep = SECTION_SEPARATOR
        )
    }

    /// The bundled MoveTurtle definition.
    pub fn move_turtle() -> Result<Self, RosError> {
        Self::parse(MOVE_TURTLE_ACTION)
    }
}

/// MoveTurtle goal section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTurtleGoal {
    /// Target X
    pub x: f32,
    /// Target Y
    pub y: f32,
    /// Target heading (rad)
    pub theta: f32,
    /// Cruise speed
    pub speed: f32,
}

/// MoveTurtle result section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTurtleResult {
    /// Whether the goal was reached
    pub success: bool,
    /// Distance left when the session ended
    pub final_distance: f32,
}

/// MoveTurtle feedback section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTurtleFeedback {
    /// Current X
    pub current_x: f32,
    /// Current Y
    pub current_y: f32,
    /// Current heading (rad)
    pub current_theta: f32,
    /// Distance still to cover
    pub distance_remaining: f32,
}

impl From<MoveTurtleGoal> for Goal {
    fn from(msg: MoveTurtleGoal) -> Self {
        Goal::new(
            f64::from(msg.x),
            f64::from(msg.y),
            f64::from(msg.theta),
            f64::from(msg.speed),
        )
    }
}

impl From<Goal> for MoveTurtleGoal {
    fn from(goal: Goal) -> Self {
        MoveTurtleGoal {
            x: goal.target_x as f32,
            y: goal.target_y as f32,
            theta: goal.target_heading as f32,
            speed: goal.cruise_speed as f32,
        }
    }
}

impl From<Feedback> for MoveTurtleFeedback {
    fn from(feedback: Feedback) -> Self {
        MoveTurtleFeedback {
            current_x: feedback.pose.x as f32,
            current_y: feedback.pose.y as f32,
            current_theta: feedback.pose.heading as f32,
            distance_remaining: feedback.distance_remaining as f32,
        }
    }
}

impl From<MoveTurtleFeedback> for Feedback {
    fn from(msg: MoveTurtleFeedback) -> Self {
        Feedback {
            pose: Pose2D::new(
                f64::from(msg.current_x),
                f64::from(msg.current_y),
                f64::from(msg.current_theta),
            ),
            distance_remaining: f64::from(msg.distance_remaining),
        }
    }
}

impl MoveTurtleResult {
    /// Result record for an outcome. Only success carries a distance; the
    /// others report the distance from `last_feedback` when one is known.
    pub fn from_outcome(outcome: &Outcome, last_feedback: Option<&Feedback>) -> Self {
        match outcome {
            Outcome::Succeeded { final_distance } => MoveTurtleResult {
                success: true,
                final_distance: *final_distance as f32,
            },
            Outcome::Cancelled | Outcome::Aborted(_) => MoveTurtleResult {
                success: false,
                final_distance: last_feedback
                    .map(|f| f.distance_remaining as f32)
                    .unwrap_or(f32::NAN),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AbortReason;

    #[test]
    fn bundled_definition_has_expected_sections() {
        fn names(fields: &[Field]) -> Vec<String> {
            fields.iter().map(|f| f.name.clone()).collect()
        }
        let def = ActionDefinition::move_turtle().unwrap();
        assert_eq!(names(&def.goal), ["x", "y", "theta", "speed"]);
        assert_eq!(names(&def.result), ["success", "final_distance"]);
        assert_eq!(
            names(&def.feedback),
            ["current_x", "current_y", "current_theta", "distance_remaining"]
        );
        assert_eq!(def.result[0].ty, "bool");
    }

    #[test]
    fn render_then_parse_is_stable() {
        let def = ActionDefinition::move_turtle().unwrap();
        let rendered = def.render();
        assert!(rendered.starts_with("float32 x\n"));
        assert_eq!(ActionDefinition::parse(&rendered).unwrap(), def);
    }

    #[test]
    fn rejects_wrong_section_count_and_bad_lines() {
        assert!(ActionDefinition::parse("float32 x\n---\nbool ok\n").is_err());
        assert!(ActionDefinition::parse("float32\n---\n---\n").is_err());
        assert!(ActionDefinition::parse("a b c\n---\n---\n").is_err());
        let empty = ActionDefinition::parse("---\n---\n").unwrap();
        assert!(empty.goal.is_empty() && empty.feedback.is_empty());
    }

    #[test]
    fn goal_record_converts_to_goal() {
        let goal: Goal = MoveTurtleGoal {
            x: 8.0,
            y: 2.5,
            theta: 1.0,
            speed: 1.5,
        }
        .into();
        assert_eq!(goal, Goal::new(8.0, 2.5, 1.0, 1.5));
    }

    #[test]
    fn result_record_reflects_outcome() {
        let ok = MoveTurtleResult::from_outcome(&Outcome::Succeeded { final_distance: 0.05 }, None);
        assert!(ok.success);
        assert!((ok.final_distance - 0.05).abs() < 1e-6);

        let feedback = Feedback {
            pose: Pose2D::default(),
            distance_remaining: 3.0,
        };
        let cancelled = MoveTurtleResult::from_outcome(&Outcome::Cancelled, Some(&feedback));
        assert!(!cancelled.success);
        assert_eq!(cancelled.final_distance, 3.0);

        let aborted =
            MoveTurtleResult::from_outcome(&Outcome::Aborted(AbortReason::NoPoseAvailable), None);
        assert!(aborted.final_distance.is_nan());
    }

    #[test]
    fn feedback_record_serializes_with_field_names() {
        let msg = MoveTurtleFeedback::from(Feedback {
            pose: Pose2D::new(1.0, 2.0, 0.5),
            distance_remaining: 4.0,
        });
        let yaml = serde_yaml::to_string(&msg).unwrap();
        assert!(yaml.contains("current_x: 1.0"));
        assert!(yaml.contains("distance_remaining: 4.0"));
    }
}
