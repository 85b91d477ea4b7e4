use rstest::rstest;
use std::time::Duration;
use turtle_motion::navigation::seconds;
use turtle_motion::{Pattern, RosConfig, TurtleConfig, TurtleError, Workspace};

#[test]
fn bundled_config_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/turtle.yaml");
    let config = TurtleConfig::load(path).unwrap();
    assert_eq!(config.tracker.pose_timeout, Some(5.0));
    assert_eq!(config.tracker.max_angular, None);
    assert_eq!(config.tracker.workspace, Some(Workspace::turtlesim()));
    assert_eq!(config.pattern.random_hold_ticks, 10);
    assert_eq!(config.pattern.random_angular, (-1.5, 1.5));
    assert_eq!(config.ros, RosConfig::default());
    assert!(!config.to_yaml().unwrap().contains("action"));
}

#[test]
fn empty_document_is_default() {
    assert_eq!(TurtleConfig::from_yaml_str("{}").unwrap(), TurtleConfig::default());
}

#[test]
fn missing_file_is_a_config_error() {
    let err = TurtleConfig::load("/nonexistent/turtle.yaml").unwrap_err();
    assert!(matches!(err, TurtleError::ConfigError(_)));
}

#[test]
fn inverted_workspace_is_rejected() {
    let yaml = "tracker:\n  workspace: {min_x: 5.0, max_x: 1.0, min_y: 0.0, max_y: 1.0}\n";
    assert!(TurtleConfig::from_yaml_str(yaml).is_err());
}

#[test]
fn pattern_names_deserialize_lowercase() {
    let pattern: Pattern = serde_yaml::from_str("spiral").unwrap();
    assert_eq!(pattern, Pattern::Spiral);
}

#[rstest]
#[case::huge_pose_timeout("tracker:\n  pose_timeout: 1.0e20\n")]
#[case::huge_feedback_period("tracker:\n  feedback_period: 1.0e20\n")]
#[case::huge_control_period("tracker:\n  control_period: 1.0e20\n")]
#[case::huge_publish_period("pattern:\n  publish_period: 1.0e20\n")]
#[case::infinite_pose_timeout("tracker:\n  pose_timeout: .inf\n")]
fn periods_beyond_duration_range_are_rejected(#[case] yaml: &str) {
    let err = TurtleConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, TurtleError::ConfigError(_)), "{:?}", err);
}

#[rstest]
#[case::unbounded_linear("pattern:\n  random_linear: [-.inf, .inf]\n")]
#[case::nan_angular("pattern:\n  random_angular: [.nan, 1.0]\n")]
#[case::inverted_linear("pattern:\n  random_linear: [2.0, 0.5]\n")]
#[case::overflowing_span("pattern:\n  random_angular: [-1.0e308, 1.0e308]\n")]
fn unusable_random_ranges_are_rejected(#[case] yaml: &str) {
    let err = TurtleConfig::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, TurtleError::ConfigError(_)), "{:?}", err);
}

#[test]
fn degenerate_random_range_is_accepted() {
    let config = TurtleConfig::from_yaml_str("pattern:\n  random_linear: [1.0, 1.0]\n").unwrap();
    assert_eq!(config.pattern.random_linear, (1.0, 1.0));
}

#[test]
fn seconds_saturates_instead_of_panicking() {
    assert_eq!(seconds(0.25), Duration::from_millis(250));
    assert_eq!(seconds(-1.0), Duration::ZERO);
    assert_eq!(seconds(f64::NAN), Duration::ZERO);
    assert_eq!(seconds(1.0e20), Duration::MAX);
    assert_eq!(seconds(f64::INFINITY), Duration::MAX);
}
