// src/main.rs
// Command-line entry point: sends one goal to the turtle, or runs a motion
// pattern. Without the `ros2` feature the turtle is simulated.

use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;
use turtle_motion::navigation::{seconds, Clock};
use turtle_motion::ros_interface::{ActionDefinition, MoveTurtleFeedback, MoveTurtleResult};
use turtle_motion::{
    Feedback, Goal, GoalServer, Outcome, Pattern, PatternGenerator, PoseSource, TurtleConfig,
    TurtleError, VelocitySink,
};

const USAGE: &str = "usage:
  turtle_motion goal <x> <y> <theta> <speed> [--config FILE]
  turtle_motion pattern <circle|square|spiral|random> [ticks] [--config FILE]
  turtle_motion interface";

enum Command {
    Goal(Goal),
    Pattern(Pattern, u64),
    Interface,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(std::env::args().skip(1).collect()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{}", e);
            if matches!(e, TurtleError::UsageError(_)) {
                eprintln!("{}", USAGE);
            }
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the requested action succeeded.
fn run(args: Vec<String>) -> Result<bool, TurtleError> {
    let (command, config_path) = parse_args(args)?;
    let config = match config_path {
        Some(path) => TurtleConfig::load(path)?,
        None => TurtleConfig::default(),
    };

    match command {
        Command::Goal(goal) => run_goal(&config, goal),
        Command::Pattern(pattern, ticks) => run_pattern(&config, pattern, ticks),
        Command::Interface => {
            print!("{}", ActionDefinition::move_turtle()?.render());
            Ok(true)
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<(Command, Option<String>), TurtleError> {
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter
                .next()
                .ok_or_else(|| TurtleError::UsageError("--config needs a path".to_string()))?;
            config_path = Some(path);
        } else {
            positional.push(arg);
        }
    }

    let number = |s: &str| -> Result<f64, TurtleError> {
        s.parse::<f64>()
            .map_err(|_| TurtleError::UsageError(format!("'{}' is not a number", s)))
    };

    let command = match positional.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["goal", x, y, theta, speed] => Command::Goal(Goal::new(
            number(*x)?,
            number(*y)?,
            number(*theta)?,
            number(*speed)?,
        )),
        ["pattern", name] => Command::Pattern(name.parse().map_err(TurtleError::UsageError)?, 200),
        ["pattern", name, ticks] => Command::Pattern(
            name.parse().map_err(TurtleError::UsageError)?,
            ticks
                .parse()
                .map_err(|_| TurtleError::UsageError(format!("'{}' is not a tick count", ticks)))?,
        ),
        ["interface"] => Command::Interface,
        _ => return Err(TurtleError::UsageError("unrecognised arguments".to_string())),
    };
    Ok((command, config_path))
}

fn report_feedback(feedback: &Feedback) {
    let msg = MoveTurtleFeedback::from(*feedback);
    info!(
        "Feedback: x={:.2} y={:.2} theta={:.2} remaining={:.2}",
        msg.current_x, msg.current_y, msg.current_theta, msg.distance_remaining
    );
}

fn finish(outcome: Outcome, last_feedback: Option<Feedback>) -> bool {
    let result = MoveTurtleResult::from_outcome(&outcome, last_feedback.as_ref());
    if result.success {
        info!("Result: success, final distance {:.3}", result.final_distance);
    } else {
        warn!("Result: {}", outcome);
    }
    result.success
}

#[cfg(not(feature = "ros2"))]
fn run_goal(config: &TurtleConfig, goal: Goal) -> Result<bool, TurtleError> {
    let sim = turtle_motion::Turtlesim::default();
    info!("Simulated turtle spawned at {:?}", sim.pose());
    let mut server = GoalServer::new(
        config.tracker.clone(),
        sim.pose_source(),
        sim.velocity_sink(),
        sim.clock(),
    );
    let mut last = None;
    let outcome = server.execute(goal, |feedback| {
        report_feedback(feedback);
        last = Some(*feedback);
    })?;
    info!("Turtle stopped at {:?}", sim.pose());
    Ok(finish(outcome, last))
}

#[cfg(feature = "ros2")]
fn run_goal(config: &TurtleConfig, goal: Goal) -> Result<bool, TurtleError> {
    use turtle_motion::ros_interface::TurtleBridge;

    let (poses, sink, clock) = TurtleBridge::new(&config.ros)?.split();
    let mut server = GoalServer::new(config.tracker.clone(), poses, sink, clock);
    let mut last = None;
    let outcome = server.execute(goal, |feedback| {
        report_feedback(feedback);
        last = Some(*feedback);
    })?;
    Ok(finish(outcome, last))
}

#[cfg(not(feature = "ros2"))]
fn run_pattern(config: &TurtleConfig, pattern: Pattern, ticks: u64) -> Result<bool, TurtleError> {
    let sim = turtle_motion::Turtlesim::default();
    drive_pattern(config, pattern, ticks, sim.velocity_sink(), sim.clock())?;
    info!("Turtle ended at {:?}", sim.pose_source().latest_pose());
    Ok(true)
}

#[cfg(feature = "ros2")]
fn run_pattern(config: &TurtleConfig, pattern: Pattern, ticks: u64) -> Result<bool, TurtleError> {
    use turtle_motion::ros_interface::TurtleBridge;

    let (poses, sink, clock) = TurtleBridge::new(&config.ros)?.split();
    drive_pattern(config, pattern, ticks, sink, clock)?;
    info!("Turtle ended at {:?}", poses.latest_pose());
    Ok(true)
}

fn drive_pattern<S: VelocitySink, C: Clock>(
    config: &TurtleConfig,
    pattern: Pattern,
    ticks: u64,
    mut sink: S,
    mut clock: C,
) -> Result<(), TurtleError> {
    let mut generator =
        PatternGenerator::new(pattern, config.pattern.clone(), StdRng::from_entropy());
    let period = seconds(config.pattern.publish_period);
    info!("Running {:?} pattern for {} ticks", pattern, ticks);
    for _ in 0..ticks {
        let command = generator.next_command();
        info!(
            "Publishing: linear={:.2}, angular={:.2}",
            command.linear, command.angular
        );
        sink.send(command)?;
        clock.sleep(period);
    }
    sink.send(turtle_motion::VelocityCommand::ZERO)?;
    Ok(())
}
