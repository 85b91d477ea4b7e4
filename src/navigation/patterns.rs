// src/navigation/patterns.rs
// Open-loop motion patterns for the publisher node: one velocity command per
// publisher tick, no pose feedback.

use crate::core::VelocityCommand;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

/// Named motion pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Constant forward speed and turn rate
    Circle,
    /// Straight sides joined by in-place quarter turns
    Square,
    /// Constant turn rate with growing forward speed
    Spiral,
    /// Random commands held for a fixed number of ticks
    Random,
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Pattern::Circle),
            "square" => Ok(Pattern::Square),
            "spiral" => Ok(Pattern::Spiral),
            "random" => Ok(Pattern::Random),
            other => Err(format!(
                "unknown pattern '{}' (expected circle, square, spiral or random)",
                other
            )),
        }
    }
}

/// Parameters for the motion patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Publisher period (seconds)
    pub publish_period: f64,
    /// Circle forward speed
    pub circle_linear: f64,
    /// Circle turn rate
    pub circle_angular: f64,
    /// Square forward speed along a side
    pub square_linear: f64,
    /// Time spent driving one side (seconds)
    pub side_duration: f64,
    /// Turn rate at the corners (rad/s)
    pub turn_speed: f64,
    /// Spiral forward speed at t = 0
    pub spiral_initial_linear: f64,
    /// Spiral forward speed gained per second
    pub spiral_growth: f64,
    /// Spiral turn rate
    pub spiral_angular: f64,
    /// Random walk forward speed range
    pub random_linear: (f64, f64),
    /// Random walk turn rate range
    pub random_angular: (f64, f64),
    /// Ticks a random command is held before a new one is drawn
    pub random_hold_ticks: u32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        PatternConfig {
            publish_period: 0.1,
            circle_linear: 2.0,
            circle_angular: 1.0,
            square_linear: 2.0,
            side_duration: 2.0,
            turn_speed: FRAC_PI_2,
            spiral_initial_linear: 0.5,
            spiral_growth: 0.1,
            spiral_angular: 1.0,
            random_linear: (0.5, 2.0),
            random_angular: (-1.5, 1.5),
            random_hold_ticks: 10,
        }
    }
}

/// Produces one command per tick for a pattern.
pub struct PatternGenerator<R: Rng> {
    pattern: Pattern,
    config: PatternConfig,
    rng: R,
    ticks: u64,
    last_command: Option<VelocityCommand>,
}

impl<R: Rng> PatternGenerator<R> {
    /// Creates a generator; `rng` is only drawn from by the random pattern.
    pub fn new(pattern: Pattern, config: PatternConfig, rng: R) -> Self {
        PatternGenerator {
            pattern,
            config,
            rng,
            ticks: 0,
            last_command: None,
        }
    }

    /// Pattern being generated.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Number of commands produced so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Command for the next publisher tick.
    pub fn next_command(&mut self) -> VelocityCommand {
        let elapsed = self.ticks as f64 * self.config.publish_period;
        let command = match self.pattern {
            Pattern::Circle => {
                VelocityCommand::new(self.config.circle_linear, self.config.circle_angular)
            }
            Pattern::Square => self.square_command(elapsed),
            Pattern::Spiral => VelocityCommand::new(
                self.config.spiral_initial_linear + self.config.spiral_growth * elapsed,
                self.config.spiral_angular,
            ),
            Pattern::Random => self.random_command(),
        };
        self.ticks += 1;
        command
    }

    fn square_command(&self, elapsed: f64) -> VelocityCommand {
        let turn_duration = FRAC_PI_2 / self.config.turn_speed.abs().max(f64::EPSILON);
        let leg = self.config.side_duration + turn_duration;
        if leg <= 0.0 {
            return VelocityCommand::ZERO;
        }
        if elapsed % leg < self.config.side_duration {
            VelocityCommand::new(self.config.square_linear, 0.0)
        } else {
            VelocityCommand::new(0.0, self.config.turn_speed.abs())
        }
    }

    fn random_command(&mut self) -> VelocityCommand {
        let hold = u64::from(self.config.random_hold_ticks.max(1));
        match self.last_command {
            Some(held) if self.ticks % hold != 0 => held,
            _ => {
                let fresh = VelocityCommand::new(
                    draw(&mut self.rng, self.config.random_linear),
                    draw(&mut self.rng, self.config.random_angular),
                );
                debug!("Random walk picked {:?}", fresh);
                self.last_command = Some(fresh);
                fresh
            }
        }
    }
}

// Empty or unbounded ranges fall back to the lower bound, or zero when that
// is not finite either; `gen_range` panics on a non-finite span.
fn draw<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if high > low && (high - low).is_finite() {
        rng.gen_range(low..high)
    } else if low.is_finite() {
        low
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(pattern: Pattern) -> PatternGenerator<StdRng> {
        PatternGenerator::new(pattern, PatternConfig::default(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn parses_pattern_names() {
        assert_eq!("Circle".parse::<Pattern>(), Ok(Pattern::Circle));
        assert_eq!(" spiral ".parse::<Pattern>(), Ok(Pattern::Spiral));
        assert!("zigzag".parse::<Pattern>().is_err());
    }

    #[test]
    fn circle_is_constant() {
        let mut g = generator(Pattern::Circle);
        let first = g.next_command();
        for _ in 0..20 {
            assert_eq!(g.next_command(), first);
        }
    }

    #[test]
    fn square_alternates_sides_and_corners() {
        let mut g = generator(Pattern::Square);
        let commands: Vec<_> = (0..60).map(|_| g.next_command()).collect();
        // side 2.0 s at 0.1 s per tick, corner pi/2 at pi/2 rad/s takes 1.0 s
        assert!(commands[..20].iter().all(|c| c.linear == 2.0 && c.angular == 0.0));
        assert!(commands[21..29].iter().all(|c| c.linear == 0.0 && c.angular > 0.0));
        assert!(commands[31..49].iter().all(|c| c.linear == 2.0));
    }

    #[test]
    fn spiral_speeds_up() {
        let mut g = generator(Pattern::Spiral);
        let first = g.next_command();
        let later = (0..50).map(|_| g.next_command()).last().unwrap();
        assert!(later.linear > first.linear);
        assert_eq!(later.angular, first.angular);
    }

    #[test]
    fn random_walk_holds_between_picks() {
        let mut g = generator(Pattern::Random);
        let commands: Vec<_> = (0..30).map(|_| g.next_command()).collect();
        for block in commands.chunks(10) {
            assert!(block.iter().all(|c| *c == block[0]));
            assert!(block[0].linear >= 0.5 && block[0].linear < 2.0);
            assert!(block[0].angular >= -1.5 && block[0].angular < 1.5);
        }
        assert_ne!(commands[0], commands[10]);
    }

    #[test]
    fn random_walk_survives_unbounded_ranges() {
        let config = PatternConfig {
            random_linear: (f64::NEG_INFINITY, f64::INFINITY),
            random_angular: (-f64::MAX, f64::MAX),
            ..PatternConfig::default()
        };
        let mut g = PatternGenerator::new(Pattern::Random, config, StdRng::seed_from_u64(7));
        let command = g.next_command();
        assert_eq!(command, VelocityCommand::new(0.0, -f64::MAX));

        let config = PatternConfig {
            random_linear: (1.0, 1.0),
            random_angular: (0.5, -0.5),
            ..PatternConfig::default()
        };
        let mut g = PatternGenerator::new(Pattern::Random, config, StdRng::seed_from_u64(7));
        assert_eq!(g.next_command(), VelocityCommand::new(1.0, 0.5));
    }
}
