use std::time::Duration;

use crate::config::GameConfig;

/// Turns food events into score and tick-rate changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedPolicy {
    food_score: u32,
    initial_speed: u32,
    max_speed: u32,
    speed_increment: u32,
    speed_threshold: u32,
}

impl SpeedPolicy {
    pub fn from_config(config: &GameConfig) -> Self {
        SpeedPolicy {
            food_score: config.food_score,
            initial_speed: config.initial_speed,
            max_speed: config.max_speed,
            speed_increment: config.speed_increment,
            speed_threshold: config.speed_threshold.max(1),
        }
    }

    pub fn initial_speed(&self) -> u32 {
        self.initial_speed
    }

    pub fn award(&self, score: u32) -> u32 {
        score.saturating_add(self.food_score)
    }

    /// Bumps `speed` once when the score crosses a multiple of the
    /// threshold, never past the maximum.
    pub fn next_speed(&self, old_score: u32, new_score: u32, speed: u32) -> u32 {
        let crossed = old_score / self.speed_threshold < new_score / self.speed_threshold;
        if crossed && speed < self.max_speed {
            speed.saturating_add(self.speed_increment).min(self.max_speed)
        } else {
            speed
        }
    }

    pub fn tick_interval(speed: u32) -> Duration {
        Duration::from_secs(1) / speed.max(1)
    }
}
