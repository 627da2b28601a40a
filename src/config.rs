use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Everything that parameterises a single game. Passed by value at
/// construction so several games with different settings can coexist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: u16,
    pub grid_height: u16,
    pub initial_length: u16,
    /// Points awarded per food item.
    pub food_score: u32,
    /// Ticks per second at the start of a game.
    pub initial_speed: u32,
    pub max_speed: u32,
    pub speed_increment: u32,
    /// Speed goes up each time the score crosses a multiple of this.
    pub speed_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 40,
            grid_height: 30,
            initial_length: 3,
            food_score: 10,
            initial_speed: 10,
            max_speed: 20,
            speed_increment: 1,
            speed_threshold: 50,
        }
    }
}

impl GameConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Reads a YAML config. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(GameConfig::default()),
            Err(e) => return Err(format!("Failed to read config {}: {}", path.display(), e)),
        };

        let config: GameConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| format!("Failed to deserialize config: {}", e))?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        self.validate()
            .map_err(|e| format!("Config validation error: {}", e))?;
        let content = serde_yaml_ng::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path.as_ref(), content)
            .map_err(|e| format!("Failed to write config {}: {}", path.as_ref().display(), e))
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err("Grid width and height must be positive".to_string());
        }
        if self.grid_width > i16::MAX as u16 || self.grid_height > i16::MAX as u16 {
            return Err(format!("Grid dimensions must not exceed {}", i16::MAX));
        }
        if self.initial_length == 0 {
            return Err("Initial snake length must be at least 1".to_string());
        }
        // The body extends left from the centre cell
        if self.initial_length > self.grid_width / 2 + 1 {
            return Err(format!(
                "Initial snake length {} does not fit a grid {} cells wide",
                self.initial_length, self.grid_width
            ));
        }
        if self.grid().cell_count() <= self.initial_length as usize {
            return Err("Grid must leave at least one free cell for food".to_string());
        }
        if self.initial_speed == 0 {
            return Err("Initial speed must be positive".to_string());
        }
        if self.max_speed < self.initial_speed {
            return Err("Max speed must not be below initial speed".to_string());
        }
        if self.speed_threshold == 0 {
            return Err("Speed threshold must be positive".to_string());
        }
        Ok(())
    }
}
