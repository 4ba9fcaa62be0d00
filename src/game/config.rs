use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square game grid, in cells
    pub grid_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food eaten.
    ///
    /// Standardized to 1 point per food; bump this for a more generous
    /// arcade scoreboard.
    pub food_points: u32,
    /// Delay between ticks at the start of a game, in milliseconds
    pub initial_tick_ms: u64,
    /// How much the tick delay shrinks per food eaten, in milliseconds
    pub speed_decrement_ms: u64,
    /// Smallest allowed tick delay, in milliseconds
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            food_points: 1,
            initial_tick_ms: 150,
            speed_decrement_ms: 2,
            min_tick_ms: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Reject configurations the engine cannot start a game on
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.grid_size >= 4, "grid size must be at least 4");
        ensure!(
            self.initial_snake_length >= 1 && self.initial_snake_length <= self.grid_size / 2,
            "initial snake length must fit in half the grid"
        );
        ensure!(self.min_tick_ms > 0, "minimum tick delay must be non-zero");
        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn speed_decrement(&self) -> Duration {
        Duration::from_millis(self.speed_decrement_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }
}
