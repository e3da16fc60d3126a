use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::state::Position;

/// Configuration for the game
///
/// The board is a fixed canvas measured in pixels and divided into square
/// cells. Everything else tunes pacing and the special food.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Side of one grid cell in pixels
    pub cell_size: u32,
    /// Cell the snake starts on after every (re)start
    pub start_position: Position,

    // Pacing
    /// Tick interval at score 0, in milliseconds
    pub base_tick_ms: u64,
    /// Fastest allowed tick interval, in milliseconds
    pub min_tick_ms: u64,
    /// How much the interval shrinks per speed step, in milliseconds
    pub speed_step_ms: u64,
    /// Points needed for each speed step
    pub points_per_speed_step: u32,

    // Special food
    /// Chance of spawning special food after eating ordinary food
    pub special_food_chance: f64,
    /// Lifetime of a special food before it disappears, in milliseconds
    pub special_food_lifetime_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 400,
            canvas_height: 400,
            cell_size: 20,
            start_position: Position::new(10, 10),
            base_tick_ms: 200,
            min_tick_ms: 60,
            speed_step_ms: 10,
            points_per_speed_step: 4,
            special_food_chance: 0.25,
            special_food_lifetime_ms: 5000,
        }
    }
}

impl GameConfig {
    /// Number of columns on the board
    pub fn grid_width(&self) -> usize {
        (self.canvas_width / self.cell_size) as usize
    }

    /// Number of rows on the board
    pub fn grid_height(&self) -> usize {
        (self.canvas_height / self.cell_size) as usize
    }

    /// Tick interval for a given score
    ///
    /// Non-increasing step function: the interval drops by `speed_step_ms`
    /// every `points_per_speed_step` points and bottoms out at `min_tick_ms`.
    pub fn tick_interval(&self, score: u32) -> Duration {
        let steps = u64::from(score / self.points_per_speed_step);
        let ms = self
            .base_tick_ms
            .saturating_sub(steps.saturating_mul(self.speed_step_ms))
            .max(self.min_tick_ms);
        Duration::from_millis(ms)
    }

    pub fn special_food_lifetime(&self) -> Duration {
        Duration::from_millis(self.special_food_lifetime_ms)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size == 0 {
            return Err("cell_size must be at least 1".to_string());
        }

        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            ));
        }

        if self.canvas_width % self.cell_size != 0 || self.canvas_height % self.cell_size != 0 {
            return Err(format!(
                "canvas {}x{} is not a multiple of cell_size {}",
                self.canvas_width, self.canvas_height, self.cell_size
            ));
        }

        let start = self.start_position;
        if start.x < 0
            || start.y < 0
            || start.x as usize >= self.grid_width()
            || start.y as usize >= self.grid_height()
        {
            return Err(format!(
                "start_position ({}, {}) is outside the {}x{} grid",
                start.x,
                start.y,
                self.grid_width(),
                self.grid_height()
            ));
        }

        if self.grid_width() * self.grid_height() < 2 {
            return Err("grid must have room for the snake and one food".to_string());
        }

        if self.points_per_speed_step == 0 {
            return Err("points_per_speed_step must be at least 1".to_string());
        }

        if self.min_tick_ms == 0 || self.min_tick_ms > self.base_tick_ms {
            return Err(format!(
                "min_tick_ms must be in [1, {}], got {}",
                self.base_tick_ms, self.min_tick_ms
            ));
        }

        if !(0.0..=1.0).contains(&self.special_food_chance) {
            return Err(format!(
                "special_food_chance must be in [0, 1], got {}",
                self.special_food_chance
            ));
        }

        Ok(())
    }
}
