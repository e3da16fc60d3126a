//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Timers live with the game loop; the engine only reports when they must be
//! armed, cancelled or rescheduled.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{Consumption, GameEngine, StepInfo, StepResult};
pub use state::{
    CollisionType, GameOutcome, GameState, Position, Rgb, Snake, SpecialFood, SpecialFoodKind,
};
