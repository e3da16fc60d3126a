//! Neon Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic (game module)
//! - Pixel-surface rendering presented through ratatui (render module)
//! - Keyboard and mouse input mapping (input module)
//! - The interactive game loop and its timers (modes module)
//! - Session metrics and the persisted high score (metrics, storage modules)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod storage;
