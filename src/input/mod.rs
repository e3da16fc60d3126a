pub mod handler;

pub use handler::{ButtonMap, InputHandler, KeyAction};
