pub mod renderer;
pub mod scene;
pub mod surface;

pub use renderer::Renderer;
pub use surface::{PixelBuffer, Surface};
