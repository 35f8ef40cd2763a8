pub mod config;
pub mod render;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use config::RenderConfig;
pub use render::animation::FrameUniforms;
pub use render::mesh::TRIANGLE_VERTICES;
pub use render::pipeline::RenderPipeline;
pub use render::shaders::{ShaderError, ShaderProgram, ShaderStage};
pub use utils::error::AppError;
pub use utils::clock::FrameClock;
pub use window::{ResizeObserver, Viewport};
