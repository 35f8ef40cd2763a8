pub mod animation;
pub mod api;
pub mod mesh;
pub mod pipeline;
#[cfg(test)]
pub(crate) mod recording;
pub mod shaders;

pub use api::{GlApi, GraphicsApi, Primitive};
pub use pipeline::RenderPipeline;
pub use shaders::ShaderProgram;
