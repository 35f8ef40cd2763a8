// pipeline.rs - build once, draw every frame, release at exit

use log::info;

use super::animation::FrameUniforms;
use super::api::{GraphicsApi, Primitive};
use super::mesh::{VertexBuffer, VertexLayout, ORIGIN_VERTEX, TRIANGLE_VERTEX_COUNT};
use super::shaders::{ShaderError, ShaderProgram};
use crate::config::RenderConfig;
use crate::window::{ResizeObserver, Viewport};

/// Owns the linked program and the vertex data for the triangle.
///
/// Both are created in [`RenderPipeline::build`] and stay valid until
/// [`RenderPipeline::teardown`] (or drop) releases them.
pub struct RenderPipeline<G: GraphicsApi> {
    api: G,
    program: Option<ShaderProgram>,
    vertex_buffer: Option<VertexBuffer>,
    clear_color: [f32; 4],
    viewport: Viewport,
}

impl<G: GraphicsApi> RenderPipeline<G> {
    pub fn build(mut api: G, config: &RenderConfig, vertices: &[f32]) -> Result<Self, ShaderError> {
        let program = ShaderProgram::from_sources(&mut api, &config.vertex_shader, &config.fragment_shader)?;
        let vertex_buffer = VertexBuffer::upload(&mut api, vertices, VertexLayout::POSITION);

        info!(
            "Render pipeline ready: program {}, {} vertices",
            program.id(),
            vertex_buffer.vertex_count()
        );

        Ok(Self {
            api,
            program: Some(program),
            vertex_buffer: Some(vertex_buffer),
            clear_color: config.clear_color,
            viewport: Viewport::new(config.width, config.height),
        })
    }

    /// Draws one frame for `elapsed_seconds` since startup and returns the
    /// uniforms it pushed.
    pub fn render_frame(&mut self, elapsed_seconds: f32) -> FrameUniforms {
        let uniforms = FrameUniforms::at(elapsed_seconds);

        self.api.clear_color(self.clear_color);
        self.api.clear();

        let (Some(program), Some(vertex_buffer)) = (self.program.as_mut(), self.vertex_buffer.as_ref()) else {
            return uniforms;
        };

        program.set_used(&mut self.api);
        program.set_uniform_1f(&mut self.api, "rotation", uniforms.rotation);
        program.set_uniform_1f(&mut self.api, "time", uniforms.time);

        vertex_buffer.bind(&mut self.api);
        // Lone point at the origin, drawn under the same transform and color.
        self.api.draw_arrays(Primitive::Points, ORIGIN_VERTEX, 1);
        self.api.draw_arrays(Primitive::Triangles, 0, TRIANGLE_VERTEX_COUNT);
        vertex_buffer.unbind(&mut self.api);

        uniforms
    }

    /// Framebuffer size in physical pixels as last reported through
    /// `on_resize`. Holds the configured window size until the first report.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn vertex_buffer(&self) -> Option<&VertexBuffer> {
        self.vertex_buffer.as_ref()
    }

    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    /// Releases the vertex array, the buffer and the program.
    pub fn teardown(mut self) {
        self.release();
        info!("Render pipeline torn down");
    }

    fn release(&mut self) {
        if let Some(vertex_buffer) = self.vertex_buffer.take() {
            vertex_buffer.delete(&mut self.api);
        }
        if let Some(program) = self.program.take() {
            program.delete(&mut self.api);
        }
    }
}

impl<G: GraphicsApi> ResizeObserver for RenderPipeline<G> {
    fn on_resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.viewport = viewport;
        self.api
            .viewport(0, 0, viewport.width as i32, viewport.height as i32);
    }
}

impl<G: GraphicsApi> Drop for RenderPipeline<G> {
    fn drop(&mut self) {
        self.release();
    }
}
