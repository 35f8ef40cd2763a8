use gl::types::*;
use glam::Vec3;
use std::mem;

use super::api::GraphicsApi;

/// Three triangle corners followed by one extra point at the origin.
pub const TRIANGLE_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.0, 0.5, 0.0,
    0.0, 0.0, 0.0,
];

/// Index of the origin point within `TRIANGLE_VERTICES`.
pub const ORIGIN_VERTEX: GLint = 3;
pub const TRIANGLE_VERTEX_COUNT: GLsizei = 3;

/// A single float attribute bound at a fixed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub location: GLuint,
    pub components: GLint,
    pub stride: GLsizei,
    pub offset: usize,
}

impl VertexLayout {
    /// `vec3` positions, tightly packed, at location 0.
    pub const POSITION: VertexLayout = VertexLayout {
        location: 0,
        components: 3,
        stride: (3 * mem::size_of::<f32>()) as GLsizei,
        offset: 0,
    };

    pub fn floats_per_vertex(&self) -> usize {
        self.stride as usize / mem::size_of::<f32>()
    }
}

/// VAO + VBO holding immutable vertex data.
#[derive(Debug)]
pub struct VertexBuffer {
    vao: GLuint,
    vbo: GLuint,
    layout: VertexLayout,
    vertices: Vec<f32>,
}

impl VertexBuffer {
    /// Uploads `vertices` once with `STATIC_DRAW` and records `layout` in a new VAO.
    ///
    /// Leaves no VAO or array buffer bound.
    pub fn upload<G: GraphicsApi>(api: &mut G, vertices: &[f32], layout: VertexLayout) -> Self {
        debug_assert_eq!(vertices.len() % layout.floats_per_vertex(), 0);

        let vao = api.gen_vertex_array();
        let vbo = api.gen_buffer();

        api.bind_vertex_array(vao);
        api.bind_array_buffer(vbo);
        api.buffer_static_data(bytemuck::cast_slice(vertices));

        api.vertex_attrib_pointer(layout.location, layout.components, layout.stride, layout.offset);
        api.enable_vertex_attrib_array(layout.location);

        api.bind_array_buffer(0);
        api.bind_vertex_array(0);

        Self {
            vao,
            vbo,
            layout,
            vertices: vertices.to_vec(),
        }
    }

    pub fn bind<G: GraphicsApi>(&self, api: &mut G) {
        api.bind_vertex_array(self.vao);
    }

    pub fn unbind<G: GraphicsApi>(&self, api: &mut G) {
        api.bind_vertex_array(0);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// CPU copy of what was uploaded.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices
            .chunks_exact(self.layout.floats_per_vertex())
            .map(Vec3::from_slice)
            .collect()
    }

    pub fn delete<G: GraphicsApi>(self, api: &mut G) {
        api.delete_vertex_array(self.vao);
        api.delete_buffer(self.vbo);
    }
}
