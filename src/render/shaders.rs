// shaders.rs - shader compilation and the embedded triangle program

use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fmt;
use thiserror::Error;

use super::api::GraphicsApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to compile {stage} shader:\n{log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Failed to link shader program:\n{0}")]
    Linking(String),
    #[error("Shader source contains a null byte: {0}")]
    Nul(#[from] NulError),
}

/// Embedded sources for the rotating triangle.
pub mod triangle_shaders {
    /// Rotates each position about Z by `rotation` radians.
    ///
    /// GLSL `mat3` takes columns, so this is the row-major matrix
    /// `[[c, -s, 0], [s, c, 0], [0, 0, 1]]`.
    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
uniform float rotation;

mat3 getRotationMatrix(float angle) {
    float s = sin(angle);
    float c = cos(angle);
    return mat3(
        c, s, 0.0,
        -s, c, 0.0,
        0.0, 0.0, 1.0
    );
}

void main()
{
    mat3 rotationMatrix = getRotationMatrix(rotation);
    gl_Position = vec4(rotationMatrix * aPos, 1.0);
}
"#;

    /// Cycles the color with `time`. Red and green are not clamped.
    pub const FRAGMENT_SRC: &str = r#"#version 330 core
out vec4 FragColor;
uniform float time;

void main()
{
    float red = sin(time);
    float green = cos(time);
    float blue = 0.5 + 0.5 * sin(2.0 * time);

    FragColor = vec4(red, green, blue, 1.0);
}
"#;
}

/// A linked program plus a cache of the uniform locations it has been asked for.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    /// Compiles both stages, links them and releases the stage objects.
    ///
    /// Nothing is left allocated on the error path.
    pub fn from_sources<G: GraphicsApi>(
        api: &mut G,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_shader(api, ShaderStage::Vertex, vertex_source)?;
        let fragment_shader = match Self::compile_shader(api, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                api.delete_shader(vertex_shader);
                return Err(err);
            }
        };

        let program = api.create_program();
        api.attach_shader(program, vertex_shader);
        api.attach_shader(program, fragment_shader);
        api.link_program(program);

        let linked = api.program_link_status(program);
        let log = if linked { String::new() } else { api.program_info_log(program) };

        api.delete_shader(vertex_shader);
        api.delete_shader(fragment_shader);

        if !linked {
            api.delete_program(program);
            return Err(ShaderError::Linking(log));
        }

        log::debug!("Linked shader program {}", program);
        Ok(ShaderProgram {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    fn compile_shader<G: GraphicsApi>(
        api: &mut G,
        stage: ShaderStage,
        source: &str,
    ) -> Result<GLuint, ShaderError> {
        let source = CString::new(source.as_bytes())?;

        let shader = api.create_shader(stage);
        api.shader_source(shader, &source);
        api.compile_shader(shader);

        if !api.shader_compile_status(shader) {
            let log = api.shader_info_log(shader);
            api.delete_shader(shader);
            return Err(ShaderError::Compilation { stage, log });
        }

        log::debug!("Compiled {} shader {}", stage, shader);
        Ok(shader)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used<G: GraphicsApi>(&self, api: &mut G) {
        api.use_program(self.id);
    }

    pub fn get_uniform_location<G: GraphicsApi>(&mut self, api: &G, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => api.uniform_location(self.id, &cname),
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    /// Expects the program to be in use.
    pub fn set_uniform_1f<G: GraphicsApi>(&mut self, api: &mut G, name: &str, value: f32) {
        let location = self.get_uniform_location(&*api, name);
        api.uniform_1f(location, value);
    }

    pub fn delete<G: GraphicsApi>(self, api: &mut G) {
        api.delete_program(self.id);
    }
}
