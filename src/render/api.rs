use gl::types::*;
use std::ffi::CStr;
use std::ptr;

use super::shaders::ShaderStage;

/// Primitive topology for `draw_arrays`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Points,
    Triangles,
}

impl Primitive {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Primitive::Points => gl::POINTS,
            Primitive::Triangles => gl::TRIANGLES,
        }
    }
}

/// The slice of OpenGL the triangle pipeline talks to.
///
/// Object names are plain `GLuint`s as handed out by the driver. Nothing here
/// checks `glGetError`; callers query compile/link status explicitly.
pub trait GraphicsApi {
    fn create_shader(&mut self, stage: ShaderStage) -> GLuint;
    fn shader_source(&mut self, shader: GLuint, source: &CStr);
    fn compile_shader(&mut self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&mut self, shader: GLuint);

    fn create_program(&mut self) -> GLuint;
    fn attach_shader(&mut self, program: GLuint, shader: GLuint);
    fn link_program(&mut self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&mut self, program: GLuint);
    fn delete_program(&mut self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1f(&mut self, location: GLint, value: f32);

    fn gen_vertex_array(&mut self) -> GLuint;
    fn bind_vertex_array(&mut self, vao: GLuint);
    fn delete_vertex_array(&mut self, vao: GLuint);

    fn gen_buffer(&mut self) -> GLuint;
    fn bind_array_buffer(&mut self, vbo: GLuint);
    fn buffer_static_data(&mut self, data: &[u8]);
    fn delete_buffer(&mut self, vbo: GLuint);

    fn vertex_attrib_pointer(&mut self, index: GLuint, components: GLint, stride: GLsizei, offset: usize);
    fn enable_vertex_attrib_array(&mut self, index: GLuint);

    fn clear_color(&mut self, rgba: [f32; 4]);
    fn clear(&mut self);
    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn draw_arrays(&mut self, mode: Primitive, first: GLint, count: GLsizei);
}

/// `GraphicsApi` backed by the global function pointers of the `gl` crate.
#[derive(Debug)]
pub struct GlApi {
    _private: (),
}

impl GlApi {
    /// # Safety
    ///
    /// A GL 3.3 context must be current on this thread and `gl::load_with`
    /// must already have resolved the entry points. Both must stay true for
    /// as long as the returned value is used.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }

    /// True when every entry point the pipeline needs has been resolved.
    pub fn entry_points_loaded() -> bool {
        gl::CreateShader::is_loaded()
            && gl::CreateProgram::is_loaded()
            && gl::GenVertexArrays::is_loaded()
            && gl::GenBuffers::is_loaded()
            && gl::Uniform1f::is_loaded()
            && gl::DrawArrays::is_loaded()
    }
}

fn info_log_from_buffer(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

impl GraphicsApi for GlApi {
    fn create_shader(&mut self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&mut self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        }
    }

    fn compile_shader(&mut self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        let mut buffer = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                buffer.len() as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        info_log_from_buffer(buffer, written)
    }

    fn delete_shader(&mut self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&mut self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&mut self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&mut self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        let mut buffer = vec![0u8; len.max(1) as usize];
        let mut written = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                buffer.len() as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            );
        }
        info_log_from_buffer(buffer, written)
    }

    fn use_program(&mut self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&mut self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1f(&mut self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn gen_vertex_array(&mut self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&mut self, vao: GLuint) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&mut self, vao: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn gen_buffer(&mut self) -> GLuint {
        let mut vbo = 0;
        unsafe { gl::GenBuffers(1, &mut vbo) };
        vbo
    }

    fn bind_array_buffer(&mut self, vbo: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, vbo) }
    }

    fn buffer_static_data(&mut self, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&mut self, vbo: GLuint) {
        unsafe { gl::DeleteBuffers(1, &vbo) }
    }

    fn vertex_attrib_pointer(&mut self, index: GLuint, components: GLint, stride: GLsizei, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const _,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        unsafe { gl::ClearColor(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&mut self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn draw_arrays(&mut self, mode: Primitive, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode.gl_enum(), first, count) }
    }
}
