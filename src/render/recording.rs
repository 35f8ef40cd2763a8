//! In-memory `GraphicsApi` used by the unit tests.

use gl::types::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::ffi::CStr;
use std::rc::Rc;

use super::api::{GraphicsApi, Primitive};
use super::shaders::ShaderStage;

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderStage, GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    Uniform1f(GLint, f32),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    GenBuffer(GLuint),
    BindArrayBuffer(GLuint),
    BufferStaticData(Vec<u8>),
    DeleteBuffer(GLuint),
    VertexAttribPointer { index: GLuint, components: GLint, stride: GLsizei, offset: usize },
    EnableVertexAttribArray(GLuint),
    ClearColor([f32; 4]),
    Clear,
    Viewport(GLint, GLint, GLsizei, GLsizei),
    DrawArrays(Primitive, GLint, GLsizei),
}

#[derive(Default)]
struct State {
    next_name: GLuint,
    calls: Vec<GlCall>,
    sources: HashMap<GLuint, String>,
    compiled: HashMap<GLuint, bool>,
    attached: HashMap<GLuint, Vec<GLuint>>,
    linked: HashMap<GLuint, bool>,
    live: HashSet<GLuint>,
    compile_error_marker: Option<String>,
    link_error: Option<String>,
}

/// Records every call and keeps just enough object state to answer queries.
///
/// Clones share the same log, so a test can hand one clone to the pipeline
/// and inspect the other afterwards.
#[derive(Clone, Default)]
pub struct RecordingApi {
    state: Rc<RefCell<State>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any shader whose source contains `marker` fails to compile.
    pub fn fail_compile_on(self, marker: &str) -> Self {
        self.state.borrow_mut().compile_error_marker = Some(marker.to_string());
        self
    }

    /// Every link attempt fails with `log`.
    pub fn fail_link_with(self, log: &str) -> Self {
        self.state.borrow_mut().link_error = Some(log.to_string());
        self
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn draw_calls(&self) -> Vec<(Primitive, GLint, GLsizei)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GlCall::DrawArrays(mode, first, count) => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    fn name(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        state.next_name += 1;
        let name = state.next_name;
        state.live.insert(name);
        name
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GraphicsApi for RecordingApi {
    fn create_shader(&mut self, stage: ShaderStage) -> GLuint {
        let name = self.name();
        self.record(GlCall::CreateShader(stage, name));
        name
    }

    fn shader_source(&mut self, shader: GLuint, source: &CStr) {
        let source = source.to_string_lossy().into_owned();
        self.state.borrow_mut().sources.insert(shader, source);
    }

    fn compile_shader(&mut self, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        let source = state.sources.get(&shader).cloned().unwrap_or_default();
        let ok = match &state.compile_error_marker {
            Some(marker) => !source.contains(marker.as_str()),
            None => true,
        };
        state.compiled.insert(shader, ok);
        state.calls.push(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.state.borrow().compiled.get(&shader).copied().unwrap_or(false)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            format!("0:1(1): error: syntax error in shader {}", shader)
        }
    }

    fn delete_shader(&mut self, shader: GLuint) {
        self.state.borrow_mut().live.remove(&shader);
        self.record(GlCall::DeleteShader(shader));
    }

    fn create_program(&mut self) -> GLuint {
        let name = self.name();
        self.record(GlCall::CreateProgram(name));
        name
    }

    fn attach_shader(&mut self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state.attached.entry(program).or_default().push(shader);
        state.calls.push(GlCall::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let ok = state.link_error.is_none();
        state.linked.insert(program, ok);
        state.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        self.state.borrow().linked.get(&program).copied().unwrap_or(false)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            self.state.borrow().link_error.clone().unwrap_or_default()
        }
    }

    fn use_program(&mut self, program: GLuint) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&mut self, program: GLuint) {
        self.state.borrow_mut().live.remove(&program);
        self.record(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let state = self.state.borrow();
        let declaration = format!("uniform float {};", name.to_string_lossy());
        let shaders = state.attached.get(&program).cloned().unwrap_or_default();
        shaders
            .iter()
            .position(|shader| {
                state
                    .sources
                    .get(shader)
                    .map_or(false, |source| source.contains(&declaration))
            })
            .map_or(-1, |index| index as GLint)
    }

    fn uniform_1f(&mut self, location: GLint, value: f32) {
        self.record(GlCall::Uniform1f(location, value));
    }

    fn gen_vertex_array(&mut self) -> GLuint {
        let name = self.name();
        self.record(GlCall::GenVertexArray(name));
        name
    }

    fn bind_vertex_array(&mut self, vao: GLuint) {
        self.record(GlCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: GLuint) {
        self.state.borrow_mut().live.remove(&vao);
        self.record(GlCall::DeleteVertexArray(vao));
    }

    fn gen_buffer(&mut self) -> GLuint {
        let name = self.name();
        self.record(GlCall::GenBuffer(name));
        name
    }

    fn bind_array_buffer(&mut self, vbo: GLuint) {
        self.record(GlCall::BindArrayBuffer(vbo));
    }

    fn buffer_static_data(&mut self, data: &[u8]) {
        self.record(GlCall::BufferStaticData(data.to_vec()));
    }

    fn delete_buffer(&mut self, vbo: GLuint) {
        self.state.borrow_mut().live.remove(&vbo);
        self.record(GlCall::DeleteBuffer(vbo));
    }

    fn vertex_attrib_pointer(&mut self, index: GLuint, components: GLint, stride: GLsizei, offset: usize) {
        self.record(GlCall::VertexAttribPointer { index, components, stride, offset });
    }

    fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn clear_color(&mut self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear(&mut self) {
        self.record(GlCall::Clear);
    }

    fn viewport(&mut self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn draw_arrays(&mut self, mode: Primitive, first: GLint, count: GLsizei) {
        self.record(GlCall::DrawArrays(mode, first, count));
    }
}
