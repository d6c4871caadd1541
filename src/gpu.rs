//! The slice of the graphics API the renderer talks to.
//!
//! The browser build implements [`GraphicsContext`] for
//! `web_sys::WebGl2RenderingContext`; tests plug in a recording context so
//! the whole startup and frame sequence can be driven without a GPU.

use std::fmt;

/// Programmable pipeline stage a shader unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// Graphics calls issued by the renderer, named after their GL counterparts.
///
/// Handles are opaque and owned by the context. Lookups that the underlying
/// API answers with a "not found" sentinel return `None` here instead.
pub trait GraphicsContext {
    type Shader;
    type Program;
    type Buffer;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn detach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn delete_program(&self, program: &Self::Program);
    fn use_program(&self, program: &Self::Program);

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn bind_array_buffer(&self, buffer: &Self::Buffer);
    fn delete_buffer(&self, buffer: &Self::Buffer);
    /// Uploads to the bound array buffer with static usage.
    fn buffer_static_f32(&self, data: &[f32]);

    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    /// Tightly packed, unnormalized float attribute reading `size` components.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform1f(&self, location: &Self::UniformLocation, x: f32);
    fn uniform2f(&self, location: &Self::UniformLocation, x: f32, y: f32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear_color_buffer(&self);
    fn draw_triangle_strip(&self, first: i32, count: i32);

    fn is_context_lost(&self) -> bool;
}
