use crate::error::RenderError;
use crate::gpu::GraphicsContext;
use crate::shaders::POSITION_ATTRIBUTE;

/// Clip-space corners of the fullscreen quad, in triangle-strip order.
pub const QUAD_VERTICES: [f32; 8] = [
    -1.0, -1.0, //
    1.0, -1.0, //
    -1.0, 1.0, //
    1.0, 1.0,
];

pub const QUAD_VERTEX_COUNT: i32 = 4;

const COMPONENTS_PER_VERTEX: i32 = 2;

/// Static vertex buffer feeding the position attribute of the active program.
pub struct FullscreenQuad<G: GraphicsContext> {
    buffer: G::Buffer,
    position: u32,
}

impl<G: GraphicsContext> FullscreenQuad<G> {
    /// Uploads the quad and wires it to `program`, which must already be in use.
    pub fn bind(gl: &G, program: &G::Program) -> Result<Self, RenderError> {
        let position = gl
            .attrib_location(program, POSITION_ATTRIBUTE)
            .ok_or(RenderError::MissingAttribute(POSITION_ATTRIBUTE))?;

        let buffer = gl
            .create_buffer()
            .ok_or(RenderError::Allocation("buffer"))?;
        gl.bind_array_buffer(&buffer);
        gl.buffer_static_f32(&QUAD_VERTICES);

        gl.vertex_attrib_pointer_f32(position, COMPONENTS_PER_VERTEX);
        gl.enable_vertex_attrib_array(position);

        Ok(Self { buffer, position })
    }

    pub fn buffer(&self) -> &G::Buffer {
        &self.buffer
    }

    pub fn position_slot(&self) -> u32 {
        self.position
    }

    pub fn draw(&self, gl: &G) {
        gl.draw_triangle_strip(0, QUAD_VERTEX_COUNT);
    }
}
