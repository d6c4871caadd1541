use crate::error::RenderError;
use crate::gpu::GraphicsContext;
use crate::shaders::{RESOLUTION_UNIFORM, TIME_UNIFORM};

/// Resolution and time uniforms of the linked program.
pub struct UniformFeed<G: GraphicsContext> {
    resolution: G::UniformLocation,
    time: G::UniformLocation,
    last_time: f32,
}

impl<G: GraphicsContext> UniformFeed<G> {
    /// Looks both handles up once; the program is never swapped afterwards.
    pub fn resolve(gl: &G, program: &G::Program) -> Result<Self, RenderError> {
        let resolution = gl
            .uniform_location(program, RESOLUTION_UNIFORM)
            .ok_or(RenderError::MissingUniform(RESOLUTION_UNIFORM))?;
        let time = gl
            .uniform_location(program, TIME_UNIFORM)
            .ok_or(RenderError::MissingUniform(TIME_UNIFORM))?;
        Ok(Self {
            resolution,
            time,
            last_time: 0.0,
        })
    }

    /// Pushes both values unconditionally and returns the time actually sent,
    /// which never drops below the previous push.
    pub fn push(&mut self, gl: &G, width: u32, height: u32, elapsed: f32) -> f32 {
        let time = elapsed.max(self.last_time);
        self.last_time = time;

        gl.uniform2f(&self.resolution, width as f32, height as f32);
        gl.uniform1f(&self.time, time);
        time
    }
}
