//! One-shot startup of the rendering pipeline and the per-frame draw.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::gpu::{GraphicsContext, ShaderStage};
use crate::pipeline::{compile_shader, link_program};
use crate::quad::FullscreenQuad;
use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};
use crate::uniforms::UniformFeed;

/// Drawing target the session renders into.
pub trait Surface {
    type Context: GraphicsContext;

    /// Hardware-accelerated context for this surface, if the host provides one.
    fn acquire_context(&self) -> Option<Self::Context>;
    /// Current size of the display area in pixels.
    fn display_size(&self) -> (u32, u32);
    /// Resizes the backing store.
    fn resize(&self, width: u32, height: u32);
}

/// Source pair compiled at startup.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

impl Default for ShaderSources<'static> {
    fn default() -> Self {
        Self {
            vertex: VERTEX_SHADER,
            fragment: FRAGMENT_SHADER,
        }
    }
}

/// Everything that lives for the whole run: the context, the active program,
/// the quad and the uniform handles.
pub struct RenderSession<G: GraphicsContext> {
    gl: G,
    program: G::Program,
    quad: FullscreenQuad<G>,
    uniforms: UniformFeed<G>,
    clear_color: [f32; 4],
}

impl<G: GraphicsContext> RenderSession<G> {
    /// Acquires the context, sizes the surface and builds the pipeline from
    /// the built-in shaders.
    pub fn init<S>(surface: &S, config: &RenderConfig) -> Result<Self, RenderError>
    where
        S: Surface<Context = G>,
    {
        Self::init_with_sources(surface, config, ShaderSources::default())
    }

    pub fn init_with_sources<S>(
        surface: &S,
        config: &RenderConfig,
        sources: ShaderSources<'_>,
    ) -> Result<Self, RenderError>
    where
        S: Surface<Context = G>,
    {
        let result = Self::build(surface, config, sources);
        if let Err(err) = &result {
            log::error!("{err}");
        }
        result
    }

    fn build<S>(
        surface: &S,
        config: &RenderConfig,
        sources: ShaderSources<'_>,
    ) -> Result<Self, RenderError>
    where
        S: Surface<Context = G>,
    {
        let gl = surface
            .acquire_context()
            .ok_or(RenderError::ContextUnavailable)?;

        let (width, height) = surface.display_size();
        surface.resize(width, height);

        let vertex = compile_shader(&gl, ShaderStage::Vertex, sources.vertex)?;
        let fragment = match compile_shader(&gl, ShaderStage::Fragment, sources.fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                vertex.release(&gl);
                return Err(err);
            }
        };
        let program = link_program(&gl, vertex, fragment)?;
        gl.use_program(&program);

        let quad = match FullscreenQuad::bind(&gl, &program) {
            Ok(quad) => quad,
            Err(err) => {
                gl.delete_program(&program);
                return Err(err);
            }
        };
        let uniforms = match UniformFeed::resolve(&gl, &program) {
            Ok(uniforms) => uniforms,
            Err(err) => {
                gl.delete_buffer(quad.buffer());
                gl.delete_program(&program);
                return Err(err);
            }
        };

        log::info!("render session ready at {width}x{height}");
        Ok(Self {
            gl,
            program,
            quad,
            uniforms,
            clear_color: config.clear_color,
        })
    }

    pub fn context(&self) -> &G {
        &self.gl
    }

    pub fn program(&self) -> &G::Program {
        &self.program
    }

    pub fn quad(&self) -> &FullscreenQuad<G> {
        &self.quad
    }

    /// Sets the viewport, feeds the uniforms, clears and draws the quad once.
    /// Returns the time value the shader received.
    pub fn render_frame(&mut self, width: u32, height: u32, elapsed: f32) -> f32 {
        let gl = &self.gl;
        gl.viewport(0, 0, clamp_dim(width), clamp_dim(height));
        let time = self.uniforms.push(gl, width, height, elapsed);

        let [r, g, b, a] = self.clear_color;
        gl.clear_color(r, g, b, a);
        gl.clear_color_buffer();

        self.quad.draw(gl);
        time
    }
}

fn clamp_dim(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
