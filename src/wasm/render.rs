use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, Performance, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::frame::{Clock, FrameDriver, FrameStatus, StopToken};
use crate::gpu::{GraphicsContext, ShaderStage};
use crate::session::Surface;

impl GraphicsContext for GL {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        GL::create_shader(self, kind)
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        GL::shader_source(self, shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        GL::compile_shader(self, shader);
    }

    fn compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.get_shader_info_log(shader)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        GL::delete_shader(self, Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        GL::create_program(self)
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        GL::attach_shader(self, program, shader);
    }

    fn detach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        GL::detach_shader(self, program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        GL::link_program(self, program);
    }

    fn link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.get_program_info_log(program)
    }

    fn delete_program(&self, program: &WebGlProgram) {
        GL::delete_program(self, Some(program));
    }

    fn use_program(&self, program: &WebGlProgram) {
        GL::use_program(self, Some(program));
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        GL::create_buffer(self)
    }

    fn bind_array_buffer(&self, buffer: &WebGlBuffer) {
        self.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        GL::delete_buffer(self, Some(buffer));
    }

    fn buffer_static_f32(&self, data: &[f32]) {
        let array = js_sys::Float32Array::from(data);
        self.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        // -1 means the attribute is not active in the program.
        u32::try_from(self.get_attrib_location(program, name)).ok()
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32) {
        self.vertex_attrib_pointer_with_i32(index, size, GL::FLOAT, false, 0, 0);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        GL::enable_vertex_attrib_array(self, index);
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn uniform1f(&self, location: &WebGlUniformLocation, x: f32) {
        GL::uniform1f(self, Some(location), x);
    }

    fn uniform2f(&self, location: &WebGlUniformLocation, x: f32, y: f32) {
        GL::uniform2f(self, Some(location), x, y);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        GL::viewport(self, x, y, width, height);
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        GL::clear_color(self, r, g, b, a);
    }

    fn clear_color_buffer(&self) {
        self.clear(GL::COLOR_BUFFER_BIT);
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.draw_arrays(GL::TRIANGLE_STRIP, first, count);
    }

    fn is_context_lost(&self) -> bool {
        GL::is_context_lost(self)
    }
}

/// Canvas that tracks the browser window size.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl Surface for CanvasSurface {
    type Context = GL;

    fn acquire_context(&self) -> Option<GL> {
        self.canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<GL>().ok())
    }

    fn display_size(&self) -> (u32, u32) {
        let inner = window().and_then(|w| {
            let width = w.inner_width().ok()?.as_f64()?;
            let height = w.inner_height().ok()?.as_f64()?;
            Some((width as u32, height as u32))
        });
        inner.unwrap_or_else(|| (self.canvas.width(), self.canvas.height()))
    }

    fn resize(&self, width: u32, height: u32) {
        // Assigning the size clears the drawing buffer, so skip no-op writes.
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }
}

/// `performance.now()` in seconds, falling back to the wall clock.
pub struct PerformanceClock {
    performance: Option<Performance>,
    origin_ms: f64,
}

impl PerformanceClock {
    pub fn new() -> Self {
        let performance = window().and_then(|w| w.performance());
        let origin_ms = if performance.is_some() {
            0.0
        } else {
            js_sys::Date::now()
        };
        Self {
            performance,
            origin_ms,
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PerformanceClock {
    fn elapsed_seconds(&self) -> f64 {
        let now_ms = match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        };
        (now_ms - self.origin_ms) / 1000.0
    }
}

fn request_frame(f: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(f.as_ref().unchecked_ref())
}

/// Builds the pipeline on `canvas` and starts the animation loop.
///
/// Returns the loop's stop token. Initialization failures have already been
/// logged when they are returned.
pub fn start(canvas: HtmlCanvasElement, config: RenderConfig) -> Result<StopToken, RenderError> {
    let mut driver = FrameDriver::new(CanvasSurface::new(canvas), PerformanceClock::new(), config);
    driver.init()?;
    let stop = driver.stop_token();

    // `f` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` on itself. Once the loop stops the closure is
    // simply not rescheduled.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match driver.step() {
            Ok(FrameStatus::Continue) => {}
            Ok(FrameStatus::Stopped) => {
                log::info!("frame loop stopped after {} frames", driver.stats().frames);
                return;
            }
            // Already logged by the driver.
            Err(_) => return,
        }

        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = request_frame(next) {
                log::error!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(first) = g.borrow().as_ref() {
        if let Err(err) = request_frame(first) {
            let err = RenderError::Dom(format!("requestAnimationFrame failed: {err:?}"));
            log::error!("{err}");
            return Err(err);
        }
    }

    Ok(stop)
}
