//! Animated raymarched pattern drawn over a fullscreen WebGL2 canvas.
//!
//! Everything except the `wasm` module is target independent, so the startup
//! sequence and the frame loop run under `cargo test` on the host against a
//! stand-in [`gpu::GraphicsContext`].

pub mod config;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod logging;
pub mod pipeline;
pub mod quad;
pub mod session;
pub mod shaders;
pub mod uniforms;

pub use config::RenderConfig;
pub use error::RenderError;
pub use frame::{Clock, DriverState, FrameDriver, FrameStats, FrameStatus, StopToken};
pub use gpu::{GraphicsContext, ShaderStage};
pub use session::{RenderSession, ShaderSources, Surface};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use crate::config::RenderConfig;
    use crate::error::RenderError;
    use crate::logging::init_logging;

    pub mod render;

    fn find_canvas(id: &str) -> Result<HtmlCanvasElement, RenderError> {
        let window = web_sys::window().ok_or_else(|| RenderError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Dom("no document".into()))?;
        document
            .get_element_by_id(id)
            .ok_or_else(|| RenderError::Dom(format!("canvas #{id} not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderError::Dom(format!("#{id} is not a canvas")))
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = RenderConfig::default();
        init_logging(config.log_level);

        // Failures end up on the console; the page just stays blank.
        let canvas = match find_canvas(&config.canvas_id) {
            Ok(canvas) => canvas,
            Err(err) => {
                log::error!("{err}");
                return Ok(());
            }
        };

        let time_scale = canvas.dataset().get("timeScale");
        let config = config.with_time_scale_override(time_scale.as_deref());

        if render::start(canvas, config).is_ok() {
            log::debug!("frame loop scheduled");
        }
        Ok(())
    }
}
