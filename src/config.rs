/// Startup settings for a render session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// `id` of the canvas element to draw into.
    pub canvas_id: String,
    /// Colour the frame is cleared to before the quad is drawn.
    pub clear_color: [f32; 4],
    /// Multiplier applied to elapsed seconds before they reach the shader.
    pub time_scale: f32,
    /// Maximum level forwarded to the console.
    pub log_level: log::LevelFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_id: "shaderCanvas".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            time_scale: 1.0,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl RenderConfig {
    /// Applies a `data-time-scale` style override. Unparseable, negative or
    /// non-finite values are ignored.
    pub fn with_time_scale_override(mut self, raw: Option<&str>) -> Self {
        match raw.map(str::trim).map(str::parse::<f32>) {
            Some(Ok(scale)) if scale.is_finite() && scale >= 0.0 => self.time_scale = scale,
            Some(_) => log::warn!("ignoring invalid time scale override {raw:?}"),
            None => {}
        }
        self
    }
}
