//! Frame driver: owns the session and redraws it once per scheduled tick.
//!
//! Scheduling lives outside this type. The browser build re-requests an
//! animation frame after every successful [`FrameDriver::step`]; tests call
//! `step` directly, which keeps the number of frames deterministic.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::gpu::GraphicsContext;
use crate::session::{RenderSession, ShaderSources, Surface};

/// Monotonic time source.
pub trait Clock {
    /// Seconds since an epoch fixed when the process started.
    fn elapsed_seconds(&self) -> f64;
}

/// Shared cancellation flag for the frame loop.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Rc<Cell<bool>>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Ready,
    Running,
}

/// Whether the caller should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub resolution: (u32, u32),
    pub time: f32,
}

pub struct FrameDriver<S: Surface, C: Clock> {
    surface: S,
    clock: C,
    config: RenderConfig,
    stop: StopToken,
    session: Option<RenderSession<S::Context>>,
    stats: FrameStats,
}

impl<S: Surface, C: Clock> FrameDriver<S, C> {
    pub fn new(surface: S, clock: C, config: RenderConfig) -> Self {
        Self {
            surface,
            clock,
            config,
            stop: StopToken::new(),
            session: None,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        match (&self.session, self.stats.frames) {
            (None, _) => DriverState::Uninitialized,
            (Some(_), 0) => DriverState::Ready,
            (Some(_), _) => DriverState::Running,
        }
    }

    /// Handle that stops the loop before its next frame.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn session(&self) -> Option<&RenderSession<S::Context>> {
        self.session.as_ref()
    }

    /// Builds the pipeline from the built-in shaders.
    pub fn init(&mut self) -> Result<(), RenderError> {
        self.init_with_sources(ShaderSources::default())
    }

    pub fn init_with_sources(&mut self, sources: ShaderSources<'_>) -> Result<(), RenderError> {
        if self.session.is_some() {
            log::warn!("frame driver already initialized");
            return Ok(());
        }
        let session = RenderSession::init_with_sources(&self.surface, &self.config, sources)?;
        self.session = Some(session);
        Ok(())
    }

    /// Draws one frame. A lost context cancels the loop and is reported as an
    /// error; a cancelled or uninitialized driver draws nothing.
    pub fn step(&mut self) -> Result<FrameStatus, RenderError> {
        if self.stop.is_cancelled() {
            return Ok(FrameStatus::Stopped);
        }
        let Some(session) = self.session.as_mut() else {
            log::warn!("frame requested before initialization");
            return Ok(FrameStatus::Stopped);
        };

        if session.context().is_context_lost() {
            self.stop.cancel();
            log::error!("{}", RenderError::ContextLost);
            return Err(RenderError::ContextLost);
        }

        let (width, height) = self.surface.display_size();
        self.surface.resize(width, height);

        let elapsed = (self.clock.elapsed_seconds() * f64::from(self.config.time_scale)) as f32;
        let time = session.render_frame(width, height, elapsed);

        if self.stats.frames == 0 {
            log::debug!("first frame at {width}x{height}");
        }
        self.stats = FrameStats {
            frames: self.stats.frames + 1,
            resolution: (width, height),
            time,
        };
        Ok(FrameStatus::Continue)
    }

    /// Runs up to `frames` steps back to back, stopping early on cancel or error.
    pub fn run_for(&mut self, frames: u64) -> Result<u64, RenderError> {
        let mut drawn = 0;
        for _ in 0..frames {
            match self.step()? {
                FrameStatus::Continue => drawn += 1,
                FrameStatus::Stopped => break,
            }
        }
        Ok(drawn)
    }
}
