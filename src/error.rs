use thiserror::Error;

use crate::gpu::ShaderStage;

/// Everything that can stop the renderer from starting or from drawing the next frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("unable to initialize WebGL2; the browser may not support it")]
    ContextUnavailable,

    #[error("{stage} shader compilation error: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program linking error: {log}")]
    Link { log: String },

    #[error("context refused to allocate a {0}")]
    Allocation(&'static str),

    #[error("vertex attribute `{0}` not found in program")]
    MissingAttribute(&'static str),

    #[error("uniform `{0}` not found in program")]
    MissingUniform(&'static str),

    #[error("rendering context lost")]
    ContextLost,

    #[error("dom error: {0}")]
    Dom(String),
}

impl RenderError {
    /// Driver diagnostic carried by compile and link failures.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Compile { log, .. } | Self::Link { log } => Some(log),
            _ => None,
        }
    }
}
