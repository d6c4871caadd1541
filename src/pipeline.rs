//! Shader compilation and program linking.

use crate::error::RenderError;
use crate::gpu::{GraphicsContext, ShaderStage};

const NO_DIAGNOSTIC: &str = "driver reported failure without a diagnostic";

/// A successfully compiled stage, waiting to be linked.
pub struct CompiledShader<G: GraphicsContext> {
    stage: ShaderStage,
    shader: G::Shader,
}

impl<G: GraphicsContext> CompiledShader<G> {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Deletes a unit that will never be linked.
    pub fn release(self, gl: &G) {
        gl.delete_shader(&self.shader);
    }
}

fn diagnostic(log: Option<String>) -> String {
    match log {
        Some(log) if !log.trim().is_empty() => log.trim().to_string(),
        _ => NO_DIAGNOSTIC.to_string(),
    }
}

/// Compiles `source` for `stage`.
///
/// A rejected unit is deleted before the error is returned, so the caller never
/// holds a handle to a broken shader.
pub fn compile_shader<G: GraphicsContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledShader<G>, RenderError> {
    let shader = gl
        .create_shader(stage)
        .ok_or(RenderError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl.compile_status(&shader) {
        let log = diagnostic(gl.shader_info_log(&shader));
        gl.delete_shader(&shader);
        return Err(RenderError::Compile { stage, log });
    }

    log::debug!("{stage} shader compiled");
    Ok(CompiledShader { stage, shader })
}

/// Links a vertex and fragment unit into a program. Both units are consumed:
/// they are released whether or not linking succeeds. The program is not made
/// current.
pub fn link_program<G: GraphicsContext>(
    gl: &G,
    vertex: CompiledShader<G>,
    fragment: CompiledShader<G>,
) -> Result<G::Program, RenderError> {
    debug_assert_eq!(vertex.stage, ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage, ShaderStage::Fragment);

    let release = |program: Option<&G::Program>| {
        for unit in [&vertex.shader, &fragment.shader] {
            if let Some(program) = program {
                gl.detach_shader(program, unit);
            }
            gl.delete_shader(unit);
        }
    };

    let Some(program) = gl.create_program() else {
        release(None);
        return Err(RenderError::Allocation("program"));
    };
    gl.attach_shader(&program, &vertex.shader);
    gl.attach_shader(&program, &fragment.shader);
    gl.link_program(&program);

    if !gl.link_status(&program) {
        let log = diagnostic(gl.program_info_log(&program));
        release(Some(&program));
        gl.delete_program(&program);
        return Err(RenderError::Link { log });
    }

    release(Some(&program));
    log::debug!("program linked");
    Ok(program)
}
