use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader};

use super::loader::ShaderSources;
use crate::error::{ShaderStage, VizError};

/// Compiles one stage. A failed shader is deleted before the error returns.
pub fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, VizError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| VizError::Js(format!("unable to create {stage} shader")))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        return Ok(shader);
    }
    let info = gl
        .get_shader_info_log(&shader)
        .unwrap_or_else(|| "unknown error".to_string());
    gl.delete_shader(Some(&shader));
    let err = VizError::Compile { stage, log: info };
    log::error!("{err}");
    Err(err)
}

pub fn link_program(
    gl: &GL,
    vert: &WebGlShader,
    frag: &WebGlShader,
) -> Result<WebGlProgram, VizError> {
    let program = gl
        .create_program()
        .ok_or_else(|| VizError::Js("unable to create program".into()))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);

    let ok = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        return Ok(program);
    }
    let info = gl
        .get_program_info_log(&program)
        .unwrap_or_else(|| "unknown error".to_string());
    gl.delete_program(Some(&program));
    let err = VizError::Link(info);
    log::error!("{err}");
    Err(err)
}

pub fn build_program(gl: &GL, sources: &ShaderSources) -> Result<WebGlProgram, VizError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, &sources.vertex)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, &sources.fragment) {
        Ok(frag) => frag,
        Err(err) => {
            gl.delete_shader(Some(&vert));
            return Err(err);
        }
    };
    let program = link_program(gl, &vert, &frag);
    // The program keeps what it needs; the shader objects can go.
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));
    program
}
