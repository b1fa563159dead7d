use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Response};

use crate::config::ShaderSource;
use crate::error::VizError;

pub const EMBEDDED_VERT: &str = include_str!("../../static/shaders/vert.glsl");
pub const EMBEDDED_FRAG: &str = include_str!("../../static/shaders/frag.glsl");

#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn embedded() -> Self {
        Self {
            vertex: EMBEDDED_VERT.to_string(),
            fragment: EMBEDDED_FRAG.to_string(),
        }
    }
}

/// Resolves GLSL text. Fetched sources are requested together and awaited
/// together; both failures are logged before the first is returned.
pub async fn load(source: &ShaderSource) -> Result<ShaderSources, VizError> {
    let (vert_url, frag_url) = match source {
        ShaderSource::Embedded => return Ok(ShaderSources::embedded()),
        ShaderSource::Fetch { vert_url, frag_url } => (vert_url, frag_url),
    };

    let window = window().ok_or_else(|| VizError::Js("no window".into()))?;
    let vert_req = window.fetch_with_str(vert_url);
    let frag_req = window.fetch_with_str(frag_url);

    let vertex = read_text(vert_url, vert_req).await;
    let fragment = read_text(frag_url, frag_req).await;
    for err in [vertex.as_ref().err(), fragment.as_ref().err()].into_iter().flatten() {
        log::error!("{err}");
    }
    Ok(ShaderSources { vertex: vertex?, fragment: fragment? })
}

async fn read_text(url: &str, request: js_sys::Promise) -> Result<String, VizError> {
    let fetch_err = |reason: String| VizError::Fetch { url: url.to_string(), reason };

    let response: Response = JsFuture::from(request)
        .await
        .map_err(|e| fetch_err(format!("{e:?}")))?
        .dyn_into()
        .map_err(|e| fetch_err(format!("not a Response: {e:?}")))?;
    if !response.ok() {
        return Err(fetch_err(format!("HTTP error! status: {}", response.status())));
    }
    let body = response.text().map_err(|e| fetch_err(format!("{e:?}")))?;
    JsFuture::from(body)
        .await
        .map_err(|e| fetch_err(format!("{e:?}")))?
        .as_string()
        .ok_or_else(|| fetch_err("body is not text".into()))
}
