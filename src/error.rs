use thiserror::Error;

/// Which pipeline stage a shader belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Everything that can abort startup. Nothing here is retried.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("canvas element `#{0}` not found")]
    CanvasMissing(String),

    #[error("WebGL is not supported in this browser")]
    ContextUnavailable,

    #[error("failed to load shader from `{url}`: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link: {0}")]
    Link(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("configuration out of range: {0}")]
    ConfigRange(String),

    #[error("browser API error: {0}")]
    Js(String),
}

impl VizError {
    /// Wraps a thrown JS value, keeping its debug rendering as the message.
    pub fn js(value: impl std::fmt::Debug) -> Self {
        Self::Js(format!("{value:?}"))
    }
}

impl From<VizError> for wasm_bindgen::JsValue {
    fn from(err: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
