//! Runtime configuration.
//!
//! The page may embed a `<script type="application/json" id="viz-config">`
//! block; any field left out falls back to [`AppConfig::default`], which
//! matches the animated variant of the page.

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Id of the optional inline JSON config element.
pub const CONFIG_ELEMENT_ID: &str = "viz-config";

pub const DEFAULT_VERT_URL: &str = "shaders/vert.glsl";
pub const DEFAULT_FRAG_URL: &str = "shaders/frag.glsl";

/// How input mutations reach the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Redraw synchronously inside each input handler.
    Immediate,
    /// Redraw from a `requestAnimationFrame` loop when the view is dirty.
    Animation,
}

/// Where the GLSL text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ShaderSource {
    /// Sources compiled into the wasm binary.
    Embedded,
    /// Sources fetched over HTTP relative to the page.
    Fetch { vert_url: String, frag_url: String },
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::Fetch {
            vert_url: DEFAULT_VERT_URL.to_string(),
            frag_url: DEFAULT_FRAG_URL.to_string(),
        }
    }
}

/// Constants that shape the rendered field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderParams {
    /// `(chi, omega, A, s)`: vibration frequency ratio, amplitude and feed.
    pub data: [f32; 4],
    /// `(R, r)`: outer and inner radius of the patterned annulus.
    pub support: [f32; 2],
    /// `(alfa, betta, gamma, ro)`: tool flank angles, tilt and nose radius.
    pub resez: [f32; 4],
}

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            data: [1.0, 1.0, 0.001, 0.001],
            support: [200.0, 20.0],
            resez: [0.1, 0.15, 0.0, 0.001],
        }
    }
}

/// The two shipped page variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Animated,
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas_id: String,
    pub render_mode: RenderMode,
    pub shader_source: ShaderSource,
    pub initial_scale: f64,
    pub initial_offset: [f64; 2],
    pub shader: ShaderParams,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::preset(Preset::Animated)
    }
}

impl AppConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Animated => Self {
                canvas_id: "canvas".to_string(),
                render_mode: RenderMode::Animation,
                shader_source: ShaderSource::default(),
                initial_scale: 0.5,
                initial_offset: [0.0, 0.0],
                shader: ShaderParams::default(),
                log_level: "info".to_string(),
            },
            Preset::Immediate => Self {
                canvas_id: "canvas".to_string(),
                render_mode: RenderMode::Immediate,
                shader_source: ShaderSource::Embedded,
                initial_scale: 0.5,
                initial_offset: [0.0, 0.0],
                // Coarse feed, flat tool and a vibration deep enough to
                // undercut the 0.1 gray offset, so grooves show at scale 0.5.
                shader: ShaderParams {
                    data: [1.0, 3.3, 0.1, 3.0],
                    support: [200.0, 20.0],
                    resez: [0.02, 0.03, 0.0, 20.0],
                },
                log_level: "info".to_string(),
            },
        }
    }

    /// Parses a JSON override document. A `"preset"` key selects the base
    /// the remaining keys are layered on; without it the base is the default.
    pub fn from_json(text: &str) -> Result<Self, VizError> {
        let mut value: serde_json::Value = serde_json::from_str(text)?;
        let base = match value.as_object_mut().and_then(|o| o.remove("preset")) {
            Some(p) => Self::preset(serde_json::from_value(p)?),
            None => Self::default(),
        };
        let mut merged = serde_json::to_value(base)?;
        merge(&mut merged, value);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the view or the field cannot work with: the scale must
    /// stay positive, the feed must be positive and the annulus non-empty.
    pub fn validate(&self) -> Result<(), VizError> {
        let range = |msg: String| Err(VizError::ConfigRange(msg));
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            return range(format!("initial_scale must be positive, got {}", self.initial_scale));
        }
        if !self.initial_offset.iter().all(|v| v.is_finite()) {
            return range(format!("initial_offset must be finite, got {:?}", self.initial_offset));
        }
        let p = &self.shader;
        if !p.data.iter().chain(&p.support).chain(&p.resez).all(|v| v.is_finite()) {
            return range("shader constants must be finite".to_string());
        }
        let feed = p.data[3];
        if feed <= 0.0 {
            return range(format!("feed (data[3]) must be positive, got {feed}"));
        }
        if p.data[1] == 0.0 {
            return range("omega (data[1]) must be non-zero".to_string());
        }
        let [outer, inner] = p.support;
        if !(inner >= 0.0 && outer > inner) {
            return range(format!("support needs R > r >= 0, got [{outer}, {inner}]"));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

fn merge(base: &mut serde_json::Value, over: serde_json::Value) {
    match (base, over) {
        (serde_json::Value::Object(b), serde_json::Value::Object(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}
