pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod uniforms;
pub mod view;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::{AppConfig, CONFIG_ELEMENT_ID};
    use crate::error::VizError;

    mod input;
    pub mod loader;
    pub mod render;
    pub mod shader;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let parsed = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
            .map(|text| AppConfig::from_json(&text));
        let (config, config_err) = match parsed {
            Some(Ok(config)) => (config, None),
            Some(Err(err)) => (AppConfig::default(), Some(err)),
            None => (AppConfig::default(), None),
        };
        console_log::init_with_level(config.log_level()).ok();
        if let Some(err) = config_err {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
        }
        log::info!("wave_viz starting ({:?} mode)", config.render_mode);

        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| VizError::CanvasMissing(config.canvas_id.clone()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = render::start(canvas, config).await {
                log::error!("initialisation failed: {err}");
            }
        });
        Ok(())
    }
}
