pub mod config;
pub mod error;
pub mod graph;
pub mod playback;
pub mod render;
pub mod visualizer;
pub mod web;

#[cfg(test)]
mod testing;

pub use config::VisualizerConfig;
pub use error::{ConfigError, GraphError, PlaybackError, VisualizerError};
pub use graph::{AudioBackend, AudioGraph, ElementKey};
pub use playback::{Playlist, Track, Transport};
pub use visualizer::{Visualizer, VisualizerHost};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the crate version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: route `log` records to the browser console and report
/// panics there. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Parse a JSON visualizer config, filling defaults and validating it.
pub fn parse_config(json: &str) -> Result<VisualizerConfig, ConfigError> {
    VisualizerConfig::from_json(json)
}

/// WASM-exposed: validate a JSON config and return it as a JS object with
/// every default filled in.
#[wasm_bindgen(js_name = resolveConfig)]
pub fn resolve_config(json: &str) -> Result<JsValue, JsValue> {
    let config = parse_config(json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&config).map_err(|e| JsValue::from_str(&format!("{e}")))
}
