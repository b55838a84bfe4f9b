//! Browser host — Web Audio, canvas and DOM implementations of the
//! platform traits, and the classes exported to JavaScript.

pub mod audio;
pub mod bindings;
pub mod canvas;
pub mod dom;
pub mod player;

pub use audio::WebAudioBackend;
pub use bindings::{AudioGraphHandle, WebPlayer, WebVisualizer};
pub use canvas::CanvasSurface;
pub use dom::{AnimationFrames, WindowEvents};
pub use player::HtmlAudioPlayer;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

/// Readable text for a thrown JS value.
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(ex) = err.dyn_ref::<DomException>() {
        return format!("{}: {}", ex.name(), ex.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub(crate) fn is_invalid_state(err: &JsValue) -> bool {
    err.dyn_ref::<DomException>()
        .is_some_and(|ex| ex.name() == "InvalidStateError")
}
