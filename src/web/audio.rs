//! Web Audio backend.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AnalyserNode, AudioContext, AudioContextState, HtmlMediaElement, MediaElementAudioSourceNode,
};

use crate::error::GraphError;
use crate::graph::{AudioBackend, ContextState, ElementKey};

use super::{describe, is_invalid_state};

/// Expando property carrying an element's [`ElementKey`]. Stored on the
/// element itself so the key dies with it.
const KEY_PROPERTY: &str = "__visualizerElementKey";

pub struct WebAudioBackend {
    ctx: AudioContext,
}

impl WebAudioBackend {
    /// Construct the page's audio context, falling back to the prefixed
    /// constructor on older WebKit.
    pub fn new() -> Result<Self, GraphError> {
        let ctx = AudioContext::new()
            .or_else(|_| webkit_audio_context())
            .map_err(|e| GraphError::Unsupported {
                reason: describe(&e),
            })?;
        Ok(WebAudioBackend { ctx })
    }

    pub fn context(&self) -> &AudioContext {
        &self.ctx
    }
}

fn webkit_audio_context() -> Result<AudioContext, JsValue> {
    let ctor = Reflect::get(&js_sys::global(), &JsValue::from_str("webkitAudioContext"))?;
    let ctor: Function = ctor.dyn_into()?;
    let ctx = Reflect::construct(&ctor, &Array::new())?;
    Ok(ctx.unchecked_into())
}

impl AudioBackend for WebAudioBackend {
    type Element = HtmlMediaElement;
    type Source = MediaElementAudioSourceNode;
    type Analyser = AnalyserNode;

    fn element_key(&self, element: &HtmlMediaElement) -> ElementKey {
        let prop = JsValue::from_str(KEY_PROPERTY);
        if let Some(key) = Reflect::get(element, &prop).ok().and_then(|v| v.as_f64()) {
            return ElementKey(key as u64);
        }
        // Page-wide: another graph may have tagged elements already.
        let key = ElementKey::fresh();
        if let Err(e) = Reflect::set(element, &prop, &JsValue::from_f64(key.0 as f64)) {
            log::warn!("Could not tag media element: {}", describe(&e));
        }
        key
    }

    fn state(&self) -> ContextState {
        match self.ctx.state() {
            AudioContextState::Running => ContextState::Running,
            AudioContextState::Closed => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }

    fn resume(&self) {
        match self.ctx.resume() {
            Ok(promise) => spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => log::info!("Audio context resumed"),
                    Err(e) => log::error!("Audio context resume failed: {}", describe(&e)),
                }
            }),
            Err(e) => log::error!("Audio context resume failed: {}", describe(&e)),
        }
    }

    fn create_media_source(
        &self,
        element: &HtmlMediaElement,
    ) -> Result<MediaElementAudioSourceNode, GraphError> {
        self.ctx.create_media_element_source(element).map_err(|e| {
            if is_invalid_state(&e) {
                GraphError::DuplicateSource {
                    key: self.element_key(element),
                }
            } else {
                GraphError::Unsupported {
                    reason: describe(&e),
                }
            }
        })
    }

    fn create_analyser(&self, fft_size: u32, smoothing: f64) -> Result<AnalyserNode, GraphError> {
        let analyser = self.ctx.create_analyser().map_err(|e| GraphError::Analyser {
            reason: describe(&e),
        })?;
        analyser.set_fft_size(fft_size);
        analyser.set_smoothing_time_constant(smoothing);
        Ok(analyser)
    }

    fn connect_destination(&self, analyser: &AnalyserNode) -> Result<(), GraphError> {
        analyser
            .connect_with_audio_node(&self.ctx.destination())
            .map(|_| ())
            .map_err(|e| GraphError::Analyser {
                reason: describe(&e),
            })
    }

    fn connect(
        &self,
        source: &MediaElementAudioSourceNode,
        analyser: &AnalyserNode,
    ) -> Result<(), GraphError> {
        source
            .connect_with_audio_node(analyser)
            .map(|_| ())
            .map_err(|e| GraphError::DuplicateConnection {
                reason: describe(&e),
            })
    }

    fn disconnect(
        &self,
        source: &MediaElementAudioSourceNode,
        analyser: &AnalyserNode,
    ) -> Result<(), GraphError> {
        source
            .disconnect_with_audio_node(analyser)
            .map_err(|e| GraphError::Disconnect {
                reason: describe(&e),
            })
    }

    fn frequency_bin_count(&self, analyser: &AnalyserNode) -> usize {
        analyser.frequency_bin_count() as usize
    }

    fn byte_frequency_data(&self, analyser: &AnalyserNode, out: &mut [u8]) {
        analyser.get_byte_frequency_data(out);
    }
}
