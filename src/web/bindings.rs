//! Classes exported to the host page.
//!
//! The page builds one [`AudioGraphHandle`] and hands it to every
//! [`WebVisualizer`] it creates; the player and the visualizers share the
//! same `<audio>` element.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlMediaElement};

use crate::config::VisualizerConfig;
use crate::graph::{AudioBackend, AudioGraph};
use crate::playback::{Playlist, Track, Transport};
use crate::visualizer::{Visualizer, VisualizerHost};

use super::audio::WebAudioBackend;
use super::canvas::CanvasSurface;
use super::dom::{AnimationFrames, WindowEvents};
use super::player::HtmlAudioPlayer;

/// The page's shared audio graph. Create one per page.
#[wasm_bindgen]
pub struct AudioGraphHandle {
    graph: Rc<AudioGraph<WebAudioBackend>>,
}

#[wasm_bindgen]
impl AudioGraphHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AudioGraphHandle {
        AudioGraphHandle {
            graph: Rc::new(AudioGraph::new(WebAudioBackend::new)),
        }
    }

    #[wasm_bindgen(js_name = sourceCount)]
    pub fn source_count(&self) -> usize {
        self.graph.source_count()
    }

    /// Forget an element's source once the element has left the page.
    pub fn release(&self, element: &HtmlMediaElement) -> bool {
        match self.graph.context() {
            Ok(ctx) => self.graph.release(ctx.element_key(element)).is_some(),
            Err(_) => false,
        }
    }
}

impl Default for AudioGraphHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
pub struct WebVisualizer {
    inner: Visualizer<WebAudioBackend>,
}

#[wasm_bindgen]
impl WebVisualizer {
    /// `config` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        graph: &AudioGraphHandle,
        canvas: HtmlCanvasElement,
        config: JsValue,
    ) -> Result<WebVisualizer, JsValue> {
        let config: VisualizerConfig = if config.is_undefined() || config.is_null() {
            VisualizerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("{e}")))?
        };
        let events = Rc::new(WindowEvents::new()?);
        let host = VisualizerHost {
            surface: Rc::new(CanvasSurface::new(canvas)?),
            scheduler: Rc::new(AnimationFrames::new()?),
            viewport: events.clone(),
            gestures: events,
        };
        let inner = Visualizer::new(graph.graph.clone(), host, config)
            .map_err(|e| JsValue::from_str(&format!("{e}")))?;
        Ok(WebVisualizer { inner })
    }

    /// Mount on `element`. Call again whenever the page swaps elements;
    /// track changes on the same element need no call.
    pub fn attach(&mut self, element: HtmlMediaElement) -> Result<(), JsValue> {
        self.inner
            .attach(&element)
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    pub fn detach(&mut self) {
        self.inner.detach();
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    #[wasm_bindgen(js_name = framesDrawn)]
    pub fn frames_drawn(&self) -> f64 {
        self.inner.frames_drawn() as f64
    }
}

#[wasm_bindgen]
pub struct WebPlayer {
    transport: Transport<HtmlAudioPlayer>,
}

#[wasm_bindgen]
impl WebPlayer {
    /// `tracks` is an array of `{ title, cover, audio }`.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlMediaElement, tracks: JsValue) -> Result<WebPlayer, JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("{e}")))?;
        let playlist = Playlist::new(tracks).map_err(|e| JsValue::from_str(&format!("{e}")))?;
        Ok(WebPlayer {
            transport: Transport::new(playlist, HtmlAudioPlayer::new(element)),
        })
    }

    pub fn toggle(&mut self) {
        self.transport.toggle();
    }

    pub fn next(&mut self) {
        self.transport.next();
    }

    pub fn prev(&mut self) {
        self.transport.prev();
    }

    pub fn select(&mut self, index: usize) -> Result<(), JsValue> {
        self.transport
            .select(index)
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    #[wasm_bindgen(js_name = trackIndex)]
    pub fn track_index(&self) -> usize {
        self.transport.state().track_index
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.transport.state().is_playing
    }

    /// `{ trackIndex, isPlaying }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.transport.state())
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    #[wasm_bindgen(js_name = currentTrack)]
    pub fn current_track(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.transport.current_track())
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    /// Call from the cover image's `error` event.
    #[wasm_bindgen(js_name = coverFailed)]
    pub fn cover_failed(&mut self) {
        self.transport.cover_failed();
    }

    #[wasm_bindgen(js_name = coverVisible)]
    pub fn cover_visible(&self, index: usize) -> bool {
        self.transport.cover_visible(index)
    }

    /// The element to hand to `WebVisualizer.attach`.
    pub fn element(&self) -> HtmlMediaElement {
        self.transport.player().element().clone()
    }
}
