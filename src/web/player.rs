//! `<audio>` element as a [`MediaPlayer`].

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlMediaElement;

use crate::error::PlaybackError;
use crate::playback::MediaPlayer;

use super::describe;

pub struct HtmlAudioPlayer {
    element: HtmlMediaElement,
}

impl HtmlAudioPlayer {
    pub fn new(element: HtmlMediaElement) -> Self {
        HtmlAudioPlayer { element }
    }

    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaPlayer for HtmlAudioPlayer {
    fn set_source(&self, url: &str) {
        self.element.set_src(url);
    }

    /// Rejections by the autoplay policy arrive on the returned promise and
    /// are only logged.
    fn play(&self) -> Result<(), PlaybackError> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::AutoplayRejected {
                reason: describe(&e),
            })?;
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                let err = PlaybackError::AutoplayRejected {
                    reason: describe(&e),
                };
                log::warn!("{err}");
            }
        });
        Ok(())
    }

    fn pause(&self) {
        if let Err(e) = self.element.pause() {
            log::warn!("pause failed: {}", describe(&e));
        }
    }
}
