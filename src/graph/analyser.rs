//! Analyser lifecycle — one analyser per visualizer, rewired only when the
//! media element itself changes.

use crate::config::VisualizerConfig;
use crate::error::GraphError;

use super::backend::{AudioBackend, ElementKey};
use super::manager::AudioGraph;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserSettings {
    pub fft_size: u32,
    pub smoothing: f64,
}

impl From<&VisualizerConfig> for AnalyserSettings {
    fn from(config: &VisualizerConfig) -> Self {
        AnalyserSettings {
            fft_size: config.fft_size,
            smoothing: config.smoothing,
        }
    }
}

/// Outcome of [`AnalyserWiring::sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewire {
    /// Same element as last time; nothing touched.
    Unchanged,
    Wired {
        previous: Option<ElementKey>,
        current: ElementKey,
    },
    /// The element's source is owned elsewhere; the analyser stays silent.
    Skipped(ElementKey),
}

/// Uninitialized until the first `sync`, then wired to one element at a time.
///
/// Teardown is just dropping this. Sources stay connected: they live as
/// long as their element, not as long as the visualizer.
pub struct AnalyserWiring<B: AudioBackend> {
    settings: AnalyserSettings,
    analyser: Option<B::Analyser>,
    /// The element currently heard and the source feeding the analyser.
    wired: Option<(ElementKey, B::Source)>,
}

impl<B: AudioBackend + 'static> AnalyserWiring<B> {
    pub fn new(settings: AnalyserSettings) -> Self {
        AnalyserWiring {
            settings,
            analyser: None,
            wired: None,
        }
    }

    pub fn analyser(&self) -> Option<&B::Analyser> {
        self.analyser.as_ref()
    }

    pub fn wired_element(&self) -> Option<ElementKey> {
        self.wired.as_ref().map(|(key, _)| *key)
    }

    /// Make sure the analyser exists and hears `element`.
    ///
    /// Only an unsupported platform or a failed analyser construction is
    /// returned as an error; connection problems are logged and absorbed.
    pub fn sync(&mut self, graph: &AudioGraph<B>, element: &B::Element) -> Result<Rewire, GraphError> {
        let ctx = graph.context()?;

        if self.analyser.is_none() {
            let analyser = ctx.create_analyser(self.settings.fft_size, self.settings.smoothing)?;
            if let Err(e) = ctx.connect_destination(&analyser) {
                log::warn!("Analyser output not connected: {e}");
            }
            self.analyser = Some(analyser);
        }
        let Some(analyser) = self.analyser.as_ref() else {
            return Err(GraphError::Analyser {
                reason: "analyser missing after creation".to_string(),
            });
        };

        let key = ctx.element_key(element);
        if self.wired_element() == Some(key) {
            return Ok(Rewire::Unchanged);
        }

        let source = match graph.source_for(element) {
            Ok(source) => source,
            Err(GraphError::DuplicateSource { key }) => {
                log::warn!("Media source for element {key} owned elsewhere; visualizer idle");
                return Ok(Rewire::Skipped(key));
            }
            Err(e) => return Err(e),
        };

        // The registry may have released the old element already.
        let previous = self.wired.take().map(|(old_key, old)| {
            if let Err(e) = ctx.disconnect(&old, analyser) {
                log::debug!("Ignoring disconnect failure: {e}");
            }
            old_key
        });

        if let Err(e) = ctx.connect(&source, analyser) {
            log::warn!("Media source connect skipped: {e}");
        }

        self.wired = Some((key, source));
        Ok(Rewire::Wired {
            previous,
            current: key,
        })
    }
}
