//! Visualizer — mounts an analyser and a render loop against one media
//! element at a time.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::VisualizerConfig;
use crate::error::VisualizerError;
use crate::graph::{AnalyserSettings, AnalyserWiring, AudioBackend, AudioGraph, ElementKey, GestureTarget};
use crate::render::bars::paint;
use crate::render::surface::fit_to_viewport;
use crate::render::{DrawSurface, FrameScheduler, ListenerId, RenderLoop, Viewport};

/// Host services a visualizer draws and listens through.
#[derive(Clone)]
pub struct VisualizerHost {
    pub surface: Rc<dyn DrawSurface>,
    pub scheduler: Rc<dyn FrameScheduler>,
    pub viewport: Rc<dyn Viewport>,
    pub gestures: Rc<dyn GestureTarget>,
}

/// What one mount owns and hands back on teardown.
struct Session {
    element: ElementKey,
    render: RenderLoop,
    resize: ListenerId,
}

pub struct Visualizer<B: AudioBackend + 'static> {
    graph: Rc<AudioGraph<B>>,
    host: VisualizerHost,
    config: Rc<VisualizerConfig>,
    wiring: AnalyserWiring<B>,
    session: Option<Session>,
}

impl<B: AudioBackend + 'static> Visualizer<B> {
    pub fn new(
        graph: Rc<AudioGraph<B>>,
        host: VisualizerHost,
        config: VisualizerConfig,
    ) -> Result<Self, VisualizerError> {
        config.validate()?;
        let wiring = AnalyserWiring::new(AnalyserSettings::from(&config));
        Ok(Visualizer {
            graph,
            host,
            config: Rc::new(config),
            wiring,
            session: None,
        })
    }

    /// Mount against `element`, or re-mount if the element changed.
    ///
    /// Switching tracks on the same element is not a change and does
    /// nothing. On an unsupported platform nothing is started and the
    /// error is returned for the caller to ignore.
    pub fn attach(&mut self, element: &B::Element) -> Result<(), VisualizerError> {
        let ctx = self.graph.context()?;
        let key = ctx.element_key(element);
        if self.session.as_ref().is_some_and(|s| s.element == key) {
            return Ok(());
        }
        self.detach();

        self.graph.resume_on_gesture(&*self.host.gestures)?;
        self.wiring.sync(&self.graph, element)?;
        let Some(analyser) = self.wiring.analyser().cloned() else {
            return Ok(());
        };

        let metrics = Rc::new(Cell::new(fit_to_viewport(self.host.surface.as_ref())));
        let resize = {
            let surface = self.host.surface.clone();
            let metrics = metrics.clone();
            self.host.viewport.add_resize_listener(Rc::new(move || {
                metrics.set(fit_to_viewport(surface.as_ref()));
            }))
        };

        let surface = self.host.surface.clone();
        let config = self.config.clone();
        let mut bins = vec![0u8; ctx.frequency_bin_count(&analyser)];
        let render = RenderLoop::start(self.host.scheduler.clone(), move |_| {
            ctx.byte_frequency_data(&analyser, &mut bins);
            paint(surface.as_ref(), &bins, &metrics.get(), &config);
        });

        log::info!("Visualizer mounted on element {key}");
        self.session = Some(Session {
            element: key,
            render,
            resize,
        });
        Ok(())
    }

    /// Unmount: stop drawing and stop listening for resizes.
    ///
    /// The element's source stays connected to the analyser.
    pub fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            session.render.cancel();
            self.host.viewport.remove_resize_listener(session.resize);
            log::debug!("Visualizer detached from element {}", session.element);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    pub fn mounted_element(&self) -> Option<ElementKey> {
        self.session.as_ref().map(|s| s.element)
    }

    pub fn frames_drawn(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.render.frames_drawn())
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }
}

impl<B: AudioBackend + 'static> Drop for Visualizer<B> {
    fn drop(&mut self) {
        self.detach();
    }
}
