//! Host-platform traits consumed by the audio graph.

use std::cell::Cell;
use std::fmt;

use crate::error::GraphError;

/// Stable identity of a media element.
///
/// Two handles to the same element must map to the same key for the
/// element's whole lifetime, whatever track it is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub u64);

thread_local! {
    static NEXT_KEY: Cell<u64> = const { Cell::new(1) };
}

impl ElementKey {
    /// A key no other call on this thread has handed out, whichever
    /// backend asks for it.
    pub fn fresh() -> ElementKey {
        NEXT_KEY.with(|next| {
            let key = next.get();
            next.set(key + 1);
            ElementKey(key)
        })
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// One audio-processing context and the node primitives the visualizer needs.
///
/// Node handles are cheap clones of host references. Methods take `&self`;
/// implementations keep whatever interior state they need.
pub trait AudioBackend {
    type Element: Clone + 'static;
    type Source: Clone + 'static;
    type Analyser: Clone + 'static;

    fn element_key(&self, element: &Self::Element) -> ElementKey;

    fn state(&self) -> ContextState;

    /// Ask a suspended context to resume. Completion is reported by the host
    /// asynchronously; this must not block.
    fn resume(&self);

    /// Derive a source node from a media element. The host allows this at
    /// most once per element, ever.
    fn create_media_source(&self, element: &Self::Element) -> Result<Self::Source, GraphError>;

    fn create_analyser(&self, fft_size: u32, smoothing: f64)
    -> Result<Self::Analyser, GraphError>;

    /// Connect an analyser to the context's output sink.
    fn connect_destination(&self, analyser: &Self::Analyser) -> Result<(), GraphError>;

    fn connect(&self, source: &Self::Source, analyser: &Self::Analyser) -> Result<(), GraphError>;

    fn disconnect(&self, source: &Self::Source, analyser: &Self::Analyser)
    -> Result<(), GraphError>;

    fn frequency_bin_count(&self, analyser: &Self::Analyser) -> usize;

    /// Fill `out` with the current byte magnitudes, one per bin.
    fn byte_frequency_data(&self, analyser: &Self::Analyser, out: &mut [u8]);
}

/// User gestures that satisfy the autoplay policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    PointerDown,
    KeyDown,
    TouchStart,
}

impl GestureEvent {
    pub const ALL: [GestureEvent; 3] = [
        GestureEvent::PointerDown,
        GestureEvent::KeyDown,
        GestureEvent::TouchStart,
    ];

    /// DOM event type name.
    pub fn event_type(self) -> &'static str {
        match self {
            GestureEvent::PointerDown => "pointerdown",
            GestureEvent::KeyDown => "keydown",
            GestureEvent::TouchStart => "touchstart",
        }
    }
}

pub trait GestureTarget {
    /// Register `callback` to run on the next `event`, then never again.
    fn listen_once(&self, event: GestureEvent, callback: Box<dyn FnOnce()>);
}
