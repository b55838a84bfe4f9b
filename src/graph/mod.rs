//! Audio graph — the shared context, the element → source registry and the
//! per-visualizer analyser wiring.
//!
//! Nothing here talks to the browser directly. The host supplies an
//! [`AudioBackend`]; the `web` module provides the Web Audio one.

pub mod analyser;
pub mod backend;
pub mod manager;

pub use analyser::{AnalyserSettings, AnalyserWiring, Rewire};
pub use backend::{AudioBackend, ContextState, ElementKey, GestureEvent, GestureTarget};
pub use manager::AudioGraph;
