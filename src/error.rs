use crate::graph::ElementKey;
use std::fmt;

#[derive(Debug)]
pub enum VisualizerError {
    Graph(GraphError),
    Playback(PlaybackError),
    Config(ConfigError),
}

/// Failures raised by the audio graph or one of its nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No audio-processing capability on this platform.
    Unsupported { reason: String },
    /// The element already feeds a source node created elsewhere.
    DuplicateSource { key: ElementKey },
    /// The source already feeds the target node.
    DuplicateConnection { reason: String },
    Disconnect { reason: String },
    Analyser { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    EmptyPlaylist,
    TrackOutOfRange { index: usize, len: usize },
    AutoplayRejected { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    FftSize(u32),
    Smoothing(f64),
    BarGeometry { field: &'static str, value: f64 },
    Gradient(String),
    Parse(String),
}

impl fmt::Display for VisualizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizerError::Graph(e) => write!(f, "Audio graph error: {e}"),
            VisualizerError::Playback(e) => write!(f, "Playback error: {e}"),
            VisualizerError::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for VisualizerError {}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Unsupported { reason } => {
                write!(f, "Audio processing unsupported: {reason}")
            }
            GraphError::DuplicateSource { key } => {
                write!(f, "Media element {key} already has a source node")
            }
            GraphError::DuplicateConnection { reason } => {
                write!(f, "Source already connected: {reason}")
            }
            GraphError::Disconnect { reason } => write!(f, "Disconnect failed: {reason}"),
            GraphError::Analyser { reason } => write!(f, "Analyser setup failed: {reason}"),
        }
    }
}

impl std::error::Error for GraphError {}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::EmptyPlaylist => write!(f, "Playlist has no tracks"),
            PlaybackError::TrackOutOfRange { index, len } => {
                write!(f, "Track {index} out of range for playlist of {len}")
            }
            PlaybackError::AutoplayRejected { reason } => write!(f, "Auto-play blocked: {reason}"),
        }
    }
}

impl std::error::Error for PlaybackError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FftSize(size) => {
                write!(f, "fftSize {size} must be a power of two in 32..=32768")
            }
            ConfigError::Smoothing(s) => write!(f, "smoothing {s} must be in [0, 1)"),
            ConfigError::BarGeometry { field, value } => write!(f, "invalid {field}: {value}"),
            ConfigError::Gradient(msg) => write!(f, "invalid gradient: {msg}"),
            ConfigError::Parse(msg) => write!(f, "could not parse config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<GraphError> for VisualizerError {
    fn from(e: GraphError) -> Self {
        VisualizerError::Graph(e)
    }
}

impl From<PlaybackError> for VisualizerError {
    fn from(e: PlaybackError) -> Self {
        VisualizerError::Playback(e)
    }
}

impl From<ConfigError> for VisualizerError {
    fn from(e: ConfigError) -> Self {
        VisualizerError::Config(e)
    }
}
