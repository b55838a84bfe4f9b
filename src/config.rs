//! Visualizer configuration.
//!
//! Loaded from JSON or a JS object (via `serde-wasm-bindgen`). Every source
//! goes through [`VisualizerConfig::validate`] before the visualizer uses it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ── Defaults ────────────────────────────────────────────────

pub const DEFAULT_FFT_SIZE: u32 = 256;
pub const DEFAULT_SMOOTHING: f64 = 0.85;
pub const DEFAULT_BAR_COLOR: &str = "#f0abfc";

const MIN_FFT_SIZE: u32 = 32;
const MAX_FFT_SIZE: u32 = 32768;

// ── Types ───────────────────────────────────────────────────

/// One stop of the horizontal bar gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the surface width, in [0, 1].
    pub offset: f64,
    /// Any CSS color string.
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: &str) -> Self {
        ColorStop {
            offset,
            color: color.to_string(),
        }
    }
}

/// Analyser and bar-drawing settings for one visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerConfig {
    /// Analyser transform size. Bin count is half of this.
    pub fft_size: u32,
    /// Analyser smoothing time constant, [0, 1).
    pub smoothing: f64,
    /// Lower bound on bar width in CSS pixels.
    pub min_bar_width: f64,
    /// Widening factor applied to `width / bins`.
    pub bar_width_scale: f64,
    /// Horizontal gap between bars in CSS pixels.
    pub bar_gap: f64,
    pub gradient: Vec<ColorStop>,
    /// Color hint from the player. Only used when `solid_bars` is set.
    pub bar_color: String,
    pub solid_bars: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        VisualizerConfig {
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: DEFAULT_SMOOTHING,
            min_bar_width: 2.0,
            bar_width_scale: 2.0,
            bar_gap: 1.0,
            gradient: default_gradient(),
            bar_color: DEFAULT_BAR_COLOR.to_string(),
            solid_bars: false,
        }
    }
}

/// Purple → pink → orange.
pub fn default_gradient() -> Vec<ColorStop> {
    vec![
        ColorStop::new(0.0, "#a855f7"),
        ColorStop::new(0.5, "#ec4899"),
        ColorStop::new(1.0, "#f97316"),
    ]
}

impl VisualizerConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: VisualizerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of frequency bins the analyser will produce.
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(ConfigError::Smoothing(self.smoothing));
        }
        // NaN fails both comparisons, so these are written as "not valid".
        if !(self.min_bar_width > 0.0) {
            return Err(ConfigError::BarGeometry {
                field: "minBarWidth",
                value: self.min_bar_width,
            });
        }
        if !(self.bar_width_scale > 0.0) {
            return Err(ConfigError::BarGeometry {
                field: "barWidthScale",
                value: self.bar_width_scale,
            });
        }
        if !(self.bar_gap >= 0.0) {
            return Err(ConfigError::BarGeometry {
                field: "barGap",
                value: self.bar_gap,
            });
        }
        if self.gradient.is_empty() {
            return Err(ConfigError::Gradient("no color stops".to_string()));
        }
        if let Some(stop) = self
            .gradient
            .iter()
            .find(|s| !(0.0..=1.0).contains(&s.offset))
        {
            return Err(ConfigError::Gradient(format!(
                "offset {} outside [0, 1]",
                stop.offset
            )));
        }
        Ok(())
    }
}
