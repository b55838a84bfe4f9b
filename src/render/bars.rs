//! Bar layout — turns one frame of byte magnitudes into rectangles.

use crate::config::{ColorStop, VisualizerConfig};

use super::surface::{DrawSurface, SurfaceMetrics};

/// A filled rectangle in CSS pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stops: Vec<ColorStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarFill {
    Gradient(LinearGradient),
    Solid(String),
}

/// Fill for the current frame. The gradient spans the full width, so it is
/// rebuilt whenever the width changes.
pub fn bar_fill(config: &VisualizerConfig, width: f64) -> BarFill {
    if config.solid_bars {
        BarFill::Solid(config.bar_color.clone())
    } else {
        BarFill::Gradient(LinearGradient {
            x0: 0.0,
            y0: 0.0,
            x1: width,
            y1: 0.0,
            stops: config.gradient.clone(),
        })
    }
}

/// Bars are widened past `width / bins` since the upper half of the
/// spectrum is mostly empty.
pub fn bar_width(surface_width: f64, bin_count: usize, config: &VisualizerConfig) -> f64 {
    if bin_count == 0 {
        return config.min_bar_width;
    }
    (surface_width / bin_count as f64 * config.bar_width_scale).max(config.min_bar_width)
}

pub fn layout_bars(bins: &[u8], width: f64, height: f64, config: &VisualizerConfig) -> Vec<Bar> {
    let bar_w = bar_width(width, bins.len(), config);
    let mut x = 0.0;
    let mut bars = Vec::with_capacity(bins.len());
    for &value in bins {
        let bar_h = value as f64 / 255.0 * height;
        bars.push(Bar {
            x,
            y: height - bar_h,
            width: bar_w,
            height: bar_h,
        });
        x += bar_w + config.bar_gap;
    }
    bars
}

/// Draw one frame: clear, pick the fill, paint every bin.
pub fn paint(
    surface: &dyn DrawSurface,
    bins: &[u8],
    metrics: &SurfaceMetrics,
    config: &VisualizerConfig,
) {
    let (width, height) = (metrics.css_width, metrics.css_height);
    surface.clear(width, height);
    surface.set_fill(&bar_fill(config, width));
    for bar in layout_bars(bins, width, height, config) {
        surface.fill_rect(&bar);
    }
}
