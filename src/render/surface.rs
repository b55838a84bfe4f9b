//! Drawing surface and viewport traits, and device-pixel-ratio sizing.

use std::rc::Rc;

use super::bars::{Bar, BarFill};

/// A 2D drawing surface whose coordinates are CSS pixels once scaled.
pub trait DrawSurface {
    /// Displayed size in CSS pixels.
    fn css_size(&self) -> (f64, f64);
    fn device_pixel_ratio(&self) -> f64;
    fn set_backing_size(&self, width: u32, height: u32);
    /// Replace the current transform with a uniform scale.
    fn set_scale(&self, scale: f64);
    fn clear(&self, width: f64, height: f64);
    fn set_fill(&self, fill: &BarFill);
    fn fill_rect(&self, bar: &Bar);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Source of viewport resize notifications.
pub trait Viewport {
    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId;
    fn remove_resize_listener(&self, id: ListenerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceMetrics {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

/// Match the backing store to the displayed size at the current pixel ratio.
///
/// The ratio is clamped to at least 1. After this call drawing coordinates
/// are CSS pixels.
pub fn fit_to_viewport(surface: &dyn DrawSurface) -> SurfaceMetrics {
    let dpr = surface.device_pixel_ratio();
    let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
    let (css_width, css_height) = surface.css_size();
    let css_width = css_width.max(0.0);
    let css_height = css_height.max(0.0);

    let backing_width = (css_width * dpr).floor() as u32;
    let backing_height = (css_height * dpr).floor() as u32;
    surface.set_backing_size(backing_width, backing_height);
    surface.set_scale(dpr);

    SurfaceMetrics {
        css_width,
        css_height,
        device_pixel_ratio: dpr,
        backing_width,
        backing_height,
    }
}
