//! `<canvas>` 2D surface.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::render::{Bar, BarFill, DrawSurface};

use super::describe;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    window: Window,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
        Ok(CanvasSurface {
            canvas,
            ctx,
            window,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawSurface for CanvasSurface {
    fn css_size(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn set_backing_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_scale(&self, scale: f64) {
        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::warn!("setTransform failed: {}", describe(&e));
        }
    }

    fn clear(&self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn set_fill(&self, fill: &BarFill) {
        match fill {
            BarFill::Gradient(g) => {
                let gradient = self.ctx.create_linear_gradient(g.x0, g.y0, g.x1, g.y1);
                for stop in &g.stops {
                    if let Err(e) = gradient.add_color_stop(stop.offset as f32, &stop.color) {
                        log::warn!("Bad color stop {}: {}", stop.color, describe(&e));
                    }
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            BarFill::Solid(color) => self.ctx.set_fill_style_str(color),
        }
    }

    fn fill_rect(&self, bar: &Bar) {
        self.ctx.fill_rect(bar.x, bar.y, bar.width, bar.height);
    }
}
