//! `<canvas>`-backed drawing surface

use std::f64::consts::TAU;

use nightsky_engine::{LayerKind, NightskyError, Rgba, Size, Surface2d, Vec2};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::log;

/// Full-viewport, non-interactive canvas owned by one layer
pub struct CanvasSurface {
    layer: LayerKind,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Size,
    attached: bool,
}

impl CanvasSurface {
    /// Create the canvas and insert it into `container`, stacked by layer depth
    pub fn create(
        document: &Document,
        container: &HtmlElement,
        layer: LayerKind,
    ) -> Result<Self, NightskyError> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| unavailable(layer, "create canvas", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| unavailable(layer, "cast canvas", e))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| unavailable(layer, "get 2d context", e))?
            .ok_or_else(|| {
                NightskyError::SurfaceUnavailable(format!("{}: 2d context not supported", layer.name()))
            })?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| unavailable(layer, "cast 2d context", e))?;

        let style = canvas.style();
        let z_index = layer.depth().to_string();
        for (property, value) in [
            ("position", "fixed"),
            ("inset", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("pointer-events", "none"),
            ("z-index", z_index.as_str()),
        ] {
            style
                .set_property(property, value)
                .map_err(|e| unavailable(layer, "style canvas", e))?;
        }
        let _ = canvas.set_attribute("aria-hidden", "true");
        let _ = canvas.set_attribute("data-layer", layer.name());

        container
            .append_child(&canvas)
            .map_err(|e| unavailable(layer, "attach canvas", e))?;

        Ok(Self {
            layer,
            canvas,
            ctx,
            size: Size::ZERO,
            attached: true,
        })
    }

    fn begin_circle(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
            .is_ok()
    }
}

fn unavailable(layer: LayerKind, step: &str, err: impl Into<JsValue>) -> NightskyError {
    NightskyError::SurfaceUnavailable(format!("{}: {} failed: {:?}", layer.name(), step, err.into()))
}

impl Surface2d for CanvasSurface {
    fn resize(&mut self, css_size: Size, device_pixel_ratio: f64) {
        let (width, height) = css_size.to_device_pixels(device_pixel_ratio);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let ratio = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
        if let Err(e) = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0) {
            log(&format!("[{}] set_transform failed: {:?}", self.layer.name(), e));
        }
        self.size = css_size;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        if !self.attached {
            return;
        }
        self.ctx
            .clear_rect(0.0, 0.0, self.size.width as f64, self.size.height as f64);
    }

    fn fill_solid(&mut self, color: Rgba) {
        if !self.attached {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(0.0, 0.0, self.size.width as f64, self.size.height as f64);
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        if !self.attached || radius <= 0.0 {
            return;
        }
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(gradient) => gradient,
            Err(_) => return,
        };
        if gradient.add_color_stop(0.0, &inner.to_css()).is_err()
            || gradient.add_color_stop(1.0, &outer.to_css()).is_err()
        {
            return;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        if self.begin_circle(center, radius) {
            self.ctx.fill();
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !self.attached {
            return;
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !self.attached {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        if self.begin_circle(center, radius) {
            self.ctx.fill();
        }
    }

    fn detach(&mut self) {
        if self.attached {
            self.canvas.remove();
            self.attached = false;
        }
    }
}
