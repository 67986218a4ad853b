use crate::core::{Painter, Rgba, Surface, SurfaceSize};
use crate::dom;
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `Surface` backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    fill: Option<Rgba>,
    stroke: Option<Rgba>,
    stroke_weight: f32,
    // fill/stroke are restored alongside the context transform
    saved: Vec<(Option<Rgba>, Option<Rgba>, f32)>,
}

impl CanvasSurface {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext(2d): {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            canvas,
            ctx,
            fill: Some(Rgba::gray(255)),
            stroke: Some(Rgba::gray(0)),
            stroke_weight: 1.0,
            saved: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    fn apply_styles(&self) {
        if let Some(f) = self.fill {
            self.ctx.set_fill_style_str(&f.to_css());
        }
        if let Some(s) = self.stroke {
            self.ctx.set_stroke_style_str(&s.to_css());
            self.ctx.set_line_width(self.stroke_weight as f64);
        }
    }

    /// Fill and/or stroke the current path.
    fn finish_path(&self) {
        self.apply_styles();
        if self.fill.is_some() {
            self.ctx.fill();
        }
        if self.stroke.is_some() {
            self.ctx.stroke();
        }
    }
}

impl Painter for CanvasSurface {
    fn background(&mut self, color: Rgba) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.save();
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.restore();
    }

    fn set_fill(&mut self, color: Option<Rgba>) {
        self.fill = color;
    }

    fn set_stroke(&mut self, color: Option<Rgba>) {
        self.stroke = color;
    }

    fn set_stroke_weight(&mut self, weight: f32) {
        self.stroke_weight = weight;
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        let Some(s) = self.stroke else { return };
        self.ctx.set_stroke_style_str(&s.to_css());
        self.ctx.set_line_width(self.stroke_weight as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn ellipse(&mut self, center: Vec2, width: f32, height: f32) {
        self.ctx.begin_path();
        _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            (width * 0.5) as f64,
            (height * 0.5) as f64,
            0.0,
            0.0,
            TAU,
        );
        self.finish_path();
    }

    fn rect(&mut self, origin: Vec2, width: f32, height: f32, corner_radius: f32) {
        let (x, y) = (origin.x as f64, origin.y as f64);
        let (w, h) = (width as f64, height as f64);
        let r = (corner_radius as f64).min(w * 0.5).min(h * 0.5).max(0.0);
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        _ = self.ctx.arc_to(x + w, y, x + w, y + h, r);
        _ = self.ctx.arc_to(x + w, y + h, x, y + h, r);
        _ = self.ctx.arc_to(x, y + h, x, y, r);
        _ = self.ctx.arc_to(x, y, x + w, y, r);
        self.ctx.close_path();
        self.finish_path();
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        self.polygon(&[a, b, c]);
    }

    fn arc(&mut self, center: Vec2, width: f32, height: f32, start: f32, stop: f32) {
        self.ctx.begin_path();
        _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            (width * 0.5) as f64,
            (height * 0.5) as f64,
            0.0,
            start as f64,
            stop as f64,
        );
        self.finish_path();
    }

    fn polygon(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.finish_path();
    }

    fn push(&mut self) {
        self.saved.push((self.fill, self.stroke, self.stroke_weight));
        self.ctx.save();
    }

    fn pop(&mut self) {
        if let Some((fill, stroke, weight)) = self.saved.pop() {
            self.fill = fill;
            self.stroke = stroke;
            self.stroke_weight = weight;
        }
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        _ = self.ctx.rotate(radians as f64);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, size: SurfaceSize) {
        dom::set_backing_size(&self.canvas, size);
    }

    fn painter(&mut self) -> &mut dyn Painter {
        self
    }
}
