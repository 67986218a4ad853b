//! Drawing abstraction between the sketches and the canvas host.
//!
//! The sketches only ever talk to a [`Painter`]; the web layer implements it on
//! top of `CanvasRenderingContext2d` and the tests implement it with a recorder.
//! State follows the familiar fill/stroke model: shapes are filled with the
//! current fill (if any) and outlined with the current stroke (if any).

use super::color::Rgba;
use glam::Vec2;

/// Pixel size of a render surface. Both sides are at least one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

pub trait Painter {
    /// Cover the whole surface; translucent colours leave a trail.
    fn background(&mut self, color: Rgba);
    fn set_fill(&mut self, color: Option<Rgba>);
    fn set_stroke(&mut self, color: Option<Rgba>);
    fn set_stroke_weight(&mut self, weight: f32);

    fn line(&mut self, from: Vec2, to: Vec2);
    fn ellipse(&mut self, center: Vec2, width: f32, height: f32);
    fn rect(&mut self, origin: Vec2, width: f32, height: f32, corner_radius: f32);
    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2);
    /// Elliptical arc; angles in radians, clockwise from +x like the canvas.
    fn arc(&mut self, center: Vec2, width: f32, height: f32, start: f32, stop: f32);
    /// Closed outline through `points`.
    fn polygon(&mut self, points: &[Vec2]);

    fn push(&mut self);
    fn pop(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);

    #[inline]
    fn circle(&mut self, center: Vec2, diameter: f32) {
        self.ellipse(center, diameter, diameter);
    }
}

/// A drawable surface owned by one sketch instance.
pub trait Surface: Painter {
    fn size(&self) -> SurfaceSize;
    /// Resize the backing store. Resizing clears the pixels.
    fn resize(&mut self, size: SurfaceSize);
    fn painter(&mut self) -> &mut dyn Painter;
}
