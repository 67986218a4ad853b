use super::color::Rgba;
use super::input::{HitRegion, TapPoint};
use super::paint::{Painter, SurfaceSize};
use super::sketch::{Frame, Sketch};
use crate::constants::*;
use glam::Vec2;
use rand::prelude::*;

/// Ball dropped onto a floor line. Sits at rest until the card is first
/// tapped; afterwards gravity runs every tick and direct hits kick it upward.
pub struct BallSketch {
    size: SurfaceSize,
    y: f32,
    vy: f32,
    color: Rgba,
    started: bool,
    rng: StdRng,
}

impl BallSketch {
    pub fn new(seed: u64) -> Self {
        let size = SurfaceSize::new(1.0, 1.0);
        Self {
            size,
            y: rest_y(size),
            vy: 0.0,
            color: Rgba::from_rgb(BRAND_RGB),
            started: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn vy(&self) -> f32 {
        self.vy
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.size.width * 0.5, self.y)
    }

    /// Lowest y the centre may reach without crossing the floor line.
    pub fn floor_y(&self) -> f32 {
        rest_y(self.size)
    }

    fn kick(&mut self) {
        self.vy = BALL_KICK_VELOCITY;
        self.color = Rgba::random_ball(&mut self.rng);
    }
}

#[inline]
fn rest_y(size: SurfaceSize) -> f32 {
    size.height - BALL_FLOOR_OFFSET - BALL_RADIUS
}

impl Sketch for BallSketch {
    fn initialize(&mut self, size: SurfaceSize, _now_ms: f64) {
        self.size = size;
        if !self.started {
            self.y = rest_y(size);
            self.vy = 0.0;
        }
    }

    fn step(&mut self, _frame: Frame) {
        if !self.started {
            return;
        }
        self.vy += BALL_GRAVITY;
        self.y += self.vy;

        let floor = rest_y(self.size);
        if self.y > floor {
            self.y = floor;
            self.vy *= BALL_BOUNCE;
            if self.vy.abs() < BALL_REST_THRESHOLD {
                self.vy = 0.0;
            }
        }
        if self.y < BALL_RADIUS {
            self.y = BALL_RADIUS;
            self.vy *= BALL_BOUNCE;
        }
    }

    fn render(&self, painter: &mut dyn Painter, _frame: Frame) {
        painter.background(Rgba::from_rgb(BACKGROUND_RGB).with_alpha(BALL_TRAIL_ALPHA));

        let floor_line = self.size.height - BALL_FLOOR_OFFSET;
        painter.set_stroke(Some(Rgba::gray(BALL_FLOOR_GRAY)));
        painter.set_stroke_weight(1.0);
        painter.line(Vec2::new(0.0, floor_line), Vec2::new(self.size.width, floor_line));

        painter.set_stroke(None);
        painter.set_fill(Some(self.color));
        painter.circle(self.center(), BALL_RADIUS * 2.0);
    }

    fn on_interact(&mut self, _tap: TapPoint, _now_ms: f64) {
        self.kick();
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.size = size;
        // A running ball keeps its position; the next tick clamps it.
        if !self.started {
            self.y = rest_y(size);
        }
    }

    fn hit_region(&self) -> HitRegion {
        HitRegion::new(self.center(), BALL_RADIUS * BALL_HIT_RADIUS_MULTIPLE)
    }

    fn started(&self) -> Option<bool> {
        Some(self.started)
    }

    fn activate(&mut self) -> bool {
        let was = self.started;
        self.started = true;
        !was
    }
}
