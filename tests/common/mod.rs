// Test doubles for the host side: a surface that records draw calls and a
// frame loop driven by hand.

#![allow(dead_code)]

use glam::Vec2;
use preview_sketches::core::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Background(Rgba),
    Line(Vec2, Vec2),
    Ellipse {
        center: Vec2,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
    },
    Rect(Vec2, f32, f32),
    Triangle,
    Arc(Vec2, f32, f32),
    Polygon(usize),
    Push,
    Pop,
    Translate(Vec2),
    Rotate(f32),
}

pub struct RecordingSurface {
    size: SurfaceSize,
    fill: Option<Rgba>,
    pub ops: Rc<RefCell<Vec<Op>>>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            fill: None,
            ops: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Painter for RecordingSurface {
    fn background(&mut self, color: Rgba) {
        self.ops.borrow_mut().push(Op::Background(color));
    }
    fn set_fill(&mut self, color: Option<Rgba>) {
        self.fill = color;
    }
    fn set_stroke(&mut self, _color: Option<Rgba>) {}
    fn set_stroke_weight(&mut self, _weight: f32) {}
    fn line(&mut self, from: Vec2, to: Vec2) {
        self.ops.borrow_mut().push(Op::Line(from, to));
    }
    fn ellipse(&mut self, center: Vec2, width: f32, height: f32) {
        let fill = self.fill;
        self.ops.borrow_mut().push(Op::Ellipse {
            center,
            width,
            height,
            fill,
        });
    }
    fn rect(&mut self, origin: Vec2, width: f32, height: f32, _corner_radius: f32) {
        self.ops.borrow_mut().push(Op::Rect(origin, width, height));
    }
    fn triangle(&mut self, _a: Vec2, _b: Vec2, _c: Vec2) {
        self.ops.borrow_mut().push(Op::Triangle);
    }
    fn arc(&mut self, center: Vec2, width: f32, height: f32, _start: f32, _stop: f32) {
        self.ops.borrow_mut().push(Op::Arc(center, width, height));
    }
    fn polygon(&mut self, points: &[Vec2]) {
        self.ops.borrow_mut().push(Op::Polygon(points.len()));
    }
    fn push(&mut self) {
        self.ops.borrow_mut().push(Op::Push);
    }
    fn pop(&mut self) {
        self.ops.borrow_mut().push(Op::Pop);
    }
    fn translate(&mut self, offset: Vec2) {
        self.ops.borrow_mut().push(Op::Translate(offset));
    }
    fn rotate(&mut self, radians: f32) {
        self.ops.borrow_mut().push(Op::Rotate(radians));
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }
    fn painter(&mut self) -> &mut dyn Painter {
        self
    }
}

#[derive(Default)]
pub struct LoopProbe {
    pub running: Cell<bool>,
    /// resume() calls that actually started the loop
    pub starts: Cell<u32>,
    pub suspends: Cell<u32>,
}

pub struct ManualLoop {
    pub probe: Rc<LoopProbe>,
}

impl ManualLoop {
    pub fn new() -> Self {
        Self {
            probe: Rc::new(LoopProbe::default()),
        }
    }
}

impl FrameLoop for ManualLoop {
    fn resume(&mut self) {
        if !self.probe.running.replace(true) {
            self.probe.starts.set(self.probe.starts.get() + 1);
        }
    }
    fn suspend(&mut self) {
        self.probe.running.set(false);
        self.probe.suspends.set(self.probe.suspends.get() + 1);
    }
    fn is_running(&self) -> bool {
        self.probe.running.get()
    }
}

pub struct Harness {
    pub instance: SharedInstance,
    pub ops: Rc<RefCell<Vec<Op>>>,
    pub probe: Rc<LoopProbe>,
}

/// Build and initialize an instance of `kind` on a `width`×`height` surface.
pub fn harness(id: &str, kind: SketchKind, width: f32, height: f32, now_ms: f64) -> Harness {
    let surface = RecordingSurface::new(width, height);
    let ops = surface.ops.clone();
    let frame_loop = ManualLoop::new();
    let probe = frame_loop.probe.clone();
    let instance = SketchInstance::new(
        SketchId::new(id),
        SketchVariant::new(kind, "audio.ogg", 7),
        Box::new(surface),
        Box::new(frame_loop),
    )
    .shared();
    instance.borrow_mut().initialize(now_ms);
    Harness {
        instance,
        ops,
        probe,
    }
}

pub fn tap(x: f32, y: f32) -> RawInput {
    RawInput::Pointer(Vec2::new(x, y))
}

pub fn ball_of(instance: &SharedInstance) -> (f32, f32, bool) {
    match instance.borrow().sketch() {
        SketchVariant::Ball(b) => (b.y(), b.vy(), b.started() == Some(true)),
        _ => panic!("not a ball sketch"),
    }
}

pub fn led_start_of(instance: &SharedInstance) -> f64 {
    match instance.borrow().sketch() {
        SketchVariant::Led(l) => l.blink_start_ms(),
        _ => panic!("not an LED sketch"),
    }
}
