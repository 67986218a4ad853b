//! Visibility-gated frame loops.
//!
//! Each card owns a [`SketchInstance`] that couples its sketch, its drawing
//! surface and a [`FrameLoop`] handle. A single [`VisibilityController`],
//! passed explicitly to whoever needs it, receives intersection batches and
//! resumes or suspends the loops. Suspension only stops tick delivery; sketch
//! state is left untouched.

use super::input::{self, Dispatch, RawInput, TapPoint};
use super::paint::{Surface, SurfaceSize};
use super::sketch::{Frame, Sketch, SketchKind, SketchVariant};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Host timer that delivers ticks to one instance.
///
/// Implementations must keep at most one tick chain alive: `resume` on a
/// running loop is a no-op, `suspend` on a stopped one too.
pub trait FrameLoop {
    fn resume(&mut self);
    fn suspend(&mut self);
    fn is_running(&self) -> bool;
}

/// Identifier of a card container (its element id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SketchId(pub String);

impl SketchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SketchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct SketchInstance {
    id: SketchId,
    sketch: SketchVariant,
    surface: Box<dyn Surface>,
    frame_loop: Box<dyn FrameLoop>,
    visible: bool,
    frame_count: u64,
}

pub type SharedInstance = Rc<RefCell<SketchInstance>>;

impl SketchInstance {
    pub fn new(
        id: SketchId,
        sketch: SketchVariant,
        surface: Box<dyn Surface>,
        frame_loop: Box<dyn FrameLoop>,
    ) -> Self {
        Self {
            id,
            sketch,
            surface,
            frame_loop,
            visible: false,
            frame_count: 0,
        }
    }

    pub fn shared(self) -> SharedInstance {
        Rc::new(RefCell::new(self))
    }

    pub fn id(&self) -> &SketchId {
        &self.id
    }

    pub fn kind(&self) -> SketchKind {
        self.sketch.kind()
    }

    pub fn sketch(&self) -> &SketchVariant {
        &self.sketch
    }

    pub fn sketch_mut(&mut self) -> &mut SketchVariant {
        &mut self.sketch
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Set up the sketch for the surface's current size and paint its first
    /// frame. The loop stays stopped until the card is revealed.
    pub fn initialize(&mut self, now_ms: f64) {
        let size = self.surface.size();
        self.sketch.initialize(size, now_ms);
        self.repaint(now_ms);
    }

    /// Advance and draw one frame; ignored while the loop is suspended.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.frame_loop.is_running() {
            return;
        }
        self.frame_count += 1;
        let frame = Frame {
            now_ms,
            count: self.frame_count,
        };
        self.sketch.on_frame_tick(self.surface.painter(), frame);
    }

    /// Route a pointer/touch press. Returns true when the host should cancel
    /// the default scroll behaviour.
    pub fn interact(&mut self, raw: &RawInput, now_ms: f64) -> bool {
        let Dispatch {
            suppress_default,
            activated,
        } = input::dispatch(&mut self.sketch, raw, now_ms);
        if activated {
            log::info!("[input] {} started", self.id);
            if self.visible {
                self.frame_loop.resume();
            }
        }
        suppress_default
    }

    pub fn pointer_moved(&mut self, point: TapPoint) {
        self.sketch.on_pointer_move(point);
    }

    pub fn resize(&mut self, size: SurfaceSize, now_ms: f64) {
        self.surface.resize(size);
        self.sketch.on_resize(size);
        // Resizing wiped the canvas; a running loop repaints on its next tick.
        if !self.frame_loop.is_running() {
            self.repaint(now_ms);
        }
    }

    pub fn reveal(&mut self, now_ms: f64) {
        self.visible = true;
        self.sketch.on_reveal(now_ms);
        if self.sketch.started() != Some(false) {
            self.frame_loop.resume();
        }
    }

    pub fn conceal(&mut self) {
        self.visible = false;
        self.frame_loop.suspend();
    }

    fn repaint(&mut self, now_ms: f64) {
        let frame = Frame {
            now_ms,
            count: self.frame_count,
        };
        self.sketch.render(self.surface.painter(), frame);
    }
}

/// One record of an intersection batch.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry {
    pub target: SketchId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl VisibilityEntry {
    pub fn new(target: SketchId, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }

    #[inline]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    Revealed,
    Concealed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub id: SketchId,
    pub kind: TransitionKind,
}

/// Resumes and suspends every registered instance from visibility batches.
pub struct VisibilityController {
    threshold: f64,
    instances: FnvHashMap<SketchId, SharedInstance>,
}

impl VisibilityController {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            instances: FnvHashMap::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn register(&mut self, instance: SharedInstance) {
        let id = instance.borrow().id().clone();
        if self.instances.insert(id.clone(), instance).is_some() {
            log::warn!("[visibility] {} registered twice; keeping the newest", id);
        }
    }

    /// Stop tracking `id`, suspending its loop. Returns the instance if known.
    pub fn deregister(&mut self, id: &SketchId) -> Option<SharedInstance> {
        let instance = self.instances.remove(id)?;
        instance.borrow_mut().conceal();
        Some(instance)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: &SketchId) -> Option<&SharedInstance> {
        self.instances.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SketchId> {
        self.instances.keys()
    }

    pub fn apply_batch(
        &mut self,
        entries: &[VisibilityEntry],
        now_ms: f64,
    ) -> SmallVec<[Transition; 4]> {
        let mut transitions: SmallVec<[Transition; 4]> = SmallVec::new();
        for entry in entries {
            let Some(instance) = self.instances.get(&entry.target) else {
                log::debug!("[visibility] entry for unknown target {}", entry.target);
                continue;
            };
            let mut inst = instance.borrow_mut();
            if entry.is_visible(self.threshold) {
                if inst.is_visible() {
                    continue;
                }
                inst.reveal(now_ms);
                transitions.push(Transition {
                    id: entry.target.clone(),
                    kind: TransitionKind::Revealed,
                });
            } else {
                let was_visible = inst.is_visible();
                inst.conceal();
                if was_visible {
                    transitions.push(Transition {
                        id: entry.target.clone(),
                        kind: TransitionKind::Concealed,
                    });
                }
            }
        }
        for t in &transitions {
            log::debug!("[visibility] {} {:?}", t.id, t.kind);
        }
        transitions
    }
}
