use crate::core::{FrameLoop, SharedInstance, SketchInstance};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickClosure = Closure<dyn FnMut(f64)>;

/// Shared between the loop handle held by the instance and the RAF callback.
struct LoopState {
    running: Cell<bool>,
    // a RAF callback is queued; guards against a second tick chain
    scheduled: Cell<bool>,
    last_tick_ms: Cell<f64>,
    interval_ms: f64,
    tick: RefCell<Option<TickClosure>>,
}

impl LoopState {
    fn request(&self) {
        if self.scheduled.get() {
            return;
        }
        let Some(w) = web::window() else { return };
        if let Some(cb) = self.tick.borrow().as_ref() {
            if w.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
                self.scheduled.set(true);
            }
        }
    }
}

/// `requestAnimationFrame` loop gated to the configured frame rate.
pub struct RafLoop {
    state: Rc<LoopState>,
}

impl RafLoop {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            state: Rc::new(LoopState {
                running: Cell::new(false),
                scheduled: Cell::new(false),
                last_tick_ms: Cell::new(f64::NEG_INFINITY),
                interval_ms,
                tick: RefCell::new(None),
            }),
        }
    }

    /// Handle used to bind the loop to its instance once the instance exists.
    pub fn binder(&self) -> LoopBinder {
        LoopBinder {
            state: self.state.clone(),
        }
    }
}

impl FrameLoop for RafLoop {
    fn resume(&mut self) {
        if self.state.running.replace(true) {
            return;
        }
        self.state.request();
    }

    fn suspend(&mut self) {
        self.state.running.set(false);
    }

    fn is_running(&self) -> bool {
        self.state.running.get()
    }
}

pub struct LoopBinder {
    state: Rc<LoopState>,
}

impl LoopBinder {
    /// Install the tick callback. The callback holds the instance weakly so
    /// dropping the instance ends the chain. `before_tick` runs right before
    /// each tick with the instance borrowed.
    pub fn bind(
        self,
        instance: &SharedInstance,
        mut before_tick: impl FnMut(&mut SketchInstance) + 'static,
    ) {
        let weak: Weak<RefCell<_>> = Rc::downgrade(instance);
        let state = Rc::downgrade(&self.state);
        let closure = Closure::wrap(Box::new(move |ts: f64| {
            let Some(state) = state.upgrade() else { return };
            state.scheduled.set(false);
            if !state.running.get() {
                return;
            }
            let Some(instance) = weak.upgrade() else { return };
            if ts - state.last_tick_ms.get() >= state.interval_ms {
                state.last_tick_ms.set(ts);
                match instance.try_borrow_mut() {
                    Ok(mut inst) => {
                        before_tick(&mut inst);
                        inst.tick(instant::now());
                    }
                    Err(_) => log::warn!("[frame] instance busy; tick skipped"),
                }
            }
            state.request();
        }) as Box<dyn FnMut(f64)>);
        *self.state.tick.borrow_mut() = Some(closure);
        if self.state.running.get() {
            self.state.request();
        }
    }
}
