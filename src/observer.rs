use crate::core::{SketchId, VisibilityController, VisibilityEntry};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

/// The page's single `IntersectionObserver`, forwarding batches to the
/// visibility controller.
pub struct VisibilityObserver {
    observer: web::IntersectionObserver,
    _callback: ObserverCallback,
}

fn to_entry(value: JsValue) -> Option<VisibilityEntry> {
    let entry: web::IntersectionObserverEntry = value.dyn_into().ok()?;
    let id = entry.target().id();
    if id.is_empty() {
        return None;
    }
    Some(VisibilityEntry::new(
        SketchId::new(id),
        entry.is_intersecting(),
        entry.intersection_ratio(),
    ))
}

impl VisibilityObserver {
    pub fn new(controller: Rc<RefCell<VisibilityController>>) -> anyhow::Result<Self> {
        let threshold = controller.borrow().threshold();
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                let batch: SmallVec<[VisibilityEntry; 4]> =
                    entries.iter().filter_map(to_entry).collect();
                let Ok(mut ctl) = controller.try_borrow_mut() else {
                    log::warn!("[visibility] controller busy; batch dropped");
                    return;
                };
                for t in ctl.apply_batch(&batch, instant::now()) {
                    log::info!("[visibility] {} {:?}", t.id, t.kind);
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = web::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        )
        .map_err(|e| anyhow::anyhow!("IntersectionObserver: {:?}", e))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &web::Element) {
        self.observer.observe(target);
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}
