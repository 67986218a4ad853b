use crate::core::SharedInstance;
use crate::dom;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A mounted card: its container and the instance drawn into it.
#[derive(Clone)]
pub struct ResizeTarget {
    pub container: web::HtmlElement,
    pub instance: SharedInstance,
}

pub fn resize_all(targets: &[ResizeTarget]) {
    let now = instant::now();
    for t in targets {
        let size = dom::container_size(&t.container);
        match t.instance.try_borrow_mut() {
            Ok(mut inst) => inst.resize(size, now),
            Err(_) => log::warn!("[resize] instance busy; skipped"),
        }
    }
}

pub fn wire_window_resize(targets: Rc<Vec<ResizeTarget>>) {
    let closure = Closure::wrap(Box::new(move || {
        resize_all(&targets);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
