use crate::audio::WebAudioPlayer;
use crate::core::{RawInput, SharedInstance};
use glam::Vec2;
use smallvec::SmallVec;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub instance: SharedInstance,
    pub audio: Option<Rc<WebAudioPlayer>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_touchstart(&w);
    wire_pointermove(&w);
    wire_pointerleave(&w);
}

// ---------------- Coordinate helpers ----------------
#[inline]
pub fn client_to_canvas_px(canvas: &web::HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width();
    let h = rect.height();
    if w <= 0.0 || h <= 0.0 {
        return Vec2::new(client_x as f32, client_y as f32);
    }
    let sx = (client_x - rect.left()) / w * canvas.width() as f64;
    let sy = (client_y - rect.top()) / h * canvas.height() as f64;
    Vec2::new(sx as f32, sy as f32)
}

// Only touches that started on this canvas; a finger resting elsewhere on the
// page must not steal the tap.
fn touches_canvas_px(
    ev: &web::TouchEvent,
    canvas: &web::HtmlCanvasElement,
) -> SmallVec<[Vec2; 4]> {
    let list = ev.target_touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| client_to_canvas_px(canvas, t.client_x() as f64, t.client_y() as f64))
        .collect()
}

/// Dispatch to the instance, then let the audio backend run whatever the tap
/// queued. Both happen inside the event callback, which the browser requires
/// for unlocking playback.
fn press(w: &InputWiring, raw: RawInput) -> bool {
    let suppress = match w.instance.try_borrow_mut() {
        Ok(mut inst) => inst.interact(&raw, instant::now()),
        Err(_) => {
            log::warn!("[input] instance busy; press dropped");
            return false;
        }
    };
    match &w.audio {
        Some(player) => player.execute(&w.instance),
        None => {
            if let Ok(mut inst) = w.instance.try_borrow_mut() {
                if let Some(audio) = inst.sketch_mut().as_audio_mut() {
                    audio.reject_commands("WebAudio unavailable");
                }
            }
        }
    }
    suppress
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        // touch presses arrive through touchstart
        if ev.pointer_type() == "touch" {
            return;
        }
        let pos = client_to_canvas_px(&w.canvas, ev.client_x() as f64, ev.client_y() as f64);
        if press(&w, RawInput::Pointer(pos)) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_touchstart(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
        let points = touches_canvas_px(&ev, &w.canvas);
        if press(&w, RawInput::Touch(points)) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    // must not be passive, otherwise preventDefault cannot stop the scroll
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    _ = canvas_for_listener.add_event_listener_with_callback_and_add_event_listener_options(
        "touchstart",
        closure.as_ref().unchecked_ref(),
        &opts,
    );
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = client_to_canvas_px(&w.canvas, ev.client_x() as f64, ev.client_y() as f64);
        if let Ok(mut inst) = w.instance.try_borrow_mut() {
            inst.pointer_moved(pos);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        if let Ok(mut inst) = w.instance.try_borrow_mut() {
            inst.pointer_moved(Vec2::splat(f32::INFINITY));
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}
