use crate::audio::WebAudioPlayer;
use crate::canvas::CanvasSurface;
use crate::core::{
    PageConfig, SharedInstance, SketchId, SketchInstance, SketchKind, SketchVariant,
    VisibilityController,
};
use crate::dom;
use crate::events::{self, InputWiring, ResizeTarget};
use crate::frame::RafLoop;
use crate::observer::VisibilityObserver;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("preview-sketches starting");

    if let Err(e) = init(PageConfig::default()) {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init(config: PageConfig) -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let containers = dom::query_containers(&document, &config.container_selector)?;
    if containers.is_empty() {
        log::info!("[mount] no {} containers", config.container_selector);
        return Ok(());
    }

    let controller = Rc::new(RefCell::new(VisibilityController::new(
        config.visibility_threshold,
    )));
    let observer = Rc::new(VisibilityObserver::new(controller.clone())?);

    let mut targets = Vec::with_capacity(containers.len());
    for (i, container) in containers.into_iter().enumerate() {
        match mount(&document, &container, i, &config, &controller, &observer) {
            Ok(instance) => targets.push(ResizeTarget {
                container,
                instance,
            }),
            // one broken card must not take the others down
            Err(e) => log::warn!("[mount] container #{} skipped: {:?}", i, e),
        }
    }
    log::info!("[mount] {} sketches mounted", targets.len());

    let targets = Rc::new(targets);
    events::wire_window_resize(targets.clone());
    wire_teardown(controller, observer, targets);
    Ok(())
}

fn mount(
    document: &web::Document,
    container: &web::HtmlElement,
    index: usize,
    config: &PageConfig,
    controller: &Rc<RefCell<VisibilityController>>,
    observer: &VisibilityObserver,
) -> anyhow::Result<SharedInstance> {
    let id = dom::ensure_id(container, index);
    let kind = SketchKind::resolve(dom::data_attr(container, "sketch").as_deref(), &id)?;
    let data_src = dom::data_attr(container, "audio-src");
    let audio_src = config.audio_src_for(data_src.as_deref());

    let canvas = dom::create_canvas(document, container)?;
    let surface = CanvasSurface::new(canvas.clone())?;
    let frame_loop = RafLoop::new(config.frame_interval_ms());
    let binder = frame_loop.binder();

    let sketch = SketchVariant::new(kind, audio_src, rand::random());
    let instance = SketchInstance::new(
        SketchId::new(id.clone()),
        sketch,
        Box::new(surface),
        Box::new(frame_loop),
    )
    .shared();
    instance.borrow_mut().initialize(instant::now());

    let audio = if kind == SketchKind::Audio {
        match WebAudioPlayer::new() {
            Ok(player) => Some(player),
            Err(e) => {
                log::error!("[audio] WebAudio unavailable: {:?}", e);
                None
            }
        }
    } else {
        None
    };

    match &audio {
        Some(player) => {
            let player_tick = player.clone();
            binder.bind(&instance, move |inst| player_tick.sample_into(inst));
            schedule_preload(player.clone(), instance.clone(), config.audio_preload_delay_ms);
        }
        None => binder.bind(&instance, |_| {}),
    }

    events::wire_input_handlers(InputWiring {
        canvas,
        instance: instance.clone(),
        audio,
    });

    controller.borrow_mut().register(instance.clone());
    observer.observe(container);
    log::info!("[mount] {} -> {}", id, kind);
    Ok(instance)
}

// Decode the track in the background once the page has had time to render.
fn schedule_preload(player: Rc<WebAudioPlayer>, instance: SharedInstance, delay_ms: i32) {
    let Some(window) = web::window() else { return };
    let callback = Closure::once_into_js(move || {
        let queued = instance
            .borrow_mut()
            .sketch_mut()
            .as_audio_mut()
            .map(|a| a.preload())
            .unwrap_or(false);
        if queued {
            player.execute(&instance);
        }
    });
    _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms,
    );
}

fn wire_teardown(
    controller: Rc<RefCell<VisibilityController>>,
    observer: Rc<VisibilityObserver>,
    targets: Rc<Vec<ResizeTarget>>,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::PageTransitionEvent| {
        // pages kept in the back/forward cache come back alive
        if ev.persisted() {
            return;
        }
        observer.disconnect();
        let mut ctl = controller.borrow_mut();
        for t in targets.iter() {
            let id = t.instance.borrow().id().clone();
            ctl.deregister(&id);
        }
        log::info!("[mount] torn down");
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
