#![cfg(target_arch = "wasm32")]

use glam::Vec2;
use preview_sketches::canvas::CanvasSurface;
use preview_sketches::core::*;
use preview_sketches::frame::RafLoop;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn test_canvas(width: u32, height: u32) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_surface_reports_backing_size() {
    let surface = CanvasSurface::new(test_canvas(240, 160)).expect("2d context");
    let size = surface.size();
    assert_eq!((size.width, size.height), (240.0, 160.0));
}

#[wasm_bindgen_test]
fn led_paints_onto_a_real_canvas() {
    let mut surface = CanvasSurface::new(test_canvas(200, 200)).expect("2d context");
    let now = instant::now();
    let mut led = LedSketch::new(1);
    led.initialize(surface.size(), now);
    // sin(0) is not above zero, so the blink starts dark
    assert!(!led.is_on_at(now));
    assert!(led.is_on_at(now + 20.0));
    led.render(surface.painter(), Frame { now_ms: now, count: 0 });

    let ctx = surface
        .canvas()
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::CanvasRenderingContext2d>()
        .unwrap();
    let centre = Vec2::new(100.0, 110.0);
    let pixel = ctx
        .get_image_data(centre.x as f64, centre.y as f64, 1.0, 1.0)
        .unwrap()
        .data();
    // body is drawn in a dim colour over the light background
    assert!(pixel[3] > 0);
}

// Resolves inside the next animation frame, after the callbacks queued before it.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        _ = web_sys::window().unwrap().request_animation_frame(&resolve);
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test(async)]
async fn raf_loop_runs_a_single_chain() {
    let surface = CanvasSurface::new(test_canvas(120, 120)).expect("2d context");
    let frame_loop = RafLoop::new(0.0);
    let binder = frame_loop.binder();
    let instance = SketchInstance::new(
        SketchId::new("raf-led"),
        SketchVariant::new(SketchKind::Led, "audio.ogg", 3),
        Box::new(surface),
        Box::new(frame_loop),
    )
    .shared();
    instance.borrow_mut().initialize(instant::now());
    binder.bind(&instance, |_| {});

    {
        let mut inst = instance.borrow_mut();
        let now = instant::now();
        inst.reveal(now);
        inst.reveal(now);
        // suspend and resume before the queued callback fires
        inst.conceal();
        inst.reveal(now);
        assert!(inst.is_running());
    }

    next_frame().await;
    assert_eq!(instance.borrow().frame_count(), 1);
    next_frame().await;
    assert_eq!(instance.borrow().frame_count(), 2);

    instance.borrow_mut().conceal();
    next_frame().await;
    next_frame().await;
    assert_eq!(instance.borrow().frame_count(), 2);
}
