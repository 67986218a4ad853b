// Host-side tests for tap normalization and dispatch.

use glam::Vec2;
use preview_sketches::core::*;
use smallvec::smallvec;

fn started_ball() -> BallSketch {
    let mut ball = BallSketch::new(1);
    ball.initialize(SurfaceSize::new(200.0, 300.0), 0.0);
    ball.activate();
    ball
}

#[test]
fn pointer_resolves_to_its_position() {
    let p = Vec2::new(12.5, 40.0);
    assert_eq!(resolve_tap(&RawInput::Pointer(p)), Some(p));
}

#[test]
fn touch_uses_only_the_first_point() {
    let input = RawInput::Touch(smallvec![Vec2::new(1.0, 2.0), Vec2::new(100.0, 270.0)]);
    assert_eq!(resolve_tap(&input), Some(Vec2::new(1.0, 2.0)));
}

#[test]
fn empty_touch_list_is_ignored() {
    assert_eq!(resolve_tap(&RawInput::Touch(smallvec![])), None);

    let mut ball = BallSketch::new(1);
    ball.initialize(SurfaceSize::new(200.0, 300.0), 0.0);
    let d = dispatch(&mut ball, &RawInput::Touch(smallvec![]), 0.0);
    assert_eq!(d, Dispatch::default());
    assert_eq!(ball.started(), Some(false));
}

#[test]
fn second_finger_on_target_does_not_count() {
    let mut ball = started_ball();
    let input = RawInput::Touch(smallvec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 270.0)]);
    let d = dispatch(&mut ball, &input, 0.0);
    assert!(!d.suppress_default);
    assert_eq!(ball.vy(), 0.0);
}

#[test]
fn touch_hit_suppresses_scrolling() {
    let mut ball = started_ball();
    let input = RawInput::Touch(smallvec![Vec2::new(110.0, 260.0)]);
    let d = dispatch(&mut ball, &input, 0.0);
    assert!(d.suppress_default);
    assert!(!d.activated);
    assert!(ball.vy() < 0.0);
}

#[test]
fn hit_region_boundary_is_exclusive() {
    let region = HitRegion::new(Vec2::new(0.0, 0.0), 10.0);
    assert!(region.contains(Vec2::new(9.999, 0.0)));
    assert!(!region.contains(Vec2::new(10.0, 0.0)));
    assert!(!region.contains(Vec2::new(0.0, -10.0)));
}

#[test]
fn ungated_sketches_never_report_activation() {
    let mut led = LedSketch::new(9);
    led.initialize(SurfaceSize::new(100.0, 100.0), 0.0);
    let d = dispatch(&mut led, &RawInput::Pointer(Vec2::new(0.0, 0.0)), 10.0);
    assert!(!d.activated);
    assert!(!d.suppress_default);
    assert_eq!(led.blink_start_ms(), 0.0);
}

#[test]
fn sketch_kind_from_markup() {
    assert_eq!(SketchKind::resolve(Some("ball"), "x"), Ok(SketchKind::Ball));
    assert_eq!(SketchKind::resolve(Some(" LED "), "x"), Ok(SketchKind::Led));
    assert_eq!(SketchKind::resolve(None, "sketch-2"), Ok(SketchKind::Audio));
    assert_eq!(
        SketchKind::resolve(None, "card-9"),
        Err(SketchError::UnknownKind("card-9".to_string()))
    );
    assert!("synth".parse::<SketchKind>().is_err());
    assert_eq!(SketchKind::Led.to_string(), "led");
}

#[test]
fn page_config_defaults_and_overrides() {
    let cfg = PageConfig::default();
    assert_eq!(cfg.container_selector, ".preview-sketch");
    assert_eq!(cfg.visibility_threshold, 0.1);
    assert_eq!(cfg.audio_src_for(None), "audio.ogg");
    assert_eq!(cfg.audio_src_for(Some("  ")), "audio.ogg");
    assert_eq!(cfg.audio_src_for(Some("/media/loop.mp3")), "/media/loop.mp3");
    // 15 fps on a 60 Hz display ticks every fourth frame
    let interval = cfg.frame_interval_ms();
    assert!(interval <= 4.0 * 1000.0 / 60.0);
    assert!(interval > 3.0 * 1000.0 / 60.0);
}
