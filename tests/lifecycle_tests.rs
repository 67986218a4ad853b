// Host-side tests for the visibility lifecycle controller and instances.

mod common;

use common::{ball_of, harness, led_start_of, tap, Harness};
use preview_sketches::core::*;

fn visible(id: &str) -> VisibilityEntry {
    VisibilityEntry::new(SketchId::new(id), true, 0.5)
}

fn hidden(id: &str) -> VisibilityEntry {
    VisibilityEntry::new(SketchId::new(id), false, 0.0)
}

fn controller_with(harnesses: &[&Harness]) -> VisibilityController {
    let mut ctl = VisibilityController::new(0.1);
    for h in harnesses {
        ctl.register(h.instance.clone());
    }
    ctl
}

#[test]
fn initialize_paints_once_and_leaves_loop_stopped() {
    let h = harness("sketch-1", SketchKind::Ball, 200.0, 300.0, 0.0);
    assert!(!h.ops.borrow().is_empty());
    assert!(!h.probe.running.get());
    assert_eq!(h.probe.starts.get(), 0);
}

#[test]
fn threshold_gates_visibility() {
    let entry = VisibilityEntry::new(SketchId::new("a"), true, 0.05);
    assert!(!entry.is_visible(0.1));
    let entry = VisibilityEntry::new(SketchId::new("a"), true, 0.1);
    assert!(entry.is_visible(0.1));
    let entry = VisibilityEntry::new(SketchId::new("a"), false, 0.4);
    assert!(!entry.is_visible(0.1));
}

#[test]
fn reveal_resumes_ungated_sketches() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let audio = harness("audio", SketchKind::Audio, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led, &audio]);

    let transitions = ctl.apply_batch(&[visible("led"), visible("audio")], 100.0);
    assert_eq!(transitions.len(), 2);
    assert!(transitions
        .iter()
        .all(|t| t.kind == TransitionKind::Revealed));
    assert!(led.probe.running.get());
    assert!(audio.probe.running.get());
}

#[test]
fn reveal_does_not_resume_an_unstarted_ball() {
    let ball = harness("ball", SketchKind::Ball, 200.0, 300.0, 0.0);
    let mut ctl = controller_with(&[&ball]);
    ctl.apply_batch(&[visible("ball")], 10.0);
    assert!(ball.instance.borrow().is_visible());
    assert!(!ball.probe.running.get());
}

#[test]
fn first_tap_on_visible_ball_starts_its_loop() {
    let ball = harness("ball", SketchKind::Ball, 200.0, 300.0, 0.0);
    let mut ctl = controller_with(&[&ball]);
    ctl.apply_batch(&[visible("ball")], 10.0);

    let suppress = ball.instance.borrow_mut().interact(&tap(5.0, 5.0), 20.0);
    assert!(!suppress);
    assert!(ball.probe.running.get());
    let (y, vy, started) = ball_of(&ball.instance);
    assert!(started);
    assert_eq!((y, vy), (270.0, 0.0));
}

#[test]
fn ball_started_while_hidden_resumes_on_next_reveal() {
    let ball = harness("ball", SketchKind::Ball, 200.0, 300.0, 0.0);
    let mut ctl = controller_with(&[&ball]);

    assert!(ball.instance.borrow_mut().interact(&tap(100.0, 270.0), 0.0));
    assert!(!ball.probe.running.get());

    ctl.apply_batch(&[visible("ball")], 50.0);
    assert!(ball.probe.running.get());
}

#[test]
fn concealing_suspends_and_ticks_become_no_ops() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    ctl.apply_batch(&[visible("led")], 0.0);
    led.instance.borrow_mut().tick(66.0);
    assert_eq!(led.instance.borrow().frame_count(), 1);

    let transitions = ctl.apply_batch(&[hidden("led")], 100.0);
    assert_eq!(transitions[0].kind, TransitionKind::Concealed);
    assert!(!led.probe.running.get());

    let painted = led.ops.borrow().len();
    led.instance.borrow_mut().tick(166.0);
    assert_eq!(led.instance.borrow().frame_count(), 1);
    assert_eq!(led.ops.borrow().len(), painted);
}

#[test]
fn suspension_preserves_ball_state() {
    let run = |suspend_midway: bool| {
        let ball = harness("ball", SketchKind::Ball, 200.0, 300.0, 0.0);
        let mut ctl = controller_with(&[&ball]);
        ctl.apply_batch(&[visible("ball")], 0.0);
        ball.instance.borrow_mut().interact(&tap(100.0, 270.0), 0.0);
        for i in 0..6 {
            ball.instance.borrow_mut().tick(i as f64 * 66.0);
        }
        if suspend_midway {
            ctl.apply_batch(&[hidden("ball")], 400.0);
            for i in 0..20 {
                ball.instance.borrow_mut().tick(500.0 + i as f64);
            }
            ctl.apply_batch(&[visible("ball")], 9_000.0);
        }
        for i in 0..6 {
            ball.instance.borrow_mut().tick(10_000.0 + i as f64 * 66.0);
        }
        ball_of(&ball.instance)
    };
    assert_eq!(run(true), run(false));
}

#[test]
fn every_reveal_replays_the_led_blink() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);

    ctl.apply_batch(&[visible("led")], 1_000.0);
    assert_eq!(led_start_of(&led.instance), 1_000.0);

    // still visible: not a reveal
    ctl.apply_batch(&[visible("led")], 2_000.0);
    assert_eq!(led_start_of(&led.instance), 1_000.0);

    ctl.apply_batch(&[hidden("led")], 3_000.0);
    ctl.apply_batch(&[visible("led")], 4_000.0);
    assert_eq!(led_start_of(&led.instance), 4_000.0);
}

#[test]
fn at_most_one_loop_per_instance() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    for i in 0..5 {
        ctl.apply_batch(&[visible("led"), visible("led")], i as f64);
    }
    assert_eq!(led.probe.starts.get(), 1);

    ctl.apply_batch(&[hidden("led")], 10.0);
    ctl.apply_batch(&[visible("led")], 20.0);
    assert_eq!(led.probe.starts.get(), 2);
}

#[test]
fn hidden_report_suspends_even_without_a_prior_reveal() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    let transitions = ctl.apply_batch(&[hidden("led")], 0.0);
    assert!(transitions.is_empty());
    assert_eq!(led.probe.suspends.get(), 1);
}

#[test]
fn unknown_targets_are_ignored() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    let transitions = ctl.apply_batch(&[visible("nope")], 0.0);
    assert!(transitions.is_empty());
    assert!(!led.probe.running.get());
}

#[test]
fn deregister_suspends_and_forgets() {
    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    ctl.apply_batch(&[visible("led")], 0.0);
    assert_eq!(ctl.len(), 1);

    assert!(ctl.deregister(&SketchId::new("led")).is_some());
    assert!(ctl.is_empty());
    assert!(!led.probe.running.get());
    assert!(ctl.deregister(&SketchId::new("led")).is_none());
    assert!(ctl.apply_batch(&[visible("led")], 1.0).is_empty());
}

#[test]
fn resize_repaints_stopped_instances_only() {
    let ball = harness("ball", SketchKind::Ball, 200.0, 300.0, 0.0);
    let before = ball.ops.borrow().len();
    ball.instance
        .borrow_mut()
        .resize(SurfaceSize::new(200.0, 400.0), 5.0);
    assert!(ball.ops.borrow().len() > before);
    assert_eq!(ball_of(&ball.instance).0, 370.0);

    let led = harness("led", SketchKind::Led, 200.0, 200.0, 0.0);
    let mut ctl = controller_with(&[&led]);
    ctl.apply_batch(&[visible("led")], 0.0);
    let before = led.ops.borrow().len();
    led.instance
        .borrow_mut()
        .resize(SurfaceSize::new(300.0, 200.0), 5.0);
    assert_eq!(led.ops.borrow().len(), before);
}
