mod common;

use airkeys_core::capture::{CaptureLoop, CycleStatus, LoopOptions, Session};
use airkeys_core::detection::DetectionResult;
use airkeys_core::error::AirKeysError;
use airkeys_core::layout::KeyboardLayout;
use airkeys_core::press::PressOutcome;
use airkeys_core::render::Palette;
use common::*;
use std::time::Duration;

fn fast() -> LoopOptions {
    LoopOptions::builder().min_cycle(Duration::ZERO).build()
}

#[tokio::test]
async fn test_http_failure_still_draws_keyboard() {
    let detector = ScriptedDetector::new(vec![Err(AirKeysError::DetectorStatus {
        status: 500,
        body: "boom".into(),
    })]);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(1, 640, 480),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    );
    let mut session = Session::new("t");

    let report = capture.run_cycle(&mut session).await;

    assert_eq!(report.status, CycleStatus::Degraded);
    assert_eq!(report.detection, DetectionResult::empty());
    let surface = capture.surface();
    assert_eq!(surface.labels().len(), 31);
    assert!(surface.circles().is_empty());
    assert_eq!(session.stats.degraded, 1);
    assert_eq!(session.press.last_at(), None);
}

#[tokio::test]
async fn test_malformed_body_degrades() {
    let detector = ScriptedDetector::new(vec![Ok("<html>oops</html>".into())]);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(1, 640, 480),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    );
    let mut session = Session::new("t");
    let report = capture.run_cycle(&mut session).await;
    assert_eq!(report.status, CycleStatus::Degraded);
    assert!(capture.surface().circles().is_empty());
}

#[tokio::test]
async fn test_landmarks_are_scaled_to_surface() {
    // Detector analyzed a 320x240 frame; the surface is 640x480.
    let detector = ScriptedDetector::new(vec![Ok(hand_body((100.0, 50.0), 320.0, 240.0, None))]);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(1, 640, 480),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    );
    let mut session = Session::new("t");
    let report = capture.run_cycle(&mut session).await;

    assert_eq!(report.status, CycleStatus::Rendered);
    let circles = capture.surface().circles();
    assert_eq!(circles.len(), 22);
    let palette = Palette::default();
    assert_eq!(
        circles.last().copied(),
        Some(&DrawOp::Circle {
            cx: 200.0,
            cy: 100.0,
            r: 8.0,
            color: palette.fingertip
        })
    );
}

#[tokio::test]
async fn test_accepted_press_highlights_key() {
    let detector = ScriptedDetector::new(vec![Ok(hand_body((10.0, 10.0), 640.0, 480.0, Some("Q")))]);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(1, 640, 480),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    );
    let mut session = Session::new("t");
    let report = capture.run_cycle(&mut session).await;

    assert!(matches!(report.press, PressOutcome::Accepted(_)));
    assert_eq!(session.output.as_str(), "Q");
    let highlight = capture.surface().fills_with(Palette::default().pressed_fill);
    assert_eq!(
        highlight,
        vec![&DrawOp::FillRect {
            x: 50.0,
            y: 50.0,
            w: 85.0,
            h: 85.0,
            color: Palette::default().pressed_fill
        }]
    );
}

#[tokio::test]
async fn test_unknown_label_types_without_highlight() {
    let detector = ScriptedDetector::new(vec![Ok(hand_body((10.0, 10.0), 640.0, 480.0, Some("SPACE")))]);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(1, 640, 480),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    );
    let mut session = Session::new("t");
    capture.run_cycle(&mut session).await;
    assert_eq!(session.output.as_str(), "SPACE");
    assert!(capture
        .surface()
        .fills_with(Palette::default().pressed_fill)
        .is_empty());
}

#[tokio::test]
async fn test_grab_and_encode_failures_are_absorbed() {
    let detector = ScriptedDetector::default();
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(3, 64, 48).failing_on(1),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(fast());
    let mut session = Session::new("t");
    let stats = capture.run(&mut session).await;

    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.degraded, 1);
    assert_eq!(stats.rendered, 2);
    // The dropped frame never reached the detector.
    assert_eq!(detector.requests.borrow().len(), 2);

    let mut broken = CaptureLoop::new(
        ScriptedSource::new(2, 64, 48),
        FailingEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(fast());
    let mut session = Session::new("t2");
    let stats = broken.run(&mut session).await;
    assert_eq!(stats.degraded, 2);
    assert_eq!(broken.surface().labels().len(), 31);
}

#[tokio::test]
async fn test_inactive_source_ends_loop_without_drawing() {
    let detector = ScriptedDetector::default();
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(0, 64, 48),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(fast());
    let mut session = Session::new("t");
    let mut seen = 0;
    let stats = capture.run_with(&mut session, |_, _, _| seen += 1).await;

    assert_eq!(seen, 0);
    assert_eq!(stats.cycles, 0);
    assert!(capture.surface().ops.is_empty());
    assert!(detector.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_one_request_per_cycle_in_order() {
    let detector = ScriptedDetector::default();
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(5, 64, 48),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(fast());
    let mut session = Session::new("t");
    let mut cycles_seen = Vec::new();
    capture
        .run_with(&mut session, |report, _, s| {
            assert_eq!(report.status, CycleStatus::Rendered);
            cycles_seen.push(s.stats.cycles);
        })
        .await;

    assert_eq!(cycles_seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(detector.requests.borrow().len(), 5);
    assert!(detector
        .requests
        .borrow()
        .iter()
        .all(|r| r == "data:image/jpeg;base64,64x48"));
}

#[tokio::test]
async fn test_max_cycles_stops_loop() {
    let detector = ScriptedDetector::default();
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(100, 64, 48),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(LoopOptions::builder().min_cycle(Duration::ZERO).max_cycles(4).build());
    let mut session = Session::new("t");
    let stats = capture.run(&mut session).await;
    assert_eq!(stats.cycles, 4);
    assert_eq!(capture.source().remaining, 96);
}

#[tokio::test]
async fn test_held_press_is_debounced_across_cycles() {
    // Same key reported on every frame, frames 100 ms apart, 13 frames = 0..=1200 ms.
    let clock = ManualClock::default();
    let detector = ScriptedDetector::repeating(hand_body((60.0, 60.0), 640.0, 480.0, Some("A")), 13);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(13, 640, 480).with_clock(clock.clone(), ms(100)),
        TagEncoder,
        &detector,
        clock.clone(),
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    )
    .with_options(fast());
    let mut session = Session::new("t");
    let stats = capture.run(&mut session).await;

    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.debounced, 10);
    assert_eq!(session.output.as_str(), "AAA");
    assert_eq!(session.press.last_at(), Some(ms(1200)));
}

#[tokio::test]
async fn test_custom_debounce_interval() {
    let clock = ManualClock::default();
    let detector = ScriptedDetector::repeating(hand_body((60.0, 60.0), 640.0, 480.0, Some("A")), 4);
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(4, 640, 480).with_clock(clock.clone(), ms(100)),
        TagEncoder,
        &detector,
        clock,
        RecordingSurface::new(640, 480),
        KeyboardLayout::default(),
    )
    .with_debounce(ms(50))
    .with_options(fast());
    let mut session = Session::new("t");
    let stats = capture.run(&mut session).await;
    assert_eq!(stats.accepted, 4);
    assert_eq!(capture.resolver().interval(), ms(50));
}

#[tokio::test(start_paused = true)]
async fn test_fast_detector_is_paced_to_min_cycle() {
    let detector = ScriptedDetector::default();
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(100, 64, 48),
        TagEncoder,
        &detector,
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(LoopOptions::builder().min_cycle(ms(100)).max_cycles(5).build());
    let mut session = Session::new("t");

    let started = tokio::time::Instant::now();
    let stats = capture.run(&mut session).await;
    let elapsed = started.elapsed();

    assert_eq!(stats.cycles, 5);
    assert!(elapsed >= ms(400), "cycles started too fast: {:?}", elapsed);
    assert!(elapsed < ms(600), "pacing overshot: {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_slow_detector_adds_no_pacing_delay() {
    let mut capture = CaptureLoop::new(
        ScriptedSource::new(100, 64, 48),
        TagEncoder,
        SlowDetector { latency: ms(250) },
        ManualClock::default(),
        RecordingSurface::new(64, 48),
        KeyboardLayout::default(),
    )
    .with_options(LoopOptions::builder().min_cycle(ms(100)).max_cycles(5).build());
    let mut session = Session::new("t");

    let started = tokio::time::Instant::now();
    let stats = capture.run(&mut session).await;
    let elapsed = started.elapsed();

    assert_eq!(stats.cycles, 5);
    assert!(elapsed >= ms(1250));
    // Round trips already exceed the floor; no sleep on top of them.
    assert!(elapsed < ms(1350), "extra delay added: {:?}", elapsed);
}
