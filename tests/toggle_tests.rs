// Recording toggle tests: the 3-state machine and the start/stop ordering
// guarantee under randomized scheduling.

mod common;

use std::time::Duration;

use common::{frame, StubBackend};
use rand::Rng;
use talkback::{CaptureSession, RecordingToggle, ToggleState};

#[tokio::test]
async fn full_press_pair_reaches_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pair.wav");

    let backend = StubBackend::new(vec![frame(vec![1, 2], 0), frame(vec![3], 100)]);
    let session = CaptureSession::new(Box::new(backend), out.clone());
    let mut toggle = RecordingToggle::new(session);

    assert_eq!(toggle.state(), ToggleState::Idle);
    assert_eq!(toggle.press().await.unwrap(), ToggleState::Recording);
    assert_eq!(toggle.press().await.unwrap(), ToggleState::Stopped);

    let summary = toggle.take_summary().expect("capture persisted");
    assert_eq!(summary.sample_count, 3);
    assert!(out.exists());
}

#[tokio::test]
async fn presses_after_stop_are_ignored() {
    let dir = tempfile::tempdir().unwrap();

    let backend = StubBackend::new(vec![frame(vec![7; 80], 0)]);
    let session = CaptureSession::new(Box::new(backend), dir.path().join("extra.wav"));
    let mut toggle = RecordingToggle::new(session);

    toggle.press().await.unwrap();
    toggle.press().await.unwrap();
    assert_eq!(toggle.state(), ToggleState::Stopped);

    // Stopped is terminal: further presses are accepted but do nothing.
    assert_eq!(toggle.press().await.unwrap(), ToggleState::Stopped);
    assert_eq!(toggle.press().await.unwrap(), ToggleState::Stopped);
}

#[tokio::test]
async fn stop_never_races_stream_startup() {
    // An immediate second press must wait for begin() to finish opening the
    // stream, whatever the scheduling. Exercised under randomized delays.
    for _ in 0..32 {
        let dir = tempfile::tempdir().unwrap();
        let (start_delay_ms, press_gap_ms) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(0..20), rng.gen_range(0..5))
        };

        let backend = StubBackend::new(vec![frame(vec![1; 16], 0)])
            .with_start_delay(Duration::from_millis(start_delay_ms));
        let log = backend.log();

        let session = CaptureSession::new(Box::new(backend), dir.path().join("race.wav"));
        let mut toggle = RecordingToggle::new(session);

        toggle.press().await.unwrap();
        tokio::time::sleep(Duration::from_millis(press_gap_ms)).await;
        toggle.press().await.unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["start:called", "start:ready", "stop:called"],
            "stop must come after start reported readiness",
        );
        assert_eq!(toggle.state(), ToggleState::Stopped);
    }
}
