// Capture session tests: frame concatenation order, empty-capture handling,
// and typed device errors.

mod common;

use std::sync::atomic::Ordering;

use common::{frame, StubBackend, UnavailableBackend};
use talkback::{AudioBackend, CaptureError, CaptureSession};

#[tokio::test]
async fn end_concatenates_frames_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("capture.wav");

    let frames = vec![
        frame(vec![1, 2, 3], 0),
        frame(vec![4, 5], 100),
        frame(vec![6], 200),
    ];
    let backend = StubBackend::new(frames);
    let session = CaptureSession::new(Box::new(backend), out.clone());

    let capture = session.begin().await.unwrap();
    let summary = capture.end().await.unwrap();

    assert_eq!(summary.sample_count, 6);
    assert_eq!(summary.path, out);

    let mut reader = hound::WavReader::open(&out).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(samples, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn empty_capture_fails_without_writing_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.wav");

    let backend = StubBackend::new(Vec::new());
    let session = CaptureSession::new(Box::new(backend), out.clone());

    let capture = session.begin().await.unwrap();
    let err = capture.end().await.unwrap_err();

    assert!(matches!(err, CaptureError::EmptyCapture), "got {err:?}");
    assert!(!out.exists(), "empty capture must never create the file");
}

#[tokio::test]
async fn begin_raises_the_active_flag_and_end_lowers_it() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new(vec![frame(vec![0; 160], 0)]);
    let active = backend.active_flag();

    let session = CaptureSession::new(Box::new(backend), dir.path().join("flag.wav"));
    assert!(!active.load(Ordering::SeqCst));

    let capture = session.begin().await.unwrap();
    assert!(active.load(Ordering::SeqCst), "flag raised while recording");

    capture.end().await.unwrap();
    assert!(!active.load(Ordering::SeqCst), "flag lowered after stop");
}

#[tokio::test]
async fn unavailable_device_surfaces_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = CaptureSession::new(
        Box::new(UnavailableBackend),
        dir.path().join("unreachable.wav"),
    );

    let err = session.begin().await.unwrap_err();
    assert!(matches!(err, CaptureError::DeviceUnavailable), "got {err:?}");
}
