//! Push-to-talk capture
//!
//! One [`CaptureSession`] exists per program run. The [`RecordingToggle`]
//! state machine drives it from key presses: the first press opens the
//! stream, the second stops it and persists the captured audio.

mod session;
mod toggle;

pub use session::{ActiveCapture, CaptureSession, CaptureSummary};
pub use toggle::{RecordingToggle, ToggleState};
