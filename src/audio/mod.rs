pub mod backend;
pub mod cpal_backend;
pub mod wav;

pub use backend::{AudioBackend, AudioFrame, CaptureConfig, CaptureError};
pub use cpal_backend::CpalBackend;
