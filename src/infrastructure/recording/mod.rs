//! Run recorders.

pub mod file_recorder;

pub use file_recorder::{render_event, FileRunRecorder};
