//! Test doubles shared by unit and integration tests.
//!
//! Compiled for unit tests and, via the `test-util` feature, for the
//! integration tests under `tests/`.

mod recording_batch;
mod scripted_writer;

pub use recording_batch::{Outcomes, RecordingBatch};
pub use scripted_writer::ScriptedWriter;
