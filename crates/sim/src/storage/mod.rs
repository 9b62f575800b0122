//! Storage module for persisting simulation data.
//!
//! Generations and per-generation coverage are written as plain CSV so runs
//! can be inspected with any tool and re-imported as seed generations.

mod csv;
mod recorder;
pub mod types;

pub use csv::{read_generation, write_generation};
pub use recorder::{CsvRecorder, NullRecorder, Recorder};
pub use types::{Progress, RecordingStrategy};
