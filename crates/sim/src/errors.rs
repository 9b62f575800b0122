use std::path::PathBuf;
use thiserror::Error;

/// Error type for every fallible operation in the simulator.
///
/// All variants are fatal for a run: a misconfigured simulation produces
/// meaningless data, so callers propagate these up and stop.
#[derive(Debug, Error)]
pub enum SimError {
    /// An unrecognized policy tag or an out-of-range parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two parallel lists that must have the same length do not.
    #[error("Configuration mismatch: {left} has {left_len} entries but {right} has {right_len}")]
    ConfigMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// The seed generation to import does not exist.
    #[error("Seed generation not found: {}", .0.display())]
    SeedNotFound(PathBuf),

    /// A sampling primitive was called with malformed input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A seed file row could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
