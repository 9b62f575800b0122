use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recording strategy for when to persist generation snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingStrategy {
    /// Record every N generations.
    EveryN(usize),

    /// Record at specific generations.
    Specific(Vec<usize>),

    /// Record all generations.
    All,

    /// No recording.
    None,
}

impl RecordingStrategy {
    /// Check if generation should be recorded
    pub fn should_record(&self, generation: usize) -> bool {
        match self {
            Self::EveryN(0) => false,
            Self::EveryN(n) => generation.is_multiple_of(*n),
            Self::Specific(gens) => gens.contains(&generation),
            Self::All => true,
            Self::None => false,
        }
    }
}

/// Progress signal for a running simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Generations completed so far.
    pub completed: usize,
    /// Generations requested for this run.
    pub total: usize,
    /// Wall time since the run started.
    pub elapsed: Duration,
    /// Wall time of the most recent generation.
    pub last_step: Duration,
}

impl Progress {
    /// Whole percent complete, `100` for an empty run.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.completed * 100 / self.total
        }
    }
}
