//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use linepack_sim::prelude::*;
//!
//! let config = SimulationBuilder::new()
//!     .communities(4)
//!     .community_size(10)
//!     .generations(2)
//!     .seed(7)
//!     .into_config()
//!     .unwrap();
//! let mut sim = Simulation::new(config).unwrap();
//! sim.run(&mut NullRecorder).unwrap();
//! ```

pub use crate::base::{Community, Generation, WeightedSampler};
pub use crate::errors::{Result, SimError};
pub use crate::evolution::{
    IndividualWeighting, MutationConfig, MutationModel, MutationOperator, SelectionConfig,
};
pub use crate::packing::{AttemptBudget, Coverage, IntervalPacker};
pub use crate::simulation::{
    Configuration, CoverageStats, InitializationConfig, Simulation, SimulationBuilder,
};
pub use crate::storage::{CsvRecorder, NullRecorder, Recorder, RecordingStrategy};
