//! Simulation engine and its configuration.
//!
//! The most commonly used types are re-exported here:
//!
//! - `Simulation`: runs generations of packing, selection and mutation.
//! - `Configuration`: the immutable parameter set for one run.
//! - `SimulationBuilder`: fluent construction of both with validation.
//! - `CommunityFactory`: generates the communities of generation zero.

pub mod builder;
pub mod configs;
pub mod engine;
pub mod initialization;

pub use builder::SimulationBuilder;
pub use configs::{
    CommunityKind, Configuration, EvolutionConfig, ExecutionConfig, InitializationConfig,
    SegmentBounds,
};
pub use engine::{coverage_trials, CoverageStats, Simulation, StepReport};
pub use initialization::{initial_generation, load_seed_generation, CommunityFactory};
