//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and validation.

use crate::errors::{Result, SimError};
use crate::evolution::{IndividualWeighting, MutationModel};
use crate::packing::AttemptBudget;
use crate::simulation::configs::{
    Configuration, EvolutionConfig, ExecutionConfig, InitializationConfig, SegmentBounds,
};
use crate::simulation::Simulation;
use std::path::PathBuf;

/// Builder for constructing [`Simulation`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use linepack_sim::simulation::SimulationBuilder;
/// use linepack_sim::storage::NullRecorder;
///
/// let mut sim = SimulationBuilder::new()
///     .communities(10)
///     .community_size(50)
///     .generations(5)
///     .homogeneous(0.1)
///     .max_packing_attempts(1000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// sim.run(&mut NullRecorder).unwrap();
/// assert_eq!(sim.generation_index(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    // Required parameters
    communities: Option<usize>,
    community_size: Option<usize>,

    generations: usize,
    attempts: AttemptBudget,
    snapshot_every: usize,
    seed: Option<u64>,
    evolution: EvolutionConfig,
    initialization: InitializationConfig,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            communities: None,
            community_size: None,
            generations: 0,
            attempts: AttemptBudget::Unbounded,
            snapshot_every: 25,
            seed: None,
            evolution: EvolutionConfig::default(),
            initialization: InitializationConfig::default(),
        }
    }

    /// Set the number of communities per generation (required).
    pub fn communities(mut self, count: usize) -> Self {
        self.communities = Some(count);
        self
    }

    /// Set the number of members per community (required).
    pub fn community_size(mut self, size: usize) -> Self {
        self.community_size = Some(size);
        self
    }

    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn max_packing_attempts(mut self, attempts: u64) -> Self {
        self.attempts = AttemptBudget::Finite(attempts);
        self
    }

    pub fn unbounded_attempts(mut self) -> Self {
        self.attempts = AttemptBudget::Unbounded;
        self
    }

    pub fn snapshot_every(mut self, interval: usize) -> Self {
        self.snapshot_every = interval;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw initial traits from `U[min_length, max_length]`.
    pub fn uniform_lengths(mut self, min_length: f64, max_length: f64) -> Self {
        self.initialization = InitializationConfig::Uniform {
            min_length,
            max_length,
        };
        self
    }

    /// Start every community with identical traits.
    pub fn homogeneous(mut self, length: f64) -> Self {
        self.initialization = InitializationConfig::Homogeneous { length };
        self
    }

    pub fn n_member(mut self, lengths: Vec<f64>, proportions: Vec<f64>) -> Self {
        self.initialization = InitializationConfig::NMember {
            lengths,
            proportions,
        };
        self
    }

    /// Start from a generation previously written to CSV.
    pub fn import(mut self, path: impl Into<PathBuf>) -> Self {
        self.initialization = InitializationConfig::Import { path: path.into() };
        self
    }

    /// Toggle the two selection stages.
    pub fn selection(mut self, community_level: bool, individual_level: bool) -> Self {
        self.evolution.selection.community_level = community_level;
        self.evolution.selection.individual_level = individual_level;
        self
    }

    pub fn individual_weighting(mut self, weighting: IndividualWeighting) -> Self {
        self.evolution.selection.individual_weighting = weighting;
        self
    }

    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.evolution.mutation.probability = probability;
        self
    }

    pub fn mutation_sizes(mut self, min_size: f64, max_size: f64) -> Self {
        self.evolution.mutation.min_size = min_size;
        self.evolution.mutation.max_size = max_size;
        self
    }

    pub fn mutation_model(mut self, model: MutationModel) -> Self {
        self.evolution.mutation.model = model;
        self
    }

    pub fn segment_bounds(mut self, min: f64, max: f64) -> Self {
        self.evolution.segment_bounds = SegmentBounds { min, max };
        self
    }

    /// Assemble and validate the configuration without building a simulation.
    pub fn into_config(self) -> Result<Configuration> {
        let communities = self
            .communities
            .ok_or_else(|| SimError::InvalidConfig("missing required parameter: communities".into()))?;
        let community_size = self.community_size.ok_or_else(|| {
            SimError::InvalidConfig("missing required parameter: community_size".into())
        })?;

        let mut execution = ExecutionConfig::new(communities, community_size, self.generations);
        execution.max_packing_attempts = self.attempts;
        execution.snapshot_every = self.snapshot_every;
        execution.seed = self.seed;

        let config = Configuration::new(execution, self.evolution, self.initialization);
        config.validate()?;
        Ok(config)
    }

    /// Build and validate the simulation.
    pub fn build(self) -> Result<Simulation> {
        Simulation::new(self.into_config()?)
    }
}
