//! Construction of the first generation.
//!
//! Generated policies (uniform, homogeneous, n-member) go through
//! [`CommunityFactory`]; imported generations are read from CSV and checked
//! by [`load_seed_generation`].

use crate::base::{Community, Generation, WeightedSampler};
use crate::errors::{Result, SimError};
use crate::simulation::configs::{Configuration, InitializationConfig};
use crate::storage::read_generation;
use rand::distr::{Distribution, Uniform};
use rand::Rng;
use std::path::Path;
use tracing::{info, warn};

/// A generation policy resolved from configuration.
#[derive(Debug, Clone)]
enum Policy {
    Uniform(Uniform<f64>),
    Homogeneous(f64),
    NMember {
        lengths: Vec<f64>,
        /// Guaranteed copies of each length.
        base_counts: Vec<usize>,
        /// Weights for the slots left after the guaranteed copies.
        fill: Option<WeightedSampler>,
    },
}

/// Generates fresh communities of a fixed size.
#[derive(Debug, Clone)]
pub struct CommunityFactory {
    policy: Policy,
    size: usize,
}

impl CommunityFactory {
    /// Resolve `init` for communities of `size` members.
    ///
    /// # Errors
    /// `ConfigMismatch` if n-member lists differ in length, `InvalidConfig`
    /// for an import policy (imports are read, not generated) or an invalid
    /// length range.
    pub fn new(init: &InitializationConfig, size: usize) -> Result<Self> {
        let policy = match init {
            InitializationConfig::Uniform {
                min_length,
                max_length,
            } => Policy::Uniform(
                Uniform::new_inclusive(*min_length, *max_length)
                    .map_err(|e| SimError::InvalidConfig(format!("uniform community: {e}")))?,
            ),
            InitializationConfig::Homogeneous { length } => Policy::Homogeneous(*length),
            InitializationConfig::NMember {
                lengths,
                proportions,
            } => Self::n_member(lengths, proportions, size)?,
            InitializationConfig::Import { .. } => {
                return Err(SimError::InvalidConfig(
                    "imported communities are read from file, not generated".into(),
                ))
            }
        };
        Ok(Self { policy, size })
    }

    fn n_member(lengths: &[f64], proportions: &[f64], size: usize) -> Result<Policy> {
        if lengths.len() != proportions.len() {
            return Err(SimError::ConfigMismatch {
                left: "lengths",
                left_len: lengths.len(),
                right: "proportions",
                right_len: proportions.len(),
            });
        }

        let targets: Vec<f64> = proportions.iter().map(|p| p * size as f64).collect();
        let base_counts: Vec<usize> = targets.iter().map(|t| t.floor() as usize).collect();
        let placed: usize = base_counts.iter().sum();

        let fill = if placed < size {
            let remaining = (size - placed) as f64;
            let weights: Vec<f64> = targets
                .iter()
                .map(|t| (t - t.floor()) / remaining)
                .collect();
            // Fractional parts can all round to zero when proportions sum
            // slightly below one; fall back to the raw proportions.
            Some(WeightedSampler::new(&weights).or_else(|_| WeightedSampler::new(proportions))?)
        } else {
            None
        };

        Ok(Policy::NMember {
            lengths: lengths.to_vec(),
            base_counts,
            fill,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Generate one community.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Community {
        match &self.policy {
            Policy::Uniform(dist) => (0..self.size).map(|_| dist.sample(rng)).collect(),
            Policy::Homogeneous(length) => Community::homogeneous(*length, self.size),
            Policy::NMember {
                lengths,
                base_counts,
                fill,
            } => {
                let mut community = Community::with_capacity(self.size);
                for (&length, &count) in lengths.iter().zip(base_counts) {
                    for _ in 0..count.min(self.size - community.len()) {
                        community.push(length);
                    }
                }
                if let Some(sampler) = fill {
                    while community.len() < self.size {
                        community.push(lengths[sampler.sample_index(rng)]);
                    }
                }
                community
            }
        }
    }

    /// Generate `count` communities.
    pub fn generate_generation<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Generation {
        (0..count).map(|_| self.generate(rng)).collect()
    }
}

/// Read a seed generation and check that every row holds usable lengths.
///
/// # Errors
/// `SeedNotFound` if the file is missing, `Parse` for unreadable cells and
/// `InvalidConfig` for an empty file or a non-positive length.
pub fn load_seed_generation(path: &Path, number_of_communities: usize) -> Result<Generation> {
    let generation = read_generation(path)?;
    if generation.is_empty() {
        return Err(SimError::InvalidConfig(format!(
            "seed generation {} has no communities",
            path.display()
        )));
    }

    for (row, community) in generation.iter().enumerate() {
        if let Some(bad) = community.iter().find(|x| !(x.is_finite() && **x > 0.0)) {
            return Err(SimError::InvalidConfig(format!(
                "seed generation {} row {}: length {bad} is not positive",
                path.display(),
                row + 1
            )));
        }
    }

    if generation.len() != number_of_communities {
        warn!(
            rows = generation.len(),
            expected = number_of_communities,
            "Seed generation row count differs from number_of_communities"
        );
    }
    info!(
        path = %path.display(),
        communities = generation.len(),
        individuals = generation.individual_count(),
        "Imported seed generation"
    );
    Ok(generation)
}

/// Build generation zero for `config`.
pub fn initial_generation<R: Rng + ?Sized>(config: &Configuration, rng: &mut R) -> Result<Generation> {
    let exec = &config.execution;
    match &config.initialization {
        InitializationConfig::Import { path } => {
            load_seed_generation(path, exec.number_of_communities)
        }
        init => {
            let factory = CommunityFactory::new(init, exec.size_of_community)?;
            Ok(factory.generate_generation(exec.number_of_communities, rng))
        }
    }
}
