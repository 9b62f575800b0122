//! Point mutations of segment lengths.
//!
//! Each generation a community receives `m ~ Binomial(size, probability)`
//! mutations. The `m` magnitudes come from one of three distributions
//! ([`MutationModel`]), are clamped into `[min_size, max_size]`, and are
//! added to or subtracted from (50/50) `m` distinct members chosen
//! uniformly without replacement. Members that leave the valid segment
//! range afterwards are removed, so a community can shrink.

use crate::base::Community;
use crate::errors::{Result, SimError};
use rand::distr::Uniform;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution that mutation magnitudes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MutationModel {
    /// Continuous uniform over `[min_size, max_size]`.
    Uniform,
    /// Poisson with the given mean; integer valued.
    Poisson { mean: f64 },
    /// `|Normal(0, std_dev)|` rounded to the nearest multiple of `delta`.
    Normal { std_dev: f64, delta: f64 },
}

impl MutationModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Poisson { .. } => "poisson",
            Self::Normal { .. } => "normal",
        }
    }
}

impl fmt::Display for MutationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a model tag; distribution parameters take their stock values.
impl FromStr for MutationModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "poisson" => Ok(Self::Poisson { mean: 0.01 }),
            "normal" => Ok(Self::Normal {
                std_dev: 0.005,
                delta: 0.001,
            }),
            other => Err(SimError::InvalidConfig(format!(
                "unknown mutation type '{other}'"
            ))),
        }
    }
}

/// Mutation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Per-member probability of receiving a mutation.
    pub probability: f64,
    /// Smallest mutation magnitude.
    pub min_size: f64,
    /// Largest mutation magnitude.
    pub max_size: f64,
    pub model: MutationModel,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            probability: 0.1,
            min_size: 0.001,
            max_size: 0.1,
            model: MutationModel::Normal {
                std_dev: 0.005,
                delta: 0.001,
            },
        }
    }
}

impl MutationConfig {
    /// Check that all parameters are in range.
    ///
    /// # Errors
    /// `InvalidConfig` describing the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(SimError::InvalidConfig(format!(
                "mutation probability must be in [0, 1], got {}",
                self.probability
            )));
        }
        if !(self.min_size.is_finite() && self.max_size.is_finite())
            || self.min_size < 0.0
            || self.min_size > self.max_size
        {
            return Err(SimError::InvalidConfig(format!(
                "mutation size range [{}, {}] is invalid",
                self.min_size, self.max_size
            )));
        }
        match self.model {
            MutationModel::Uniform => {}
            MutationModel::Poisson { mean } => {
                if !(mean.is_finite() && mean > 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "Poisson mutation mean must be positive, got {mean}"
                    )));
                }
            }
            MutationModel::Normal { std_dev, delta } => {
                if !(std_dev.is_finite() && std_dev >= 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "normal mutation standard deviation must be non-negative, got {std_dev}"
                    )));
                }
                if !(delta.is_finite() && delta > 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "mutation discretization step must be positive, got {delta}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Magnitude distribution resolved once from a [`MutationModel`].
#[derive(Debug, Clone)]
enum Magnitude {
    Uniform(Uniform<f64>),
    Poisson(Poisson<f64>),
    Normal { dist: Normal<f64>, delta: f64 },
}

impl Magnitude {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Uniform(dist) => dist.sample(rng).abs(),
            Self::Poisson(dist) => dist.sample(rng),
            Self::Normal { dist, delta } => (dist.sample(rng).abs() / delta).round() * delta,
        }
    }
}

/// Counts from one mutation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub mutations: usize,
    pub culled: usize,
}

/// Applies point mutations and range culling to communities.
#[derive(Debug, Clone)]
pub struct MutationOperator {
    probability: f64,
    min_size: f64,
    max_size: f64,
    magnitude: Magnitude,
    segment_min: f64,
    segment_max: f64,
}

impl MutationOperator {
    /// Build an operator; members outside `[segment_min, segment_max]` are
    /// culled after mutation.
    ///
    /// # Errors
    /// `InvalidConfig` if the mutation parameters are out of range.
    pub fn new(config: &MutationConfig, segment_min: f64, segment_max: f64) -> Result<Self> {
        config.validate()?;

        let magnitude = match config.model {
            MutationModel::Uniform => Magnitude::Uniform(
                Uniform::new_inclusive(config.min_size, config.max_size)
                    .map_err(|e| SimError::InvalidConfig(format!("uniform mutation: {e}")))?,
            ),
            MutationModel::Poisson { mean } => Magnitude::Poisson(
                Poisson::new(mean)
                    .map_err(|e| SimError::InvalidConfig(format!("Poisson mutation: {e}")))?,
            ),
            MutationModel::Normal { std_dev, delta } => Magnitude::Normal {
                dist: Normal::new(0.0, std_dev)
                    .map_err(|e| SimError::InvalidConfig(format!("normal mutation: {e}")))?,
                delta,
            },
        };

        Ok(Self {
            probability: config.probability,
            min_size: config.min_size,
            max_size: config.max_size,
            magnitude,
            segment_min,
            segment_max,
        })
    }

    /// Return a mutated and culled copy of `community`.
    pub fn mutate<R: Rng + ?Sized>(&self, community: &Community, rng: &mut R) -> Result<Community> {
        self.mutate_with_stats(community, rng).map(|(c, _)| c)
    }

    /// Like [`mutate`](Self::mutate), also reporting how many mutations
    /// were applied and how many members were culled.
    pub fn mutate_with_stats<R: Rng + ?Sized>(
        &self,
        community: &Community,
        rng: &mut R,
    ) -> Result<(Community, MutationStats)> {
        let mut mutated = community.clone();
        let len = mutated.len();

        let binomial = Binomial::new(len as u64, self.probability)
            .map_err(|e| SimError::InvalidArgument(format!("mutation count: {e}")))?;
        let count = binomial.sample(rng) as usize;

        let magnitudes: Vec<f64> = (0..count)
            .map(|_| self.magnitude.sample(rng).clamp(self.min_size, self.max_size))
            .collect();

        let targets = index::sample(rng, len, count);
        let members = mutated.members_mut();
        for (pos, magnitude) in targets.iter().zip(magnitudes) {
            if rng.random_bool(0.5) {
                members[pos] += magnitude;
            } else {
                members[pos] -= magnitude;
            }
        }

        let culled = mutated.retain_within(self.segment_min, self.segment_max);
        Ok((
            mutated,
            MutationStats {
                mutations: count,
                culled,
            },
        ))
    }
}
