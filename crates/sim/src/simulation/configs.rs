//! Simulation configuration.
//!
//! A [`Configuration`] is built once (from a JSON file, the CLI or
//! [`SimulationBuilder`](crate::simulation::SimulationBuilder)), validated,
//! and then passed by reference to every stage of the run.

use crate::errors::{Result, SimError};
use crate::evolution::{MutationConfig, SelectionConfig};
use crate::packing::AttemptBudget;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const PROPORTION_TOLERANCE: f64 = 1e-9;

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub evolution: EvolutionConfig,
    pub initialization: InitializationConfig,
}

/// Run-size parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Communities per generation
    pub number_of_communities: usize,
    /// Members per community after selection
    pub size_of_community: usize,
    /// Number of generations to simulate
    pub total_generations: usize,
    /// Placement attempts per community per generation
    #[serde(default = "default_budget")]
    pub max_packing_attempts: AttemptBudget,
    /// Write a generation snapshot every this many generations
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: usize,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_budget() -> AttemptBudget {
    AttemptBudget::Unbounded
}

fn default_snapshot_every() -> usize {
    25
}

impl ExecutionConfig {
    pub fn new(number_of_communities: usize, size_of_community: usize, total_generations: usize) -> Self {
        Self {
            number_of_communities,
            size_of_community,
            total_generations,
            max_packing_attempts: default_budget(),
            snapshot_every: default_snapshot_every(),
            seed: None,
        }
    }
}

/// Allowed range for surviving trait values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for SegmentBounds {
    fn default() -> Self {
        Self { min: 0.005, max: 1.0 }
    }
}

/// Grouped evolutionary parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub segment_bounds: SegmentBounds,
}

/// How the first generation is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InitializationConfig {
    /// Traits drawn independently from `U[min_length, max_length]`.
    Uniform { min_length: f64, max_length: f64 },
    /// Every trait equals `length`.
    Homogeneous { length: f64 },
    /// Fixed lengths in target proportions.
    NMember {
        lengths: Vec<f64>,
        proportions: Vec<f64>,
    },
    /// A previously exported generation read from CSV.
    #[serde(rename = "from-import", alias = "from-csv")]
    Import { path: PathBuf },
}

impl Default for InitializationConfig {
    fn default() -> Self {
        CommunityKind::Uniform.default_initialization()
    }
}

impl InitializationConfig {
    pub fn kind(&self) -> CommunityKind {
        match self {
            Self::Uniform { .. } => CommunityKind::Uniform,
            Self::Homogeneous { .. } => CommunityKind::Homogeneous,
            Self::NMember { .. } => CommunityKind::NMember,
            Self::Import { .. } => CommunityKind::Import,
        }
    }

    /// Label used in output file names: the policy tag, followed by the
    /// length for homogeneous runs or the seed file stem for imports.
    pub fn community_label(&self) -> String {
        match self {
            Self::Homogeneous { length } => format!("homogeneous{length}"),
            Self::Import { path } => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("from-import{stem}")
            }
            other => other.kind().to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Uniform {
                min_length,
                max_length,
            } => {
                if !(min_length.is_finite() && max_length.is_finite())
                    || *min_length <= 0.0
                    || min_length > max_length
                {
                    return Err(SimError::InvalidConfig(format!(
                        "uniform length range [{min_length}, {max_length}] is invalid"
                    )));
                }
            }
            Self::Homogeneous { length } => {
                if !(length.is_finite() && *length > 0.0) {
                    return Err(SimError::InvalidConfig(format!(
                        "homogeneous length must be positive, got {length}"
                    )));
                }
            }
            Self::NMember {
                lengths,
                proportions,
            } => {
                if lengths.len() != proportions.len() {
                    return Err(SimError::ConfigMismatch {
                        left: "lengths",
                        left_len: lengths.len(),
                        right: "proportions",
                        right_len: proportions.len(),
                    });
                }
                if lengths.is_empty() {
                    return Err(SimError::InvalidConfig(
                        "n-member community needs at least one length".into(),
                    ));
                }
                if let Some(bad) = lengths.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
                    return Err(SimError::InvalidConfig(format!(
                        "n-member lengths must be positive, got {bad}"
                    )));
                }
                if let Some(bad) = proportions.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
                    return Err(SimError::InvalidConfig(format!(
                        "n-member proportions must be non-negative, got {bad}"
                    )));
                }
                let sum: f64 = proportions.iter().sum();
                if (sum - 1.0).abs() > PROPORTION_TOLERANCE {
                    return Err(SimError::InvalidConfig(format!(
                        "n-member proportions must sum to 1, got {sum}"
                    )));
                }
            }
            Self::Import { .. } => {}
        }
        Ok(())
    }
}

/// Initialization policy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityKind {
    Uniform,
    Homogeneous,
    NMember,
    Import,
}

impl CommunityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Homogeneous => "homogeneous",
            Self::NMember => "n-member",
            Self::Import => "from-import",
        }
    }

    /// Initialization with the stock parameters for this policy.
    ///
    /// Imports have no sensible default path and start from an empty one.
    pub fn default_initialization(&self) -> InitializationConfig {
        match self {
            Self::Uniform => InitializationConfig::Uniform {
                min_length: 0.005,
                max_length: 1.0,
            },
            Self::Homogeneous => InitializationConfig::Homogeneous { length: 0.5 },
            Self::NMember => InitializationConfig::NMember {
                lengths: vec![0.01, 0.877],
                proportions: vec![0.5, 0.5],
            },
            Self::Import => InitializationConfig::Import {
                path: PathBuf::new(),
            },
        }
    }
}

impl fmt::Display for CommunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunityKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "homogeneous" => Ok(Self::Homogeneous),
            "n-member" => Ok(Self::NMember),
            "from-import" | "from-csv" => Ok(Self::Import),
            other => Err(SimError::InvalidConfig(format!(
                "unknown community type '{other}'"
            ))),
        }
    }
}

impl Configuration {
    pub fn new(
        execution: ExecutionConfig,
        evolution: EvolutionConfig,
        initialization: InitializationConfig,
    ) -> Self {
        Self {
            execution,
            evolution,
            initialization,
        }
    }

    /// Check every parameter, failing on the first problem found.
    ///
    /// # Errors
    /// `ConfigMismatch` for n-member lists of different lengths,
    /// `InvalidConfig` for anything else out of range.
    pub fn validate(&self) -> Result<()> {
        let exec = &self.execution;
        if exec.number_of_communities == 0 {
            return Err(SimError::InvalidConfig(
                "number_of_communities must be positive".into(),
            ));
        }
        if exec.size_of_community == 0 {
            return Err(SimError::InvalidConfig(
                "size_of_community must be positive".into(),
            ));
        }
        if exec.snapshot_every == 0 {
            return Err(SimError::InvalidConfig(
                "snapshot_every must be positive".into(),
            ));
        }

        let bounds = &self.evolution.segment_bounds;
        if !(bounds.min.is_finite() && bounds.max.is_finite())
            || bounds.min <= 0.0
            || bounds.min > bounds.max
        {
            return Err(SimError::InvalidConfig(format!(
                "segment bounds [{}, {}] are invalid",
                bounds.min, bounds.max
            )));
        }

        self.evolution.mutation.validate()?;
        self.initialization.validate()
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Run label without the timestamp suffix:
    /// `<attempts>_<weighting>_<community>_<mutation>_<regime>_<generations>_<communities>_<size>`.
    pub fn run_label_prefix(&self) -> String {
        let exec = &self.execution;
        let selection = &self.evolution.selection;
        [
            exec.max_packing_attempts.to_string(),
            selection.individual_weighting.to_string(),
            self.initialization.community_label(),
            self.evolution.mutation.model.to_string(),
            selection.regime_label().to_string(),
            exec.total_generations.to_string(),
            exec.number_of_communities.to_string(),
            exec.size_of_community.to_string(),
        ]
        .join("_")
    }
}
