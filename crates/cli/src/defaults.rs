//! Shared default values for simulation configuration.
//! These values are used by the `init` and `coverage` commands (via clap).

pub const CONFIG_FILE: &str = "linepack.json";

pub const COMMUNITIES: usize = 100;
pub const COMMUNITY_SIZE: usize = 100;
pub const GENERATIONS: usize = 1000;
pub const PACKING_ATTEMPTS: &str = "inf";
pub const SNAPSHOT_EVERY: usize = 25;

// Initialization
pub const COMMUNITY_TYPE: &str = "uniform";
pub const MIN_LENGTH: f64 = 0.005;
pub const MAX_LENGTH: f64 = 1.0;
pub const HOMOGENEOUS_LENGTH: f64 = 0.5;
pub const N_MEMBER_LENGTHS: [f64; 2] = [0.01, 0.877];
pub const N_MEMBER_PROPORTIONS: [f64; 2] = [0.5, 0.5];

// Selection
pub const WEIGHTING: &str = "placement";

// Mutation
pub const MUTATION_TYPE: &str = "normal";
pub const MUTATION_PROBABILITY: f64 = 0.1;
pub const MIN_MUTATION_SIZE: f64 = 0.001;
pub const MAX_MUTATION_SIZE: f64 = 0.1;
pub const MUTATION_STD_DEV: f64 = 0.005;
pub const MUTATION_DELTA: f64 = 0.001;
pub const MUTATION_MEAN: f64 = 0.01;

// Segment range
pub const MIN_SEGMENT_SIZE: f64 = 0.005;
pub const MAX_SEGMENT_SIZE: f64 = 1.0;

pub const COVERAGE_TRIALS: usize = 1000;
