use crate::defaults;
use clap::{ArgAction, Args};
use linepack_sim::evolution::{IndividualWeighting, MutationModel};
use linepack_sim::packing::AttemptBudget;
use linepack_sim::simulation::CommunityKind;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,

    /// Number of communities per generation
    #[arg(short = 'n', long, default_value_t = defaults::COMMUNITIES)]
    pub communities: usize,

    /// Number of members per community
    #[arg(short = 's', long, default_value_t = defaults::COMMUNITY_SIZE)]
    pub community_size: usize,

    /// Number of generations
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: usize,

    /// Placement attempts per community per generation ("inf" for unbounded)
    #[arg(short = 'a', long, default_value = defaults::PACKING_ATTEMPTS)]
    pub attempts: AttemptBudget,

    /// Starting community type (uniform, homogeneous, n-member, from-import)
    #[arg(long, default_value = defaults::COMMUNITY_TYPE)]
    pub community_type: CommunityKind,

    /// Smallest initial length (uniform communities)
    #[arg(long, default_value_t = defaults::MIN_LENGTH)]
    pub min_length: f64,

    /// Largest initial length (uniform communities)
    #[arg(long, default_value_t = defaults::MAX_LENGTH)]
    pub max_length: f64,

    /// Length of every member (homogeneous communities)
    #[arg(long, default_value_t = defaults::HOMOGENEOUS_LENGTH)]
    pub length: f64,

    /// Member lengths (n-member communities)
    #[arg(long, value_delimiter = ',', default_values_t = defaults::N_MEMBER_LENGTHS)]
    pub lengths: Vec<f64>,

    /// Target proportion of each length (n-member communities)
    #[arg(long, value_delimiter = ',', default_values_t = defaults::N_MEMBER_PROPORTIONS)]
    pub proportions: Vec<f64>,

    /// Seed generation CSV (from-import communities)
    #[arg(long, required_if_eq_any = [("community_type", "from-import"), ("community_type", "from-csv")])]
    pub seed_csv: Option<PathBuf>,

    /// Select individuals by placement
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub individual_selection: bool,

    /// Select communities by coverage
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub community_selection: bool,

    /// Individual weighting (placement, coverage, coverage2)
    #[arg(long, default_value = defaults::WEIGHTING)]
    pub weighting: IndividualWeighting,

    /// Mutation magnitude distribution (uniform, poisson, normal)
    #[arg(long, default_value = defaults::MUTATION_TYPE)]
    pub mutation_type: MutationModel,

    /// Per-member mutation probability
    #[arg(long, default_value_t = defaults::MUTATION_PROBABILITY)]
    pub mutation_probability: f64,

    /// Smallest mutation magnitude
    #[arg(long, default_value_t = defaults::MIN_MUTATION_SIZE)]
    pub min_mutation_size: f64,

    /// Largest mutation magnitude
    #[arg(long, default_value_t = defaults::MAX_MUTATION_SIZE)]
    pub max_mutation_size: f64,

    /// Standard deviation of normal mutations
    #[arg(long, default_value_t = defaults::MUTATION_STD_DEV)]
    pub mutation_std_dev: f64,

    /// Discretization step of normal mutations
    #[arg(long, default_value_t = defaults::MUTATION_DELTA)]
    pub mutation_delta: f64,

    /// Mean of Poisson mutations
    #[arg(long, default_value_t = defaults::MUTATION_MEAN)]
    pub mutation_mean: f64,

    /// Smallest trait value that survives mutation
    #[arg(long, default_value_t = defaults::MIN_SEGMENT_SIZE)]
    pub min_segment_size: f64,

    /// Largest trait value that survives mutation
    #[arg(long, default_value_t = defaults::MAX_SEGMENT_SIZE)]
    pub max_segment_size: f64,

    /// Write a generation snapshot every N generations
    #[arg(long, default_value_t = defaults::SNAPSHOT_EVERY)]
    pub snapshot_every: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Configuration file written by `linepack init`
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory for generation snapshots and the coverage log
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Configuration file written by `linepack init`
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub config: PathBuf,

    /// Number of independent communities to pack
    #[arg(long, default_value_t = defaults::COVERAGE_TRIALS)]
    pub trials: usize,

    /// Write one coverage value per line to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override random seed (default: use configured seed)
    #[arg(long)]
    pub seed: Option<u64>,
}
