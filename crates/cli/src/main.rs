mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{CoverageArgs, InitArgs, RunArgs};
use commands::{coverage, init, run};

/// Linepack: a community packing simulator
///
/// Communities of line segments compete for space on the unit interval.
/// Each generation the segments are placed by random sequential adsorption,
/// the best-covering communities and individuals reproduce, and offspring
/// lengths mutate.
#[derive(Parser, Debug)]
#[command(name = "linepack")]
#[command(author, version, about = "Simulates the evolution of communities packing a line", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a new simulation configuration.
    ///
    /// Sets up the parameters for a new experiment but does not run it yet.
    Init(Box<InitArgs>),

    /// Run a simulation from a configuration file.
    ///
    /// Writes generation snapshots and a per-generation coverage log as CSV.
    Run(RunArgs),

    /// Measure packing coverage of freshly generated communities.
    Coverage(CoverageArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => init::init_simulation(&args)?,
        Commands::Run(args) => run::run_simulation(&args)?,
        Commands::Coverage(args) => coverage::measure_coverage(&args)?,
    }

    Ok(())
}
