use anyhow::{Context, Result};
use linepack_sim::simulation::{coverage_trials, Configuration, CoverageStats};
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::args::CoverageArgs;
use crate::printing::print_coverage_stats;

pub fn measure_coverage(args: &CoverageArgs) -> Result<()> {
    let mut config = Configuration::from_json_file(&args.config).with_context(|| {
        format!("Failed to load configuration from {}", args.config.display())
    })?;
    if let Some(seed) = args.seed {
        config.execution.seed = Some(seed);
    }

    let values = coverage_trials(&config, args.trials).context("Packing failed")?;
    let stats = CoverageStats::from_values(&values);
    print_coverage_stats(values.len(), &stats);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for value in &values {
            writeln!(writer, "{value}")?;
        }
        writer.flush()?;
        println!("\n✓ Coverage values written to {}", path.display());
    }

    Ok(())
}
