use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use linepack_sim::base::Generation;
use linepack_sim::simulation::{Configuration, Simulation};
use linepack_sim::storage::{CsvRecorder, Progress, Recorder, RecordingStrategy};
use tracing::info;

use crate::args::RunArgs;
use crate::printing::print_parameters;
use crate::utils::run_label;

/// CSV output plus an optional progress bar.
struct RunRecorder {
    csv: CsvRecorder,
    bar: Option<ProgressBar>,
}

impl Recorder for RunRecorder {
    fn record_generation(
        &mut self,
        index: usize,
        generation: &Generation,
    ) -> linepack_sim::errors::Result<()> {
        self.csv.record_generation(index, generation)
    }

    fn record_coverage(&mut self, index: usize, coverage: &[f64]) -> linepack_sim::errors::Result<()> {
        self.csv.record_coverage(index, coverage)
    }

    fn report_progress(&mut self, progress: &Progress) {
        if let Some(bar) = &self.bar {
            bar.set_position(progress.completed as u64);
            bar.set_message(format!("{} ms/gen", progress.last_step.as_millis()));
        }
    }
}

fn progress_bar(total: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("📏 Linepack - Running Simulation");
    println!("============================================\n");

    let mut config = Configuration::from_json_file(&args.config).with_context(|| {
        format!(
            "Failed to load configuration from {}. Did you run 'linepack init' first?",
            args.config.display()
        )
    })?;
    if let Some(seed) = args.seed {
        config.execution.seed = Some(seed);
    }

    println!("Configuration:");
    print_parameters(&config);

    let label = run_label(&config);
    // The engine applies the snapshot interval itself.
    let csv = CsvRecorder::new(&args.output_dir, &label, RecordingStrategy::All).with_context(|| {
        format!("Failed to create output files in {}", args.output_dir.display())
    })?;
    info!(%label, output_dir = %args.output_dir.display(), "Recording run");

    // The final generation is packed and logged as well.
    let steps = config.execution.total_generations + 1;

    let mut sim = Simulation::new(config).context("Failed to initialize simulation")?;

    let bar = if args.progress {
        Some(progress_bar(steps)?)
    } else {
        None
    };
    let mut recorder = RunRecorder { csv, bar };

    println!("Running {steps} generations...");
    sim.run_for(steps, &mut recorder)
        .with_context(|| format!("Simulation failed at generation {}", sim.generation_index()))?;

    if let Some(bar) = recorder.bar.take() {
        bar.finish_with_message("Done");
    }

    println!("\n✓ Simulation complete!");
    println!("  Generations: {}", sim.generation_index());
    println!("  Snapshots written: {}", recorder.csv.snapshots_written());
    println!("  Coverage log: {}", recorder.csv.coverage_path().display());

    Ok(())
}
