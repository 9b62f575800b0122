//! Sinks for generation snapshots, coverage rows and progress.

use crate::base::Generation;
use crate::errors::Result;
use crate::storage::csv::write_generation;
use crate::storage::types::{Progress, RecordingStrategy};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives output from a running simulation.
///
/// Every hook defaults to doing nothing, so implementors only override what
/// they persist.
pub trait Recorder {
    /// Called with the generation about to be packed, on the simulation's
    /// snapshot interval.
    fn record_generation(&mut self, _index: usize, _generation: &Generation) -> Result<()> {
        Ok(())
    }

    /// Called with each community's total coverage, in community order.
    fn record_coverage(&mut self, _index: usize, _coverage: &[f64]) -> Result<()> {
        Ok(())
    }

    fn report_progress(&mut self, _progress: &Progress) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record_generation(&mut self, index: usize, generation: &Generation) -> Result<()> {
        (**self).record_generation(index, generation)
    }

    fn record_coverage(&mut self, index: usize, coverage: &[f64]) -> Result<()> {
        (**self).record_coverage(index, coverage)
    }

    fn report_progress(&mut self, progress: &Progress) {
        (**self).report_progress(progress)
    }
}

/// Writes `generations_<label>_<i>.csv` snapshots and appends coverage rows
/// to `coverage_<label>.csv`, all inside one output directory.
#[derive(Debug)]
pub struct CsvRecorder {
    output_dir: PathBuf,
    label: String,
    strategy: RecordingStrategy,
    coverage: BufWriter<File>,
    snapshots_written: usize,
}

impl CsvRecorder {
    /// Create the output directory if needed and start a fresh coverage file.
    pub fn new(
        output_dir: impl AsRef<Path>,
        label: impl Into<String>,
        strategy: RecordingStrategy,
    ) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        let label = label.into();
        let coverage = BufWriter::new(File::create(
            output_dir.join(format!("coverage_{label}.csv")),
        )?);

        Ok(Self {
            output_dir,
            label,
            strategy,
            coverage,
            snapshots_written: 0,
        })
    }

    pub fn coverage_path(&self) -> PathBuf {
        self.output_dir.join(format!("coverage_{}.csv", self.label))
    }

    pub fn generation_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("generations_{}_{index}.csv", self.label))
    }

    pub fn snapshots_written(&self) -> usize {
        self.snapshots_written
    }
}

impl Recorder for CsvRecorder {
    fn record_generation(&mut self, index: usize, generation: &Generation) -> Result<()> {
        if !self.strategy.should_record(index) {
            return Ok(());
        }
        let path = self.generation_path(index);
        write_generation(&path, generation)?;
        self.snapshots_written += 1;
        debug!(generation = index, path = %path.display(), "Wrote generation snapshot");
        Ok(())
    }

    fn record_coverage(&mut self, _index: usize, coverage: &[f64]) -> Result<()> {
        for (i, value) in coverage.iter().enumerate() {
            if i > 0 {
                self.coverage.write_all(b",")?;
            }
            write!(self.coverage, "{value}")?;
        }
        writeln!(self.coverage)?;
        // Keep completed rows on disk if the run is killed.
        self.coverage.flush()?;
        Ok(())
    }
}
