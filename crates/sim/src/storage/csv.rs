//! Row-oriented CSV files holding one generation each.
//!
//! Every line is one community: its trait values joined by commas, or an
//! empty line for a community that went extinct. Values are written with
//! the shortest representation that parses back to the same `f64`.

use crate::base::{Community, Generation};
use crate::errors::{Result, SimError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `generation` to `path`, replacing any existing file.
pub fn write_generation(path: impl AsRef<Path>, generation: &Generation) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for community in generation {
        writeln!(writer, "{community}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a generation written by [`write_generation`] (or any comma-separated
/// numeric rows).
///
/// Every line is a community, so a blank line, including a trailing one,
/// reads as an extinct community. Seed files should end with a single
/// newline.
///
/// # Errors
/// `SeedNotFound` if `path` does not exist, `Parse` for a cell that is not
/// a number.
pub fn read_generation(path: impl AsRef<Path>) -> Result<Generation> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SimError::SeedNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    parse_generation(&text)
}

fn parse_generation(text: &str) -> Result<Generation> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| parse_row(idx + 1, line))
        .collect()
}

fn parse_row(line_no: usize, line: &str) -> Result<Community> {
    if line.trim().is_empty() {
        return Ok(Community::default());
    }
    line.split(',')
        .map(|cell| {
            let cell = cell.trim().trim_matches('"');
            cell.parse::<f64>().map_err(|e| SimError::Parse {
                line: line_no,
                message: format!("'{cell}': {e}"),
            })
        })
        .collect()
}
