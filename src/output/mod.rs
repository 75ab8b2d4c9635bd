//! Rendering of listings and summaries.
//!
//! Query results are turned into text by a [`Printer`]: CSV for machines,
//! fixed-width columns for terminals. Subtitle cues have their own writer,
//! [`SrtWriter`], since SRT is not a tabular format. Charts are drawn to
//! image files by [`plot`].

mod csv;
mod free;
pub mod plot;
mod srt;

pub use self::csv::CsvPrinter;
pub use self::free::{column_width, FreePrinter};
pub use self::srt::{srt_timestamp, SrtWriter};

use std::fmt;
use std::io::Write;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::query::{Listing, Row, SummaryBlock};

/// Output format selected with `-f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma separated values, header row first
    #[default]
    Csv,
    /// Aligned columns for reading in a terminal
    Free,
    /// SubRip subtitles (list-detections-by-second only)
    Srt,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Free => f.write_str("free"),
            OutputFormat::Srt => f.write_str("srt"),
        }
    }
}

/// Writes tabular results.
pub trait Printer {
    /// Column names. Called once, before any row.
    fn header(&mut self, columns: &[String]) -> Result<()>;

    fn row(&mut self, cells: &[String]) -> Result<()>;

    /// Summary blocks, each with its own column row.
    fn summary(&mut self, blocks: &[SummaryBlock]) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Printer for a tabular format. SRT is rejected; use [`SrtWriter`].
pub fn printer<'w>(format: OutputFormat, out: Box<dyn Write + 'w>) -> Result<Box<dyn Printer + 'w>> {
    match format {
        OutputFormat::Csv => Ok(Box::new(CsvPrinter::new(out))),
        OutputFormat::Free => Ok(Box::new(FreePrinter::new(out))),
        OutputFormat::Srt => {
            bail!("SRT output is only supported by list-detections-by-second")
        }
    }
}

/// Print a header and every row of `listing`. Returns the number of rows.
pub fn print_listing<R: Row>(printer: &mut dyn Printer, listing: Listing<'_, R>) -> Result<usize> {
    printer.header(&listing.header)?;
    let mut count = 0;
    for row in listing.rows {
        printer.row(&row.cells())?;
        count += 1;
    }
    printer.finish()?;
    Ok(count)
}
