//! CSV printer.

use std::io::Write;

use anyhow::Result;

use super::Printer;
use crate::query::{format_number, SummaryBlock};

/// RFC 4180 style CSV with `\n` line endings.
pub struct CsvPrinter<W: Write> {
    out: W,
}

impl<W: Write> CsvPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_record<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<()> {
        let line: Vec<String> = cells.iter().map(|c| quote(c.as_ref())).collect();
        writeln!(self.out, "{}", line.join(","))?;
        Ok(())
    }
}

impl<W: Write> Printer for CsvPrinter<W> {
    fn header(&mut self, columns: &[String]) -> Result<()> {
        self.write_record(columns)
    }

    fn row(&mut self, cells: &[String]) -> Result<()> {
        self.write_record(cells)
    }

    fn summary(&mut self, blocks: &[SummaryBlock]) -> Result<()> {
        for block in blocks {
            self.write_record(&[block.detection_type.as_str()])?;
            self.write_record(&block.columns())?;
            for entry in &block.entries {
                self.write_record(&block.cells_with(entry, format_number))?;
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Quote a field when it holds a delimiter, a quote or a line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
