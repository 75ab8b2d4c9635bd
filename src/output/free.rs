//! Fixed-width terminal printer.

use std::io::Write;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use super::Printer;
use crate::query::SummaryBlock;

/// Column widths by column name.
const WIDTHS: &[(&str, usize)] = &[
    ("timestamp", 12),
    ("second", 6),
    ("detection ID", 13),
    ("detection type", 24),
    ("confidence", 11),
    ("label", 30),
    ("labels", 12),
    ("Valossa concept ID", 19),
    ("GKG concept ID", 15),
    ("more information", 50),
    ("name", 24),
    ("screentime", 10),
    ("of video length", 17),
];

/// Width of columns no rule covers.
const DEFAULT_WIDTH: usize = 12;

/// Summary column titles.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("name", "Name"),
    ("screentime", "Time (s)"),
    ("confidence", "Confidence"),
    ("label", "Label"),
    ("of video length", "Of video length"),
];

/// Width of a column. Names containing a known column name (`max confidence`)
/// get that width plus four.
pub fn column_width(name: &str) -> usize {
    if let Some((_, width)) = WIDTHS.iter().find(|(key, _)| *key == name) {
        return *width;
    }
    WIDTHS
        .iter()
        .find(|(key, _)| name.contains(*key))
        .map_or(DEFAULT_WIDTH, |(_, width)| width + 4)
}

fn display_name(column: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(key, _)| *key == column)
        .map_or(column, |&(_, display)| display)
}

/// Aligned columns: the first left-aligned, the rest right-aligned with two
/// spaces of separation. A trailing `more information` column is left as is.
pub struct FreePrinter<W: Write> {
    out: W,
    widths: Vec<usize>,
    free_last: bool,
}

impl<W: Write> FreePrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            widths: Vec::new(),
            free_last: false,
        }
    }

    fn set_columns<S: AsRef<str>>(&mut self, columns: &[S]) {
        self.widths = columns.iter().map(|c| column_width(c.as_ref())).collect();
        self.free_last = columns
            .last()
            .map_or(false, |c| c.as_ref() == "more information");
    }

    fn write_cells<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<()> {
        let line = format_line(cells, &self.widths, self.free_last);
        writeln!(self.out, "{}", line)?;
        Ok(())
    }
}

fn format_line<S: AsRef<str>>(cells: &[S], widths: &[usize], free_last: bool) -> String {
    let fallback = widths.last().copied().unwrap_or(DEFAULT_WIDTH);
    let width_of = |i: usize| widths.get(i).copied().unwrap_or(fallback);
    let last = cells.len().saturating_sub(1);

    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let cell = cell.as_ref();
        if i == 0 {
            line.push_str(&pad_right(cell, width_of(i)));
        } else if i < last {
            line.push_str(&pad_left(cell, width_of(i)));
            line.push_str("  ");
        } else if free_last && i < widths.len() {
            line.push_str(cell);
        } else {
            line.push_str(&pad_left(cell, width_of(i)));
        }
    }
    line
}

fn pad_right(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

fn pad_left(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", " ".repeat(fill), cell)
}

impl<W: Write> Printer for FreePrinter<W> {
    fn header(&mut self, columns: &[String]) -> Result<()> {
        self.set_columns(columns);
        self.write_cells(columns)
    }

    fn row(&mut self, cells: &[String]) -> Result<()> {
        self.write_cells(cells)
    }

    fn summary(&mut self, blocks: &[SummaryBlock]) -> Result<()> {
        for block in blocks {
            writeln!(self.out, "Detection type: {}", block.detection_type)?;
            let columns = block.columns();
            self.set_columns(&columns);
            self.free_last = false;

            let titles: Vec<&str> = columns.iter().map(|c| display_name(c)).collect();
            self.write_cells(&titles)?;
            let rule = self.widths.iter().sum::<usize>() + self.widths.len().saturating_sub(1);
            writeln!(self.out, "{}", "-".repeat(rule))?;

            for entry in &block.entries {
                let cells = block.cells_with(entry, |share| format!("{:.2}%", share * 100.0));
                self.write_cells(&cells)?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
