//! SubRip writer.

use std::io::Write;

use anyhow::Result;

use crate::query::SubtitleCue;

/// Cues with more labels than this are split over two lines.
const MAX_LABELS_ON_ONE_LINE: usize = 5;

/// Writes numbered SRT cues.
pub struct SrtWriter<W: Write> {
    out: W,
    next_number: usize,
}

impl<W: Write> SrtWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_number: 1,
        }
    }

    pub fn cue(&mut self, cue: &SubtitleCue) -> Result<()> {
        writeln!(self.out, "{}", self.next_number)?;
        self.next_number += 1;
        writeln!(
            self.out,
            "{} --> {}",
            srt_timestamp(cue.start),
            srt_timestamp(cue.end)
        )?;
        writeln!(self.out, "{}\n", label_lines(&cue.labels))?;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Labels joined with `, `; long lists break once around the middle.
fn label_lines(labels: &[String]) -> String {
    let Some((first, rest)) = labels.split_first() else {
        return String::new();
    };
    let break_at = if labels.len() > MAX_LABELS_ON_ONE_LINE {
        Some((labels.len() / 2).saturating_sub(1))
    } else {
        None
    };

    let mut line = first.clone();
    for (i, label) in rest.iter().enumerate() {
        if Some(i) == break_at {
            line.push_str(",\n");
        } else {
            line.push_str(", ");
        }
        line.push_str(label);
    }
    line
}

/// `HH:MM:SS,mmm`. Milliseconds are rounded and carried.
pub fn srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60,
        ms
    )
}
