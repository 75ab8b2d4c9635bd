//! Subtitle cue synthesis.
//!
//! Occurrence labels are packed greedily into non-overlapping cues. A label
//! shows up no earlier than `delta` seconds after its occurrence starts, and
//! every cue lasts at least `min_sub_interval` seconds. Consecutive cues are
//! separated by [`CUE_GAP`].
//!
//! Speech-only selections are not packed: each occurrence becomes one cue
//! spanning exactly its start and end.

use std::collections::HashSet;

use super::records::{header, Listing, SubtitleCue};
use super::MetadataReader;
use crate::error::{MetareaderError, Result};
use crate::matching::types_match;
use crate::metadata::{Detection, AUDIO_SPEECH};

pub const DEFAULT_DELTA: f64 = 0.5;
pub const DEFAULT_MIN_SUB_INTERVAL: f64 = 2.0;

/// Gap between the end of one cue and the start of the next.
pub const CUE_GAP: f64 = 0.05;

/// Parameters of [`MetadataReader::list_subtitle`].
#[derive(Debug, Clone)]
pub struct SubtitleOptions {
    /// Type patterns; empty selects every type.
    pub detection_types: Vec<String>,
    pub start_second: usize,
    pub end_second: Option<usize>,
    /// Delay between an occurrence start and its label showing up.
    pub delta: f64,
    /// Shortest cue duration. Must be positive.
    pub min_sub_interval: f64,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            detection_types: Vec::new(),
            start_second: 0,
            end_second: None,
            delta: DEFAULT_DELTA,
            min_sub_interval: DEFAULT_MIN_SUB_INTERVAL,
        }
    }
}

/// A label and the occurrence span it belongs to.
#[derive(Debug, Clone, PartialEq)]
struct Span {
    start: f64,
    end: f64,
    label: String,
    speech: bool,
}

impl MetadataReader {
    /// Subtitle cues for the occurrences seen in the requested seconds.
    pub fn list_subtitle(&self, options: SubtitleOptions) -> Result<Listing<'_, SubtitleCue>> {
        if !(options.min_sub_interval > 0.0) {
            return Err(MetareaderError::invalid(
                "min_sub_interval",
                options.min_sub_interval.to_string(),
            ));
        }
        if !(options.delta >= 0.0) {
            return Err(MetareaderError::invalid("delta", options.delta.to_string()));
        }

        let spans = self.subtitle_spans(&options);
        let cues = if !spans.is_empty() && spans.iter().all(|s| s.speech) {
            spans
                .into_iter()
                .map(|s| SubtitleCue {
                    start: s.start,
                    end: s.end,
                    labels: vec![s.label],
                })
                .collect()
        } else {
            pack_cues(spans, options.delta, options.min_sub_interval)
        };

        Ok(Listing::new(
            header(&["start", "end", "labels"]),
            cues.into_iter(),
        ))
    }

    /// Occurrences referenced from the requested seconds, each once, in order
    /// of first appearance.
    fn subtitle_spans(&self, options: &SubtitleOptions) -> Vec<Span> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut spans = Vec::new();

        for (_, entries) in self
            .index
            .second_data(options.start_second, options.end_second)
        {
            for entry in entries {
                let Ok(detection) = self.index.detection(&entry.detection_id) else {
                    continue;
                };
                if !options.detection_types.is_empty()
                    && !types_match(&detection.detection_type, &options.detection_types)
                {
                    continue;
                }
                for occurrence_id in &entry.occurrence_ids {
                    if !seen.insert((entry.detection_id.as_str(), occurrence_id.as_str())) {
                        continue;
                    }
                    let Some(occurrence) = detection.occurrence(occurrence_id) else {
                        tracing::debug!(
                            detection = %entry.detection_id,
                            occurrence = %occurrence_id,
                            "occurrence not found, skipping"
                        );
                        continue;
                    };
                    spans.push(Span {
                        start: occurrence.start,
                        end: occurrence.end,
                        label: subtitle_label(detection),
                        speech: detection.detection_type == AUDIO_SPEECH,
                    });
                }
            }
        }
        spans
    }
}

/// Identity name for attributed detections, the label otherwise.
fn subtitle_label(detection: &Detection) -> String {
    if detection.attributes.is_none() {
        return detection.label.clone();
    }
    if let Some(top) = detection.top_similar() {
        top.name.clone()
    } else if let Some(gender) = detection.gender() {
        format!("unknown {}", gender.value)
    } else {
        "unknown person".to_string()
    }
}

/// Greedy packing of spans into cues.
///
/// Spans are consumed in input order. Cues are emitted while the pending
/// spans reach further than four minimum intervals past the last cue; the
/// rest drain once the input is exhausted.
fn pack_cues(spans: Vec<Span>, delta: f64, min_sub_interval: f64) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut pending: Vec<Span> = Vec::new();
    let mut last_end = -CUE_GAP;

    for span in spans {
        if !pending.contains(&span) {
            pending.push(span);
        }
        while !pending.is_empty() && last_end + 4.0 * min_sub_interval < latest_start(&pending) {
            cues.push(next_cue(&mut pending, &mut last_end, delta, min_sub_interval));
        }
    }
    while !pending.is_empty() {
        cues.push(next_cue(&mut pending, &mut last_end, delta, min_sub_interval));
    }
    cues
}

fn latest_start(pending: &[Span]) -> f64 {
    pending
        .iter()
        .map(|s| s.start)
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Emit one cue from the pending spans and drop the spans it used up.
///
/// `pending` must not be empty.
fn next_cue(
    pending: &mut Vec<Span>,
    last_end: &mut f64,
    delta: f64,
    min_sub_interval: f64,
) -> SubtitleCue {
    let earliest_start = pending
        .iter()
        .map(|s| s.start)
        .fold(f64::INFINITY, f64::min);
    let start = (*last_end + CUE_GAP).max(earliest_start + delta);

    let (shown, waiting): (Vec<&Span>, Vec<&Span>) =
        pending.iter().partition(|s| s.start + delta <= start);

    let earliest_end = pending
        .iter()
        .map(|s| s.end + delta)
        .fold(f64::INFINITY, f64::min);
    let next_arrival = waiting
        .iter()
        .map(|s| s.start + delta)
        .fold(f64::INFINITY, f64::min);
    let end = (start + min_sub_interval).max(earliest_end.min(next_arrival));

    let mut labels: Vec<String> = Vec::new();
    for span in shown {
        if !labels.contains(&span.label) {
            labels.push(span.label.clone());
        }
    }

    // Spans not shown yet stay pending even when they already ended.
    pending.retain(|s| s.start + delta > start || s.end + delta > end);
    *last_end = end;
    SubtitleCue { start, end, labels }
}
