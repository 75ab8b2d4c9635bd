//! Category tag screentime per detection type.

use std::collections::BTreeMap;

use super::MetadataIndex;
use crate::interval::{AdditionMethod, IntervalAccumulator};
use crate::matching::has_any_category;

/// Parameters of [`MetadataIndex::categories`].
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    /// Exact type names; `None` reports every type.
    pub detection_types: Option<Vec<String>>,
    /// Only detections carrying one of these tags contribute.
    pub with_category: Option<Vec<String>>,
    pub start_second: Option<f64>,
    pub end_second: Option<f64>,
}

/// Union screentime of one tag within one detection type.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDuration {
    pub detection_type: String,
    pub tag: String,
    pub duration: f64,
}

struct CategoryEntry {
    detection_ids: Vec<String>,
    duration: IntervalAccumulator,
}

/// type -> tag -> members and their merged occurrences.
pub(super) struct CategoryIndex {
    types: BTreeMap<String, BTreeMap<String, CategoryEntry>>,
}

impl CategoryIndex {
    pub(super) fn build(index: &MetadataIndex) -> Self {
        let mut types: BTreeMap<String, BTreeMap<String, CategoryEntry>> = BTreeMap::new();
        for detection_type in index.types() {
            let tags = types.entry(detection_type.to_string()).or_default();
            for id in index.ids_of_type(detection_type) {
                let Ok(detection) = index.detection(id) else {
                    continue;
                };
                if index.is_blacklisted(detection) {
                    continue;
                }
                for tag in detection.category_tags() {
                    let entry = tags.entry(tag.clone()).or_insert_with(|| CategoryEntry {
                        detection_ids: Vec::new(),
                        duration: IntervalAccumulator::new(AdditionMethod::Union),
                    });
                    entry.detection_ids.push(id.clone());
                    for occurrence in &detection.occurrences {
                        entry.duration.add_interval(occurrence.start, occurrence.end);
                    }
                }
            }
        }
        tracing::debug!(types = types.len(), "built category index");
        Self { types }
    }

    /// Durations per type, longest tag first. Tags with no time in range are
    /// left out.
    pub(super) fn durations(
        &self,
        index: &MetadataIndex,
        query: &CategoryQuery,
    ) -> Vec<CategoryDuration> {
        let mut result = Vec::new();
        for (detection_type, tags) in &self.types {
            if let Some(wanted) = &query.detection_types {
                if !wanted.contains(detection_type) {
                    continue;
                }
            }

            let mut durations: Vec<(&str, f64)> = tags
                .iter()
                .map(|(tag, entry)| (tag.as_str(), entry_duration(index, entry, query)))
                .filter(|(_, duration)| *duration != 0.0)
                .collect();
            durations.sort_by(|a, b| b.1.total_cmp(&a.1));

            result.extend(durations.into_iter().map(|(tag, duration)| CategoryDuration {
                detection_type: detection_type.clone(),
                tag: tag.to_string(),
                duration,
            }));
        }
        result
    }
}

fn entry_duration(index: &MetadataIndex, entry: &CategoryEntry, query: &CategoryQuery) -> f64 {
    let Some(with_category) = &query.with_category else {
        return entry
            .duration
            .duration_between(query.start_second, query.end_second);
    };

    let mut duration = IntervalAccumulator::new(AdditionMethod::Union);
    for id in &entry.detection_ids {
        let Ok(detection) = index.detection(id) else {
            continue;
        };
        if !has_any_category(detection, with_category) {
            continue;
        }
        for occurrence in &detection.occurrences {
            duration.add_interval(occurrence.start, occurrence.end);
        }
    }
    duration.duration_between(query.start_second, query.end_second)
}
