//! Detections expanded into their individual occurrences.

use std::fmt;
use std::str::FromStr;

use super::MetadataIndex;
use crate::error::{MetareaderError, Result};
use crate::matching::has_any_category;
use crate::metadata::{SimilarTo, HUMAN_FACE};

/// Optional columns appended to listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtraField {
    SimilarTo,
    Gender,
    Text,
    Valence,
}

impl ExtraField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraField::SimilarTo => "similar_to",
            ExtraField::Gender => "gender",
            ExtraField::Text => "text",
            ExtraField::Valence => "valence",
        }
    }
}

impl FromStr for ExtraField {
    type Err = MetareaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "similar_to" => Ok(ExtraField::SimilarTo),
            "gender" => Ok(ExtraField::Gender),
            "text" => Ok(ExtraField::Text),
            "valence" => Ok(ExtraField::Valence),
            other => Err(MetareaderError::invalid("extra_header", other)),
        }
    }
}

impl fmt::Display for ExtraField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order of occurrence listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccurrenceOrder {
    /// Ascending numeric detection ID, occurrences in document order.
    #[default]
    DetectionId,
    /// Ascending start second.
    StartSecond,
    /// Descending valence; occurrences without valence are dropped.
    Valence,
    /// Longest first.
    Duration,
}

impl FromStr for OccurrenceOrder {
    type Err = MetareaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "detection_id" => Ok(OccurrenceOrder::DetectionId),
            "start_second" => Ok(OccurrenceOrder::StartSecond),
            "valence" => Ok(OccurrenceOrder::Valence),
            "duration" => Ok(OccurrenceOrder::Duration),
            other => Err(MetareaderError::invalid("sort_by", other)),
        }
    }
}

/// Parameters of [`MetadataIndex::occurrences`].
#[derive(Debug, Clone, Default)]
pub struct OccurrenceQuery {
    /// Exact type names.
    pub detection_types: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub sort_by: OccurrenceOrder,
    /// Keep occurrences ending at or after this second.
    pub start_second: Option<f64>,
    /// Keep occurrences starting at or before this second.
    pub end_second: Option<f64>,
    pub extra_fields: Vec<ExtraField>,
}

/// One occurrence with its owning detection and derived fields.
#[derive(Debug, Clone)]
pub struct OccurrenceRecord {
    pub detection_id: String,
    pub detection_type: String,
    pub occurrence_id: String,
    pub start: f64,
    pub end: f64,
    pub max_confidence: Option<f64>,
    /// Mean face valence over the occurrence, when requested.
    pub valence: Option<f64>,
    /// Best identity candidate of a face, when requested.
    pub similar_to: Option<SimilarTo>,
}

impl OccurrenceRecord {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Every occurrence of every non-blacklisted detection, in detection ID order.
pub(super) fn expand(index: &MetadataIndex) -> Vec<OccurrenceRecord> {
    let mut records = Vec::new();
    for id in index.sorted_ids() {
        let Ok(detection) = index.detection(id) else {
            continue;
        };
        if index.is_blacklisted(detection) {
            continue;
        }
        records.extend(detection.occurrences.iter().map(|occurrence| OccurrenceRecord {
            detection_id: id.clone(),
            detection_type: detection.detection_type.clone(),
            occurrence_id: occurrence.id.clone(),
            start: occurrence.start,
            end: occurrence.end,
            max_confidence: occurrence.max_confidence,
            valence: None,
            similar_to: None,
        }));
    }
    tracing::debug!(occurrences = records.len(), "expanded occurrences");
    records
}

/// Filter, decorate and sort the expanded occurrences for one query.
pub(super) fn resolve(
    index: &MetadataIndex,
    expanded: &[OccurrenceRecord],
    query: &OccurrenceQuery,
) -> Vec<OccurrenceRecord> {
    let want_valence = query.sort_by == OccurrenceOrder::Valence
        || query.extra_fields.contains(&ExtraField::Valence);
    let want_similar_to = query.extra_fields.contains(&ExtraField::SimilarTo);

    let mut records: Vec<OccurrenceRecord> = expanded
        .iter()
        .filter(|record| {
            query
                .detection_types
                .as_ref()
                .map_or(true, |types| types.contains(&record.detection_type))
        })
        .filter(|record| match &query.categories {
            Some(categories) => index
                .detection(&record.detection_id)
                .map_or(false, |d| has_any_category(d, categories)),
            None => true,
        })
        .filter(|record| query.start_second.map_or(true, |s| record.end >= s))
        .filter(|record| query.end_second.map_or(true, |e| record.start <= e))
        .cloned()
        .collect();

    for record in &mut records {
        if record.detection_type != HUMAN_FACE {
            continue;
        }
        if want_valence {
            let from = record.start.max(0.0).floor() as usize;
            let to = record.end.max(0.0).floor() as usize;
            record.valence = index
                .emotions()
                .average_valence(&record.detection_id, from, to);
        }
        if want_similar_to {
            record.similar_to = index
                .detection(&record.detection_id)
                .ok()
                .and_then(|d| d.top_similar())
                .cloned();
        }
    }

    match query.sort_by {
        OccurrenceOrder::DetectionId => {}
        OccurrenceOrder::StartSecond => records.sort_by(|a, b| a.start.total_cmp(&b.start)),
        OccurrenceOrder::Valence => {
            records.retain(|r| r.valence.is_some());
            records.sort_by(|a, b| {
                let (a, b) = (a.valence.unwrap_or_default(), b.valence.unwrap_or_default());
                b.total_cmp(&a)
            });
        }
        OccurrenceOrder::Duration => {
            records.sort_by(|a, b| b.duration().total_cmp(&a.duration()))
        }
    }
    records
}
