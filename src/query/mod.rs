//! Query operations over an indexed metadata document.
//!
//! [`MetadataReader`] is the entry point. Each operation validates its
//! arguments up front and returns either a lazy [`Listing`] or a typed
//! structure. Nothing here prints.

mod by_second;
mod detections;
mod occurrences;
mod records;
mod sentiment;
mod subtitle;
mod summary;

pub use by_second::{BySecondListing, BySecondMode, BySecondOptions};
pub use detections::{CategoryListOptions, DetectionListOptions};
pub use occurrences::OccurrenceListOptions;
pub use records::{
    format_number, CategoryRecord, DetectionRecord, Listing, MetadataInfo, OccurrenceRow, Row,
    SecondRecord, SentimentRecord, ShortSecondRecord, SubtitleCue, SummaryBlock, SummaryEntry,
};
pub use sentiment::ValenceSeries;
pub use subtitle::{SubtitleOptions, DEFAULT_DELTA, DEFAULT_MIN_SUB_INTERVAL};
pub use summary::SummaryOptions;

use crate::blacklist::Blacklist;
use crate::error::{MetareaderError, Result};
use crate::index::{ExtraField, MetadataIndex};
use crate::metadata::{Detection, MetadataDocument};

/// Answers listing and summary queries over one document.
pub struct MetadataReader {
    index: MetadataIndex,
}

impl MetadataReader {
    /// Index `document`. Fails on dangling detection references.
    pub fn new(document: MetadataDocument, blacklist: Option<Blacklist>) -> Result<Self> {
        Ok(Self {
            index: MetadataIndex::new(document, blacklist)?,
        })
    }

    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    /// Format versions, title, duration and source URLs.
    pub fn metadata_info(&self) -> MetadataInfo {
        let document = self.index.document();
        let media = &document.job_info.request.media;
        MetadataInfo {
            metadata_format: document.version_info.metadata_format.clone(),
            backend: document.version_info.backend.clone(),
            title: document
                .media_info
                .from_customer
                .title
                .clone()
                .or_else(|| media.title.clone()),
            duration_s: document.media_info.technical.duration_s,
            description: media.description.clone(),
            video_url: media.video.as_ref().and_then(|v| v.url.clone()),
            transcript_url: media.transcript.as_ref().and_then(|t| t.url.clone()),
        }
    }

    /// Types selected by wildcard patterns; `None` when no pattern is given.
    fn resolve_types(&self, patterns: &[String]) -> Option<Vec<String>> {
        if patterns.is_empty() {
            None
        } else {
            Some(self.index.matching_types(patterns))
        }
    }
}

/// Reject extra fields the operation does not support.
fn check_extras(requested: &[ExtraField], supported: &[ExtraField]) -> Result<()> {
    match requested.iter().find(|field| !supported.contains(field)) {
        Some(field) => Err(MetareaderError::invalid("extra_header", field.as_str())),
        None => Ok(()),
    }
}

/// Value of a detection-level extra column; empty when absent.
fn detection_extra(detection: &Detection, field: ExtraField) -> String {
    match field {
        ExtraField::SimilarTo => detection
            .top_similar()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        ExtraField::Gender => detection
            .gender()
            .map(|g| g.value.clone())
            .unwrap_or_default(),
        ExtraField::Text => detection.text().unwrap_or_default().to_string(),
        ExtraField::Valence => detection
            .sentiment()
            .and_then(|s| s.valence)
            .map(format_number)
            .unwrap_or_default(),
    }
}

fn gkg_id(detection: &Detection) -> String {
    detection.external_id("gkg").unwrap_or_default().to_string()
}

fn concept_id(detection: &Detection) -> String {
    detection.concept_id.clone().unwrap_or_default()
}
