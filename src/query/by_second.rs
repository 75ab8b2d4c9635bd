//! Per-second listings.

use super::records::{header, Listing, SecondRecord, SentimentRecord, ShortSecondRecord, SubtitleCue};
use super::subtitle::SubtitleOptions;
use super::{check_extras, concept_id, detection_extra, gkg_id, MetadataReader};
use crate::error::Result;
use crate::index::ExtraField;
use crate::matching::DetectionFilter;
use crate::query::records::format_number;

/// Shape of a per-second listing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BySecondMode {
    /// One row per detection per second.
    #[default]
    Detections,
    /// One row per second listing every visible label.
    Short,
    /// Valence time series, see [`MetadataReader::list_sentiment`].
    Sentiment,
    /// Subtitle cues, see [`MetadataReader::list_subtitle`].
    Subtitles { delta: f64, min_sub_interval: f64 },
}

/// Parameters of [`MetadataReader::list_detections_by_second`].
#[derive(Debug, Clone, Default)]
pub struct BySecondOptions {
    pub filter: DetectionFilter,
    pub start_second: usize,
    /// Inclusive; `None` runs to the end of the media.
    pub end_second: Option<usize>,
    pub mode: BySecondMode,
    /// `similar_to`, `gender`, `valence` and `text` are supported.
    pub extra_fields: Vec<ExtraField>,
}

/// Result of a per-second listing; the row type depends on the mode.
pub enum BySecondListing<'a> {
    Detections(Listing<'a, SecondRecord>),
    Short(Listing<'a, ShortSecondRecord>),
    Sentiment(Listing<'a, SentimentRecord>),
    Subtitles(Listing<'a, SubtitleCue>),
}

impl<'a> BySecondListing<'a> {
    pub fn into_cells(self) -> Listing<'a, Vec<String>> {
        match self {
            BySecondListing::Detections(listing) => listing.into_cells(),
            BySecondListing::Short(listing) => listing.into_cells(),
            BySecondListing::Sentiment(listing) => listing.into_cells(),
            BySecondListing::Subtitles(listing) => listing.into_cells(),
        }
    }
}

impl MetadataReader {
    /// Walk `by_second` within the requested range.
    ///
    /// In the default mode a row whose per-second confidence is below the
    /// filter's minimum is dropped; rows without a per-second confidence are
    /// kept.
    pub fn list_detections_by_second(
        &self,
        options: BySecondOptions,
    ) -> Result<BySecondListing<'_>> {
        let BySecondOptions {
            filter,
            start_second,
            end_second,
            mode,
            extra_fields,
        } = options;

        match mode {
            BySecondMode::Subtitles {
                delta,
                min_sub_interval,
            } => {
                let options = SubtitleOptions {
                    detection_types: filter.detection_types,
                    start_second,
                    end_second,
                    delta,
                    min_sub_interval,
                };
                Ok(BySecondListing::Subtitles(self.list_subtitle(options)?))
            }
            BySecondMode::Sentiment => Ok(BySecondListing::Sentiment(
                self.list_sentiment(start_second, end_second)?,
            )),
            BySecondMode::Short => Ok(BySecondListing::Short(self.short_listing(
                filter,
                start_second,
                end_second,
            ))),
            BySecondMode::Detections => {
                check_extras(
                    &extra_fields,
                    &[
                        ExtraField::SimilarTo,
                        ExtraField::Gender,
                        ExtraField::Valence,
                        ExtraField::Text,
                    ],
                )?;
                Ok(BySecondListing::Detections(self.second_listing(
                    filter,
                    start_second,
                    end_second,
                    extra_fields,
                )))
            }
        }
    }

    fn second_listing(
        &self,
        filter: DetectionFilter,
        start_second: usize,
        end_second: Option<usize>,
        extra_fields: Vec<ExtraField>,
    ) -> Listing<'_, SecondRecord> {
        let mut columns = header(&[
            "second",
            "timestamp",
            "detection ID",
            "detection type",
            "confidence",
            "label",
            "Valossa concept ID",
            "GKG concept ID",
        ]);
        columns.extend(extra_fields.iter().map(|f| f.as_str().to_string()));

        let index = &self.index;
        let rows = index
            .second_data(start_second, end_second)
            .flat_map(move |(second, entries)| {
                let mut records = Vec::new();
                for entry in entries {
                    let Ok(detection) = index.detection(&entry.detection_id) else {
                        continue;
                    };
                    if !filter.matches(detection) {
                        continue;
                    }
                    if let (Some(min), Some(c)) = (filter.min_confidence, entry.confidence) {
                        if c < min {
                            continue;
                        }
                    }
                    let extras = extra_fields
                        .iter()
                        .map(|field| match field {
                            ExtraField::Valence => {
                                entry.valence().map(format_number).unwrap_or_default()
                            }
                            other => detection_extra(detection, *other),
                        })
                        .collect();
                    records.push(SecondRecord {
                        second,
                        detection_id: entry.detection_id.clone(),
                        detection_type: detection.detection_type.clone(),
                        confidence: entry.confidence,
                        label: detection.label.clone(),
                        concept_id: concept_id(detection),
                        gkg_id: gkg_id(detection),
                        extras,
                    });
                }
                records
            });

        Listing::new(columns, rows)
    }

    /// Seconds without any matching label are skipped.
    fn short_listing(
        &self,
        filter: DetectionFilter,
        start_second: usize,
        end_second: Option<usize>,
    ) -> Listing<'_, ShortSecondRecord> {
        let index = &self.index;
        let rows = index
            .second_data(start_second, end_second)
            .filter_map(move |(second, entries)| {
                let mut labels: Vec<String> = Vec::new();
                for entry in entries {
                    let Ok(detection) = index.detection(&entry.detection_id) else {
                        continue;
                    };
                    if !filter.matches(detection) {
                        continue;
                    }
                    let label = index
                        .label(&entry.detection_id, true)
                        .unwrap_or_else(|_| detection.label.clone());
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
                if labels.is_empty() {
                    None
                } else {
                    Some(ShortSecondRecord { second, labels })
                }
            });

        Listing::new(header(&["second", "timestamp", "labels"]), rows)
    }
}
