//! Occurrence listing.

use super::records::{format_number, header, Listing, OccurrenceRow};
use super::{check_extras, MetadataReader};
use crate::error::Result;
use crate::index::{ExtraField, OccurrenceOrder, OccurrenceQuery};
use crate::matching::DetectionFilter;

/// Parameters of [`MetadataReader::list_occurrences`].
#[derive(Debug, Clone, Default)]
pub struct OccurrenceListOptions {
    /// Applied to the detection owning each occurrence.
    pub filter: DetectionFilter,
    pub sort_by: OccurrenceOrder,
    pub start_second: Option<f64>,
    pub end_second: Option<f64>,
    /// `valence`, `similar_to` and `text` are supported.
    pub extra_fields: Vec<ExtraField>,
}

impl MetadataReader {
    /// One row per occurrence of every matching detection.
    pub fn list_occurrences(
        &self,
        options: OccurrenceListOptions,
    ) -> Result<Listing<'_, OccurrenceRow>> {
        check_extras(
            &options.extra_fields,
            &[ExtraField::Valence, ExtraField::SimilarTo, ExtraField::Text],
        )?;

        let OccurrenceListOptions {
            filter,
            sort_by,
            start_second,
            end_second,
            extra_fields,
        } = options;

        let mut columns = header(&[
            "detection ID",
            "detection type",
            "label",
            "occurrence ID",
            "start",
            "end",
            "max confidence",
        ]);
        for field in &extra_fields {
            match field {
                ExtraField::SimilarTo => {
                    columns.push("similar_to".to_string());
                    columns.push("recognition confidence".to_string());
                }
                other => columns.push(other.as_str().to_string()),
            }
        }

        let query = OccurrenceQuery {
            detection_types: self.resolve_types(&filter.detection_types),
            categories: filter.categories.clone(),
            sort_by,
            start_second,
            end_second,
            extra_fields: extra_fields.clone(),
        };
        let records = self.index.occurrences(&query);
        let index = &self.index;

        let rows = records.into_iter().filter_map(move |record| {
            let detection = index.detection(&record.detection_id).ok()?;
            if !filter.matches(detection) {
                return None;
            }

            let mut extras = Vec::new();
            for field in &extra_fields {
                match field {
                    ExtraField::Valence => {
                        extras.push(record.valence.map(format_number).unwrap_or_default())
                    }
                    ExtraField::SimilarTo => {
                        let similar = record.similar_to.as_ref();
                        extras.push(similar.map(|s| s.name.clone()).unwrap_or_default());
                        extras.push(
                            similar
                                .map(|s| format_number(s.confidence))
                                .unwrap_or_default(),
                        );
                    }
                    ExtraField::Text => {
                        extras.push(detection.text().unwrap_or_default().to_string())
                    }
                    ExtraField::Gender => {}
                }
            }

            Some(OccurrenceRow {
                label: detection.label.clone(),
                detection_id: record.detection_id,
                detection_type: record.detection_type,
                occurrence_id: record.occurrence_id,
                start: record.start,
                end: record.end,
                max_confidence: record.max_confidence,
                extras,
            })
        });

        Ok(Listing::new(columns, rows))
    }
}
