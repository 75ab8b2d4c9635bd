//! Detection and category listings.

use super::records::{header, CategoryRecord, DetectionRecord, Listing};
use super::{check_extras, concept_id, detection_extra, gkg_id, MetadataReader};
use crate::error::Result;
use crate::index::{CategoryQuery, DetectionOrder, DetectionSelection, ExtraField};
use crate::matching::DetectionFilter;

/// Parameters of [`MetadataReader::list_detections`].
#[derive(Debug, Clone, Default)]
pub struct DetectionListOptions {
    pub filter: DetectionFilter,
    pub order: DetectionOrder,
    /// Keep only the N first detections of each type.
    pub limit_per_type: Option<usize>,
    /// `similar_to`, `gender` and `text` are supported.
    pub extra_fields: Vec<ExtraField>,
}

/// Parameters of [`MetadataReader::list_categories`].
#[derive(Debug, Clone, Default)]
pub struct CategoryListOptions {
    /// Type patterns; empty reports every type.
    pub detection_types: Vec<String>,
    /// Only detections carrying one of these tags contribute.
    pub categories: Option<Vec<String>>,
    pub start_second: Option<f64>,
    pub end_second: Option<f64>,
    /// Maximum number of tags listed.
    pub limit: Option<usize>,
}

impl MetadataReader {
    /// One row per detection: ID, type, label, concept IDs, extras.
    pub fn list_detections(
        &self,
        options: DetectionListOptions,
    ) -> Result<Listing<'_, DetectionRecord>> {
        check_extras(
            &options.extra_fields,
            &[ExtraField::SimilarTo, ExtraField::Gender, ExtraField::Text],
        )?;

        let DetectionListOptions {
            filter,
            order,
            limit_per_type,
            extra_fields,
        } = options;

        let mut columns = header(&[
            "detection ID",
            "detection type",
            "label",
            "Valossa concept ID",
            "GKG concept ID",
        ]);
        columns.extend(extra_fields.iter().map(|f| f.as_str().to_string()));

        let selection = DetectionSelection {
            types: self.resolve_types(&filter.detection_types),
            categories: filter.categories.clone(),
            order,
            limit_per_type,
        };

        let rows = self
            .index
            .detections(selection)
            .filter(move |(_, detection)| filter.matches(detection))
            .map(move |(id, detection)| DetectionRecord {
                detection_id: id.to_string(),
                detection_type: detection.detection_type.clone(),
                label: detection.label.clone(),
                concept_id: concept_id(detection),
                gkg_id: gkg_id(detection),
                extras: extra_fields
                    .iter()
                    .map(|field| detection_extra(detection, *field))
                    .collect(),
            });

        Ok(Listing::new(columns, rows))
    }

    /// Category tags by screentime, longest first within each type.
    pub fn list_categories(
        &self,
        options: CategoryListOptions,
    ) -> Result<Listing<'_, CategoryRecord>> {
        let query = CategoryQuery {
            detection_types: self.resolve_types(&options.detection_types),
            with_category: options.categories,
            start_second: options.start_second,
            end_second: options.end_second,
        };
        let limit = options.limit.unwrap_or(usize::MAX);

        let rows = self
            .index
            .categories(&query)
            .into_iter()
            .take(limit)
            .map(|c| CategoryRecord {
                detection_type: c.detection_type,
                tag: c.tag,
                duration: c.duration,
            });

        Ok(Listing::new(
            header(&["detection type", "category tag", "duration"]),
            rows,
        ))
    }
}
