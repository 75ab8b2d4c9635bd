//! Indexed, read-only view over one metadata document.
//!
//! [`MetadataIndex`] owns the document and the optional blacklist. Derived
//! indexes (numeric ID order, categories, emotions, expanded occurrences) are
//! built on first use and cached for the lifetime of the index. The caches are
//! `OnceCell`s, so an index is not shared between threads.

mod categories;
mod emotions;
mod occurrences;

pub use categories::{CategoryDuration, CategoryQuery};
pub use emotions::EmotionIndex;
pub use occurrences::{ExtraField, OccurrenceOrder, OccurrenceQuery, OccurrenceRecord};

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::blacklist::Blacklist;
use crate::error::{MetareaderError, Result};
use crate::matching::{has_any_category, types_match};
use crate::metadata::{
    detection_id_key, Detection, MetadataDocument, SecondEntry, HUMAN_FACE, HUMAN_FACE_GROUP,
};

use categories::CategoryIndex;

/// Order in which [`MetadataIndex::detections`] yields detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionOrder {
    /// Ascending numeric detection ID across all types.
    #[default]
    DetectionId,
    /// Type by type, in the producer's prominence order.
    Prominence,
}

impl FromStr for DetectionOrder {
    type Err = MetareaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "detection_id" => Ok(DetectionOrder::DetectionId),
            "prominence" => Ok(DetectionOrder::Prominence),
            other => Err(MetareaderError::invalid("sort_by", other)),
        }
    }
}

impl fmt::Display for DetectionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionOrder::DetectionId => f.write_str("detection_id"),
            DetectionOrder::Prominence => f.write_str("prominence"),
        }
    }
}

/// Which detections to iterate and how.
#[derive(Debug, Clone, Default)]
pub struct DetectionSelection {
    /// Exact type names. `None` selects every type in the document.
    pub types: Option<Vec<String>>,
    /// Keep only detections carrying at least one of these tags.
    pub categories: Option<Vec<String>>,
    pub order: DetectionOrder,
    /// Maximum number of detections yielded per type.
    pub limit_per_type: Option<usize>,
}

pub struct MetadataIndex {
    document: MetadataDocument,
    blacklist: Option<Blacklist>,
    sorted_ids: OnceCell<Vec<String>>,
    categories: OnceCell<CategoryIndex>,
    emotions: OnceCell<EmotionIndex>,
    occurrences: OnceCell<Vec<OccurrenceRecord>>,
}

impl MetadataIndex {
    /// Index a document.
    ///
    /// Fails when a grouping references a detection ID that does not exist.
    pub fn new(document: MetadataDocument, blacklist: Option<Blacklist>) -> Result<Self> {
        validate_references(&document)?;
        tracing::debug!(
            detections = document.detections.len(),
            seconds = document.detection_groupings.by_second.len(),
            blacklist = blacklist.is_some(),
            "indexed metadata"
        );
        Ok(Self {
            document,
            blacklist,
            sorted_ids: OnceCell::new(),
            categories: OnceCell::new(),
            emotions: OnceCell::new(),
            occurrences: OnceCell::new(),
        })
    }

    pub fn document(&self) -> &MetadataDocument {
        &self.document
    }

    pub fn blacklist(&self) -> Option<&Blacklist> {
        self.blacklist.as_ref()
    }

    /// Media length in seconds.
    pub fn duration(&self) -> f64 {
        self.document.media_info.technical.duration_s
    }

    /// Detection types present in `by_detection_type`, in index order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.document
            .detection_groupings
            .by_detection_type
            .keys()
            .map(String::as_str)
    }

    /// Detection IDs of one type in prominence order.
    pub fn ids_of_type(&self, detection_type: &str) -> &[String] {
        self.document
            .detection_groupings
            .by_detection_type
            .get(detection_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Types matching any of the wildcard patterns, in index order.
    pub fn matching_types(&self, patterns: &[String]) -> Vec<String> {
        self.types()
            .filter(|t| types_match(t, patterns))
            .map(str::to_string)
            .collect()
    }

    pub fn detection(&self, detection_id: &str) -> Result<&Detection> {
        self.document
            .detections
            .get(detection_id)
            .ok_or_else(|| MetareaderError::UnknownDetection(detection_id.to_string()))
    }

    /// Category tags of one detection, in document order.
    pub fn detection_categories(&self, detection_id: &str) -> Result<&[String]> {
        Ok(self.detection(detection_id)?.category_tags())
    }

    pub fn is_blacklisted(&self, detection: &Detection) -> bool {
        self.blacklist
            .as_ref()
            .map_or(false, |bl| bl.is_blacklisted(detection))
    }

    /// Detection IDs in ascending numeric order.
    pub fn sorted_ids(&self) -> &[String] {
        self.sorted_ids.get_or_init(|| {
            let mut ids: Vec<String> = self.document.detections.keys().cloned().collect();
            ids.sort_by(|a, b| detection_id_key(a).cmp(&detection_id_key(b)));
            ids
        })
    }

    /// Iterate detections by `selection`. Blacklisted detections are never
    /// yielded.
    pub fn detections(
        &self,
        selection: DetectionSelection,
    ) -> Box<dyn Iterator<Item = (&str, &Detection)> + '_> {
        let DetectionSelection {
            types,
            categories,
            order,
            limit_per_type,
        } = selection;
        let limit = limit_per_type.unwrap_or(usize::MAX);

        match order {
            DetectionOrder::DetectionId => {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                let by_type = &self.document.detection_groupings.by_detection_type;
                Box::new(self.sorted_ids().iter().filter_map(move |id| {
                    let detection = self.document.detections.get(id)?;
                    if !self.passes(detection, categories.as_deref()) {
                        return None;
                    }
                    let wanted = match &types {
                        Some(types) => types.contains(&detection.detection_type),
                        None => by_type.contains_key(&detection.detection_type),
                    };
                    if !wanted {
                        return None;
                    }
                    let count = counts.entry(detection.detection_type.as_str()).or_insert(0);
                    if *count >= limit {
                        return None;
                    }
                    *count += 1;
                    Some((id.as_str(), detection))
                }))
            }
            DetectionOrder::Prominence => {
                let types = types.unwrap_or_else(|| self.types().map(str::to_string).collect());
                Box::new(types.into_iter().flat_map(move |detection_type| {
                    let ids = match self
                        .document
                        .detection_groupings
                        .by_detection_type
                        .get(&detection_type)
                    {
                        Some(ids) => ids.as_slice(),
                        None => {
                            tracing::debug!(%detection_type, "detection type not found, skipping");
                            &[]
                        }
                    };
                    let categories = categories.clone();
                    ids.iter()
                        .filter_map(move |id| {
                            self.document
                                .detections
                                .get(id)
                                .map(|detection| (id.as_str(), detection))
                        })
                        .filter(move |(_, detection)| {
                            self.passes(detection, categories.as_deref())
                        })
                        .take(limit)
                }))
            }
        }
    }

    fn passes(&self, detection: &Detection, categories: Option<&[String]>) -> bool {
        if self.is_blacklisted(detection) {
            return false;
        }
        match categories {
            Some(categories) => has_any_category(detection, categories),
            None => true,
        }
    }

    /// Per-second entries for the inclusive range `[start_second, end_second]`.
    ///
    /// `end_second = None` runs to the last second. Blacklisted entries are
    /// removed; seconds are yielded even when nothing remains.
    pub fn second_data(
        &self,
        start_second: usize,
        end_second: Option<usize>,
    ) -> impl Iterator<Item = (usize, Vec<&SecondEntry>)> + '_ {
        let by_second = &self.document.detection_groupings.by_second;
        let end = end_second.map_or(by_second.len(), |e| e.saturating_add(1).min(by_second.len()));
        let range = if start_second < end {
            &by_second[start_second..end]
        } else {
            &by_second[0..0]
        };
        range.iter().enumerate().map(move |(offset, entries)| {
            let kept: Vec<&SecondEntry> = entries
                .iter()
                .filter(|entry| {
                    self.document
                        .detections
                        .get(&entry.detection_id)
                        .map_or(false, |d| !self.is_blacklisted(d))
                })
                .collect();
            (start_second + offset, kept)
        })
    }

    /// Category durations, see [`CategoryQuery`].
    pub fn categories(&self, query: &CategoryQuery) -> Vec<CategoryDuration> {
        self.categories
            .get_or_init(|| CategoryIndex::build(self))
            .durations(self, query)
    }

    /// Emotion and valence data gathered from the per-second entries.
    pub fn emotions(&self) -> &EmotionIndex {
        self.emotions.get_or_init(|| EmotionIndex::build(self))
    }

    /// Every emotion name seen in the document -> number of seconds it was
    /// reported for `detection_id`.
    pub fn emotion(&self, detection_id: &str) -> Vec<(String, usize)> {
        self.emotions().emotion_counts(detection_id)
    }

    /// Display label of a detection.
    ///
    /// With `resolve_face_name`, faces resolve to their best identity and face
    /// groups list their members.
    pub fn label(&self, detection_id: &str, resolve_face_name: bool) -> Result<String> {
        let detection = self.detection(detection_id)?;
        if !resolve_face_name {
            return Ok(detection.label.clone());
        }
        match detection.detection_type.as_str() {
            HUMAN_FACE => Ok(self.face_name(detection_id, detection, false)),
            HUMAN_FACE_GROUP => {
                let members = detection
                    .attributes
                    .as_ref()
                    .and_then(|a| a.face_det_ids.as_ref());
                match members {
                    Some(members) => {
                        let names: Vec<String> = members
                            .iter()
                            .map(|id| match self.document.detections.get(id) {
                                Some(member) => self.face_name(id, member, true),
                                None => id.clone(),
                            })
                            .collect();
                        Ok(format!("Face_group: {}", names.join(", ")))
                    }
                    None => Ok(format!("Face_group (id: {})", detection_id)),
                }
            }
            _ => Ok(detection.label.clone()),
        }
    }

    fn face_name(&self, detection_id: &str, detection: &Detection, id_only: bool) -> String {
        if let Some(top) = detection.top_similar() {
            return top.name.clone();
        }
        if id_only {
            return detection_id.to_string();
        }
        match detection.gender() {
            Some(gender) => format!("unknown {} (det id: {})", gender.value, detection_id),
            None => format!("Face (id: {})", detection_id),
        }
    }

    /// Expanded occurrences, see [`OccurrenceQuery`].
    pub fn occurrences(&self, query: &OccurrenceQuery) -> Vec<OccurrenceRecord> {
        let expanded = self
            .occurrences
            .get_or_init(|| occurrences::expand(self));
        occurrences::resolve(self, expanded, query)
    }
}

fn validate_references(document: &MetadataDocument) -> Result<()> {
    let groupings = &document.detection_groupings;
    let by_type = groupings.by_detection_type.values().flatten();
    let by_second = groupings
        .by_second
        .iter()
        .flatten()
        .map(|entry| &entry.detection_id);

    for id in by_type.chain(by_second) {
        if !document.detections.contains_key(id) {
            return Err(MetareaderError::UnknownDetection(id.clone()));
        }
    }
    Ok(())
}
