//! Screentime summaries.

use super::records::{SummaryBlock, SummaryEntry};
use super::MetadataReader;
use crate::error::{MetareaderError, Result};
use crate::interval::{AdditionMethod, IntervalAccumulator};
use crate::matching::{confidence_match, has_any_category, wildcard_match};
use crate::metadata::{Detection, HUMAN_FACE, VISUAL_CONTEXT};

/// Parameters of [`MetadataReader::list_summary`].
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Exact type or wildcard pattern. `None` summarizes faces and visual
    /// context.
    pub detection_type: Option<String>,
    /// Non-face types: only detections carrying one of these tags count.
    pub categories: Option<Vec<String>>,
    pub addition_method: AdditionMethod,
    pub min_confidence: Option<f64>,
    /// Keep the N longest entries of each block.
    pub limit: Option<usize>,
    pub separate_face_identities: bool,
    pub skip_unknown_faces: bool,
    /// Add one count column per emotion name to face blocks.
    pub emotion: bool,
}

/// An entry under construction; screentime stays an accumulator until the
/// identities are merged.
struct Pending {
    entry: SummaryEntry,
    screentime: IntervalAccumulator,
    known: bool,
}

impl MetadataReader {
    /// One block per summarized type, entries longest first.
    pub fn list_summary(&self, options: &SummaryOptions) -> Result<Vec<SummaryBlock>> {
        if let Some(min) = options.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(MetareaderError::invalid("min_confidence", min.to_string()));
            }
        }

        self.summary_types(options.detection_type.as_deref())
            .into_iter()
            .map(|detection_type| self.summary_block(&detection_type, options))
            .collect()
    }

    fn summary_types(&self, pattern: Option<&str>) -> Vec<String> {
        match pattern {
            None => vec![HUMAN_FACE.to_string(), VISUAL_CONTEXT.to_string()],
            Some(pattern) if pattern.contains('*') => self
                .index
                .types()
                .filter(|t| wildcard_match(pattern, t) && !t.contains("iab"))
                .map(str::to_string)
                .collect(),
            Some(exact) => vec![exact.to_string()],
        }
    }

    fn summary_block(&self, detection_type: &str, options: &SummaryOptions) -> Result<SummaryBlock> {
        let pending = if detection_type == HUMAN_FACE {
            let faces = self.face_entries(options)?;
            if options.separate_face_identities {
                faces
            } else {
                merge_identities(faces)?
            }
        } else {
            self.label_entries(detection_type, options)
        };

        let duration = self.index.duration();
        let mut entries: Vec<SummaryEntry> = pending
            .into_iter()
            .map(|p| {
                let screentime = p.screentime.total();
                SummaryEntry {
                    screentime,
                    share: if duration > 0.0 { screentime / duration } else { 0.0 },
                    ..p.entry
                }
            })
            .collect();
        entries.sort_by(|a, b| b.screentime.total_cmp(&a.screentime));
        if let Some(limit) = options.limit {
            entries.truncate(limit);
        }

        let emotion_names = if options.emotion && detection_type == HUMAN_FACE {
            self.index.emotions().emotion_names().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        tracing::debug!(%detection_type, entries = entries.len(), "summarized");
        Ok(SummaryBlock {
            detection_type: detection_type.to_string(),
            entries,
            emotion_names,
        })
    }

    fn face_entries(&self, options: &SummaryOptions) -> Result<Vec<Pending>> {
        let mut faces = Vec::new();
        for id in self.index.ids_of_type(HUMAN_FACE) {
            let detection = self.index.detection(id)?;
            if self.index.is_blacklisted(detection) {
                continue;
            }
            if detection.attributes.is_none() {
                return Err(MetareaderError::MissingField {
                    detection_id: id.clone(),
                    field: "a",
                });
            }

            let (name, confidence) = match detection.top_similar() {
                Some(top) => {
                    if options.min_confidence.map_or(false, |min| top.confidence < min) {
                        continue;
                    }
                    (top.name.clone(), Some(top.confidence))
                }
                None if options.skip_unknown_faces => continue,
                None => {
                    let gender = detection.gender().map_or("person", |g| g.value.as_str());
                    (format!("unknown {} (det id: {})", gender, id), None)
                }
            };

            let emotions = if options.emotion {
                self.index
                    .emotion(id)
                    .into_iter()
                    .map(|(_, count)| count)
                    .collect()
            } else {
                Vec::new()
            };

            faces.push(Pending {
                entry: SummaryEntry {
                    detection_id: id.clone(),
                    name,
                    screentime: 0.0,
                    confidence,
                    share: 0.0,
                    emotions,
                },
                screentime: screentime(detection, options.addition_method, None),
                known: confidence.is_some(),
            });
        }
        Ok(faces)
    }

    fn label_entries(&self, detection_type: &str, options: &SummaryOptions) -> Vec<Pending> {
        let mut labels = Vec::new();
        for id in self.index.ids_of_type(detection_type) {
            let Ok(detection) = self.index.detection(id) else {
                continue;
            };
            if self.index.is_blacklisted(detection) {
                continue;
            }
            if let Some(categories) = &options.categories {
                if !has_any_category(detection, categories) {
                    continue;
                }
            }
            if !confidence_match(detection, options.min_confidence) {
                continue;
            }

            labels.push(Pending {
                entry: SummaryEntry {
                    detection_id: id.clone(),
                    name: detection.label.clone(),
                    screentime: 0.0,
                    confidence: None,
                    share: 0.0,
                    emotions: Vec::new(),
                },
                screentime: screentime(detection, options.addition_method, options.min_confidence),
                known: false,
            });
        }
        labels
    }
}

/// Accumulate the occurrences of one detection. With `min_confidence`,
/// occurrences below it or without a maximum confidence are left out.
fn screentime(
    detection: &Detection,
    method: AdditionMethod,
    min_confidence: Option<f64>,
) -> IntervalAccumulator {
    let mut accumulator = IntervalAccumulator::new(method);
    for occurrence in &detection.occurrences {
        if let Some(min) = min_confidence {
            if occurrence.max_confidence.map_or(true, |c| c < min) {
                continue;
            }
        }
        accumulator.add_interval(occurrence.start, occurrence.end);
    }
    accumulator
}

/// Fold recognized faces sharing a name into the first one seen. Unknown
/// faces stay separate.
fn merge_identities(faces: Vec<Pending>) -> Result<Vec<Pending>> {
    let mut merged: Vec<Pending> = Vec::new();
    for face in faces {
        let existing = if face.known {
            merged
                .iter_mut()
                .find(|m| m.known && m.entry.name == face.entry.name)
        } else {
            None
        };
        match existing {
            Some(target) => {
                target.screentime.merge(&face.screentime)?;
                target.entry.confidence = match (target.entry.confidence, face.entry.confidence) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                for (total, count) in target.entry.emotions.iter_mut().zip(&face.entry.emotions) {
                    *total += count;
                }
            }
            None => merged.push(face),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataDocument;

    const DOC: &str = r#"{
        "media_info": {"technical": {"duration_s": 100.0}},
        "detections": {
            "1": {"t": "human.face", "label": "face",
                  "a": {"gender": {"value": "female", "c": 0.9},
                        "similar_to": [{"name": "Ada", "c": 0.9}]},
                  "occs": [{"id": "1", "ss": 0.0, "se": 5.0}]},
            "2": {"t": "human.face", "label": "face",
                  "a": {"gender": {"value": "female", "c": 0.8},
                        "similar_to": [{"name": "Ada", "c": 0.7}]},
                  "occs": [{"id": "2", "ss": 10.0, "se": 12.0}]},
            "3": {"t": "human.face", "label": "face",
                  "a": {"gender": {"value": "male", "c": 0.6}},
                  "occs": [{"id": "3", "ss": 20.0, "se": 21.0}]},
            "4": {"t": "visual.context", "label": "dog",
                  "occs": [{"id": "4", "ss": 0.0, "se": 3.0, "c_max": 0.9},
                           {"id": "5", "ss": 3.0, "se": 8.0, "c_max": 0.4}]},
            "5": {"t": "visual.context", "label": "cat",
                  "occs": [{"id": "6", "ss": 0.0, "se": 2.0, "c_max": 0.8}]}
        },
        "detection_groupings": {
            "by_detection_type": {
                "human.face": ["1", "2", "3"],
                "visual.context": ["5", "4"]
            },
            "by_second": []
        }
    }"#;

    fn reader() -> MetadataReader {
        MetadataReader::new(MetadataDocument::parse_str(DOC).unwrap(), None).unwrap()
    }

    fn names(block: &SummaryBlock) -> Vec<&str> {
        block.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn default_summarizes_faces_then_visual_context() {
        let blocks = reader().list_summary(&SummaryOptions::default()).unwrap();
        let types: Vec<&str> = blocks.iter().map(|b| b.detection_type.as_str()).collect();
        assert_eq!(types, vec!["human.face", "visual.context"]);
        assert_eq!(names(&blocks[1]), vec!["dog", "cat"]);
        assert_eq!(blocks[1].entries[0].screentime, 8.0);
        assert!((blocks[1].entries[0].share - 0.08).abs() < 1e-12);
    }

    #[test]
    fn same_name_identities_merge() {
        let options = SummaryOptions {
            detection_type: Some("human.face".to_string()),
            ..SummaryOptions::default()
        };
        let blocks = reader().list_summary(&options).unwrap();
        let ada = &blocks[0].entries[0];
        assert_eq!(ada.name, "Ada");
        assert_eq!(ada.detection_id, "1");
        assert_eq!(ada.screentime, 7.0);
        assert_eq!(ada.confidence, Some(0.7));
        assert_eq!(names(&blocks[0]), vec!["Ada", "unknown male (det id: 3)"]);
    }

    #[test]
    fn separate_identities_and_skip_unknown() {
        let options = SummaryOptions {
            detection_type: Some("human.face".to_string()),
            separate_face_identities: true,
            skip_unknown_faces: true,
            ..SummaryOptions::default()
        };
        let blocks = reader().list_summary(&options).unwrap();
        assert_eq!(names(&blocks[0]), vec!["Ada", "Ada"]);
        assert_eq!(blocks[0].entries[1].screentime, 2.0);
    }

    #[test]
    fn min_confidence_filters_occurrences() {
        let options = SummaryOptions {
            detection_type: Some("visual.*".to_string()),
            min_confidence: Some(0.5),
            ..SummaryOptions::default()
        };
        let blocks = reader().list_summary(&options).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(names(&blocks[0]), vec!["dog", "cat"]);
        assert_eq!(blocks[0].entries[0].screentime, 3.0);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let options = SummaryOptions {
            detection_type: Some("visual.context".to_string()),
            limit: Some(1),
            ..SummaryOptions::default()
        };
        let blocks = reader().list_summary(&options).unwrap();
        assert_eq!(names(&blocks[0]), vec!["dog"]);
    }

    #[test]
    fn absent_type_yields_empty_block() {
        let options = SummaryOptions {
            detection_type: Some("audio.context".to_string()),
            ..SummaryOptions::default()
        };
        let blocks = reader().list_summary(&options).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].entries.is_empty());
    }

    #[test]
    fn face_without_attributes_is_a_schema_error() {
        let json = DOC.replace(
            r#""a": {"gender": {"value": "male", "c": 0.6}},"#,
            "",
        );
        let reader =
            MetadataReader::new(MetadataDocument::parse_str(&json).unwrap(), None).unwrap();
        let options = SummaryOptions {
            detection_type: Some("human.face".to_string()),
            ..SummaryOptions::default()
        };
        assert!(matches!(
            reader.list_summary(&options),
            Err(MetareaderError::MissingField { .. })
        ));
    }
}
