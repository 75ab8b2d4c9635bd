//! Predicates used to narrow listings.
//!
//! Type and person filters accept `*` wildcards and comma-separated lists.
//! Labels, concept IDs and category tags match exactly.

use crate::error::{MetareaderError, Result};
use crate::metadata::Detection;

/// External ontologies that can be filtered on.
pub const SUPPORTED_ONTOLOGIES: &[&str] = &["gkg"];

/// Match `target` against a pattern where `*` stands for any run of characters.
///
/// Without a leading `*` the first fragment must start the target; without a
/// trailing `*` the last fragment must end it. A pattern without `*` is an
/// exact comparison.
pub fn wildcard_match(pattern: &str, target: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == target;
    }

    let fragments: Vec<&str> = pattern.split('*').collect();
    let first = fragments[0];
    let last = fragments[fragments.len() - 1];

    let Some(mut remaining) = target.strip_prefix(first) else {
        return false;
    };

    for fragment in &fragments[1..fragments.len() - 1] {
        match remaining.find(fragment) {
            Some(index) => remaining = &remaining[index + fragment.len()..],
            None => return false,
        }
    }

    last.is_empty() || remaining.ends_with(last)
}

/// Split comma-separated pattern lists into trimmed, non-empty patterns.
fn split_patterns(patterns: &[String]) -> impl Iterator<Item = &str> {
    patterns
        .iter()
        .flat_map(|p| p.split(','))
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Whether `value` matches any of the (comma-separated) patterns.
pub fn types_match(value: &str, patterns: &[String]) -> bool {
    split_patterns(patterns).any(|pattern| wildcard_match(pattern, value))
}

/// Whether any identity candidate of `detection` matches any pattern.
///
/// Detections without `similar_to` candidates never match.
pub fn person_match(detection: &Detection, patterns: &[String]) -> bool {
    let candidates = detection.similar_to();
    split_patterns(patterns)
        .any(|pattern| candidates.iter().any(|c| wildcard_match(pattern, &c.name)))
}

/// Whether the detection meets a minimum confidence.
///
/// The best evidence available decides: identity candidates first, then the
/// gender confidence, then occurrence maxima. Occurrence scanning stops with
/// no match at the first occurrence without a confidence (face groups and
/// unrecognized faces have none).
pub fn confidence_match(detection: &Detection, min_confidence: Option<f64>) -> bool {
    let Some(threshold) = min_confidence else {
        return true;
    };

    if let Some(candidates) = detection
        .attributes
        .as_ref()
        .and_then(|a| a.similar_to.as_ref())
    {
        return candidates.iter().any(|c| c.confidence >= threshold);
    }

    if let Some(gender) = detection.gender() {
        if gender.confidence >= threshold {
            return true;
        }
    }

    for occurrence in &detection.occurrences {
        match occurrence.max_confidence {
            Some(c) if c >= threshold => return true,
            Some(_) => {}
            None => return false,
        }
    }
    false
}

/// An `(ontology, concept ID)` pair. Only supported ontologies can be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConceptId {
    ontology: String,
    id: String,
}

impl ExternalConceptId {
    pub fn new(ontology: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let ontology = ontology.into();
        if !SUPPORTED_ONTOLOGIES.contains(&ontology.as_str()) {
            return Err(MetareaderError::UnsupportedOntology(ontology));
        }
        Ok(Self {
            ontology,
            id: id.into(),
        })
    }

    pub fn ontology(&self) -> &str {
        &self.ontology
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, detection: &Detection) -> bool {
        detection.external_id(&self.ontology) == Some(self.id.as_str())
    }
}

/// Detection-level conditions shared by the listing operations.
///
/// Every set condition must hold; unset conditions are ignored.
#[derive(Debug, Clone, Default)]
pub struct DetectionFilter {
    /// Type patterns (wildcards, comma lists).
    pub detection_types: Vec<String>,
    /// Exact label.
    pub label: Option<String>,
    /// Person name patterns matched against `similar_to` candidates.
    pub persons: Vec<String>,
    pub valossa_cid: Option<String>,
    pub external_concept: Option<ExternalConceptId>,
    pub min_confidence: Option<f64>,
    /// Exact category tags; any overlap matches.
    pub categories: Option<Vec<String>>,
}

impl DetectionFilter {
    pub fn matches(&self, detection: &Detection) -> bool {
        if !self.detection_types.is_empty()
            && !types_match(&detection.detection_type, &self.detection_types)
        {
            return false;
        }
        if let Some(label) = &self.label {
            if &detection.label != label {
                return false;
            }
        }
        if !self.persons.is_empty() && !person_match(detection, &self.persons) {
            return false;
        }
        if let Some(cid) = &self.valossa_cid {
            if detection.concept_id.as_deref() != Some(cid.as_str()) {
                return false;
            }
        }
        if let Some(external) = &self.external_concept {
            if !external.matches(detection) {
                return false;
            }
        }
        if !confidence_match(detection, self.min_confidence) {
            return false;
        }
        if let Some(categories) = &self.categories {
            if !has_any_category(detection, categories) {
                return false;
            }
        }
        true
    }
}

/// Whether the detection carries at least one of `categories`.
pub fn has_any_category(detection: &Detection, categories: &[String]) -> bool {
    detection
        .category_tags()
        .iter()
        .any(|tag| categories.contains(tag))
}
