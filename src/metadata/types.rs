//! Type definitions for the Valossa Core metadata format (1.3.x).
//!
//! The document is a single JSON object:
//!
//! ```text
//! {
//!   "version_info": {"metadata_format": "1.3.4", "backend": "..."},
//!   "job_info": {"request": {"media": {"description": null, "video": {"url": "..."}}}},
//!   "media_info": {"technical": {"duration_s": 100.0}, "from_customer": {"title": "..."}},
//!   "detections": {
//!     "1": {"t": "visual.context", "label": "dog", "cid": "X1",
//!           "occs": [{"id": "1", "ss": 0.0, "se": 3.0, "c_max": 0.8}]}
//!   },
//!   "detection_groupings": {
//!     "by_detection_type": {"visual.context": ["1"]},
//!     "by_second": [[{"d": "1", "o": ["1"], "c": 0.8}], ...]
//!   }
//! }
//! ```
//!
//! Short JSON keys (`t`, `a`, `occs`, `ss`, ...) are renamed to descriptive
//! field names. Optional blocks are `Option`s so their absence can be told
//! apart from empty content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Document
// ============================================================================

/// A complete metadata document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub version_info: VersionInfo,

    #[serde(default)]
    pub job_info: JobInfo,

    pub media_info: MediaInfo,

    /// Detection ID -> detection.
    #[serde(default)]
    pub detections: BTreeMap<String, Detection>,

    #[serde(default)]
    pub detection_groupings: DetectionGroupings,
}

/// Format and backend versions of the producer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub metadata_format: String,

    #[serde(default)]
    pub backend: String,
}

/// Customer-supplied job description. Passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(default)]
    pub request: JobRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub media: RequestMedia,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestMedia {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub video: Option<UrlRef>,

    #[serde(default)]
    pub transcript: Option<UrlRef>,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlRef {
    #[serde(default)]
    pub url: Option<String>,
}

/// Technical facts about the analysed media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub technical: TechnicalInfo,

    #[serde(default)]
    pub from_customer: CustomerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalInfo {
    /// Total media length in seconds.
    pub duration_s: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub title: Option<String>,
}

/// Producer-built groupings of detection IDs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionGroupings {
    /// Detection type -> detection IDs in descending prominence.
    #[serde(default)]
    pub by_detection_type: BTreeMap<String, Vec<String>>,

    /// Index = second from media start.
    #[serde(default)]
    pub by_second: Vec<Vec<SecondEntry>>,
}

// ============================================================================
// Detections
// ============================================================================

/// One recognized entity, concept or event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Dotted type taxonomy, e.g. `human.face` or `visual.context`.
    #[serde(rename = "t")]
    pub detection_type: String,

    #[serde(default)]
    pub label: String,

    /// Valossa concept ID.
    #[serde(rename = "cid", default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,

    /// External ontology name -> concept reference.
    #[serde(rename = "ext_refs", default, skip_serializing_if = "Option::is_none")]
    pub external_refs: Option<BTreeMap<String, ExternalRef>>,

    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,

    #[serde(rename = "occs", default)]
    pub occurrences: Vec<Occurrence>,

    #[serde(rename = "categ", default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Categories>,
}

impl Detection {
    /// Category tags of this detection, empty when it has none.
    pub fn category_tags(&self) -> &[String] {
        self.categories
            .as_ref()
            .map(|c| c.tags.as_slice())
            .unwrap_or(&[])
    }

    /// Ranked identity candidates, empty when there are none.
    pub fn similar_to(&self) -> &[SimilarTo] {
        self.attributes
            .as_ref()
            .and_then(|a| a.similar_to.as_deref())
            .unwrap_or(&[])
    }

    /// Best identity candidate.
    pub fn top_similar(&self) -> Option<&SimilarTo> {
        self.similar_to().first()
    }

    pub fn gender(&self) -> Option<&Gender> {
        self.attributes.as_ref().and_then(|a| a.gender.as_ref())
    }

    pub fn text(&self) -> Option<&str> {
        self.attributes.as_ref().and_then(|a| a.text.as_deref())
    }

    pub fn sentiment(&self) -> Option<&Sentiment> {
        self.attributes.as_ref().and_then(|a| a.sentiment.as_ref())
    }

    /// Concept ID in the named external ontology.
    pub fn external_id(&self, ontology: &str) -> Option<&str> {
        self.external_refs
            .as_ref()
            .and_then(|refs| refs.get(ontology))
            .map(|r| r.id.as_str())
    }

    pub fn occurrence(&self, occurrence_id: &str) -> Option<&Occurrence> {
        self.occurrences.iter().find(|o| o.id == occurrence_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Type-specific attributes (mostly `human.face`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Identity candidates in descending confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_to: Option<Vec<SimilarTo>>,

    #[serde(rename = "sen", default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    /// Extracted text (text regions, transcripts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Member faces of a `human.face_group`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_det_ids: Option<Vec<String>>,

    /// Seconds visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_visible: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gender {
    pub value: String,

    #[serde(rename = "c")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarTo {
    pub name: String,

    #[serde(rename = "c")]
    pub confidence: f64,
}

/// Sentiment payload: valence and emotions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(rename = "val", default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,

    #[serde(rename = "emo", default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<Vec<Emotion>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emotion {
    #[serde(rename = "e")]
    pub name: String,

    #[serde(rename = "c")]
    pub confidence: f64,
}

/// One contiguous span during which a detection was observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: String,

    /// Start second.
    #[serde(rename = "ss")]
    pub start: f64,

    /// End second.
    #[serde(rename = "se")]
    pub end: f64,

    #[serde(rename = "c_max", default, skip_serializing_if = "Option::is_none")]
    pub max_confidence: Option<f64>,
}

impl Occurrence {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

// ============================================================================
// Per-second grouping
// ============================================================================

/// An occurrence reference active during one second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondEntry {
    #[serde(rename = "d")]
    pub detection_id: String,

    #[serde(rename = "o", default)]
    pub occurrence_ids: Vec<String>,

    /// Confidence at this second.
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SecondAttributes>,
}

impl SecondEntry {
    pub fn sentiment(&self) -> Option<&Sentiment> {
        self.attributes.as_ref().and_then(|a| a.sentiment.as_ref())
    }

    pub fn valence(&self) -> Option<f64> {
        self.sentiment().and_then(|s| s.valence)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecondAttributes {
    #[serde(rename = "sen", default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}
