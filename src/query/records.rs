//! Result records and lazy listings.
//!
//! Every listing operation returns a [`Listing`]: a header plus a lazy row
//! sequence. The column order is what printers and downstream CSV consumers
//! rely on.

use crate::metadata::seconds_to_timestamp;

/// A record that renders to one row of cells.
pub trait Row {
    fn cells(&self) -> Vec<String>;
}

impl Row for Vec<String> {
    fn cells(&self) -> Vec<String> {
        self.clone()
    }
}

/// Column names plus a lazy sequence of rows.
pub struct Listing<'a, R> {
    pub header: Vec<String>,
    pub rows: Box<dyn Iterator<Item = R> + 'a>,
}

impl<'a, R: 'a> Listing<'a, R> {
    pub fn new(header: Vec<String>, rows: impl Iterator<Item = R> + 'a) -> Self {
        Self {
            header,
            rows: Box::new(rows),
        }
    }
}

impl<'a, R: Row + 'a> Listing<'a, R> {
    /// Render rows to cells.
    pub fn into_cells(self) -> Listing<'a, Vec<String>> {
        Listing {
            header: self.header,
            rows: Box::new(self.rows.map(|row| row.cells())),
        }
    }
}

pub(crate) fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Format a number the way the metadata prints it: whole numbers keep one
/// decimal (`3.0`), others print as-is (`0.734`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// One detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    pub detection_id: String,
    pub detection_type: String,
    pub label: String,
    /// Valossa concept ID, empty when absent.
    pub concept_id: String,
    /// GKG concept ID, empty when absent.
    pub gkg_id: String,
    pub extras: Vec<String>,
}

impl Row for DetectionRecord {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.detection_id.clone(),
            self.detection_type.clone(),
            self.label.clone(),
            self.concept_id.clone(),
            self.gkg_id.clone(),
        ];
        cells.extend(self.extras.iter().cloned());
        cells
    }
}

/// One detection active during one second.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondRecord {
    pub second: usize,
    pub detection_id: String,
    pub detection_type: String,
    /// Confidence at this second.
    pub confidence: Option<f64>,
    pub label: String,
    pub concept_id: String,
    pub gkg_id: String,
    pub extras: Vec<String>,
}

impl Row for SecondRecord {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.second.to_string(),
            seconds_to_timestamp(self.second as f64),
            self.detection_id.clone(),
            self.detection_type.clone(),
            format_optional(self.confidence),
            self.label.clone(),
            self.concept_id.clone(),
            self.gkg_id.clone(),
        ];
        cells.extend(self.extras.iter().cloned());
        cells
    }
}

/// Every label visible during one second.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortSecondRecord {
    pub second: usize,
    pub labels: Vec<String>,
}

impl Row for ShortSecondRecord {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.second.to_string(),
            seconds_to_timestamp(self.second as f64),
        ];
        cells.extend(self.labels.iter().cloned());
        cells
    }
}

/// One occurrence with the columns requested for it.
#[derive(Debug, Clone)]
pub struct OccurrenceRow {
    pub detection_id: String,
    pub detection_type: String,
    pub label: String,
    pub occurrence_id: String,
    pub start: f64,
    pub end: f64,
    pub max_confidence: Option<f64>,
    pub extras: Vec<String>,
}

impl Row for OccurrenceRow {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.detection_id.clone(),
            self.detection_type.clone(),
            self.label.clone(),
            self.occurrence_id.clone(),
            format_number(self.start),
            format_number(self.end),
            format_optional(self.max_confidence),
        ];
        cells.extend(self.extras.iter().cloned());
        cells
    }
}

/// Screentime of one category tag.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub detection_type: String,
    pub tag: String,
    pub duration: f64,
}

impl Row for CategoryRecord {
    fn cells(&self) -> Vec<String> {
        vec![
            self.detection_type.clone(),
            self.tag.clone(),
            format!("{:.1}", self.duration),
        ]
    }
}

/// One subtitle cue.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    pub start: f64,
    pub end: f64,
    pub labels: Vec<String>,
}

impl Row for SubtitleCue {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![format!("{:.3}", self.start), format!("{:.3}", self.end)];
        cells.extend(self.labels.iter().cloned());
        cells
    }
}

/// Valence values of one second, one per sentiment column.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRecord {
    pub second: usize,
    pub values: Vec<Option<f64>>,
}

impl Row for SentimentRecord {
    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.second.to_string(),
            seconds_to_timestamp(self.second as f64),
        ];
        cells.extend(
            self.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        cells
    }
}

/// Screentime summary of one detection type.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryBlock {
    pub detection_type: String,
    pub entries: Vec<SummaryEntry>,
    /// Emotion column names; empty unless emotions were requested.
    pub emotion_names: Vec<String>,
}

/// One identity or label in a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    /// Representative detection (the first one seen when identities merge).
    pub detection_id: String,
    pub name: String,
    pub screentime: f64,
    /// Recognition confidence. `None` for unknown faces and non-face types.
    pub confidence: Option<f64>,
    /// Screentime as a fraction of the media length.
    pub share: f64,
    /// Seconds per emotion, aligned with [`SummaryBlock::emotion_names`].
    pub emotions: Vec<usize>,
}

impl SummaryBlock {
    pub fn is_face(&self) -> bool {
        self.detection_type == crate::metadata::HUMAN_FACE
    }

    /// Column names of the entry rows.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = if self.is_face() {
            header(&["name", "screentime", "confidence", "of video length"])
        } else {
            header(&["label", "screentime", "of video length"])
        };
        columns.extend(self.emotion_names.iter().cloned());
        columns
    }

    /// Screentime text: milliseconds for faces, tenths otherwise.
    pub fn screentime_text(&self, entry: &SummaryEntry) -> String {
        if self.is_face() {
            format!("{:.3}", entry.screentime)
        } else {
            format!("{:.1}", entry.screentime)
        }
    }

    /// Entry cells with the share rendered by `share`.
    pub fn cells_with(&self, entry: &SummaryEntry, share: impl Fn(f64) -> String) -> Vec<String> {
        let mut cells = vec![entry.name.clone(), self.screentime_text(entry)];
        if self.is_face() {
            cells.push(
                entry
                    .confidence
                    .map(format_number)
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
        cells.push(share(entry.share));
        cells.extend(entry.emotions.iter().map(|count| count.to_string()));
        cells
    }
}

/// Descriptive facts about the document.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataInfo {
    pub metadata_format: String,
    pub backend: String,
    pub title: Option<String>,
    pub duration_s: f64,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub transcript_url: Option<String>,
}

impl MetadataInfo {
    /// Human readable block.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Metadata format:  {}", self.metadata_format),
            format!("Backend version:  {}", self.backend),
            String::new(),
            format!("Media title:      {}", self.title.as_deref().unwrap_or("-")),
            format!("Duration:         {}", seconds_to_timestamp(self.duration_s)),
            format!(
                "Description:      {}",
                self.description.as_deref().unwrap_or("-")
            ),
        ];
        if self.video_url.is_some() || self.transcript_url.is_some() {
            lines.push(String::new());
        }
        if let Some(url) = &self.video_url {
            lines.push(format!("Video URL:        {}", url));
        }
        if let Some(url) = &self.transcript_url {
            lines.push(format!("Transcript URL:   {}", url));
        }
        lines
    }

    /// `(field, value)` pairs for tabular output.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("metadata format", self.metadata_format.clone()),
            ("backend version", self.backend.clone()),
            ("media title", self.title.clone().unwrap_or_default()),
            ("duration", seconds_to_timestamp(self.duration_s)),
            ("description", self.description.clone().unwrap_or_default()),
            ("video url", self.video_url.clone().unwrap_or_default()),
            ("transcript url", self.transcript_url.clone().unwrap_or_default()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_keep_one_decimal_when_whole() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(0.734), "0.734");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn second_record_cells_include_timestamp() {
        let record = SecondRecord {
            second: 3661,
            detection_id: "7".to_string(),
            detection_type: "visual.context".to_string(),
            confidence: None,
            label: "dog".to_string(),
            concept_id: "X".to_string(),
            gkg_id: String::new(),
            extras: vec!["extra".to_string()],
        };
        assert_eq!(
            record.cells(),
            vec!["3661", "01:01:01", "7", "visual.context", "", "dog", "X", "", "extra"]
        );
    }

    #[test]
    fn summary_cells_depend_on_type() {
        let entry = SummaryEntry {
            detection_id: "1".to_string(),
            name: "Ada".to_string(),
            screentime: 7.0,
            confidence: None,
            share: 0.07,
            emotions: vec![2],
        };
        let face = SummaryBlock {
            detection_type: "human.face".to_string(),
            entries: vec![entry.clone()],
            emotion_names: vec!["joy".to_string()],
        };
        assert_eq!(
            face.columns(),
            vec!["name", "screentime", "confidence", "of video length", "joy"]
        );
        assert_eq!(
            face.cells_with(&entry, |s| s.to_string()),
            vec!["Ada", "7.000", "-", "0.07", "2"]
        );

        let context = SummaryBlock {
            detection_type: "visual.context".to_string(),
            entries: vec![],
            emotion_names: vec![],
        };
        assert_eq!(
            context.cells_with(&entry, |s| format!("{:.2}%", s * 100.0)),
            vec!["Ada", "7.0", "7.00%", "2"]
        );
    }

    #[test]
    fn metadata_info_lists_present_urls() {
        let info = MetadataInfo {
            metadata_format: "1.3.4".to_string(),
            backend: "3.2.1".to_string(),
            title: Some("Clip".to_string()),
            duration_s: 125.0,
            description: None,
            video_url: Some("https://example.com/v.mp4".to_string()),
            transcript_url: None,
        };
        let lines = info.lines();
        assert!(lines.contains(&"Duration:         00:02:05".to_string()));
        assert!(lines.contains(&"Description:      -".to_string()));
        assert!(lines.contains(&"Video URL:        https://example.com/v.mp4".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Transcript URL")));
    }
}
