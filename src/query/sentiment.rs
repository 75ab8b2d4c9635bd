//! Valence time series.

use std::collections::HashMap;

use super::records::{header, Listing, SentimentRecord};
use super::MetadataReader;
use crate::error::{MetareaderError, Result};
use crate::metadata::{Detection, SecondEntry, AUDIO_SPEECH, HUMAN_FACE};

const SPEECH_COLUMN: &str = "speech valence";

/// Valence values of one face identity or of speech, by second.
#[derive(Debug, Clone, PartialEq)]
pub struct ValenceSeries {
    pub name: String,
    /// Set for the `speech valence` column.
    pub speech: bool,
    pub points: Vec<(usize, f64)>,
}

impl MetadataReader {
    /// One column per face identity with valence data, plus `speech valence`
    /// when speech carries sentiment.
    ///
    /// Face columns follow prominence order; detections resolving to the same
    /// name share a column. Seconds without any value are not yielded.
    pub fn list_sentiment(
        &self,
        start_second: usize,
        end_second: Option<usize>,
    ) -> Result<Listing<'_, SentimentRecord>> {
        let index = &self.index;
        let emotions = index.emotions();

        let mut columns: Vec<String> = Vec::new();
        let mut column_of: HashMap<&str, usize> = HashMap::new();
        for id in index.ids_of_type(HUMAN_FACE) {
            let Ok(detection) = index.detection(id) else {
                continue;
            };
            if index.is_blacklisted(detection) || !emotions.has_valence(id) {
                continue;
            }
            let name = index.label(id, true)?;
            let column = match columns.iter().position(|c| c == &name) {
                Some(position) => position,
                None => {
                    columns.push(name);
                    columns.len() - 1
                }
            };
            column_of.insert(id.as_str(), column);
        }

        let speech_column = if self.speech_has_sentiment() {
            columns.push(SPEECH_COLUMN.to_string());
            Some(columns.len() - 1)
        } else {
            None
        };

        if columns.is_empty() {
            return Err(MetareaderError::application("No sentiment data found."));
        }
        tracing::debug!(columns = columns.len(), "listing sentiment");

        let width = columns.len();
        let mut head = header(&["second", "timestamp"]);
        head.extend(columns);

        let rows = index
            .second_data(start_second, end_second)
            .filter_map(move |(second, entries)| {
                let mut values: Vec<Option<f64>> = vec![None; width];
                for entry in entries {
                    let Ok(detection) = index.detection(&entry.detection_id) else {
                        continue;
                    };
                    let column = match column_of.get(entry.detection_id.as_str()) {
                        Some(column) => Some(*column),
                        None if detection.detection_type == AUDIO_SPEECH => speech_column,
                        None => None,
                    };
                    let Some(column) = column else {
                        continue;
                    };
                    if values[column].is_none() {
                        values[column] = entry_valence(entry, detection);
                    }
                }
                if values.iter().all(Option::is_none) {
                    None
                } else {
                    Some(SentimentRecord { second, values })
                }
            });

        Ok(Listing::new(head, rows))
    }

    /// The sentiment listing split into one valence series per column.
    pub fn valence_series(
        &self,
        start_second: usize,
        end_second: Option<usize>,
    ) -> Result<Vec<ValenceSeries>> {
        let listing = self.list_sentiment(start_second, end_second)?;
        let mut series: Vec<ValenceSeries> = listing
            .header
            .into_iter()
            .skip(2)
            .map(|name| ValenceSeries {
                speech: name == SPEECH_COLUMN,
                name,
                points: Vec::new(),
            })
            .collect();
        for record in listing.rows {
            for (column, value) in record.values.iter().enumerate() {
                if let (Some(value), Some(target)) = (value, series.get_mut(column)) {
                    target.points.push((record.second, *value));
                }
            }
        }
        Ok(series)
    }

    fn speech_has_sentiment(&self) -> bool {
        let index = &self.index;
        let emotions = index.emotions();
        index.ids_of_type(AUDIO_SPEECH).iter().any(|id| {
            index.detection(id).map_or(false, |detection| {
                !index.is_blacklisted(detection)
                    && (emotions.has_valence(id)
                        || detection.sentiment().and_then(|s| s.valence).is_some())
            })
        })
    }
}

/// Valence of one entry. Speech falls back to its detection-level sentiment.
fn entry_valence(entry: &SecondEntry, detection: &Detection) -> Option<f64> {
    entry.valence().or_else(|| {
        if detection.detection_type == AUDIO_SPEECH {
            detection.sentiment().and_then(|s| s.valence)
        } else {
            None
        }
    })
}
