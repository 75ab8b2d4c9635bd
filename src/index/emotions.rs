//! Sentiment payloads gathered from the per-second entries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::MetadataIndex;
use crate::metadata::Sentiment;

/// Emotion and valence lookup built from `by_second`.
///
/// Blacklisted detections are not indexed.
#[derive(Debug, Default)]
pub struct EmotionIndex {
    /// detection ID -> one payload per second it was reported.
    sentiments: HashMap<String, Vec<Sentiment>>,
    /// Every emotion name seen anywhere.
    emotion_names: BTreeSet<String>,
    /// detection ID -> second -> valence values.
    valences: HashMap<String, BTreeMap<usize, Vec<f64>>>,
}

impl EmotionIndex {
    pub(super) fn build(index: &MetadataIndex) -> Self {
        let mut emotions = EmotionIndex::default();
        for (second, entries) in index.second_data(0, None) {
            for entry in entries {
                let Some(sentiment) = entry.sentiment() else {
                    continue;
                };
                for emotion in sentiment.emotions.iter().flatten() {
                    emotions.emotion_names.insert(emotion.name.clone());
                }
                if let Some(valence) = sentiment.valence {
                    emotions
                        .valences
                        .entry(entry.detection_id.clone())
                        .or_default()
                        .entry(second)
                        .or_default()
                        .push(valence);
                }
                emotions
                    .sentiments
                    .entry(entry.detection_id.clone())
                    .or_default()
                    .push(sentiment.clone());
            }
        }
        tracing::debug!(
            detections = emotions.sentiments.len(),
            emotions = emotions.emotion_names.len(),
            "built emotion index"
        );
        emotions
    }

    /// Emotion names in sorted order.
    pub fn emotion_names(&self) -> impl Iterator<Item = &str> {
        self.emotion_names.iter().map(String::as_str)
    }

    /// Per-second sentiment payloads of one detection.
    pub fn sentiments(&self, detection_id: &str) -> &[Sentiment] {
        self.sentiments
            .get(detection_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every known emotion name -> seconds it was reported for the detection.
    pub fn emotion_counts(&self, detection_id: &str) -> Vec<(String, usize)> {
        let sentiments = self.sentiments(detection_id);
        self.emotion_names
            .iter()
            .map(|name| {
                let count = sentiments
                    .iter()
                    .flat_map(|s| s.emotions.iter().flatten())
                    .filter(|emotion| &emotion.name == name)
                    .count();
                (name.clone(), count)
            })
            .collect()
    }

    pub fn has_valence(&self, detection_id: &str) -> bool {
        self.valences
            .get(detection_id)
            .map_or(false, |seconds| !seconds.is_empty())
    }

    /// Mean valence over seconds `from..=to`, rounded to three decimals.
    pub fn average_valence(&self, detection_id: &str, from: usize, to: usize) -> Option<f64> {
        if from > to {
            return None;
        }
        let seconds = self.valences.get(detection_id)?;
        let values = seconds.range(from..=to).flat_map(|(_, v)| v.iter().copied());
        mean(values).map(round3)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to three decimals.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
