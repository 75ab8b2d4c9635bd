//! Unit tests for per-second listings, sentiment and subtitles

use metareader::query::{BySecondListing, BySecondMode, BySecondOptions, SubtitleOptions};
use metareader::{DetectionFilter, ExtraField, MetareaderError};

use crate::helpers::{blacklisted_reader, cells, reader_from, sample_reader};

fn by_second(options: BySecondOptions) -> Vec<Vec<String>> {
    let reader = sample_reader();
    let listing = reader.list_detections_by_second(options).unwrap();
    cells(listing.into_cells())
}

#[test]
fn range_is_inclusive() {
    let rows = by_second(BySecondOptions {
        start_second: 2,
        end_second: Some(3),
        ..BySecondOptions::default()
    });
    let seconds: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(seconds, vec!["2", "2", "2", "2", "2", "3", "3", "3", "3", "3"]);
    assert_eq!(
        rows[0],
        vec!["2", "00:00:02", "1", "human.face", "0.8", "face", "", ""]
    );
}

#[test]
fn per_second_confidence_is_checked_too() {
    let rows = by_second(BySecondOptions {
        filter: DetectionFilter {
            min_confidence: Some(0.85),
            ..DetectionFilter::default()
        },
        start_second: 2,
        end_second: Some(2),
        ..BySecondOptions::default()
    });
    let ids: Vec<&str> = rows.iter().map(|r| r[2].as_str()).collect();
    assert_eq!(ids, vec!["3", "5"]);
}

#[test]
fn valence_extra_comes_from_the_second() {
    let rows = by_second(BySecondOptions {
        filter: DetectionFilter {
            detection_types: vec!["human.face".to_string()],
            ..DetectionFilter::default()
        },
        start_second: 10,
        end_second: Some(10),
        extra_fields: vec![ExtraField::Valence, ExtraField::SimilarTo],
        ..BySecondOptions::default()
    });
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][8..], &["-0.25", "Ada Lovelace"]);
}

#[test]
fn short_mode_lists_names_per_second() {
    let reader = blacklisted_reader();
    let options = BySecondOptions {
        start_second: 10,
        end_second: Some(14),
        mode: BySecondMode::Short,
        ..BySecondOptions::default()
    };
    let rows = cells(reader.list_detections_by_second(options).unwrap().into_cells());
    assert_eq!(
        rows,
        vec![
            vec!["10", "00:00:10", "Ada Lovelace"],
            vec!["11", "00:00:11", "Ada Lovelace"],
            vec!["12", "00:00:12", "cat"],
            vec!["13", "00:00:13", "cat"],
        ]
    );
}

#[test]
fn sentiment_has_one_column_per_identity() {
    let reader = sample_reader();
    let options = BySecondOptions {
        mode: BySecondMode::Sentiment,
        ..BySecondOptions::default()
    };
    let listing = match reader.list_detections_by_second(options).unwrap() {
        BySecondListing::Sentiment(listing) => listing,
        _ => panic!("expected a sentiment listing"),
    };
    assert_eq!(listing.header, vec!["second", "timestamp", "Ada Lovelace"]);
    let rows = cells(listing);
    let seconds: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(seconds, vec!["0", "1", "2", "3", "4", "10", "11"]);
    assert_eq!(rows[0][2], "0.5");
    assert_eq!(rows[5][2], "-0.25");
}

#[test]
fn missing_sentiment_is_an_application_error() {
    let reader = reader_from(
        r#"{
            "media_info": {"technical": {"duration_s": 2.0}},
            "detections": {"1": {"t": "visual.context", "label": "dog", "occs": []}},
            "detection_groupings": {
                "by_detection_type": {"visual.context": ["1"]},
                "by_second": [[{"d": "1", "o": []}], []]
            }
        }"#,
    );
    let err = match reader.list_sentiment(0, None) {
        Err(err) => err,
        Ok(_) => panic!("expected an error"),
    };
    assert!(err.is_application());
    assert!(matches!(err, MetareaderError::Application(ref m) if m == "No sentiment data found."));
}

#[test]
fn speech_only_subtitles_pass_through() {
    let reader = sample_reader();
    let options = SubtitleOptions {
        detection_types: vec!["audio.speech".to_string()],
        ..SubtitleOptions::default()
    };
    let cues: Vec<_> = reader.list_subtitle(options).unwrap().rows.collect();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start, 15.0);
    assert_eq!(cues[0].end, 17.0);
    assert_eq!(cues[0].labels, vec!["hello world"]);
}

#[test]
fn subtitles_pack_visual_context() {
    let reader = blacklisted_reader();
    let options = SubtitleOptions {
        detection_types: vec!["visual.context".to_string()],
        ..SubtitleOptions::default()
    };
    let cues: Vec<_> = reader.list_subtitle(options).unwrap().rows.collect();
    let spans: Vec<(f64, f64)> = cues.iter().map(|c| (c.start, c.end)).collect();
    let expected = [(0.5, 4.5), (4.55, 6.55), (6.6, 8.6), (12.5, 14.5)];
    assert_eq!(spans.len(), expected.len());
    for ((start, end), (want_start, want_end)) in spans.iter().zip(expected) {
        assert!((start - want_start).abs() < 1e-9, "start {start} != {want_start}");
        assert!((end - want_end).abs() < 1e-9, "end {end} != {want_end}");
    }
    let labels: Vec<&str> = cues.iter().map(|c| c.labels[0].as_str()).collect();
    assert_eq!(labels, vec!["dog", "dog", "dog", "cat"]);
}

#[test]
fn subtitle_interval_must_be_positive() {
    let reader = sample_reader();
    let options = SubtitleOptions {
        min_sub_interval: 0.0,
        ..SubtitleOptions::default()
    };
    assert!(reader.list_subtitle(options).is_err());
}
