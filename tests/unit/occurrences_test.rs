//! Unit tests for occurrence listings

use metareader::query::OccurrenceListOptions;
use metareader::{DetectionFilter, ExtraField, OccurrenceOrder};

use crate::helpers::{blacklisted_reader, cells, sample_reader};

fn keys(rows: &[Vec<String>]) -> Vec<(&str, &str)> {
    rows.iter()
        .map(|row| (row[0].as_str(), row[3].as_str()))
        .collect()
}

#[test]
fn occurrences_follow_detection_order() {
    let reader = sample_reader();
    let rows = cells(reader.list_occurrences(OccurrenceListOptions::default()).unwrap());
    assert_eq!(
        keys(&rows),
        vec![
            ("1", "1"),
            ("1", "2"),
            ("2", "3"),
            ("3", "4"),
            ("3", "5"),
            ("4", "6"),
            ("5", "7"),
            ("6", "8"),
            ("7", "9"),
        ]
    );
    assert_eq!(rows[3], vec!["3", "visual.context", "dog", "4", "0.0", "6.0", "0.9"]);
    assert_eq!(rows[0][6], "");
}

#[test]
fn duration_order_is_stable_for_ties() {
    let reader = blacklisted_reader();
    let options = OccurrenceListOptions {
        sort_by: OccurrenceOrder::Duration,
        ..OccurrenceListOptions::default()
    };
    let rows = cells(reader.list_occurrences(options).unwrap());
    assert_eq!(
        keys(&rows),
        vec![
            ("6", "8"),
            ("3", "4"),
            ("1", "1"),
            ("3", "5"),
            ("1", "2"),
            ("2", "3"),
            ("4", "6"),
            ("7", "9"),
        ]
    );
}

#[test]
fn window_keeps_overlapping_occurrences() {
    let reader = sample_reader();
    let options = OccurrenceListOptions {
        start_second: Some(13.0),
        end_second: Some(15.0),
        ..OccurrenceListOptions::default()
    };
    let rows = cells(reader.list_occurrences(options).unwrap());
    assert_eq!(keys(&rows), vec![("4", "6"), ("5", "7"), ("7", "9")]);
}

#[test]
fn valence_order_drops_occurrences_without_valence() {
    let reader = sample_reader();
    let options = OccurrenceListOptions {
        filter: DetectionFilter {
            detection_types: vec!["human.face".to_string()],
            ..DetectionFilter::default()
        },
        sort_by: OccurrenceOrder::Valence,
        extra_fields: vec![ExtraField::Valence, ExtraField::SimilarTo],
        ..OccurrenceListOptions::default()
    };
    let listing = reader.list_occurrences(options).unwrap();
    assert_eq!(
        &listing.header[7..],
        &["valence", "similar_to", "recognition confidence"]
    );
    let rows = cells(listing);
    assert_eq!(keys(&rows), vec![("1", "1"), ("1", "2")]);
    assert_eq!(&rows[0][7..], &["0.5", "Ada Lovelace", "0.7"]);
    assert_eq!(rows[1][7], "-0.25");
}

#[test]
fn gender_is_not_an_occurrence_extra() {
    let reader = sample_reader();
    let options = OccurrenceListOptions {
        extra_fields: vec![ExtraField::Gender],
        ..OccurrenceListOptions::default()
    };
    assert!(reader.list_occurrences(options).is_err());
}
