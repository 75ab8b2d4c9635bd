//! Unit tests for detection and category listings

use metareader::query::{CategoryListOptions, DetectionListOptions};
use metareader::{DetectionFilter, DetectionOrder, ExternalConceptId, ExtraField};

use crate::helpers::{blacklisted_reader, cells, sample_reader};

fn ids(rows: &[Vec<String>]) -> Vec<&str> {
    rows.iter().map(|row| row[0].as_str()).collect()
}

#[test]
fn detections_default_to_numeric_id_order() {
    let reader = sample_reader();
    let listing = reader.list_detections(DetectionListOptions::default()).unwrap();
    assert_eq!(
        listing.header,
        vec![
            "detection ID",
            "detection type",
            "label",
            "Valossa concept ID",
            "GKG concept ID"
        ]
    );
    let rows = cells(listing);
    assert_eq!(ids(&rows), vec!["1", "2", "3", "4", "5", "6", "7"]);
    assert_eq!(
        rows[2],
        vec!["3", "visual.context", "dog", "sEl5Jb8H_WG7", "/m/0bt9lr"]
    );
    assert_eq!(rows[3], vec!["4", "visual.context", "cat", "aB3dE", ""]);
}

#[test]
fn blacklisted_detections_are_never_listed() {
    let reader = blacklisted_reader();
    let rows = cells(reader.list_detections(DetectionListOptions::default()).unwrap());
    assert_eq!(ids(&rows), vec!["1", "2", "3", "4", "6", "7"]);
}

#[test]
fn prominence_and_id_order_list_the_same_detections() {
    let animal = DetectionFilter {
        categories: Some(vec!["animal".to_string()]),
        ..DetectionFilter::default()
    };
    for reader in [sample_reader(), blacklisted_reader()] {
        for filter in [DetectionFilter::default(), animal.clone()] {
            let listed = |order: DetectionOrder| {
                let options = DetectionListOptions {
                    filter: filter.clone(),
                    order,
                    ..DetectionListOptions::default()
                };
                let mut ids: Vec<String> = cells(reader.list_detections(options).unwrap())
                    .into_iter()
                    .map(|mut row| row.swap_remove(0))
                    .collect();
                ids.sort();
                ids
            };
            let by_id = listed(DetectionOrder::DetectionId);
            assert!(!by_id.is_empty());
            assert_eq!(by_id, listed(DetectionOrder::Prominence));
        }
    }
}

#[test]
fn prominence_cap_applies_per_type() {
    let reader = sample_reader();
    let options = DetectionListOptions {
        order: DetectionOrder::Prominence,
        limit_per_type: Some(1),
        ..DetectionListOptions::default()
    };
    let rows = cells(reader.list_detections(options).unwrap());
    // audio.context, audio.speech, human.face, visual.context
    assert_eq!(ids(&rows), vec!["6", "7", "1", "3"]);
}

#[test]
fn id_order_cap_skips_the_rest_of_a_type() {
    let reader = sample_reader();
    let options = DetectionListOptions {
        limit_per_type: Some(1),
        ..DetectionListOptions::default()
    };
    let rows = cells(reader.list_detections(options).unwrap());
    assert_eq!(ids(&rows), vec!["1", "3", "6", "7"]);
}

#[test]
fn filters_combine() {
    let reader = sample_reader();

    let persons = DetectionListOptions {
        filter: DetectionFilter {
            persons: vec!["*Lovelace".to_string()],
            ..DetectionFilter::default()
        },
        extra_fields: vec![ExtraField::SimilarTo, ExtraField::Gender],
        ..DetectionListOptions::default()
    };
    let rows = cells(reader.list_detections(persons).unwrap());
    assert_eq!(
        rows,
        vec![vec!["1", "human.face", "face", "", "", "Ada Lovelace", "female"]]
    );

    let external = DetectionListOptions {
        filter: DetectionFilter {
            external_concept: Some(ExternalConceptId::new("gkg", "/m/0bt9lr").unwrap()),
            ..DetectionFilter::default()
        },
        ..DetectionListOptions::default()
    };
    assert_eq!(ids(&cells(reader.list_detections(external).unwrap())), vec!["3"]);

    let wildcard = DetectionListOptions {
        filter: DetectionFilter {
            detection_types: vec!["audio.*".to_string()],
            min_confidence: Some(0.6),
            ..DetectionFilter::default()
        },
        ..DetectionListOptions::default()
    };
    assert_eq!(ids(&cells(reader.list_detections(wildcard).unwrap())), vec!["6"]);
}

#[test]
fn valence_is_not_a_detection_extra() {
    let reader = sample_reader();
    let options = DetectionListOptions {
        extra_fields: vec![ExtraField::Valence],
        ..DetectionListOptions::default()
    };
    assert!(reader.list_detections(options).is_err());
}

#[test]
fn categories_are_listed_longest_first() {
    let reader = sample_reader();
    let rows = cells(reader.list_categories(CategoryListOptions::default()).unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["visual.context", "generic", "20.0"],
            vec!["visual.context", "animal", "10.0"],
        ]
    );
}

#[test]
fn blacklisted_categories_do_not_count() {
    let reader = blacklisted_reader();
    let rows = cells(reader.list_categories(CategoryListOptions::default()).unwrap());
    assert_eq!(rows, vec![vec!["visual.context", "animal", "10.0"]]);
}

#[test]
fn category_range_and_tag_selection() {
    let reader = sample_reader();
    let windowed = CategoryListOptions {
        start_second: Some(4.0),
        end_second: Some(13.0),
        ..CategoryListOptions::default()
    };
    let rows = cells(reader.list_categories(windowed).unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["visual.context", "generic", "9.0"],
            vec!["visual.context", "animal", "5.0"],
        ]
    );

    let animals = CategoryListOptions {
        categories: Some(vec!["animal".to_string()]),
        limit: Some(5),
        ..CategoryListOptions::default()
    };
    let rows = cells(reader.list_categories(animals).unwrap());
    assert_eq!(rows, vec![vec!["visual.context", "animal", "10.0"]]);
}
