//! Unit tests for blacklist handling across operations

use std::fs;

use metareader::query::{
    BySecondOptions, CategoryListOptions, DetectionListOptions, OccurrenceListOptions,
    SummaryOptions,
};
use metareader::Blacklist;
use tempfile::TempDir;

use crate::helpers::{blacklisted_reader, cells, load_fixture, sample_document};

#[test]
fn sample_blacklist_hides_generic_only_detections() {
    let document = sample_document();
    let blacklist: Blacklist = serde_json::from_str(&load_fixture("blacklist.json")).unwrap();
    let person = &document.detections["5"];
    let dog = &document.detections["3"];
    assert!(blacklist.is_blacklisted(person));
    assert!(!blacklist.is_blacklisted(dog));
}

#[test]
fn blacklisted_detection_is_absent_everywhere() {
    let reader = blacklisted_reader();

    let detections = cells(reader.list_detections(DetectionListOptions::default()).unwrap());
    assert!(detections.iter().all(|row| row[0] != "5"));

    let by_second = cells(
        reader
            .list_detections_by_second(BySecondOptions::default())
            .unwrap()
            .into_cells(),
    );
    assert!(!by_second.is_empty());
    assert!(by_second.iter().all(|row| row[2] != "5"));

    let occurrences = cells(reader.list_occurrences(OccurrenceListOptions::default()).unwrap());
    assert!(occurrences.iter().all(|row| row[0] != "5"));

    let categories = cells(reader.list_categories(CategoryListOptions::default()).unwrap());
    assert!(categories.iter().all(|row| row[1] != "generic"));

    let summary = reader.list_summary(&SummaryOptions::default()).unwrap();
    assert!(summary
        .iter()
        .flat_map(|block| &block.entries)
        .all(|entry| entry.detection_id != "5"));
}

#[test]
fn locate_prefers_the_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("custom.json");
    fs::write(&path, r#"{"concept_tags": ["dog"]}"#).unwrap();

    let (found, blacklist) = Blacklist::locate(Some(path.as_path())).unwrap().unwrap();
    assert_eq!(found, path);
    assert!(blacklist.concept_tags.contains("dog"));
    assert!(blacklist.category_tags_weak_blacklist.is_empty());
}
