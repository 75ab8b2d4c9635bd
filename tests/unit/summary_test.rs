//! Unit tests for screentime summaries

use metareader::query::{SummaryBlock, SummaryOptions};
use metareader::{AdditionMethod, IntervalAccumulator, MetareaderError};

use crate::helpers::{blacklisted_reader, reader_from, sample_reader};

fn names(block: &SummaryBlock) -> Vec<&str> {
    block.entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn default_summary_covers_faces_and_visual_context() {
    let blocks = sample_reader().list_summary(&SummaryOptions::default()).unwrap();
    assert_eq!(blocks.len(), 2);

    let faces = &blocks[0];
    assert_eq!(faces.detection_type, "human.face");
    assert_eq!(names(faces), vec!["Ada Lovelace", "unknown male (det id: 2)"]);
    assert_eq!(faces.entries[0].screentime, 7.0);
    assert_eq!(faces.entries[0].confidence, Some(0.7));
    assert!((faces.entries[0].share - 0.35).abs() < 1e-12);
    assert_eq!(faces.entries[1].confidence, None);

    let visual = &blocks[1];
    assert_eq!(names(visual), vec!["person", "dog", "cat"]);
    assert_eq!(visual.entries[1].screentime, 8.0);
}

#[test]
fn blacklist_removes_entries() {
    let blocks = blacklisted_reader()
        .list_summary(&SummaryOptions::default())
        .unwrap();
    assert_eq!(names(&blocks[1]), vec!["dog", "cat"]);
}

#[test]
fn normal_addition_counts_overlap_twice() {
    let options = SummaryOptions {
        detection_type: Some("visual.context".to_string()),
        addition_method: AdditionMethod::Normal,
        ..SummaryOptions::default()
    };
    let blocks = sample_reader().list_summary(&options).unwrap();
    let dog = blocks[0].entries.iter().find(|e| e.name == "dog").unwrap();
    assert_eq!(dog.screentime, 10.0);
}

#[test]
fn wildcard_type_expands_in_index_order() {
    let options = SummaryOptions {
        detection_type: Some("audio.*".to_string()),
        ..SummaryOptions::default()
    };
    let blocks = sample_reader().list_summary(&options).unwrap();
    let types: Vec<&str> = blocks.iter().map(|b| b.detection_type.as_str()).collect();
    assert_eq!(types, vec!["audio.context", "audio.speech"]);
    assert_eq!(names(&blocks[1]), vec!["hello world"]);
}

#[test]
fn category_and_limit_options() {
    let options = SummaryOptions {
        detection_type: Some("visual.context".to_string()),
        categories: Some(vec!["animal".to_string()]),
        limit: Some(1),
        ..SummaryOptions::default()
    };
    let blocks = sample_reader().list_summary(&options).unwrap();
    assert_eq!(names(&blocks[0]), vec!["dog"]);
}

#[test]
fn emotion_columns_for_faces() {
    let options = SummaryOptions {
        detection_type: Some("human.face".to_string()),
        emotion: true,
        ..SummaryOptions::default()
    };
    let blocks = sample_reader().list_summary(&options).unwrap();
    let faces = &blocks[0];
    assert_eq!(faces.emotion_names, vec!["happiness"]);
    assert_eq!(
        faces.columns(),
        vec!["name", "screentime", "confidence", "of video length", "happiness"]
    );
    assert_eq!(faces.entries[0].emotions, vec![3]);
    assert_eq!(faces.entries[1].emotions, vec![0]);
}

#[test]
fn face_without_attributes_is_an_error() {
    let reader = reader_from(
        r#"{
            "media_info": {"technical": {"duration_s": 10.0}},
            "detections": {"1": {"t": "human.face", "label": "face",
                                 "occs": [{"id": "1", "ss": 0.0, "se": 1.0}]}},
            "detection_groupings": {"by_detection_type": {"human.face": ["1"]}}
        }"#,
    );
    let err = reader.list_summary(&SummaryOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        MetareaderError::MissingField { ref detection_id, field: "a" } if detection_id == "1"
    ));
}

#[test]
fn merged_accumulators_must_share_a_method() {
    let mut union = IntervalAccumulator::new(AdditionMethod::Union);
    union.add_grouped(0.0, 4.0, "1");
    let mut other = IntervalAccumulator::new(AdditionMethod::Union);
    other.add_grouped(2.0, 6.0, "1");
    other.add_grouped(2.0, 6.0, "2");
    union.merge(&other).unwrap();
    assert_eq!(union.total(), 10.0);

    let normal = IntervalAccumulator::new(AdditionMethod::Normal);
    assert!(union.merge(&normal).is_err());
}
