//! CLI tests
//!
//! Runs the binary against the sample fixture. HOME points at a temporary
//! directory so no user config or blacklist leaks in.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sample() -> String {
    fixture("metadata_sample.json").display().to_string()
}

fn metareader(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("metareader").unwrap();
    cmd.env("HOME", home.path()).env_remove("METAREADER_LOG");
    cmd
}

/// Home directory whose config dir holds the sample blacklist.
fn home_with_blacklist() -> TempDir {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("metareader");
    fs::create_dir_all(&config_dir).unwrap();
    fs::copy(fixture("blacklist.json"), config_dir.join("blacklist.json")).unwrap();
    home
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

// ============================================================================
// Listings
// ============================================================================

#[test]
fn list_detections_csv() {
    let home = TempDir::new().unwrap();
    let stdout = stdout_of(metareader(&home).args([
        "list-detections",
        &sample(),
        "-t",
        "visual.context",
    ]));
    insta::assert_snapshot!(stdout, @r"
    detection ID,detection type,label,Valossa concept ID,GKG concept ID
    3,visual.context,dog,sEl5Jb8H_WG7,/m/0bt9lr
    4,visual.context,cat,aB3dE,
    5,visual.context,person,,
    ");
}

#[test]
fn summary_csv() {
    let home = TempDir::new().unwrap();
    let stdout = stdout_of(metareader(&home).args(["summary", &sample()]));
    insta::assert_snapshot!(stdout, @r"
    human.face
    name,screentime,confidence,of video length
    Ada Lovelace,7.000,0.7,0.35
    unknown male (det id: 2),2.000,-,0.1
    visual.context
    label,screentime,of video length
    person,20.0,1.0
    dog,8.0,0.4
    cat,2.0,0.1
    ");
}

#[test]
fn blacklist_from_config_dir_is_applied() {
    let home = home_with_blacklist();
    metareader(&home)
        .args(["summary", &sample(), "-t", "visual.context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dog,8.0,0.4"))
        .stdout(predicate::str::contains("person").not());
}

#[test]
fn free_format_summary_shows_percentages() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["summary", &sample(), "-f", "free", "-t", "human.face"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detection type: human.face"))
        .stdout(predicate::str::contains("35.00%"));
}

#[test]
fn metadata_info_defaults_to_free_text() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["metadata-info", &sample()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Metadata format:  1.3.4"))
        .stdout(predicate::str::contains("Media title:      Test clip"))
        .stdout(predicate::str::contains("Duration:         00:00:20"))
        .stdout(predicate::str::contains(
            "Video URL:        https://example.com/clip.mp4",
        ));
}

#[test]
fn subtitles_as_srt() {
    let home = home_with_blacklist();
    let stdout = stdout_of(metareader(&home).args([
        "list-detections-by-second",
        &sample(),
        "-t",
        "visual.context",
        "-f",
        "srt",
    ]));
    assert_eq!(
        stdout,
        "1\n00:00:00,500 --> 00:00:04,500\ndog\n\n\
         2\n00:00:04,550 --> 00:00:06,550\ndog\n\n\
         3\n00:00:06,600 --> 00:00:08,600\ndog\n\n\
         4\n00:00:12,500 --> 00:00:14,500\ncat\n\n"
    );
}

#[test]
fn length_seconds_sets_the_end() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args([
            "list-detections-by-second",
            &sample(),
            "--short",
            "--start-second",
            "12",
            "--length-seconds",
            "1",
            "-t",
            "visual.context",
        ])
        .assert()
        .success()
        .stdout(predicate::eq(
            "second,timestamp,labels\n12,00:00:12,cat,person\n13,00:00:13,cat,person\n",
        ));
}

#[test]
fn length_and_end_set_the_start() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args([
            "list-detections-by-second",
            &sample(),
            "--short",
            "--length-seconds",
            "1",
            "--end-second",
            "13",
            "-t",
            "visual.context",
        ])
        .assert()
        .success()
        .stdout(predicate::eq(
            "second,timestamp,labels\n12,00:00:12,cat,person\n13,00:00:13,cat,person\n",
        ));
}

#[test]
fn output_file_receives_the_listing() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("occurrences.csv");
    metareader(&home)
        .args(["list-occurrences", &sample(), "-l", "dog", "--output-file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "3,visual.context,dog,4,0.0,6.0,0.9");
    assert_eq!(lines[2], "3,visual.context,dog,5,4.0,8.0,0.8");
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[subtitle]"))
        .stdout(predicate::str::contains("min_interval = 2.0"));
}

// ============================================================================
// Plots
// ============================================================================

#[test]
fn bar_summary_plot_is_written_to_the_output_file() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("bars.svg");
    metareader(&home)
        .args(["plot", &sample(), "--bar-summary", "-t", "visual.context", "-n", "2"])
        .arg("--output-file")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::eq(format!("{}\n", out.display())));

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("dog (00:00:08, 40%)"));
    assert!(!svg.contains("cat ("));
}

#[test]
fn plot_without_output_file_writes_to_the_working_directory() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .current_dir(home.path())
        .args(["plot", &sample(), "--bar-summary", "-t", "human.face", "-n", "3"])
        .args(["-f", "png", "--show-title"])
        .assert()
        .success()
        .stdout(predicate::eq("metareader_bar_summary.png\n"));

    let bytes = fs::read(home.path().join("metareader_bar_summary.png")).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn face_sentiment_graph_is_written() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("faces.png");
    metareader(&home)
        .args(["plot", &sample(), "--face-sentiment-graph", "--simple", "--image-size", "320,160"])
        .arg("--output-file")
        .arg(&out)
        .assert()
        .success();

    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn transcript_graph_without_speech_sentiment_fails() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .current_dir(home.path())
        .args(["plot", &sample(), "--transcript-sentiment-graph"])
        .assert()
        .code(1)
        .stderr(predicate::eq("Error: No transcript sentiment data found.\n"));
    assert!(!home.path().join("metareader_transcript_sentiment.svg").exists());
}

#[test]
fn plot_rejects_unknown_image_extension() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["plot", &sample(), "--face-sentiment-graph", "--output-file", "faces.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported image file"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn srt_is_rejected_outside_by_second() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["summary", &sample(), "-f", "srt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "SRT output is only supported by list-detections-by-second",
        ));
}

#[test]
fn missing_sentiment_is_reported_cleanly() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("plain.json");
    fs::write(
        &path,
        r#"{"media_info": {"technical": {"duration_s": 1.0}},
            "detection_groupings": {"by_second": [[]]}}"#,
    )
    .unwrap();

    metareader(&home)
        .args(["list-detections-by-second", "--sentiment"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::eq("Error: No sentiment data found.\n"));
}

#[test]
fn unsupported_ontology_fails() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args([
            "list-detections",
            &sample(),
            "--detection-external-concept-id",
            "wikidata",
            "Q144",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported external ontology 'wikidata'"));
}

#[test]
fn missing_metadata_file_fails() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["metadata-info", "/no/such/metadata.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn confidence_out_of_range_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    metareader(&home)
        .args(["summary", &sample(), "--min-confidence", "1.5"])
        .assert()
        .code(2);
}
