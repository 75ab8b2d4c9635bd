//! Test helper utilities

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use metareader::{Blacklist, MetadataDocument, MetadataReader};

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture file's contents
pub fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// The sample document
pub fn sample_document() -> MetadataDocument {
    MetadataDocument::parse(fixtures_dir().join("metadata_sample.json"))
        .expect("Failed to parse sample metadata")
}

/// The sample blacklist (weakly blacklists the `generic` tag)
pub fn sample_blacklist() -> Blacklist {
    Blacklist::from_file(fixtures_dir().join("blacklist.json")).expect("Failed to load blacklist")
}

/// Reader over the sample document, without a blacklist
pub fn sample_reader() -> MetadataReader {
    MetadataReader::new(sample_document(), None).expect("Failed to index sample metadata")
}

/// Reader over the sample document with the sample blacklist applied
pub fn blacklisted_reader() -> MetadataReader {
    MetadataReader::new(sample_document(), Some(sample_blacklist()))
        .expect("Failed to index sample metadata")
}

/// Reader over an inline document
pub fn reader_from(json: &str) -> MetadataReader {
    MetadataReader::new(MetadataDocument::parse_str(json).expect("invalid test JSON"), None)
        .expect("Failed to index test metadata")
}

/// Render a listing to cells
pub fn cells<R: metareader::query::Row>(listing: metareader::query::Listing<'_, R>) -> Vec<Vec<String>> {
    listing.rows.map(|row| row.cells()).collect()
}
