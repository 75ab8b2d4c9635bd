//! Metadata document loading.
//!
//! Documents come from a local path or an `http(s)://` URL and are parsed as
//! JSON. Errors carry enough context for the CLI to print them as-is:
//! - missing files name the path
//! - failed downloads name the URL
//! - parse errors report the decoder message

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use super::types::MetadataDocument;

impl MetadataDocument {
    /// Load a document from a local path or an `http(s)://` URL.
    pub fn load(path_or_url: &str) -> Result<Self> {
        if is_url(path_or_url) {
            Self::fetch(path_or_url)
        } else {
            Self::parse(path_or_url)
        }
    }

    /// Parse a document from a filesystem path.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("No such file found: {}", path.display()))?;
        Self::parse_str(&contents)
            .with_context(|| format!("Input file not valid JSON-file: {}", path.display()))
    }

    /// Parse a document from any reader.
    pub fn parse_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse metadata JSON")
    }

    /// Parse a document from a JSON string.
    pub fn parse_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse metadata JSON")
    }

    /// Download and parse a document.
    pub fn fetch(url: &str) -> Result<Self> {
        tracing::debug!(url, "downloading metadata");
        let response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Invalid url: {}", url))?;
        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))?;
        Self::parse_str(&body)
            .with_context(|| format!("Input file not valid JSON-file: {}", url))
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
