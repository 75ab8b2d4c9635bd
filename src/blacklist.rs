//! Blacklist of labels and category tags suppressed from every listing.
//!
//! The file is JSON with three string lists:
//!
//! ```text
//! {
//!   "category_tags_strong_blacklist": ["flagged"],
//!   "category_tags_weak_blacklist": ["generic"],
//!   "concept_tags": ["person"]
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metadata::Detection;

/// File name searched for in the default locations.
pub const BLACKLIST_FILE: &str = "blacklist.json";

/// Suppression rules applied to detections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blacklist {
    /// A single matching tag blacklists the detection.
    #[serde(default)]
    pub category_tags_strong_blacklist: BTreeSet<String>,

    /// Tags that only blacklist when every tag of the detection is weak or strong.
    #[serde(default)]
    pub category_tags_weak_blacklist: BTreeSet<String>,

    /// Labels blacklisted outright.
    #[serde(default)]
    pub concept_tags: BTreeSet<String>,
}

impl Blacklist {
    /// Whether `detection` is suppressed.
    ///
    /// A detection is blacklisted when its label is a blacklisted concept, when
    /// any of its tags is strongly blacklisted, or when it has at least one tag
    /// and all of them are weakly or strongly blacklisted. A detection without
    /// tags is only blacklisted through its label.
    pub fn is_blacklisted(&self, detection: &Detection) -> bool {
        if self.concept_tags.contains(&detection.label) {
            return true;
        }

        let tags = detection.category_tags();
        if tags.is_empty() {
            return false;
        }

        let strong = tags
            .iter()
            .any(|tag| self.category_tags_strong_blacklist.contains(tag));
        let all_weak = tags.iter().all(|tag| {
            self.category_tags_weak_blacklist.contains(tag)
                || self.category_tags_strong_blacklist.contains(tag)
        });
        strong || all_weak
    }

    /// Read a blacklist file. A malformed file is an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read blacklist file: {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| {
            format!(
                "{} not formatted correctly. Remove it or fix the format problem",
                path.display()
            )
        })
    }

    /// Load the first blacklist found.
    ///
    /// An explicit path must exist. Without one, the default locations are
    /// tried in order and `Ok(None)` means none of them had a file.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            let blacklist = Self::from_file(path)?;
            return Ok(Some((path.to_path_buf(), blacklist)));
        }

        for candidate in default_locations() {
            if candidate.is_file() {
                let blacklist = Self::from_file(&candidate)?;
                return Ok(Some((candidate, blacklist)));
            }
        }
        Ok(None)
    }
}

/// Default lookup order: the user config directory, then next to the binary.
pub fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".config").join("metareader").join(BLACKLIST_FILE));
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        locations.push(dir.join(BLACKLIST_FILE));
    }
    locations
}
