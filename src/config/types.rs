//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;
use crate::query::{DEFAULT_DELTA, DEFAULT_MIN_SUB_INTERVAL};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub blacklist: BlacklistConfig,
    #[serde(default)]
    pub subtitle: SubtitleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Blacklist lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistConfig {
    /// Apply a blacklist when one is found
    #[serde(default = "default_blacklist_enabled")]
    pub enabled: bool,
    /// Explicit blacklist file; the default locations are searched when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

pub fn default_blacklist_enabled() -> bool {
    true
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            enabled: default_blacklist_enabled(),
            path: None,
        }
    }
}

/// Subtitle cue synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Seconds between an occurrence start and its label appearing
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Shortest cue duration in seconds
    #[serde(default = "default_min_interval")]
    pub min_interval: f64,
}

pub fn default_delta() -> f64 {
    DEFAULT_DELTA
}

pub fn default_min_interval() -> f64 {
    DEFAULT_MIN_SUB_INTERVAL
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            delta: default_delta(),
            min_interval: default_min_interval(),
        }
    }
}

/// Output defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when `-f` is not given (metadata-info always defaults to free)
    #[serde(default)]
    pub format: OutputFormat,
}
