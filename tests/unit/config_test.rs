//! Unit tests for configuration loading

use std::fs;

use metareader::{Config, OutputFormat};
use tempfile::TempDir;

#[test]
fn default_config_round_trips_through_toml() {
    let config = Config::default();
    let text = toml::to_string_pretty(&config).unwrap();
    assert!(text.contains("[subtitle]"));
    assert!(text.contains("format = \"csv\""));
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn blacklist_path_expands_home() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(
        &path,
        "[blacklist]\npath = \"~/lists/blacklist.json\"\n\n[output]\nformat = \"free\"\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.output.format, OutputFormat::Free);
    let expanded = config.blacklist_path().unwrap();
    assert!(expanded.ends_with("lists/blacklist.json"));
    if dirs::home_dir().is_some() {
        assert!(!expanded.starts_with("~"));
    }
}

#[test]
fn disabled_blacklist_is_kept() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[blacklist]\nenabled = false\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(!config.blacklist.enabled);
    assert!(config.blacklist_path().is_none());
}
