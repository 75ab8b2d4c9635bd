//! Command handlers for the metareader CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod by_second;
pub mod categories;
pub mod config;
pub mod detections;
pub mod info;
pub mod occurrences;
pub mod plot;
pub mod summary;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::{Add, Sub};
use std::path::Path;

use metareader::cli::{FilterArgs, IoArgs};
use metareader::output::{self, OutputFormat, Printer};
use metareader::{Blacklist, Config, DetectionFilter, ExternalConceptId, ExtraField, MetadataDocument, MetadataReader};

/// Load the document named on the command line and index it with the
/// configured blacklist.
pub fn load_reader(metadata_file: &str, config: &Config) -> Result<MetadataReader> {
    let document = MetadataDocument::load(metadata_file)?;
    let blacklist = load_blacklist(config)?;
    Ok(MetadataReader::new(document, blacklist)?)
}

fn load_blacklist(config: &Config) -> Result<Option<Blacklist>> {
    if !config.blacklist.enabled {
        tracing::debug!("blacklist disabled in config");
        return Ok(None);
    }
    let explicit = config.blacklist_path();
    match Blacklist::locate(explicit.as_deref())? {
        Some((path, blacklist)) => {
            tracing::debug!(path = %path.display(), "loaded blacklist");
            Ok(Some(blacklist))
        }
        None => {
            tracing::debug!("no blacklist file found");
            Ok(None)
        }
    }
}

/// Writer for `--output-file`, or stdout.
pub fn open_output(output_file: Option<&str>) -> Result<Box<dyn Write>> {
    match output_file {
        Some(path) => {
            let file = File::create(Path::new(path))
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Format from `-f`, falling back to `default`.
pub fn output_format(io: &IoArgs, default: OutputFormat) -> OutputFormat {
    io.output_format.unwrap_or(default)
}

/// Tabular printer for the requested format and destination.
pub fn open_printer(io: &IoArgs, default: OutputFormat) -> Result<Box<dyn Printer>> {
    let format = output_format(io, default);
    output::printer(format, open_output(io.output_file.as_deref())?)
}

pub fn build_filter(args: &FilterArgs) -> Result<DetectionFilter> {
    let external_concept = match args.detection_external_concept_id.as_deref() {
        Some([ontology, id]) => Some(ExternalConceptId::new(ontology.as_str(), id.as_str())?),
        Some(other) => anyhow::bail!(
            "--detection-external-concept-id takes ONTOLOGY and ID, got {} values",
            other.len()
        ),
        None => None,
    };
    Ok(DetectionFilter {
        detection_types: args.detection_types.clone(),
        label: args.detection_label.clone(),
        persons: args.detection_persons.iter().cloned().collect(),
        valossa_cid: args.detection_valossa_cid.clone(),
        external_concept,
        min_confidence: args.min_confidence,
        categories: non_empty(&args.categories),
    })
}

pub fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}

pub fn parse_extras(names: &[String]) -> Result<Vec<ExtraField>> {
    let mut fields = Vec::new();
    for name in names {
        let field: ExtraField = name.parse()?;
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    Ok(fields)
}

/// Reconcile `--start-second`, `--length-seconds` and `--end-second`.
///
/// Any two determine the third. With all three, the length is ignored.
pub fn reconcile_range<T>(start: Option<T>, length: Option<T>, end: Option<T>) -> (Option<T>, Option<T>)
where
    T: Copy + Default + PartialOrd + Add<Output = T> + Sub<Output = T>,
{
    match (start, length, end) {
        (start, _, Some(end)) if start.is_some() => (start, Some(end)),
        (Some(start), Some(length), None) => (Some(start), Some(start + length)),
        (None, Some(length), Some(end)) if length > end => (Some(T::default()), Some(end)),
        (None, Some(length), Some(end)) => (Some(end - length), Some(end)),
        (start, _, end) => (start, end),
    }
}
