//! Metareader Library
//!
//! Query and summarize Valossa Core video-analysis metadata: list
//! detections, walk the per-second structure, total screentime by category
//! or identity, and synthesize subtitle cues.

pub mod blacklist;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod interval;
pub mod matching;
pub mod metadata;
pub mod output;
pub mod query;

pub use blacklist::Blacklist;
pub use config::Config;
pub use error::MetareaderError;
pub use index::{DetectionOrder, ExtraField, MetadataIndex, OccurrenceOrder};
pub use interval::{AdditionMethod, IntervalAccumulator};
pub use matching::{DetectionFilter, ExternalConceptId};
pub use metadata::MetadataDocument;
pub use output::OutputFormat;
pub use query::MetadataReader;
