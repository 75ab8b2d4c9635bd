//! CLI definitions for metareader
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::output::plot::ImageFormat;
use crate::output::OutputFormat;

/// Build clap styles.
///
/// - Green: headers, usage, command names
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// float in [0.0, 1.0]
fn confidence(arg: &str) -> Result<f64, String> {
    let value: f64 = arg.parse().map_err(|_| format!("'{}' is not a number", arg))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} not in range [0.0, 1.0]", value))
    }
}

/// int in [1, 2, 3, ...]
fn positive(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("{} is not positive integer", arg)),
    }
}

/// "WIDTH,HEIGHT" or "WIDTHxHEIGHT" in pixels
fn image_size(arg: &str) -> Result<(u32, u32), String> {
    let trimmed = arg.trim().trim_start_matches('(').trim_end_matches(')');
    let (width, height) = trimmed
        .split_once(',')
        .or_else(|| trimmed.split_once('x'))
        .ok_or_else(|| format!("'{}' is not WIDTH,HEIGHT", arg))?;
    let pixels = |v: &str| v.trim().parse::<u32>().ok().filter(|v| *v > 0);
    match (pixels(width), pixels(height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(format!("'{}' is not a positive image size", arg)),
    }
}

#[derive(Parser)]
#[command(name = "metareader")]
#[command(about = "Helper tool to read Valossa Core metadata")]
#[command(
    long_about = "Metareader - query and summarize Valossa Core video-analysis metadata.

Reads one metadata JSON file (local path or http(s) URL) and lists detections,
per-second detections, category screentimes and occurrences, or summarizes
screentime by label and identity.

A FEW EXAMPLES:
    metareader summary metadata_example.json -f free -n 10
    metareader list-detections metadata_example.json -t visual.context
    metareader list-detections-by-second metadata_example.json -f srt > subs.srt

Logging goes to stderr. Use -v or METAREADER_LOG=debug for details."
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input and output options shared by every query command.
#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Valossa Core metadata file to examine (path or URL)
    #[arg(value_name = "METADATA_FILE")]
    pub metadata_file: String,

    /// Output results to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<String>,

    /// Output format (defaults to the configured format)
    #[arg(short = 'f', long, value_enum)]
    pub output_format: Option<OutputFormat>,
}

/// Detection selection options.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Detection types to read; * wildcards and comma lists are accepted
    #[arg(short = 't', long, value_name = "TYPE", num_args = 1..)]
    pub detection_types: Vec<String>,

    /// Category tags to read
    #[arg(short = 'c', long = "category", value_name = "CATEGORY", num_args = 1..)]
    pub categories: Vec<String>,

    /// Detection label to read. Example: dog
    #[arg(short = 'l', long, value_name = "LABEL")]
    pub detection_label: Option<String>,

    /// Comma-separated person names. Example: "George Clooney,*Willis"
    #[arg(short = 'p', long, alias = "similar-to", value_name = "PERSON")]
    pub detection_persons: Option<String>,

    /// Valossa concept ID to read. Example: "sEl5Jb8H_WG7"
    #[arg(short = 'i', long, value_name = "ID")]
    pub detection_valossa_cid: Option<String>,

    /// External ontology followed by a concept ID. Example: gkg "/m/01j61q"
    #[arg(long, num_args = 2, value_names = ["ONTOLOGY", "ID"])]
    pub detection_external_concept_id: Option<Vec<String>>,

    /// Minimum confidence in [0, 1]; ignored for types without confidence
    #[arg(long, value_name = "FLOAT", value_parser = confidence)]
    pub min_confidence: Option<f64>,
}

/// Whole-second time range.
#[derive(Args, Debug, Clone, Default)]
pub struct SecondRangeArgs {
    /// Start of the examined interval in seconds (default: 0)
    #[arg(long)]
    pub start_second: Option<usize>,

    /// Length of the examined interval in seconds
    #[arg(long)]
    pub length_seconds: Option<usize>,

    /// End of the examined interval in seconds (default: end of video)
    #[arg(long)]
    pub end_second: Option<usize>,
}

/// Options of the plot command.
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("plot_kind")
        .required(true)
        .args(["bar_summary", "transcript_sentiment_graph", "face_sentiment_graph"])
))]
pub struct PlotArgs {
    /// Valossa Core metadata file to examine (path or URL)
    #[arg(value_name = "METADATA_FILE")]
    pub metadata_file: String,

    /// Image file to write; the format follows its extension
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<String>,

    /// Image format (default: from --output-file, else svg)
    #[arg(short = 'f', long, value_enum)]
    pub output_format: Option<ImageFormat>,

    /// Bar chart of screentime per label of one detection type
    #[arg(long)]
    pub bar_summary: bool,

    /// Valence graph of the speech transcript
    #[arg(long)]
    pub transcript_sentiment_graph: bool,

    /// Valence graph of each face identity, one file each
    #[arg(long)]
    pub face_sentiment_graph: bool,

    /// Detection type to plot (required with --bar-summary)
    #[arg(short = 't', long, value_name = "TYPE", required_if_eq("bar_summary", "true"))]
    pub detection_type: Option<String>,

    /// Plot only the N longest entries (required with --bar-summary)
    #[arg(
        short = 'n',
        long,
        value_name = "N",
        value_parser = positive,
        required_if_eq("bar_summary", "true")
    )]
    pub n_most_prominent_detections_per_type: Option<usize>,

    /// Minimum confidence in [0, 1]
    #[arg(long, value_name = "FLOAT", value_parser = confidence)]
    pub min_confidence: Option<f64>,

    /// Image size in pixels. Example: 800,600
    #[arg(long, value_name = "WIDTH,HEIGHT", value_parser = image_size)]
    pub image_size: Option<(u32, u32)>,

    /// Do not merge faces recognized as the same person
    #[arg(long)]
    pub separate_face_identities: bool,

    /// Leave out faces without a recognized identity
    #[arg(long)]
    pub skip_unknown_faces: bool,

    /// Three-level valence graph: positive, neutral and negative
    #[arg(long)]
    pub simple: bool,

    /// Put the video title in the image
    #[arg(long)]
    pub show_title: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List detections without looking into the by_second structure
    #[command(long_about = "List detections without looking into the by_second structure.

Each row holds detection ID, type, label, Valossa concept ID and GKG concept ID,
followed by any --extra-header columns.

EXAMPLES:
    metareader list-detections meta.json -t visual.context -n 10
    metareader list-detections meta.json -t human.face --extra-header similar_to gender
    metareader list-detections meta.json --sort-by prominence -f free")]
    ListDetections {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// List only N most prominent detections from each detection type
        #[arg(short = 'n', long, value_name = "N", value_parser = positive)]
        n_most_prominent_detections_per_type: Option<usize>,

        /// Sort order
        #[arg(long, default_value = "detection_id", value_parser = ["prominence", "detection_id"])]
        sort_by: String,

        /// Extra columns
        #[arg(long, num_args = 1.., value_parser = ["similar_to", "gender", "text"])]
        extra_header: Vec<String>,
    },

    /// List detections for each second from the by_second structure
    #[command(long_about = "List detections for each second, by looking into the by_second structure.

Only time-bound detections are listed, so for example IAB categories are not.
--short prints one row per second with every label seen. --sentiment prints a
valence time series. -f srt prints subtitle cues.

EXAMPLES:
    metareader list-detections-by-second meta.json --start-second 60 --length-seconds 30
    metareader list-detections-by-second meta.json -t human.face --short
    metareader list-detections-by-second meta.json -t visual.context -f srt")]
    ListDetectionsBySecond {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        range: SecondRangeArgs,

        /// One row per second: timestamp followed by labels
        #[arg(long, conflicts_with = "sentiment")]
        short: bool,

        /// List sentiment (valence) data
        #[arg(long)]
        sentiment: bool,

        /// Extra columns
        #[arg(long, num_args = 1.., value_parser = ["similar_to", "gender", "valence", "text"])]
        extra_header: Vec<String>,
    },

    /// List category tags by screentime
    #[command(long_about = "List category tags with the time their detections are visible.

Tags are listed per detection type, longest first.

EXAMPLES:
    metareader list-categories meta.json -n 20
    metareader list-categories meta.json -t visual.context --start-second 0 --end-second 60")]
    ListCategories {
        #[command(flatten)]
        io: IoArgs,

        /// Detection types to read
        #[arg(short = 't', long, value_name = "TYPE", num_args = 1..)]
        detection_types: Vec<String>,

        /// Only count detections carrying one of these tags
        #[arg(short = 'c', long = "category", value_name = "CATEGORY", num_args = 1..)]
        categories: Vec<String>,

        #[command(flatten)]
        range: SecondRangeArgs,

        /// List only the N longest categories
        #[arg(short = 'n', long, value_name = "N", value_parser = positive)]
        n_most_longest: Option<usize>,
    },

    /// List all occurrences for one or more detections
    #[command(long_about = "List all occurrences for one or more detections.

With --sort-by, items missing the sort property are not listed at all.

EXAMPLES:
    metareader list-occurrences meta.json -l dog
    metareader list-occurrences meta.json -t human.face --sort-by valence --extra-header valence")]
    ListOccurrences {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Start of the examined interval in seconds
        #[arg(long)]
        start_second: Option<f64>,

        /// Length of the examined interval in seconds
        #[arg(long)]
        length_seconds: Option<f64>,

        /// End of the examined interval in seconds
        #[arg(long)]
        end_second: Option<f64>,

        /// Sort order (default: detection ID)
        #[arg(long, value_parser = ["start_second", "valence", "duration"])]
        sort_by: Option<String>,

        /// Extra columns
        #[arg(long, num_args = 1.., value_parser = ["valence", "similar_to", "text"])]
        extra_header: Vec<String>,
    },

    /// Summarize screentime by label and identity
    #[command(long_about = "Create a summary of detections based on their total occurrence time.

Percentages are relative to the total length of the video. Without -t, faces
and visual context are summarized. Faces sharing a recognized name are merged
unless --separate-face-identities is given.

EXAMPLES:
    metareader summary meta.json -f free -n 10
    metareader summary meta.json -t human.face --skip-unknown-faces --emotion
    metareader summary meta.json -t \"audio.*\"")]
    Summary {
        #[command(flatten)]
        io: IoArgs,

        /// Detection type to read; a * pattern expands to every matching type
        #[arg(short = 't', long, value_name = "TYPE")]
        detection_type: Option<String>,

        /// Category tags to read
        #[arg(short = 'c', long = "category", value_name = "CATEGORY", num_args = 1..)]
        categories: Vec<String>,

        /// List only the N longest entries of each detection type
        #[arg(short = 'n', long, value_name = "N", value_parser = positive)]
        n_most_prominent_detections_per_type: Option<usize>,

        /// Minimum confidence in [0, 1]
        #[arg(long, value_name = "FLOAT", value_parser = confidence)]
        min_confidence: Option<f64>,

        /// How overlapping occurrences are added up
        #[arg(long, default_value = "union", value_parser = ["union", "normal"])]
        addition_method: String,

        /// Do not merge faces recognized as the same person
        #[arg(long)]
        separate_face_identities: bool,

        /// Leave out faces without a recognized identity
        #[arg(long)]
        skip_unknown_faces: bool,

        /// Show available emotion data
        #[arg(long)]
        emotion: bool,
    },

    /// Plot a summary or a valence graph into an image file
    #[command(long_about = "Plot a screentime bar chart or valence graphs into image files.

--bar-summary draws the N longest labels of one detection type.
--transcript-sentiment-graph draws speech valence over time.
--face-sentiment-graph draws one valence graph per face identity, numbering
the files when there is more than one. The written paths are printed.

SVG output carries every label; PNG output holds the shapes only.

EXAMPLES:
    metareader plot meta.json --bar-summary -t visual.context -n 10 --output-file bars.svg
    metareader plot meta.json --face-sentiment-graph --simple -f png")]
    Plot(PlotArgs),

    /// Show information about a metadata file
    #[command(long_about = "Show format version, backend version, title, duration,
description and source URLs of a metadata file.

EXAMPLE:
    metareader metadata-info meta.json")]
    MetadataInfo {
        #[command(flatten)]
        io: IoArgs,
    },

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View the metareader configuration.

Configuration is stored in ~/.config/metareader/config.toml and holds the
blacklist lookup, subtitle timing and the default output format.

EXAMPLE:
    metareader config show"
    )]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
}
