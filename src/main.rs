//! Metareader - CLI entry point

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use metareader::cli::{Cli, Commands, ConfigCommands};
use metareader::query::SummaryOptions;

use commands::by_second::Shape;
use commands::occurrences::OccurrenceRange;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<metareader::MetareaderError>() {
                Some(app) if app.is_application() => eprintln!("Error: {}", app),
                _ => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never mix with listings on stdout.
fn init_logging(verbose: bool) {
    let default = if verbose { "metareader=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("METAREADER_LOG").unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(not(tarpaulin_include))]
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ListDetections {
            io,
            filter,
            n_most_prominent_detections_per_type,
            sort_by,
            extra_header,
        } => commands::detections::handle(
            &io,
            &filter,
            n_most_prominent_detections_per_type,
            &sort_by,
            &extra_header,
        ),
        Commands::ListDetectionsBySecond {
            io,
            filter,
            range,
            short,
            sentiment,
            extra_header,
        } => commands::by_second::handle(
            &io,
            &filter,
            &range,
            Shape { short, sentiment },
            &extra_header,
        ),
        Commands::ListCategories {
            io,
            detection_types,
            categories,
            range,
            n_most_longest,
        } => commands::categories::handle(
            &io,
            &detection_types,
            &categories,
            &range,
            n_most_longest,
        ),
        Commands::ListOccurrences {
            io,
            filter,
            start_second,
            length_seconds,
            end_second,
            sort_by,
            extra_header,
        } => commands::occurrences::handle(
            &io,
            &filter,
            OccurrenceRange {
                start_second,
                length_seconds,
                end_second,
            },
            sort_by.as_deref(),
            &extra_header,
        ),
        Commands::Summary {
            io,
            detection_type,
            categories,
            n_most_prominent_detections_per_type,
            min_confidence,
            addition_method,
            separate_face_identities,
            skip_unknown_faces,
            emotion,
        } => {
            let options = SummaryOptions {
                detection_type,
                categories: commands::non_empty(&categories),
                addition_method: addition_method.parse()?,
                min_confidence,
                limit: n_most_prominent_detections_per_type,
                separate_face_identities,
                skip_unknown_faces,
                emotion,
            };
            commands::summary::handle(&io, &options)
        }
        Commands::Plot(args) => commands::plot::handle(&args),
        Commands::MetadataInfo { io } => commands::info::handle(&io),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
        },
    }
}
