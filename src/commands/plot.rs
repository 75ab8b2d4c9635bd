//! plot handler

use std::path::{Path, PathBuf};

use anyhow::Result;

use metareader::cli::PlotArgs;
use metareader::output::plot::{self, ImageFormat, PlotStyle};
use metareader::query::{MetadataReader, SummaryOptions};
use metareader::{AdditionMethod, Config, MetareaderError};

use super::load_reader;

#[cfg(not(tarpaulin_include))]
pub fn handle(args: &PlotArgs) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&args.metadata_file, &config)?;
    let format = image_format(args)?;
    let style = PlotStyle {
        size: args.image_size,
        title: if args.show_title {
            reader.metadata_info().title
        } else {
            None
        },
    };

    let written = if args.bar_summary {
        plot_bar_summary(&reader, args, format, &style)?
    } else {
        plot_sentiment(&reader, args, format, &style)?
    };
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// `-f` wins, then the output file extension, then the default.
fn image_format(args: &PlotArgs) -> Result<ImageFormat> {
    match (args.output_format, &args.output_file) {
        (Some(format), _) => Ok(format),
        (None, Some(file)) => ImageFormat::from_path(Path::new(file)),
        (None, None) => Ok(ImageFormat::default()),
    }
}

fn target(args: &PlotArgs, default_stem: &str, format: ImageFormat) -> PathBuf {
    match &args.output_file {
        Some(file) => PathBuf::from(file),
        None => PathBuf::from(format!("{}.{}", default_stem, format.extension())),
    }
}

/// One path per image; numbered only when there are several.
fn targets(base: &Path, count: usize) -> Vec<PathBuf> {
    if count == 1 {
        vec![base.to_path_buf()]
    } else {
        (1..=count).map(|n| plot::numbered_path(base, n)).collect()
    }
}

fn plot_bar_summary(
    reader: &MetadataReader,
    args: &PlotArgs,
    format: ImageFormat,
    style: &PlotStyle,
) -> Result<Vec<PathBuf>> {
    let options = SummaryOptions {
        detection_type: args.detection_type.clone(),
        categories: None,
        addition_method: AdditionMethod::Union,
        min_confidence: args.min_confidence,
        limit: args.n_most_prominent_detections_per_type,
        separate_face_identities: args.separate_face_identities,
        skip_unknown_faces: args.skip_unknown_faces,
        emotion: false,
    };
    let blocks: Vec<_> = reader
        .list_summary(&options)?
        .into_iter()
        .filter(|block| !block.entries.is_empty())
        .collect();
    if blocks.is_empty() {
        return Err(MetareaderError::application("No detections to plot.").into());
    }

    let duration = reader.index().duration();
    let paths = targets(&target(args, "metareader_bar_summary", format), blocks.len());
    for (block, path) in blocks.iter().zip(&paths) {
        plot::bar_summary(block, duration, path, format, style)?;
    }
    Ok(paths)
}

fn plot_sentiment(
    reader: &MetadataReader,
    args: &PlotArgs,
    format: ImageFormat,
    style: &PlotStyle,
) -> Result<Vec<PathBuf>> {
    let speech = args.transcript_sentiment_graph;
    let series: Vec<_> = reader
        .valence_series(0, None)?
        .into_iter()
        .filter(|series| series.speech == speech && !series.points.is_empty())
        .collect();
    if series.is_empty() {
        let message = if speech {
            "No transcript sentiment data found."
        } else {
            "No face sentiment data found."
        };
        return Err(MetareaderError::application(message).into());
    }

    let stem = if speech {
        "metareader_transcript_sentiment"
    } else {
        "metareader_face_sentiment"
    };
    let duration = reader.index().duration();
    let paths = targets(&target(args, stem, format), series.len());
    for (series, path) in series.iter().zip(&paths) {
        plot::valence_graph(series, duration, path, format, style, args.simple)?;
    }
    Ok(paths)
}
