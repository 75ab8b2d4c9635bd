//! list-detections-by-second handler

use anyhow::Result;

use metareader::cli::{FilterArgs, IoArgs, SecondRangeArgs};
use metareader::output::{print_listing, OutputFormat, SrtWriter};
use metareader::query::{BySecondListing, BySecondMode, BySecondOptions};
use metareader::Config;

use super::{build_filter, load_reader, open_output, open_printer, output_format, parse_extras, reconcile_range};

/// Row shape requested on the command line.
pub struct Shape {
    pub short: bool,
    pub sentiment: bool,
}

#[cfg(not(tarpaulin_include))]
pub fn handle(
    io: &IoArgs,
    filter: &FilterArgs,
    range: &SecondRangeArgs,
    shape: Shape,
    extra_header: &[String],
) -> Result<()> {
    let config = Config::load()?;
    let format = output_format(io, config.output.format);
    let mode = if format == OutputFormat::Srt {
        BySecondMode::Subtitles {
            delta: config.subtitle.delta,
            min_sub_interval: config.subtitle.min_interval,
        }
    } else if shape.sentiment {
        BySecondMode::Sentiment
    } else if shape.short {
        BySecondMode::Short
    } else {
        BySecondMode::Detections
    };

    let reader = load_reader(&io.metadata_file, &config)?;
    let (start, end) = reconcile_range(
        range.start_second,
        range.length_seconds,
        range.end_second,
    );
    let options = BySecondOptions {
        filter: build_filter(filter)?,
        start_second: start.unwrap_or(0),
        end_second: end,
        mode,
        extra_fields: parse_extras(extra_header)?,
    };

    let result = match reader.list_detections_by_second(options)? {
        BySecondListing::Subtitles(listing) => {
            let mut writer = SrtWriter::new(open_output(io.output_file.as_deref())?);
            for cue in listing.rows {
                writer.cue(&cue)?;
            }
            writer.finish()
        }
        listing => {
            let mut printer = open_printer(io, config.output.format)?;
            print_listing(printer.as_mut(), listing.into_cells())?;
            Ok(())
        }
    };
    result
}
