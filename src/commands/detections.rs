//! list-detections handler

use anyhow::Result;

use metareader::cli::{FilterArgs, IoArgs};
use metareader::output::print_listing;
use metareader::query::DetectionListOptions;
use metareader::Config;

use super::{build_filter, load_reader, open_printer, parse_extras};

#[cfg(not(tarpaulin_include))]
pub fn handle(
    io: &IoArgs,
    filter: &FilterArgs,
    limit_per_type: Option<usize>,
    sort_by: &str,
    extra_header: &[String],
) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&io.metadata_file, &config)?;
    let options = DetectionListOptions {
        filter: build_filter(filter)?,
        order: sort_by.parse()?,
        limit_per_type,
        extra_fields: parse_extras(extra_header)?,
    };
    let listing = reader.list_detections(options)?;

    let mut printer = open_printer(io, config.output.format)?;
    let count = print_listing(printer.as_mut(), listing)?;
    tracing::debug!(rows = count, "listed detections");
    Ok(())
}
