//! list-occurrences handler

use anyhow::Result;

use metareader::cli::{FilterArgs, IoArgs};
use metareader::index::OccurrenceOrder;
use metareader::output::print_listing;
use metareader::query::OccurrenceListOptions;
use metareader::Config;

use super::{build_filter, load_reader, open_printer, parse_extras, reconcile_range};

/// Time bounds of the occurrence listing, in seconds.
pub struct OccurrenceRange {
    pub start_second: Option<f64>,
    pub length_seconds: Option<f64>,
    pub end_second: Option<f64>,
}

#[cfg(not(tarpaulin_include))]
pub fn handle(
    io: &IoArgs,
    filter: &FilterArgs,
    range: OccurrenceRange,
    sort_by: Option<&str>,
    extra_header: &[String],
) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&io.metadata_file, &config)?;
    let (start_second, end_second) =
        reconcile_range(range.start_second, range.length_seconds, range.end_second);
    let options = OccurrenceListOptions {
        filter: build_filter(filter)?,
        sort_by: sort_by
            .map(|s| s.parse::<OccurrenceOrder>())
            .transpose()?
            .unwrap_or_default(),
        start_second,
        end_second,
        extra_fields: parse_extras(extra_header)?,
    };
    let listing = reader.list_occurrences(options)?;

    let mut printer = open_printer(io, config.output.format)?;
    print_listing(printer.as_mut(), listing)?;
    Ok(())
}
