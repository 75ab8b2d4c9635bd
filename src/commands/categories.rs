//! list-categories handler

use anyhow::Result;

use metareader::cli::{IoArgs, SecondRangeArgs};
use metareader::output::print_listing;
use metareader::query::CategoryListOptions;
use metareader::Config;

use super::{load_reader, non_empty, open_printer, reconcile_range};

#[cfg(not(tarpaulin_include))]
pub fn handle(
    io: &IoArgs,
    detection_types: &[String],
    categories: &[String],
    range: &SecondRangeArgs,
    limit: Option<usize>,
) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&io.metadata_file, &config)?;
    let (start, end) = reconcile_range(
        range.start_second,
        range.length_seconds,
        range.end_second,
    );
    let options = CategoryListOptions {
        detection_types: detection_types.to_vec(),
        categories: non_empty(categories),
        start_second: start.map(|s| s as f64),
        end_second: end.map(|e| e as f64),
        limit,
    };
    let listing = reader.list_categories(options)?;

    let mut printer = open_printer(io, config.output.format)?;
    print_listing(printer.as_mut(), listing)?;
    Ok(())
}
