//! summary handler

use anyhow::Result;

use metareader::cli::IoArgs;
use metareader::query::SummaryOptions;
use metareader::Config;

use super::{load_reader, open_printer};

#[cfg(not(tarpaulin_include))]
pub fn handle(io: &IoArgs, options: &SummaryOptions) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&io.metadata_file, &config)?;
    let blocks = reader.list_summary(options)?;
    tracing::debug!(blocks = blocks.len(), "summary computed");

    let mut printer = open_printer(io, config.output.format)?;
    printer.summary(&blocks)?;
    printer.finish()
}
