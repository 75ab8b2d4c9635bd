//! metadata-info handler

use anyhow::Result;
use std::io::Write;

use metareader::cli::IoArgs;
use metareader::output::{self, OutputFormat};
use metareader::Config;

use super::{load_reader, open_output, output_format};

/// Free text by default; `-f csv` gives `field,value` rows.
#[cfg(not(tarpaulin_include))]
pub fn handle(io: &IoArgs) -> Result<()> {
    let config = Config::load()?;
    let reader = load_reader(&io.metadata_file, &config)?;
    let info = reader.metadata_info();
    let mut out = open_output(io.output_file.as_deref())?;

    match output_format(io, OutputFormat::Free) {
        OutputFormat::Free => {
            for line in info.lines() {
                writeln!(out, "{}", line)?;
            }
            out.flush()?;
            Ok(())
        }
        format => {
            let mut printer = output::printer(format, out)?;
            printer.header(&["field".to_string(), "value".to_string()])?;
            for (field, value) in info.fields() {
                printer.row(&[field.to_string(), value])?;
            }
            printer.finish()
        }
    }
}
