//! Config subcommands handler

use anyhow::Result;

use metareader::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# {}", path.display());
    print!("{}", toml_str);
    Ok(())
}
