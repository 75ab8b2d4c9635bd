//! xtask - Build tasks for metareader
//!
//! Run with: cargo xtask <command>
//!
//! Commands:
//! - gen-docs: Generate man pages and COMMANDS.md from the CLI definitions

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, Command, CommandFactory, Parser, Subcommand};

use metareader::cli::Cli;

const BIN: &str = "metareader";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build tasks for metareader")]
struct Xtask {
    #[command(subcommand)]
    command: XtaskCommand,
}

#[derive(Subcommand)]
enum XtaskCommand {
    /// Generate documentation from CLI definitions
    #[command(name = "gen-docs")]
    GenDocs {
        /// Output directory (default: docs/)
        #[arg(long, short, default_value = "docs")]
        output: PathBuf,

        /// Generate man pages only
        #[arg(long, conflicts_with = "markdown")]
        man: bool,

        /// Generate COMMANDS.md only
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> Result<()> {
    let args = Xtask::parse();

    match args.command {
        XtaskCommand::GenDocs {
            output,
            man,
            markdown,
        } => {
            if !markdown {
                generate_man_pages(&output)?;
            }
            if !man {
                generate_markdown(&output)?;
            }
        }
    }

    Ok(())
}

fn visible_subcommands(cmd: &Command) -> impl Iterator<Item = &Command> {
    cmd.get_subcommands().filter(|c| !c.is_hide_set())
}

fn documented_args(cmd: &Command) -> impl Iterator<Item = &Arg> {
    cmd.get_arguments().filter(|a| {
        let id = a.get_id().as_str();
        id != "help" && id != "version"
    })
}

fn flag_text(arg: &Arg) -> Option<String> {
    if arg.is_positional() {
        return Some(format!("<{}>", arg.get_id().as_str().to_uppercase()));
    }
    let long = arg.get_long().map(|l| format!("--{}", l));
    let short = arg.get_short().map(|s| format!("-{}", s));
    match (short, long) {
        (Some(s), Some(l)) => Some(format!("{}, {}", s, l)),
        (Some(s), None) => Some(s),
        (None, Some(l)) => Some(l),
        (None, None) => None,
    }
}

fn write_man(cmd: &Command, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(path, buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Generated: {}", path.display());
    Ok(())
}

/// Generate man pages using clap_mangen
fn generate_man_pages(output: &Path) -> Result<()> {
    let man_dir = output.join("man");
    fs::create_dir_all(&man_dir).context("Failed to create man directory")?;

    let cmd = Cli::command();
    write_man(&cmd, &man_dir.join(format!("{}.1", BIN)))?;

    for subcommand in visible_subcommands(&cmd) {
        let name = subcommand.get_name();
        write_man(subcommand, &man_dir.join(format!("{}-{}.1", BIN, name)))?;

        for nested in visible_subcommands(subcommand) {
            let file = format!("{}-{}-{}.1", BIN, name, nested.get_name());
            write_man(nested, &man_dir.join(file))?;
        }
    }

    println!("Man pages generated in {}", man_dir.display());
    Ok(())
}

fn push_args(markdown: &mut String, cmd: &Command) -> Result<()> {
    let mut any = false;
    for arg in documented_args(cmd) {
        let Some(flag) = flag_text(arg) else {
            continue;
        };
        if !any {
            markdown.push_str("### Options\n\n");
            any = true;
        }
        let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
        writeln!(markdown, "- `{}`: {}", flag, help)?;
    }
    if any {
        markdown.push('\n');
    }
    Ok(())
}

fn push_long_about(markdown: &mut String, cmd: &Command) -> Result<()> {
    if let Some(long_about) = cmd.get_long_about() {
        write!(markdown, "```\n{}\n```\n\n", long_about)?;
    }
    Ok(())
}

/// Generate COMMANDS.md markdown documentation
fn generate_markdown(output: &Path) -> Result<()> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let cmd = Cli::command();
    let mut markdown = String::new();

    markdown.push_str("# Metareader Command Reference\n\n");
    markdown.push_str("This document is auto-generated from the CLI definitions.\n\n");
    markdown.push_str("## Table of Contents\n\n");
    for subcommand in visible_subcommands(&cmd) {
        let name = subcommand.get_name();
        writeln!(markdown, "- [{}](#{}-{})", name, BIN, name)?;
    }
    markdown.push_str("\n---\n\n");

    writeln!(markdown, "## {}\n", BIN)?;
    if let Some(about) = cmd.get_about() {
        writeln!(markdown, "{}\n", about)?;
    }
    push_long_about(&mut markdown, &cmd)?;

    for subcommand in visible_subcommands(&cmd) {
        let name = subcommand.get_name();
        writeln!(markdown, "## {} {}\n", BIN, name)?;
        if let Some(about) = subcommand.get_about() {
            writeln!(markdown, "{}\n", about)?;
        }
        push_args(&mut markdown, subcommand)?;
        push_long_about(&mut markdown, subcommand)?;

        for nested in visible_subcommands(subcommand) {
            writeln!(markdown, "#### {} {} {}\n", BIN, name, nested.get_name())?;
            if let Some(about) = nested.get_about() {
                writeln!(markdown, "{}\n", about)?;
            }
            push_args(&mut markdown, nested)?;
        }

        markdown.push_str("---\n\n");
    }

    markdown.push_str("\n*Generated by `cargo xtask gen-docs`*\n");

    let output_path = output.join("COMMANDS.md");
    fs::write(&output_path, markdown)?;
    println!("Generated: {}", output_path.display());

    Ok(())
}
