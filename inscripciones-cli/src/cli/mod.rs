//! Command-line interface

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "inscripciones-cli")]
#[command(about = "Import course enrollments from an .xlsx spreadsheet")]
#[command(version)]
pub struct Cli {
    /// Override the configured API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a spreadsheet into the enrollment service
    Import(ImportArgs),
    /// Show how a spreadsheet would be grouped, without contacting the service
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// Spreadsheet to import (.xlsx)
    pub file: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Spreadsheet to inspect (.xlsx)
    pub file: PathBuf,

    /// Print the groups as JSON
    #[arg(long)]
    pub json: bool,
}

/// Only `.xlsx` uploads are accepted
pub fn ensure_xlsx(path: &Path) -> Result<()> {
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

    if !is_xlsx {
        bail!("Only .xlsx files are supported: {}", path.display());
    }
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    Ok(())
}
