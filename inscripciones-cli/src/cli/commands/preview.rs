//! `preview` command

use anyhow::{Context, Result};

use crate::cli::{PreviewArgs, ensure_xlsx, output};
use crate::config::Config;
use crate::import::{now_rfc3339, prepare};

pub async fn handle_preview_command(args: PreviewArgs, config: &Config) -> Result<()> {
    ensure_xlsx(&args.file)?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read spreadsheet: {}", args.file.display()))?;

    let prepared = prepare(&bytes, &config.import, &now_rfc3339())?;

    if args.json {
        let json = serde_json::to_string_pretty(&prepared.groups)
            .context("Failed to format JSON output")?;
        println!("{}", json);
    } else {
        output::print_preview(&args.file.display().to_string(), &prepared);
    }
    Ok(())
}
