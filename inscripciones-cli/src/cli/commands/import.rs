//! `import` command

use anyhow::{Context, Result, bail};
use colored::*;

use crate::api::ApiClient;
use crate::cli::{ImportArgs, ensure_xlsx, output};
use crate::config::Config;
use crate::import::{ImportCancel, Importer};

pub async fn handle_import_command(args: ImportArgs, config: &Config) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    ensure_xlsx(&args.file)?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read spreadsheet: {}", args.file.display()))?;

    let client = ApiClient::new(&config.api)?;
    let importer = Importer::new(client, config.import.clone());

    if !args.json {
        println!(
            "Importing {} into {}",
            args.file.display().to_string().cyan(),
            importer.store().base_url().bright_green()
        );
    }

    let cancel = ImportCancel::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Ctrl-C received, finishing the current enrollment");
                cancel.cancel();
            }
        })
    };

    let result = importer.run(&bytes, &cancel).await;
    ctrl_c.abort();
    let result = result?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to format JSON output")?;
        println!("{}", json);
    } else {
        output::print_import_result(&result);
    }

    if result.has_errors() {
        bail!("Import finished with {} errors", result.errors.len());
    }
    Ok(())
}
