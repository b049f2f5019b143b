use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use inscripciones_cli::cli::{Cli, Commands, commands};
use inscripciones_cli::config::Config;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    log::debug!("Using API at {}", config.api.base_url);

    match cli.command {
        Commands::Import(args) => commands::import::handle_import_command(args, &config).await,
        Commands::Preview(args) => commands::preview::handle_preview_command(args, &config).await,
    }
}
