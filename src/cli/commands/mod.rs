//! CLI command implementations.

pub mod books;
pub mod daily;

use anyhow::{Context, Result};

use crate::cli::types::{Cli, Commands};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::GatewayClient;

/// Load configuration, start logging, and run the selected command.
pub async fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;
    let client = GatewayClient::new(&config).context("Failed to build gateway client")?;

    match cli.command {
        Commands::Status => books::handle_status(&client, cli.refresh, cli.json).await,
        Commands::Book { book_id } => {
            books::handle_book(&client, &book_id, cli.refresh, cli.json).await
        }
        Commands::Latest { count } => {
            books::handle_latest(&client, count, cli.refresh, cli.json).await
        }
        Commands::Random { count } => {
            books::handle_random(&client, count, cli.refresh, cli.json).await
        }
        Commands::Today { month, day } => {
            books::handle_today(&client, month.zip(day), cli.refresh, cli.json).await
        }
        Commands::Wotd => daily::handle_wotd(&client, cli.refresh, cli.json).await,
        Commands::Qotd => daily::handle_qotd(&client, cli.refresh, cli.json).await,
        Commands::Home => daily::handle_home(&client, cli.refresh, cli.json).await,
    }
}
