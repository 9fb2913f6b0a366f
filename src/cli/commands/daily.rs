//! Daily content and home page commands.

use anyhow::{anyhow, Result};

use crate::cli::display::output;
use crate::services::GatewayClient;

/// Handle wotd command
pub async fn handle_wotd(client: &GatewayClient, refresh: bool, json: bool) -> Result<()> {
    let word = client
        .word_of_the_day(refresh)
        .await
        .ok_or_else(|| anyhow!("Word of the day is unavailable"))?;
    output(&word, json);
    Ok(())
}

/// Handle qotd command
pub async fn handle_qotd(client: &GatewayClient, refresh: bool, json: bool) -> Result<()> {
    let quote = client
        .quote_of_the_day(refresh)
        .await
        .ok_or_else(|| anyhow!("Quote of the day is unavailable"))?;
    output(&quote, json);
    Ok(())
}

/// Handle home command
pub async fn handle_home(client: &GatewayClient, refresh: bool, json: bool) -> Result<()> {
    let page = client.home_page(refresh).await;
    output(&page, json);
    Ok(())
}
