//! Book commands.

use anyhow::{anyhow, Result};

use crate::cli::display::records::BookList;
use crate::cli::display::output;
use crate::services::GatewayClient;

/// Handle status command
pub async fn handle_status(client: &GatewayClient, refresh: bool, json: bool) -> Result<()> {
    let stats = client
        .collection_status(refresh)
        .await
        .ok_or_else(|| anyhow!("Collection statistics are unavailable"))?;
    output(&stats, json);
    Ok(())
}

/// Handle book command
pub async fn handle_book(
    client: &GatewayClient,
    book_id: &str,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let book = client
        .book_details(book_id, refresh)
        .await
        .ok_or_else(|| anyhow!("Book {book_id} not found or unavailable"))?;
    output(&book, json);
    Ok(())
}

/// Handle latest command
pub async fn handle_latest(
    client: &GatewayClient,
    count: u32,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let books = client.latest_books(count, refresh).await;
    output(
        &BookList {
            heading: "Latest acquisitions".to_string(),
            books,
        },
        json,
    );
    Ok(())
}

/// Handle random command
pub async fn handle_random(
    client: &GatewayClient,
    count: u32,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let books = client.random_books(count, refresh).await;
    output(
        &BookList {
            heading: "Random picks".to_string(),
            books,
        },
        json,
    );
    Ok(())
}

/// Handle today command; `date` is `(month, day)`.
pub async fn handle_today(
    client: &GatewayClient,
    date: Option<(u32, u32)>,
    refresh: bool,
    json: bool,
) -> Result<()> {
    let (heading, books) = match date {
        Some((month, day)) => (
            format!("Acquired on {month:02}-{day:02}"),
            client.books_for_date(month, day, refresh).await,
        ),
        None => {
            let today = client.todays_books(refresh).await;
            let heading = match today.date_label() {
                Some(label) => format!("Acquired on this day ({label})"),
                None => "Acquired on this day".to_string(),
            };
            (heading, today.books)
        }
    };
    output(&BookList { heading, books }, json);
    Ok(())
}
