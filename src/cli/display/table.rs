//! Table builder wrapper around comfy-table for consistent list display.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

use crate::domain::models::format::truncate_chars;
use crate::domain::models::Book;

/// Longest title shown in a book table.
const MAX_TITLE_CHARS: usize = 30;

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Render the table to string with a count header.
pub fn render_list(entity_name: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let noun = if total == 1 {
        entity_name.to_string()
    } else {
        format!("{entity_name}s")
    };
    format!("{total} {noun}:\n{table}")
}

/// Table of books: catalogue number, title, author, region, purchase date.
pub fn book_table(books: &[Book]) -> Table {
    let mut table = list_table(&["id", "title", "author", "region", "purchased"]);
    for book in books {
        let title = if book.translated {
            format!("[译] {}", book.title)
        } else {
            book.title.clone()
        };
        table.add_row(vec![
            Cell::new(&book.bookid),
            Cell::new(truncate_chars(&title, MAX_TITLE_CHARS)),
            Cell::new(&book.author),
            Cell::new(&book.region),
            Cell::new(book.formatted_purchase_date()),
        ]);
    }
    table
}
