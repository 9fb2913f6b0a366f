//! Human-readable rendering of gateway records.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;

use super::detail::DetailView;
use super::table::{book_table, render_list};
use super::CommandOutput;
use crate::domain::models::format::format_number;
use crate::domain::models::{Book, CollectionStats, QuoteOfTheDay, WordOfTheDay};
use crate::services::HomePage;

/// Longest definition shown for the word of the day on the home page.
const HOME_DEFINITION_CHARS: usize = 40;

/// A titled list of books.
#[derive(Debug, Serialize)]
pub struct BookList {
    /// Heading printed above the table
    pub heading: String,
    /// Books to list
    pub books: Vec<Book>,
}

impl CommandOutput for BookList {
    fn to_human(&self) -> String {
        let table = book_table(&self.books);
        format!(
            "{}\n{}",
            self.heading,
            render_list("book", &table, self.books.len())
        )
    }
}

impl CommandOutput for Book {
    fn to_human(&self) -> String {
        let mut view = DetailView::new(&self.summary())
            .field("Catalogue no.", &self.bookid)
            .field("Author", &self.author)
            .field_opt("Translator", self.copyrighter.as_deref())
            .field_opt("Publisher", self.publisher_name.as_deref())
            .field_opt("Place", self.place_name.as_deref())
            .field_opt("ISBN", self.isbn.as_deref())
            .field_opt("Category", self.category.as_deref())
            .field("Purchased", &self.formatted_purchase_date())
            .field("Price", &self.formatted_price())
            .field_opt("Location", Some(self.location.as_str()))
            .field("Visits", &self.total_visits.to_string())
            .field_opt("Last visited", self.last_visited.as_deref());

        if !self.tags.is_empty() {
            view = view.section("Tags");
            for tag in &self.tags {
                view = view.item(tag);
            }
        }
        if !self.intro.is_empty() {
            view = view.section("Introduction").item(&self.intro);
        }
        view.render()
    }
}

impl CommandOutput for CollectionStats {
    fn to_human(&self) -> String {
        DetailView::new("Collection")
            .field("Books", &format_number(self.total_books as f64, 0))
            .field("Authors", &format_number(self.total_authors as f64, 0))
            .field("Publishers", &format_number(self.total_publishers as f64, 0))
            .field("Countries", &format_number(self.total_countries as f64, 0))
            .field("Total value", &self.formatted_total_value())
            .field("Average price", &self.formatted_average_price())
            .field("Books per author", &format_number(self.books_per_author(), 2))
            .section("This year")
            .field("Books", &self.books_this_year.to_string())
            .field("Value", &self.formatted_year_value())
            .field("Share", &self.formatted_year_percentage())
            .section("This month")
            .field("Books", &self.books_this_month.to_string())
            .field("Value", &self.formatted_month_value())
            .render()
    }
}

impl CommandOutput for WordOfTheDay {
    fn to_human(&self) -> String {
        let mut view = DetailView::new(&self.summary()).field("Meaning", &self.meaning);
        if self.has_examples() {
            view = view.section("Example").item(&self.sentence);
        }
        view.render()
    }
}

impl CommandOutput for QuoteOfTheDay {
    fn to_human(&self) -> String {
        if self.source.is_empty() {
            self.quote.clone()
        } else {
            format!("{}\n  -- {}", self.quote, self.source)
        }
    }
}

impl CommandOutput for HomePage {
    fn to_human(&self) -> String {
        let mut blocks = Vec::new();

        if let Some(stats) = &self.stats {
            blocks.push(format!(
                "{} books by {} authors, worth {}",
                format_number(stats.total_books as f64, 0),
                format_number(stats.total_authors as f64, 0),
                stats.formatted_total_value()
            ));
        }

        for (heading, books) in [
            ("Latest", &self.latest),
            ("Random picks", &self.random),
            ("Forgotten", &self.forgotten),
            ("Recently visited", &self.recent),
        ] {
            if !books.is_empty() {
                let lines: Vec<String> = books.iter().map(|b| format!("  {}", b.summary())).collect();
                blocks.push(format!("{heading}\n{}", lines.join("\n")));
            }
        }

        if let Some(word) = &self.word_of_the_day {
            blocks.push(format!(
                "Word of the day: {}  {}",
                word.summary(),
                word.short_definition(HOME_DEFINITION_CHARS)
            ));
        }
        if let Some(quote) = &self.quote_of_the_day {
            blocks.push(format!("Quote of the day: {}", quote.summary()));
        }
        if !self.latest_readings.is_empty() {
            let lines: Vec<String> = self
                .latest_readings
                .iter()
                .map(|review| format!("  {} ({})", review.title, review.datein))
                .collect();
            blocks.push(format!("Latest readings\n{}", lines.join("\n")));
        }
        if !self.failed_sections.is_empty() {
            blocks.push(format!("Unavailable: {}", self.failed_sections.join(", ")));
        }

        blocks.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_rendering() {
        let quote: QuoteOfTheDay =
            serde_json::from_value(json!({"id": 1, "quote": "读书破万卷", "source": "杜甫"})).unwrap();
        assert_eq!(quote.to_human(), "读书破万卷\n  -- 杜甫");
        assert_eq!(quote.to_json()["source"], "杜甫");
    }

    #[test]
    fn test_home_page_lists_unavailable_sections() {
        let page = HomePage {
            failed_sections: vec!["stats".to_string(), "wotd".to_string()],
            ..HomePage::default()
        };
        assert_eq!(page.to_human(), "Unavailable: stats, wotd");
    }

    #[test]
    fn test_book_detail_includes_tags() {
        let book: Book = serde_json::from_value(json!({
            "id": 1,
            "bookid": "00001",
            "title": "围城",
            "author": "钱锺书",
            "tags": ["小说"]
        }))
        .unwrap();
        let rendered = book.to_human();
        assert!(rendered.starts_with("围城 - 钱锺书"));
        assert!(rendered.contains("\u{2022} 小说"));
    }
}
