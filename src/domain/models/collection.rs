use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;
use super::format::{format_number, format_yuan};

/// Aggregate statistics for the whole collection.
///
/// Every field is optional upstream; an empty object decodes to zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Number of books
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_books: i64,
    /// Number of distinct authors
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_authors: i64,
    /// Number of distinct publishers
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_publishers: i64,
    /// Number of distinct countries
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_countries: i64,
    /// Sum of purchase prices
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub total_value: f64,
    /// Books bought this year
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub books_this_year: i64,
    /// Value bought this year
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub value_this_year: f64,
    /// Books bought this month
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub books_this_month: i64,
    /// Value bought this month
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub value_this_month: f64,
    /// Top authors, untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub top_authors: Vec<Value>,
    /// Top publishers, untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub top_publishers: Vec<Value>,
    /// Top countries, untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub top_countries: Vec<Value>,
    /// Recent purchases, untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub recent_purchases: Vec<Value>,
    /// When the upstream last recomputed the statistics
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub last_updated: Option<String>,
}

#[allow(clippy::cast_precision_loss)]
impl CollectionStats {
    /// Total value with currency.
    pub fn formatted_total_value(&self) -> String {
        format_yuan(self.total_value)
    }

    /// This year's value with currency.
    pub fn formatted_year_value(&self) -> String {
        format_yuan(self.value_this_year)
    }

    /// This month's value with currency.
    pub fn formatted_month_value(&self) -> String {
        format_yuan(self.value_this_month)
    }

    /// Mean purchase price; 0 for an empty collection.
    pub fn average_book_price(&self) -> f64 {
        if self.total_books > 0 {
            self.total_value / self.total_books as f64
        } else {
            0.0
        }
    }

    /// Mean purchase price with currency.
    pub fn formatted_average_price(&self) -> String {
        format_yuan(self.average_book_price())
    }

    /// Books per distinct author.
    pub fn books_per_author(&self) -> f64 {
        if self.total_authors > 0 {
            self.total_books as f64 / self.total_authors as f64
        } else {
            0.0
        }
    }

    /// Share of the collection bought this year, in percent.
    pub fn year_purchase_percentage(&self) -> f64 {
        if self.total_books > 0 {
            self.books_this_year as f64 / self.total_books as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Share bought this year, e.g. `12.5%`.
    pub fn formatted_year_percentage(&self) -> String {
        format!("{}%", format_number(self.year_purchase_percentage(), 1))
    }

    /// True when at least one book was bought this month.
    pub const fn is_growing(&self) -> bool {
        self.books_this_month > 0
    }

    /// Countries per 100 books.
    pub fn diversity_score(&self) -> f64 {
        if self.total_books > 0 {
            self.total_countries as f64 / self.total_books as f64 * 100.0
        } else {
            0.0
        }
    }
}
