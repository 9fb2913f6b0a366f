//! Book records.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;
use super::format::format_yuan;

/// Region value for which the summary omits the region suffix.
const HOME_REGION: &str = "中国";

/// One book in the collection.
///
/// `id`, `bookid` and `title` identify the record and are required; every
/// other field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Numeric primary key
    #[serde(deserialize_with = "de::required_i64")]
    pub id: i64,
    /// Catalogue number
    #[serde(deserialize_with = "de::required_string")]
    pub bookid: String,
    /// Title
    #[serde(deserialize_with = "de::required_string")]
    pub title: String,
    /// Author
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub author: String,
    /// Whether the book is a translation
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub translated: bool,
    /// Translator or copyright holder
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub copyrighter: Option<String>,
    /// Region of origin
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub region: String,
    /// Shelf location
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub location: String,
    /// Purchase date as sent by the upstream (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub purchdate: String,
    /// Purchase price in yuan
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub price: f64,
    /// Publication date
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub pubdate: Option<String>,
    /// Print date
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub printdate: Option<String>,
    /// Edition
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub ver: Option<String>,
    /// Binding
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub deco: Option<String>,
    /// ISBN
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub isbn: Option<String>,
    /// Category
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub category: Option<String>,
    /// Original language
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub ol: Option<String>,
    /// Word count in thousands
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub kword: i64,
    /// Page count
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub page: i64,
    /// Introduction
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub intro: String,
    /// Whether the book is on the shelf
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub instock: bool,
    /// Publisher name
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub publisher_name: Option<String>,
    /// Publisher city
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub place_name: Option<String>,
    /// Tags
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub tags: Vec<String>,
    /// Reviews, passed through untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub reviews: Vec<Value>,
    /// Cover image URI
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub cover_uri: Option<String>,
    /// Total visit count
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_visits: i64,
    /// Last visit timestamp
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub last_visited: Option<String>,
    /// Country of the last visit
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub visit_country: Option<String>,
    /// Days since the last visit
    #[serde(default, deserialize_with = "de::lenient_opt_i64")]
    pub days_since_visit: Option<i64>,
    /// Years since purchase, for "on this day" lists
    #[serde(default, deserialize_with = "de::lenient_opt_i64")]
    pub years_ago: Option<i64>,
}

impl Book {
    /// Price with currency, e.g. `¥45.00`.
    pub fn formatted_price(&self) -> String {
        format_yuan(self.price)
    }

    /// Purchase date as `YYYY年MM月DD日`; the raw value when unparseable.
    pub fn formatted_purchase_date(&self) -> String {
        let raw = self.purchdate.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
            })
            .map_or_else(|_| raw.to_string(), |date| date.format("%Y年%m月%d日").to_string())
    }

    /// True when a cover image is available.
    pub fn has_cover(&self) -> bool {
        self.cover_uri.is_some()
    }

    /// One-line summary: `[译] title - author (region)`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.translated {
            parts.push("[译]".to_string());
        }
        parts.push(self.title.clone());
        parts.push(format!("- {}", self.author));
        if !self.region.is_empty() && self.region != HOME_REGION {
            parts.push(format!("({})", self.region));
        }
        parts.join(" ")
    }

    /// Tags joined with `, `.
    pub fn tags_string(&self) -> String {
        self.tags.join(", ")
    }
}
