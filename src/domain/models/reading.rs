//! Reading journal records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use super::listing::Pagination;

/// Reading statistics. The upstream shape is open-ended, so fields are
/// kept as-is and read through typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingSummary {
    /// Raw summary fields
    pub fields: Map<String, Value>,
}

impl ReadingSummary {
    /// Integer field, 0 when absent or not numeric.
    pub fn get_i64(&self, name: &str) -> i64 {
        self.fields.get(name).and_then(Value::as_i64).unwrap_or_default()
    }

    /// Text field, empty when absent.
    pub fn get_str(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or_default()
    }
}

/// One review in the reading journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingReview {
    /// Review title
    #[serde(deserialize_with = "de::required_string")]
    pub title: String,
    /// Date the review was written
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub datein: String,
    /// Link to the full review
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub uri: String,
    /// Feature image or blurb
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub feature: String,
    /// Catalogue number of the reviewed book
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub bookid: String,
    /// Title of the reviewed book
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub book_title: String,
    /// Cover of the reviewed book
    #[serde(default, deserialize_with = "de::lenient_opt_string")]
    pub cover_uri: Option<String>,
}

/// One page of reading reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingReviewPage {
    /// Reviews on this page
    #[serde(rename = "data", default, deserialize_with = "de::lenient_vec")]
    pub reviews: Vec<ReadingReview>,
    /// Page position
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub pagination: Pagination,
}
