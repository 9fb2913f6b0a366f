//! Paginated book listings: search results and browse pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::book::Book;
use super::de;
use super::format::format_number;

const fn default_page() -> i64 {
    1
}

const fn default_per_page() -> i64 {
    20
}

/// Page position within a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based current page
    #[serde(default = "default_page", deserialize_with = "de::lenient_i64")]
    pub current_page: i64,
    /// Number of pages
    #[serde(default = "default_page", deserialize_with = "de::lenient_i64")]
    pub total_pages: i64,
    /// Items per page
    #[serde(default = "default_per_page", deserialize_with = "de::lenient_i64")]
    pub per_page: i64,
    /// Total number of items
    #[serde(default, alias = "total_count", deserialize_with = "de::lenient_i64")]
    pub total: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: default_page(),
            total_pages: default_page(),
            per_page: default_per_page(),
            total: 0,
        }
    }
}

impl Pagination {
    /// True when a later page exists.
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// True when an earlier page exists.
    pub const fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Number of the next page, if any.
    pub const fn next_page(&self) -> Option<i64> {
        if self.has_next_page() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// Number of the previous page, if any.
    pub const fn previous_page(&self) -> Option<i64> {
        if self.has_previous_page() {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// Item range shown on this page, e.g. `21-40 of 150`.
    pub fn result_range(&self) -> String {
        if self.total <= 0 {
            return "0 results".to_string();
        }
        let start = (self.current_page - 1) * self.per_page + 1;
        let end = (self.current_page * self.per_page).min(self.total);
        format!("{start}-{end} of {}", self.total)
    }

    /// `Page N of M`.
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Result of a book search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matching books on this page
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub books: Vec<Book>,
    /// Total matches
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub total_count: i64,
    /// 1-based current page
    #[serde(default = "default_page", deserialize_with = "de::lenient_i64")]
    pub current_page: i64,
    /// Matches per page
    #[serde(default = "default_per_page", deserialize_with = "de::lenient_i64")]
    pub per_page: i64,
    /// Number of pages
    #[serde(default = "default_page", deserialize_with = "de::lenient_i64")]
    pub total_pages: i64,
    /// Query echoed by the upstream
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub query: String,
    /// Upstream search time in seconds
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub search_time: f64,
    /// Facets for filtering, untyped
    #[serde(default)]
    pub facets: Value,
    /// Spelling suggestions, untyped
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub suggestions: Vec<Value>,
}

impl SearchResult {
    /// Page position of this result.
    pub const fn pagination(&self) -> Pagination {
        Pagination {
            current_page: self.current_page,
            total_pages: self.total_pages,
            per_page: self.per_page,
            total: self.total_count,
        }
    }

    /// True when anything matched.
    pub const fn has_results(&self) -> bool {
        self.total_count > 0
    }

    /// Search time in milliseconds, e.g. `12.30ms`.
    pub fn formatted_search_time(&self) -> String {
        format!("{}ms", format_number(self.search_time * 1000.0, 2))
    }

    /// True when the upstream suggested alternatives.
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// True when facets are available.
    pub fn has_facets(&self) -> bool {
        match &self.facets {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            _ => true,
        }
    }
}

/// One page of the browse listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookListPage {
    /// Books on this page
    #[serde(rename = "data", default, deserialize_with = "de::lenient_vec")]
    pub books: Vec<Book>,
    /// Page position
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_navigation() {
        let page = Pagination {
            current_page: 2,
            total_pages: 8,
            per_page: 20,
            total: 150,
        };
        assert_eq!(page.next_page(), Some(3));
        assert_eq!(page.previous_page(), Some(1));
        assert_eq!(page.result_range(), "21-40 of 150");
        assert_eq!(page.page_label(), "Page 2 of 8");

        let last = Pagination {
            current_page: 8,
            ..page
        };
        assert_eq!(last.next_page(), None);
        assert_eq!(last.result_range(), "141-150 of 150");
    }

    #[test]
    fn test_empty_search_result() {
        let result: SearchResult = serde_json::from_value(json!({})).unwrap();
        assert!(!result.has_results());
        assert_eq!(result.pagination().result_range(), "0 results");
        assert!(!result.has_facets());
        assert_eq!(result.formatted_search_time(), "0.00ms");
    }

    #[test]
    fn test_book_list_page_with_null_pagination() {
        let page: BookListPage = serde_json::from_value(json!({
            "data": [{"id": 1, "bookid": "00001", "title": "A"}],
            "pagination": null
        }))
        .unwrap();
        assert_eq!(page.books.len(), 1);
        assert_eq!(page.pagination, Pagination::default());
    }
}
