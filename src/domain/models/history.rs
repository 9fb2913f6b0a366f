//! Date-anchored views of the collection: books acquired on this day in
//! earlier years, and visit history.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::book::Book;
use super::de;

/// Books acquired on today's date in earlier years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodaysBooks {
    /// Matching books
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub books: Vec<Book>,
    /// Upstream description of the date that was matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_info: Option<Value>,
    /// Whether the upstream served this from its own cache
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub cached: bool,
}

impl TodaysBooks {
    /// True when no book matched.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Display label of the matched date: the `date_info` string itself, or
    /// its `formatted`/`date` field.
    pub fn date_label(&self) -> Option<&str> {
        match self.date_info.as_ref()? {
            Value::String(label) => Some(label),
            Value::Object(fields) => fields
                .get("formatted")
                .or_else(|| fields.get("date"))
                .and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Visit statistics over a trailing window of days. The shape is chart
/// data, so fields are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitHistory {
    /// Raw history fields
    pub fields: Map<String, Value>,
}

impl VisitHistory {
    /// Per-day visit points, empty when absent.
    pub fn entries(&self) -> &[Value] {
        self.array("visit_history")
    }

    /// Chart datasets, empty when absent.
    pub fn datasets(&self) -> &[Value] {
        self.array("datasets")
    }

    fn array(&self, name: &str) -> &[Value] {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}
