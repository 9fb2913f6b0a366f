//! Per-day editorial content: word and quote of the day.

use serde::{Deserialize, Serialize};

use super::de;
use super::format::truncate_chars;

/// Word of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordOfTheDay {
    /// Upstream id
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub id: i64,
    /// The word itself
    #[serde(deserialize_with = "de::required_string")]
    pub word: String,
    /// Definition
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub meaning: String,
    /// Example sentence
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub sentence: String,
    /// Part of speech
    #[serde(default, rename = "type", deserialize_with = "de::lenient_string")]
    pub word_type: String,
}

impl WordOfTheDay {
    /// `word (type)`, or just the word when the type is unknown.
    pub fn summary(&self) -> String {
        if self.word_type.is_empty() {
            self.word.clone()
        } else {
            format!("{} ({})", self.word, self.word_type)
        }
    }

    /// Definition cut to `max_chars` characters.
    pub fn short_definition(&self, max_chars: usize) -> String {
        truncate_chars(&self.meaning, max_chars)
    }

    /// True when an example sentence is available.
    pub fn has_examples(&self) -> bool {
        !self.sentence.is_empty()
    }
}

/// Quote of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOfTheDay {
    /// Upstream id
    #[serde(deserialize_with = "de::required_i64")]
    pub id: i64,
    /// Quote text
    #[serde(deserialize_with = "de::required_string")]
    pub quote: String,
    /// Author or work quoted
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub source: String,
}

impl QuoteOfTheDay {
    /// Quote cut to `max_chars` characters.
    pub fn short_quote(&self, max_chars: usize) -> String {
        truncate_chars(&self.quote, max_chars)
    }

    /// `short quote - source`.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.short_quote(50), self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_word_of_the_day() {
        let wotd: WordOfTheDay = serde_json::from_value(json!({
            "id": 3,
            "word": "serendipity",
            "meaning": "finding something good without looking for it",
            "type": "n."
        }))
        .unwrap();

        assert_eq!(wotd.summary(), "serendipity (n.)");
        assert_eq!(wotd.short_definition(7), "finding...");
        assert!(!wotd.has_examples());
    }

    #[test]
    fn test_word_is_required() {
        assert!(serde_json::from_value::<WordOfTheDay>(json!({"id": 1, "meaning": "x"})).is_err());
    }

    #[test]
    fn test_quote_summary() {
        let qotd: QuoteOfTheDay = serde_json::from_value(json!({
            "id": 9,
            "quote": "学而不思则罔",
            "source": "论语"
        }))
        .unwrap();
        assert_eq!(qotd.summary(), "学而不思则罔 - 论语");
    }
}
