//! Decoding of upstream payloads into typed records.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{
    Book, BookListPage, CollectionStats, Envelope, QuoteOfTheDay, ReadingReview,
    ReadingReviewPage, ReadingSummary, SearchResult, TodaysBooks, VisitHistory, WordOfTheDay,
};

/// Record shapes the upstream returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A single book
    Book,
    /// A list of books
    Books,
    /// Collection statistics
    CollectionStats,
    /// Word of the day
    WordOfTheDay,
    /// Quote of the day
    QuoteOfTheDay,
    /// Search result page
    SearchResult,
    /// Browse listing page
    BookListPage,
    /// Reading statistics
    ReadingSummary,
    /// A list of reading reviews
    ReadingReviews,
    /// Reading review page
    ReadingReviewPage,
    /// Books acquired on this day in earlier years
    TodaysBooks,
    /// Visit statistics
    VisitHistory,
}

impl RecordKind {
    /// Kind name used in decode messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Books => "book list",
            Self::CollectionStats => "collection stats",
            Self::WordOfTheDay => "word of the day",
            Self::QuoteOfTheDay => "quote of the day",
            Self::SearchResult => "search result",
            Self::BookListPage => "book list page",
            Self::ReadingSummary => "reading summary",
            Self::ReadingReviews => "reading reviews",
            Self::ReadingReviewPage => "reading review page",
            Self::TodaysBooks => "today's books",
            Self::VisitHistory => "visit history",
        }
    }

    /// True for kinds whose pagination sits beside `data` in the envelope.
    pub const fn is_paged(self) -> bool {
        matches!(self, Self::BookListPage | Self::ReadingReviewPage)
    }

    /// Field a bare list payload is placed under for kinds decoded from
    /// the whole envelope, or `None` for kinds read from `data` alone.
    pub const fn merged_list_field(self) -> Option<&'static str> {
        match self {
            Self::TodaysBooks => Some("books"),
            Self::VisitHistory => Some("visit_history"),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainRecord {
    /// A single book
    Book(Box<Book>),
    /// A list of books
    Books(Vec<Book>),
    /// Collection statistics
    CollectionStats(CollectionStats),
    /// Word of the day
    WordOfTheDay(WordOfTheDay),
    /// Quote of the day
    QuoteOfTheDay(QuoteOfTheDay),
    /// Search result page
    SearchResult(SearchResult),
    /// Browse listing page
    BookListPage(BookListPage),
    /// Reading statistics
    ReadingSummary(ReadingSummary),
    /// A list of reading reviews
    ReadingReviews(Vec<ReadingReview>),
    /// Reading review page
    ReadingReviewPage(ReadingReviewPage),
    /// Books acquired on this day in earlier years
    TodaysBooks(TodaysBooks),
    /// Visit statistics
    VisitHistory(VisitHistory),
}

/// Stateless payload decoder.
///
/// Identity fields missing or blank fail the whole record; every other
/// field falls back to its default. A list fails if any element fails.
pub struct RecordMapper;

impl RecordMapper {
    /// Decode `payload` as `kind`.
    pub fn decode(kind: RecordKind, payload: &Value) -> GatewayResult<DomainRecord> {
        Ok(match kind {
            RecordKind::Book => DomainRecord::Book(Box::new(Self::decode_as(kind, payload)?)),
            RecordKind::Books => DomainRecord::Books(Self::decode_as(kind, payload)?),
            RecordKind::CollectionStats => DomainRecord::CollectionStats(Self::decode_as(kind, payload)?),
            RecordKind::WordOfTheDay => DomainRecord::WordOfTheDay(Self::decode_as(kind, payload)?),
            RecordKind::QuoteOfTheDay => DomainRecord::QuoteOfTheDay(Self::decode_as(kind, payload)?),
            RecordKind::SearchResult => DomainRecord::SearchResult(Self::decode_as(kind, payload)?),
            RecordKind::BookListPage => DomainRecord::BookListPage(Self::decode_as(kind, payload)?),
            RecordKind::ReadingSummary => DomainRecord::ReadingSummary(Self::decode_as(kind, payload)?),
            RecordKind::ReadingReviews => DomainRecord::ReadingReviews(Self::decode_as(kind, payload)?),
            RecordKind::ReadingReviewPage => DomainRecord::ReadingReviewPage(Self::decode_as(kind, payload)?),
            RecordKind::TodaysBooks => DomainRecord::TodaysBooks(Self::decode_as(kind, payload)?),
            RecordKind::VisitHistory => DomainRecord::VisitHistory(Self::decode_as(kind, payload)?),
        })
    }

    /// Extract the payload of `envelope` in the layout `kind` expects and
    /// decode it.
    pub fn decode_envelope(kind: RecordKind, envelope: Envelope) -> GatewayResult<DomainRecord> {
        let payload = Self::payload(kind, envelope)?;
        Self::decode(kind, &payload)
    }

    /// Extract the payload of `envelope` for `kind` without decoding it.
    pub fn payload(kind: RecordKind, envelope: Envelope) -> GatewayResult<Value> {
        if kind.is_paged() {
            envelope.into_paged_payload()
        } else if let Some(list_field) = kind.merged_list_field() {
            envelope.into_merged_payload(list_field)
        } else {
            envelope.into_payload()
        }
    }

    /// Decode `payload` directly into `T`, reporting failures against `kind`.
    pub fn decode_as<T: DeserializeOwned>(kind: RecordKind, payload: &Value) -> GatewayResult<T> {
        let payload = match kind {
            RecordKind::Books => list_items(payload, "books"),
            RecordKind::ReadingReviews => list_items(payload, "reviews"),
            _ => payload,
        };
        T::deserialize(payload)
            .map_err(|err| GatewayError::DecodeFailure(format!("{kind}: {err}")))
    }
}

/// List payloads arrive either as a bare array or wrapped in an object
/// under `field` (or `data`).
fn list_items<'a>(payload: &'a Value, field: &str) -> &'a Value {
    match payload {
        Value::Object(fields) => fields
            .get(field)
            .or_else(|| fields.get("data"))
            .unwrap_or(payload),
        _ => payload,
    }
}
