//! Typed facade over the gateway pipeline.
//!
//! Single operations return `Option`/`Vec` and log failures, so a caller
//! can render a degraded view. Batches return every outcome as a value.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{
    Book, BookListPage, CachePolicy, CollectionStats, Config, Envelope, QuoteOfTheDay,
    ReadingReview, ReadingReviewPage, ReadingSummary, RequestSpec, SearchResult, TodaysBooks,
    VisitHistory, WordOfTheDay,
};
use crate::domain::ports::{CacheStore, Clock, Transport};
use crate::infrastructure::cache::MokaCacheStore;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::http::HttpTransport;
use crate::services::aggregator::{AggregateResult, Aggregator};
use crate::services::cache_layer::ResponseCache;
use crate::services::pipeline::RequestPipeline;
use crate::services::record_mapper::{DomainRecord, RecordKind, RecordMapper};
use crate::services::retry::{RetryExecutor, RetryPolicy};

/// Number of latest books on the home page.
const HOME_LATEST_COUNT: u32 = 1;
/// Number of random books on the home page.
const HOME_RANDOM_COUNT: u32 = 4;
/// Number of forgotten books on the home page.
const HOME_FORGOTTEN_COUNT: u32 = 1;
/// Number of recently visited books on the home page.
const HOME_RECENT_COUNT: u32 = 1;
/// Number of latest reading reviews on the home page.
const HOME_READINGS_COUNT: u32 = 10;

/// Everything the home page renders, each section independent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomePage {
    /// Collection statistics
    pub stats: Option<CollectionStats>,
    /// Latest acquisitions
    pub latest: Vec<Book>,
    /// Random picks
    pub random: Vec<Book>,
    /// Books not visited for a long time
    pub forgotten: Vec<Book>,
    /// Recently visited books
    pub recent: Vec<Book>,
    /// Word of the day
    pub word_of_the_day: Option<WordOfTheDay>,
    /// Quote of the day
    pub quote_of_the_day: Option<QuoteOfTheDay>,
    /// Reading statistics
    pub reading_summary: Option<ReadingSummary>,
    /// Latest reading reviews
    pub latest_readings: Vec<ReadingReview>,
    /// Sections that could not be fetched or decoded
    pub failed_sections: Vec<String>,
}

/// Client for the collection API.
#[derive(Clone)]
pub struct GatewayClient {
    pipeline: Arc<RequestPipeline>,
    aggregator: Aggregator,
    list_ttl: Duration,
}

impl GatewayClient {
    /// Build a client from configuration with the HTTP transport, an
    /// in-process cache and the system clock.
    pub fn new(config: &Config) -> GatewayResult<Self> {
        let transport = HttpTransport::new(&config.upstream)?;
        let store = MokaCacheStore::with_capacity(config.cache.max_capacity);
        Ok(Self::with_components(
            Arc::new(transport),
            Arc::new(store),
            Arc::new(SystemClock),
            config,
        ))
    }

    /// Build a client over explicit ports.
    pub fn with_components(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        let cache = if config.cache.enabled {
            ResponseCache::new(store, clock)
        } else {
            ResponseCache::disabled(store, clock)
        };
        let retry = RetryExecutor::new(transport, RetryPolicy::from(&config.retry));
        let pipeline = Arc::new(RequestPipeline::new(
            cache,
            retry,
            config.cache.default_ttl(),
        ));
        let aggregator = Aggregator::from_config(Arc::clone(&pipeline), &config.aggregator);

        Self {
            pipeline,
            aggregator,
            list_ttl: config.cache.list_ttl(),
        }
    }

    /// Execute one request through cache and retry.
    pub async fn execute(&self, spec: &RequestSpec) -> GatewayResult<Envelope> {
        self.pipeline.run(spec).await
    }

    /// Execute a keyed batch concurrently. Every key appears in the result.
    pub async fn run_batch(&self, specs: BTreeMap<String, RequestSpec>) -> AggregateResult {
        self.aggregator.fan_out(specs).await
    }

    /// Execute a keyed batch and decode each outcome as its record kind.
    pub async fn fetch_records(
        &self,
        specs: BTreeMap<String, (RequestSpec, RecordKind)>,
    ) -> BTreeMap<String, GatewayResult<DomainRecord>> {
        let kinds: BTreeMap<String, RecordKind> = specs
            .iter()
            .map(|(key, (_, kind))| (key.clone(), *kind))
            .collect();
        let mut outcomes = self
            .run_batch(specs.into_iter().map(|(key, (spec, _))| (key, spec)).collect())
            .await;

        kinds
            .into_iter()
            .map(|(key, kind)| {
                let record = outcomes
                    .remove(&key)
                    .unwrap_or_else(|| {
                        Err(GatewayError::DecodeFailure(format!("no outcome for {key}")))
                    })
                    .and_then(|envelope| RecordMapper::decode_envelope(kind, envelope));
                (key, record)
            })
            .collect()
    }

    /// Fetch and decode one record, surfacing the failure.
    pub async fn fetch_typed<T: DeserializeOwned>(
        &self,
        kind: RecordKind,
        spec: &RequestSpec,
    ) -> GatewayResult<T> {
        let envelope = self.pipeline.run(spec).await?;
        let payload = RecordMapper::payload(kind, envelope)?;
        RecordMapper::decode_as(kind, &payload)
    }

    async fn fetch_record<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        kind: RecordKind,
        spec: RequestSpec,
    ) -> Option<T> {
        match self.fetch_typed(kind, &spec).await {
            Ok(record) => Some(record),
            Err(err) => {
                error!(operation, method = %spec.method, path = %spec.path, error = %err, "operation failed");
                None
            }
        }
    }

    fn list_cache(&self) -> CachePolicy {
        CachePolicy::Ttl(self.list_ttl)
    }

    fn status_spec(refresh: bool) -> RequestSpec {
        RequestSpec::get("/books/status").with_refresh(refresh)
    }

    fn book_details_spec(segment: &str) -> RequestSpec {
        RequestSpec::get(format!("/books/{segment}"))
    }

    fn latest_books_spec(&self, count: u32, refresh: bool) -> RequestSpec {
        RequestSpec::get(format!("/books/latest/{count}"))
            .with_refresh(refresh)
            .with_cache(self.list_cache())
    }

    fn random_books_spec(count: u32, refresh: bool) -> RequestSpec {
        RequestSpec::get(format!("/books/random/{count}"))
            .with_refresh(refresh)
            .with_cache(CachePolicy::Bypass)
    }

    fn forgotten_books_spec(&self, count: u32, refresh: bool) -> RequestSpec {
        RequestSpec::get(format!("/books/forgotten/{count}"))
            .with_refresh(refresh)
            .with_cache(self.list_cache())
    }

    fn recently_visited_spec(&self, count: u32, refresh: bool) -> RequestSpec {
        RequestSpec::get("/books/last_visited")
            .with_query("count", count)
            .with_refresh(refresh)
            .with_cache(self.list_cache())
    }

    fn word_of_the_day_spec(refresh: bool) -> RequestSpec {
        RequestSpec::get("/misc/wotd")
            .with_refresh(refresh)
            .with_cache(CachePolicy::Daily)
    }

    fn quote_of_the_day_spec(refresh: bool) -> RequestSpec {
        RequestSpec::get("/misc/qotd")
            .with_refresh(refresh)
            .with_cache(CachePolicy::Daily)
    }

    fn reading_summary_spec(&self, refresh: bool) -> RequestSpec {
        RequestSpec::get("/readings/summary")
            .with_refresh(refresh)
            .with_cache(self.list_cache())
    }

    fn latest_readings_spec(&self, count: u32, refresh: bool) -> RequestSpec {
        RequestSpec::get(format!("/readings/latest/{count}"))
            .with_refresh(refresh)
            .with_cache(self.list_cache())
    }

    /// Collection statistics.
    pub async fn collection_status(&self, refresh: bool) -> Option<CollectionStats> {
        self.fetch_record(
            "collection_status",
            RecordKind::CollectionStats,
            Self::status_spec(refresh),
        )
        .await
    }

    /// One book by catalogue number.
    pub async fn book_details(&self, book_id: &str, refresh: bool) -> Option<Book> {
        let segment = checked_segment("book_details", book_id)?;
        self.fetch_record(
            "book_details",
            RecordKind::Book,
            Self::book_details_spec(&segment).with_refresh(refresh),
        )
        .await
    }

    /// Books related to `book_id`.
    pub async fn related_books(&self, book_id: &str, count: u32, refresh: bool) -> Vec<Book> {
        let Some(segment) = checked_segment("related_books", book_id) else {
            return Vec::new();
        };
        let spec = RequestSpec::get(format!("/books/{segment}/related/{count}"))
            .with_refresh(refresh)
            .with_cache(self.list_cache());
        self.fetch_record("related_books", RecordKind::Books, spec)
            .await
            .unwrap_or_default()
    }

    /// Most recently acquired books.
    pub async fn latest_books(&self, count: u32, refresh: bool) -> Vec<Book> {
        self.fetch_record(
            "latest_books",
            RecordKind::Books,
            self.latest_books_spec(count, refresh),
        )
        .await
        .unwrap_or_default()
    }

    /// Random picks. Never cached.
    pub async fn random_books(&self, count: u32, refresh: bool) -> Vec<Book> {
        self.fetch_record(
            "random_books",
            RecordKind::Books,
            Self::random_books_spec(count, refresh),
        )
        .await
        .unwrap_or_default()
    }

    /// Books not visited for the longest time.
    pub async fn forgotten_books(&self, count: u32, refresh: bool) -> Vec<Book> {
        self.fetch_record(
            "forgotten_books",
            RecordKind::Books,
            self.forgotten_books_spec(count, refresh),
        )
        .await
        .unwrap_or_default()
    }

    /// Most recently visited books.
    pub async fn recently_visited_books(&self, count: u32, refresh: bool) -> Vec<Book> {
        self.fetch_record(
            "recently_visited_books",
            RecordKind::Books,
            self.recently_visited_spec(count, refresh),
        )
        .await
        .unwrap_or_default()
    }

    /// Books acquired on today's date in earlier years, with the
    /// upstream's date description. The cache entry is keyed by date and
    /// expires at local midnight.
    pub async fn todays_books(&self, refresh: bool) -> TodaysBooks {
        let spec = RequestSpec::get("/books/today")
            .with_refresh(refresh)
            .with_cache(CachePolicy::Daily);
        self.fetch_record("todays_books", RecordKind::TodaysBooks, spec)
            .await
            .unwrap_or_default()
    }

    /// Books acquired on `month`/`day` in any year.
    pub async fn books_for_date(&self, month: u32, day: u32, refresh: bool) -> Vec<Book> {
        let spec = RequestSpec::get(format!("/books/today/{month}/{day}")).with_refresh(refresh);
        self.fetch_record("books_for_date", RecordKind::Books, spec)
            .await
            .unwrap_or_default()
    }

    /// Search by `kind` (title, author, tag, ...). Page 1 is implicit.
    pub async fn search_books(&self, kind: &str, value: &str, page: u32) -> Option<SearchResult> {
        let mut path = format!("/books/search/{}", checked_segment("search_books", kind)?);
        if !value.is_empty() {
            path.push('/');
            path.push_str(&checked_segment("search_books", value)?);
        }
        if page > 1 {
            path = format!("{path}/{page}");
        }
        let spec = RequestSpec::get(path).with_cache(self.list_cache());
        self.fetch_record("search_books", RecordKind::SearchResult, spec)
            .await
    }

    /// Browse listing filtered by `kind` = `value`.
    pub async fn books_list(&self, kind: &str, value: &str, page: u32) -> Option<BookListPage> {
        let value = if value.is_empty() { "-" } else { value };
        let spec = RequestSpec::get(format!(
            "/books/list/{}/{}/{}",
            checked_segment("books_list", kind)?,
            checked_segment("books_list", value)?,
            page.max(1)
        ))
        .with_cache(self.list_cache());
        self.fetch_record("books_list", RecordKind::BookListPage, spec)
            .await
    }

    /// Visit statistics over the last `days` days.
    pub async fn visit_history(&self, days: u32, refresh: bool) -> Option<VisitHistory> {
        let spec = RequestSpec::get("/books/visit_history")
            .with_query("days", days)
            .with_refresh(refresh)
            .with_cache(self.list_cache());
        self.fetch_record("visit_history", RecordKind::VisitHistory, spec)
            .await
    }

    /// Word of the day, cached per calendar day.
    pub async fn word_of_the_day(&self, refresh: bool) -> Option<WordOfTheDay> {
        self.fetch_record(
            "word_of_the_day",
            RecordKind::WordOfTheDay,
            Self::word_of_the_day_spec(refresh),
        )
        .await
    }

    /// Quote of the day, cached per calendar day.
    pub async fn quote_of_the_day(&self, refresh: bool) -> Option<QuoteOfTheDay> {
        self.fetch_record(
            "quote_of_the_day",
            RecordKind::QuoteOfTheDay,
            Self::quote_of_the_day_spec(refresh),
        )
        .await
    }

    /// Reading statistics.
    pub async fn reading_summary(&self, refresh: bool) -> Option<ReadingSummary> {
        self.fetch_record(
            "reading_summary",
            RecordKind::ReadingSummary,
            self.reading_summary_spec(refresh),
        )
        .await
    }

    /// Latest reading reviews.
    pub async fn latest_readings(&self, count: u32, refresh: bool) -> Vec<ReadingReview> {
        self.fetch_record(
            "latest_readings",
            RecordKind::ReadingReviews,
            self.latest_readings_spec(count, refresh),
        )
        .await
        .unwrap_or_default()
    }

    /// One page of reading reviews.
    pub async fn reading_reviews(&self, page: u32, refresh: bool) -> Option<ReadingReviewPage> {
        let spec = RequestSpec::get(format!("/readings/reviews/{}", page.max(1)))
            .with_refresh(refresh)
            .with_cache(self.list_cache());
        self.fetch_record("reading_reviews", RecordKind::ReadingReviewPage, spec)
            .await
    }

    /// Attach tags to a book. Never cached; a successful write drops the
    /// book's cached details.
    pub async fn add_tags(&self, book_id: &str, tags: &[String]) -> GatewayResult<Envelope> {
        let log_failure = |err: &GatewayError| {
            error!(operation = "add_tags", book_id, error = %err, "operation failed");
        };
        let segment = path_segment(book_id).inspect_err(log_failure)?;
        let spec = RequestSpec::post(format!("/books/{segment}/tags"), json!({ "tags": tags }));
        let envelope = self.pipeline.run(&spec).await.inspect_err(log_failure)?;

        if envelope.success {
            if let Some((key, _)) = self.pipeline.cache_slot(&Self::book_details_spec(&segment)) {
                self.pipeline.cache().invalidate(&key).await;
            }
            info!(book_id, tags = tags.len(), "tags added");
        }
        Ok(envelope)
    }

    /// The home page batch: every section fetched concurrently, each
    /// failure confined to its own section.
    pub async fn home_page(&self, refresh: bool) -> HomePage {
        let specs: BTreeMap<String, (RequestSpec, RecordKind)> = [
            ("stats", Self::status_spec(refresh), RecordKind::CollectionStats),
            ("latest", self.latest_books_spec(HOME_LATEST_COUNT, refresh), RecordKind::Books),
            ("random", Self::random_books_spec(HOME_RANDOM_COUNT, refresh), RecordKind::Books),
            ("forgotten", self.forgotten_books_spec(HOME_FORGOTTEN_COUNT, refresh), RecordKind::Books),
            ("recent", self.recently_visited_spec(HOME_RECENT_COUNT, refresh), RecordKind::Books),
            ("wotd", Self::word_of_the_day_spec(refresh), RecordKind::WordOfTheDay),
            ("qotd", Self::quote_of_the_day_spec(refresh), RecordKind::QuoteOfTheDay),
            ("reading_summary", self.reading_summary_spec(refresh), RecordKind::ReadingSummary),
            ("latest_readings", self.latest_readings_spec(HOME_READINGS_COUNT, refresh), RecordKind::ReadingReviews),
        ]
        .into_iter()
        .map(|(key, spec, kind)| (key.to_string(), (spec, kind)))
        .collect();

        let mut page = HomePage::default();
        for (key, record) in self.fetch_records(specs).await {
            match record {
                Ok(DomainRecord::CollectionStats(stats)) => page.stats = Some(stats),
                Ok(DomainRecord::Books(books)) => match key.as_str() {
                    "latest" => page.latest = books,
                    "random" => page.random = books,
                    "forgotten" => page.forgotten = books,
                    _ => page.recent = books,
                },
                Ok(DomainRecord::WordOfTheDay(word)) => page.word_of_the_day = Some(word),
                Ok(DomainRecord::QuoteOfTheDay(quote)) => page.quote_of_the_day = Some(quote),
                Ok(DomainRecord::ReadingSummary(summary)) => page.reading_summary = Some(summary),
                Ok(DomainRecord::ReadingReviews(reviews)) => page.latest_readings = reviews,
                Ok(_) => {}
                Err(err) => {
                    error!(section = %key, error = %err, "home page section failed");
                    page.failed_sections.push(key);
                }
            }
        }
        page
    }
}

/// Percent-encode `value` as a single path segment.
///
/// Empty and dot segments are rejected: URL normalization drops or
/// resolves them, even percent-encoded, so the request would reach a
/// different endpoint.
fn path_segment(value: &str) -> GatewayResult<String> {
    if matches!(value, "" | "." | "..") {
        return Err(GatewayError::InvalidRequest(format!(
            "{value:?} is not a usable path segment"
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// Encoded segment for `operation`, or `None` after logging the rejection.
fn checked_segment(operation: &'static str, value: &str) -> Option<String> {
    path_segment(value)
        .inspect_err(|err| error!(operation, error = %err, "operation failed"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::services::test_support::{noon, upstream, ScriptedTransport};
    use serde_json::Value;

    fn config() -> Config {
        let mut config = Config::default();
        config.retry.base_backoff_ms = 1;
        config.retry.max_backoff_ms = 10;
        config
    }

    fn client(transport: &Arc<ScriptedTransport>) -> GatewayClient {
        GatewayClient::with_components(
            transport.clone(),
            Arc::new(MokaCacheStore::new()),
            Arc::new(ManualClock::new(noon())),
            &config(),
        )
    }

    fn book(id: i64) -> Value {
        json!({"id": id, "bookid": format!("{id:05}"), "title": format!("Book {id}")})
    }

    const WEICHENG: &str = "%E5%9B%B4%E5%9F%8E";

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("a/b c").unwrap(), "a%2Fb%20c");
        assert_eq!(path_segment("a\\b").unwrap(), "a%5Cb");
        assert_eq!(path_segment("a+b&c=d").unwrap(), "a%2Bb%26c%3Dd");
        assert_eq!(path_segment("围城").unwrap(), WEICHENG);
        assert_eq!(path_segment("v1.2").unwrap(), "v1.2");
    }

    #[test]
    fn test_path_segment_rejects_empty_and_dot_segments() {
        for value in ["", ".", ".."] {
            assert!(matches!(
                path_segment(value),
                Err(GatewayError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_encoded_segment_stays_one_url_segment() {
        for value in ["a\\b", "a/b", "a?b#c", "..a", "%2e%2e"] {
            let segment = path_segment(value).unwrap();
            let url =
                reqwest::Url::parse(&format!("http://upstream/books/search/title/{segment}"))
                    .unwrap();
            let segments: Vec<&str> = url.path_segments().unwrap().collect();
            assert_eq!(segments, vec!["books", "search", "title", segment.as_str()]);
        }
    }

    #[tokio::test]
    async fn test_unusable_segments_send_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = client(&transport);

        assert!(client.book_details("..", false).await.is_none());
        assert!(client.related_books(".", 5, false).await.is_empty());
        assert!(client.search_books("title", "..", 1).await.is_none());
        assert!(client.books_list("..", "x", 1).await.is_none());
        assert!(matches!(
            client.add_tags("..", &["x".to_string()]).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_single_operation_returns_none_on_failure() {
        let transport =
            Arc::new(ScriptedTransport::new().always("/books/00001", Err(upstream(404))));
        let client = client(&transport);
        assert!(client.book_details("00001", false).await.is_none());
        assert!(client.latest_books(5, false).await.is_empty());
    }

    #[tokio::test]
    async fn test_book_details_cached() {
        let transport = Arc::new(
            ScriptedTransport::new().always("/books/00001", Ok(Envelope::ok(book(1)))),
        );
        let client = client(&transport);

        let first = client.book_details("00001", false).await.unwrap();
        let second = client.book_details("00001", false).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.calls("/books/00001"), 1);

        client.book_details("00001", true).await.unwrap();
        assert_eq!(transport.calls("/books/00001"), 2);
    }

    #[tokio::test]
    async fn test_random_books_never_cached() {
        let transport = Arc::new(ScriptedTransport::new().always(
            "/books/random/2",
            Ok(Envelope::ok(json!([book(1), book(2)]))),
        ));
        let client = client(&transport);

        assert_eq!(client.random_books(2, false).await.len(), 2);
        assert_eq!(client.random_books(2, false).await.len(), 2);
        assert_eq!(transport.calls("/books/random/2"), 2);
    }

    #[tokio::test]
    async fn test_todays_books_reads_top_level_books() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true, "books": [book(3)]})).unwrap();
        let transport = Arc::new(ScriptedTransport::new().always("/books/today", Ok(envelope)));
        let today = client(&transport).todays_books(false).await;
        assert_eq!(today.books.len(), 1);
        assert_eq!(today.books[0].id, 3);
        assert!(today.date_info.is_none());
    }

    #[tokio::test]
    async fn test_todays_books_keeps_date_info() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "data": [book(4)],
            "date_info": {"formatted": "5月1日"},
            "cached": true
        }))
        .unwrap();
        let transport = Arc::new(ScriptedTransport::new().always("/books/today", Ok(envelope)));
        let today = client(&transport).todays_books(false).await;
        assert_eq!(today.books[0].id, 4);
        assert_eq!(today.date_label(), Some("5月1日"));
        assert!(today.cached);
    }

    #[tokio::test]
    async fn test_related_books_cached_with_list_ttl() {
        let transport = Arc::new(ScriptedTransport::new().always(
            "/books/00001/related/3",
            Ok(Envelope::ok(json!([book(2), book(3)]))),
        ));
        let client = client(&transport);

        assert_eq!(client.related_books("00001", 3, false).await.len(), 2);
        assert_eq!(client.related_books("00001", 3, false).await.len(), 2);
        assert_eq!(transport.calls("/books/00001/related/3"), 1);

        client.related_books("00001", 3, true).await;
        assert_eq!(transport.calls("/books/00001/related/3"), 2);
    }

    #[tokio::test]
    async fn test_visit_history() {
        let transport = Arc::new(ScriptedTransport::new().always(
            "/books/visit_history",
            Ok(Envelope::ok(json!({
                "visit_history": [{"date": "2024-05-01", "count": 12}],
                "datasets": [{"label": "visits"}, {"label": "books"}]
            }))),
        ));
        let client = client(&transport);

        let history = client.visit_history(30, false).await.unwrap();
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.datasets().len(), 2);

        client.visit_history(30, false).await.unwrap();
        assert_eq!(transport.calls("/books/visit_history"), 1);
        client.visit_history(7, false).await.unwrap();
        assert_eq!(transport.calls("/books/visit_history"), 2);
    }

    #[tokio::test]
    async fn test_visit_history_none_on_failure() {
        let transport = Arc::new(
            ScriptedTransport::new().always("/books/visit_history", Err(upstream(500))),
        );
        assert!(client(&transport).visit_history(30, false).await.is_none());
    }

    #[tokio::test]
    async fn test_search_path_shape() {
        let result = json!({"books": [book(1)], "total_count": 1});
        let first = format!("/books/search/title/{WEICHENG}");
        let second = format!("{first}/2");
        let transport = Arc::new(
            ScriptedTransport::new()
                .always(&first, Ok(Envelope::ok(result.clone())))
                .always(&second, Ok(Envelope::ok(result))),
        );
        let client = client(&transport);

        assert!(client.search_books("title", "围城", 1).await.unwrap().has_results());
        assert!(client.search_books("title", "围城", 2).await.is_some());
        assert_eq!(transport.calls(&first), 1);
        assert_eq!(transport.calls(&second), 1);
    }

    #[tokio::test]
    async fn test_books_list_page() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "data": [book(1), book(2)],
            "pagination": {"current_page": 1, "total_pages": 3, "total": 42}
        }))
        .unwrap();
        let transport =
            Arc::new(ScriptedTransport::new().always("/books/list/author/-/1", Ok(envelope)));

        let page = client(&transport).books_list("author", "", 0).await.unwrap();
        assert_eq!(page.books.len(), 2);
        assert_eq!(page.pagination.next_page(), Some(2));
    }

    #[tokio::test]
    async fn test_add_tags_invalidates_details() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .always("/books/00001", Ok(Envelope::ok(book(1))))
                .always("/books/00001/tags", Ok(Envelope::ok(json!({"added": 2})))),
        );
        let client = client(&transport);

        client.book_details("00001", false).await.unwrap();
        let tags = vec!["小说".to_string(), "经典".to_string()];
        assert!(client.add_tags("00001", &tags).await.unwrap().success);
        client.book_details("00001", false).await.unwrap();

        assert_eq!(transport.calls("/books/00001"), 2);
        assert_eq!(transport.calls("/books/00001/tags"), 1);
    }

    #[tokio::test]
    async fn test_add_tags_is_not_retried_on_client_error() {
        let transport =
            Arc::new(ScriptedTransport::new().always("/books/00001/tags", Err(upstream(422))));
        let result = client(&transport).add_tags("00001", &["x".to_string()]).await;
        assert_eq!(result, Err(upstream(422)));
        assert_eq!(transport.calls("/books/00001/tags"), 1);
    }

    #[tokio::test]
    async fn test_home_page_isolates_failed_sections() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .always(
                    "/books/status",
                    Ok(Envelope::ok(json!({"total_books": 8000, "total_authors": 2000}))),
                )
                .always("/books/latest/1", Ok(Envelope::ok(json!([book(9)]))))
                .always("/books/random/4", Ok(Envelope::ok(json!([book(1), book(2)]))))
                .always("/books/forgotten/1", Err(upstream(500)))
                .always("/books/last_visited", Ok(Envelope::ok(json!([book(4)]))))
                .always("/misc/wotd", Ok(Envelope::ok(json!({"id": 1, "word": "书"}))))
                .always("/misc/qotd", Ok(Envelope::ok(json!({"id": 2}))))
                .always("/readings/summary", Ok(Envelope::ok(json!({"total_reviews": 3}))))
                .always("/readings/latest/10", Ok(Envelope::ok(json!([{"title": "读后感"}])))),
        );

        let page = client(&transport).home_page(false).await;

        assert_eq!(page.stats.as_ref().map(|s| s.total_books), Some(8000));
        assert_eq!(page.latest[0].id, 9);
        assert_eq!(page.random.len(), 2);
        assert!(page.forgotten.is_empty());
        assert_eq!(page.recent[0].id, 4);
        assert_eq!(page.word_of_the_day.unwrap().word, "书");
        // quote without text fails decoding
        assert!(page.quote_of_the_day.is_none());
        assert_eq!(page.reading_summary.unwrap().get_i64("total_reviews"), 3);
        assert_eq!(page.latest_readings.len(), 1);

        let mut failed = page.failed_sections.clone();
        failed.sort();
        assert_eq!(failed, vec!["forgotten".to_string(), "qotd".to_string()]);
        assert_eq!(transport.calls("/books/forgotten/1"), 3);
    }
}
