pub mod book;
pub mod cache;
pub mod collection;
pub mod config;
pub mod daily;
pub mod de;
pub mod envelope;
pub mod format;
pub mod history;
pub mod listing;
pub mod reading;
pub mod request;

pub use book::Book;
pub use cache::CacheEntry;
pub use collection::CollectionStats;
pub use config::{
    AggregatorConfig, CacheConfig, Config, LoggingConfig, RetryConfig, RotationPolicy,
    UpstreamConfig,
};
pub use daily::{QuoteOfTheDay, WordOfTheDay};
pub use envelope::Envelope;
pub use history::{TodaysBooks, VisitHistory};
pub use listing::{BookListPage, Pagination, SearchResult};
pub use reading::{ReadingReview, ReadingReviewPage, ReadingSummary};
pub use request::{CachePolicy, HttpMethod, QueryValue, RequestSpec};
