//! RSYWX Gateway - client for the RSYWX book collection API
//!
//! The gateway issues calls to the collection API, fans batches of
//! independent calls out concurrently, retries transient failures with
//! exponential backoff, memoizes successful responses in a short-lived
//! cache, and decodes the upstream's JSON envelopes into typed records.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): errors, models and port traits
//! - **Service Layer** (`services`): retry, cache, fan-out and decoding
//! - **Infrastructure Layer** (`infrastructure`): HTTP, cache store, config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use rsywx_gateway::{ConfigLoader, GatewayClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let client = GatewayClient::new(&config)?;
//!     let home = client.home_page(false).await;
//!     println!("{} failed sections", home.failed_sections.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CacheError, GatewayError, GatewayResult, TransportFailureKind};
pub use domain::models::{
    Book, BookListPage, CachePolicy, CollectionStats, Config, Envelope, HttpMethod,
    QuoteOfTheDay, ReadingReview, ReadingReviewPage, ReadingSummary, RequestSpec, SearchResult,
    TodaysBooks, VisitHistory, WordOfTheDay,
};
pub use domain::ports::{CacheStore, Clock, Transport};
pub use infrastructure::cache::MokaCacheStore;
pub use infrastructure::clock::{ManualClock, SystemClock};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::http::HttpTransport;
pub use infrastructure::logging::LoggerImpl;
pub use services::{
    AggregateResult, Aggregator, DomainRecord, GatewayClient, HomePage, RecordKind,
    RecordMapper, ResponseCache, RetryExecutor, RetryPolicy,
};
