//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the gateway services depend on:
//! - Transport: one HTTP call to the upstream
//! - CacheStore: storage behind the response cache
//! - Clock: wall-clock time for expiry and date-scoped keys
//!
//! Infrastructure adapters implement these; tests substitute their own.

pub mod cache_store;
pub mod clock;
pub mod transport;

pub use cache_store::CacheStore;
pub use clock::Clock;
pub use transport::Transport;
