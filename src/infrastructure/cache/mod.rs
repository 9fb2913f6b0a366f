//! In-memory caching layer for upstream responses.
//!
//! Uses `moka` for concurrent storage with per-entry eviction. Freshness
//! is decided by the response cache service, not by the store.

pub mod moka_store;

pub use moka_store::MokaCacheStore;
