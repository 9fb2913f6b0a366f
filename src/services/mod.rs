//! Service layer: the request pipeline and the typed client built on it.
//!
//! Control flow for one unit of work:
//! `Aggregator` (batches) -> `RequestPipeline` -> `ResponseCache` ->
//! `RetryExecutor` -> `Transport`, with `RecordMapper` decoding the
//! resulting envelopes into typed records.

pub mod aggregator;
pub mod cache_layer;
pub mod gateway;
pub mod pipeline;
pub mod record_mapper;
pub mod retry;

#[cfg(test)]
mod test_support;

pub use aggregator::{AggregateResult, Aggregator};
pub use cache_layer::ResponseCache;
pub use gateway::{GatewayClient, HomePage};
pub use pipeline::RequestPipeline;
pub use record_mapper::{DomainRecord, RecordKind, RecordMapper};
pub use retry::{RetryExecutor, RetryPolicy};
