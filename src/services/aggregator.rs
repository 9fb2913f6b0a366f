//! Concurrent fan-out of a keyed batch with fan-in into a result map.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::errors::{GatewayError, GatewayResult, TransportFailureKind};
use crate::domain::models::{AggregatorConfig, Envelope, RequestSpec};
use crate::services::pipeline::RequestPipeline;

/// Outcome of every unit in a batch, keyed by the caller's names.
///
/// Every submitted key is present exactly once.
pub type AggregateResult = BTreeMap<String, GatewayResult<Envelope>>;

/// Runs each spec of a batch as its own task and waits for all of them.
///
/// A failing unit never stops its siblings. A unit exceeding the per-unit
/// timeout, or still running when the batch deadline passes, is recorded
/// as a timeout failure.
#[derive(Clone)]
pub struct Aggregator {
    pipeline: Arc<RequestPipeline>,
    unit_timeout: Option<Duration>,
    batch_deadline: Option<Duration>,
}

impl Aggregator {
    /// Create an aggregator with no time limits.
    pub const fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            pipeline,
            unit_timeout: None,
            batch_deadline: None,
        }
    }

    /// Create an aggregator with the configured time limits.
    pub fn from_config(pipeline: Arc<RequestPipeline>, config: &AggregatorConfig) -> Self {
        Self {
            pipeline,
            unit_timeout: config.unit_timeout(),
            batch_deadline: config.batch_deadline(),
        }
    }

    /// Bound each unit.
    #[must_use]
    pub const fn with_unit_timeout(mut self, limit: Option<Duration>) -> Self {
        self.unit_timeout = limit;
        self
    }

    /// Bound the whole batch.
    #[must_use]
    pub const fn with_batch_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.batch_deadline = deadline;
        self
    }

    /// Execute every spec concurrently and collect all outcomes.
    pub async fn fan_out(&self, specs: BTreeMap<String, RequestSpec>) -> AggregateResult {
        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        let keys: Vec<String> = specs.keys().cloned().collect();
        debug!(%batch_id, units = keys.len(), "dispatching batch");

        let mut units = JoinSet::new();
        for (key, spec) in specs {
            let pipeline = Arc::clone(&self.pipeline);
            let unit_timeout = self.unit_timeout;
            let span = info_span!("batch_unit", %batch_id, key = %key, path = %spec.path);

            units.spawn(
                async move {
                    let outcome = match unit_timeout {
                        Some(limit) => timeout(limit, pipeline.run(&spec))
                            .await
                            .unwrap_or_else(|_| Err(GatewayError::timeout(limit))),
                        None => pipeline.run(&spec).await,
                    };
                    (key, outcome)
                }
                .instrument(span),
            );
        }

        let mut results = AggregateResult::new();
        let collect = async {
            while let Some(joined) = units.join_next().await {
                match joined {
                    Ok((key, outcome)) => {
                        results.insert(key, outcome);
                    }
                    Err(err) => warn!(%batch_id, error = %err, "batch unit aborted"),
                }
            }
        };

        let deadline_hit = match self.batch_deadline {
            Some(deadline) => timeout(deadline, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };
        units.abort_all();

        for key in keys {
            results.entry(key).or_insert_with(|| match self.batch_deadline {
                Some(deadline) if deadline_hit => Err(GatewayError::timeout(deadline)),
                _ => Err(GatewayError::TransportFailure {
                    kind: TransportFailureKind::Request,
                    message: "unit aborted before completing".to_string(),
                }),
            });
        }

        let failed = results.values().filter(|outcome| outcome.is_err()).count();
        for (key, outcome) in &results {
            if let Err(err) = outcome {
                warn!(%batch_id, key = %key, error = %err, "batch unit failed");
            }
        }
        info!(
            %batch_id,
            units = results.len(),
            failed,
            deadline_hit,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "batch complete"
        );

        results
    }
}
