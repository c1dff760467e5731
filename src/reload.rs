// Index Reload
// LiveIndex is the single mutable shared resource in the system: an atomic
// handle to the currently-served PrefixIndex. IndexBuilder rebuilds a brand
// new index from a store snapshot and publishes it through that handle.

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::info;

use crate::builders::TypeaheadConfig;
use crate::contracts::QueryFrequencyStore;
use crate::observability::{log_operation, record_metric, MetricType, Operation, OperationContext};
use crate::prefix_index::PrefixIndex;

/// Hot-swap handle to the live index.
///
/// Readers clone the Arc under a briefly-held read lock and then work
/// against an immutable tree; a publish replaces the Arc under the write
/// lock. In-flight readers keep the old tree alive until they drop it.
pub struct LiveIndex {
    inner: RwLock<Arc<PrefixIndex>>,
}

impl LiveIndex {
    /// Start from an empty index so the serving path is valid before the
    /// first reload completes.
    pub fn new(config: TypeaheadConfig) -> Self {
        Self {
            inner: RwLock::new(Arc::new(PrefixIndex::empty(config))),
        }
    }

    /// Snapshot the currently-live index.
    pub fn load(&self) -> Arc<PrefixIndex> {
        Arc::clone(&self.inner.read())
    }

    /// Atomically replace the live index. Never blocks readers beyond the
    /// pointer swap; no reader ever observes a partially built tree.
    pub fn publish(&self, index: Arc<PrefixIndex>) {
        *self.inner.write() = index;
    }
}

/// Performs the full-rebuild pass: snapshot the store, build a new trie,
/// swap it in. The index in service is never mutated.
pub struct IndexBuilder {
    store: Arc<dyn QueryFrequencyStore>,
    live: Arc<LiveIndex>,
    config: TypeaheadConfig,
}

impl IndexBuilder {
    pub fn new(
        store: Arc<dyn QueryFrequencyStore>,
        live: Arc<LiveIndex>,
        config: TypeaheadConfig,
    ) -> Self {
        Self {
            store,
            live,
            config,
        }
    }

    pub fn live(&self) -> Arc<LiveIndex> {
        Arc::clone(&self.live)
    }

    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }

    /// Rebuild from a fresh snapshot and publish the result.
    ///
    /// On failure the attempt is abandoned: the previous live index stays in
    /// service and the error is recorded for observability. Callers on the
    /// serving path are never interrupted.
    pub async fn reload(&self) -> Result<()> {
        let ctx = OperationContext::new("index.reload");

        let records = match self
            .store
            .find_all()
            .await
            .context("Failed to snapshot query frequency store")
        {
            Ok(records) => records,
            Err(e) => {
                // Single record per failed attempt; log_operation emits the
                // error-level event and bumps the failure counter.
                log_operation(
                    &ctx,
                    &Operation::IndexReloadFailed {
                        reason: e.to_string(),
                    },
                    &Err(anyhow::anyhow!("{e:#}")),
                );
                return Err(e);
            }
        };

        let record_count = records.len();
        let index = PrefixIndex::build(&records, self.config.clone());
        self.live.publish(Arc::new(index));

        info!(record_count, "Published rebuilt prefix index");
        log_operation(&ctx, &Operation::IndexReload { record_count }, &Ok(()));
        record_metric(MetricType::Timer {
            name: "index.reload.duration",
            duration: ctx.elapsed(),
        });
        record_metric(MetricType::Gauge {
            name: "index.reload.records",
            value: record_count as f64,
        });

        Ok(())
    }
}
