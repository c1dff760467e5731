// Wrapper Components
// High-level wrappers that layer cross-cutting behavior over the contract
// traits without the inner implementation knowing.

use crate::contracts::{Suggestion, SuggestionCache};
use crate::observability::{log_operation, record_metric, MetricType, Operation, OperationContext};
use crate::types::ValidatedQuery;

/// Cache wrapper that adds automatic metrics to every lookup
pub struct MeteredCache<C: SuggestionCache> {
    inner: C,
    name: String,
}

impl<C: SuggestionCache> MeteredCache<C> {
    pub fn new(inner: C, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }
}

impl<C: SuggestionCache> SuggestionCache for MeteredCache<C> {
    fn get_suggestions(&self, prefix: &ValidatedQuery) -> Vec<Suggestion> {
        // The context must predate the inner call so its elapsed time covers
        // the lookup itself.
        let mut ctx = OperationContext::new("cache.get_suggestions");
        ctx.add_attribute("cache", self.name.clone());
        ctx.add_attribute("prefix_len", prefix.len().to_string());

        let results = self.inner.get_suggestions(prefix);

        record_metric(MetricType::Histogram {
            name: "cache.lookup.duration",
            value: ctx.elapsed().as_millis() as f64,
            unit: "ms",
        });
        log_operation(
            &ctx,
            &Operation::IndexLookup {
                prefix_len: prefix.len(),
                result_count: results.len(),
            },
            &Ok(()),
        );

        results
    }
}
