// Suggestion Service
// Validates input once, reads through the suggestion cache, and routes
// frequency writes straight to the store. Writes surface in lookups only
// after the next background reload.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::builders::TypeaheadConfig;
use crate::contracts::{QueryFrequencyStore, QueryRecord, Suggestion, SuggestionCache};
use crate::observability::{
    log_operation, record_metric, with_trace_id, MetricType, Operation, OperationContext,
};
use crate::types::{ValidatedQuery, ValidationError};

/// Failures on the serving path. Validation is a client error; everything
/// else is a store fault.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Query frequency store error: {0}")]
    Store(#[source] anyhow::Error),
}

pub struct SuggestionService {
    cache: Arc<dyn SuggestionCache>,
    store: Arc<dyn QueryFrequencyStore>,
    config: TypeaheadConfig,
}

impl SuggestionService {
    pub fn new(
        cache: Arc<dyn SuggestionCache>,
        store: Arc<dyn QueryFrequencyStore>,
        config: TypeaheadConfig,
    ) -> Self {
        Self {
            cache,
            store,
            config,
        }
    }

    pub fn config(&self) -> &TypeaheadConfig {
        &self.config
    }

    /// Validate the query and return the top suggestions for it as a prefix.
    /// Result comes back from the cache verbatim: already capped at K and
    /// sorted by descending frequency.
    pub fn get_top_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, ServiceError> {
        let validated = ValidatedQuery::new(query, self.config.max_query_length)?;

        let suggestions = self.cache.get_suggestions(&validated);
        info!(
            query = %validated,
            count = suggestions.len(),
            "Fetched top suggestions"
        );
        Ok(suggestions)
    }

    /// Upsert the query's frequency: create at 1, otherwise increment by 1.
    /// Not reflected in lookups until the next reload cycle.
    pub async fn update_query_frequency(&self, query: &str) -> Result<(), ServiceError> {
        let validated = ValidatedQuery::new(query, self.config.max_query_length)?;
        let ctx = OperationContext::new("service.update_query_frequency");

        let new_frequency = with_trace_id("service.update_query_frequency", async {
            let new_frequency = match self.store.find_by_query(validated.as_str()).await? {
                Some(existing) => existing.frequency + 1,
                None => 1,
            };

            let record = QueryRecord {
                text: validated.as_str().to_string(),
                frequency: new_frequency,
            };
            self.store.save(record).await?;
            Ok(new_frequency)
        })
        .await
        .map_err(ServiceError::Store)?;

        info!(query = %validated, frequency = new_frequency, "Updated query frequency");
        log_operation(&ctx, &Operation::FrequencyUpdate { new_frequency }, &Ok(()));
        record_metric(MetricType::Counter {
            name: "service.frequency_update",
            value: 1,
        });
        Ok(())
    }
}
