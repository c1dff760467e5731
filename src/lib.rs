// Typeahead - prefix suggestion serving over a hot-swappable top-K trie
// Root library module

pub mod observability;
pub mod contracts;
pub mod types;
pub mod builders;
pub mod prefix_index;
pub mod reload;
pub mod sync_worker;
pub mod cache;
pub mod wrappers;
pub mod memory_store;
pub mod service;
pub mod http_server;

// Re-export key types
pub use observability::{
    counter_snapshot,
    init_logging,
    init_logging_with_level,
    log_operation,
    record_metric,
    with_trace_id,
    MetricType,
    Operation,
    OperationContext,
};

pub use contracts::{QueryFrequencyStore, QueryRecord, Suggestion, SuggestionCache};

pub use types::{ValidatedQuery, ValidationError};

pub use builders::{TypeaheadConfig, TypeaheadConfigBuilder};

// Re-export the index and its reload machinery
pub use prefix_index::PrefixIndex;
pub use reload::{IndexBuilder, LiveIndex};
pub use sync_worker::{spawn_sync_worker, SyncWorkerHandle};

// Re-export cache implementations and wrappers
pub use cache::TrieSuggestionCache;
pub use wrappers::MeteredCache;

// Re-export store implementations
pub use memory_store::InMemoryQueryFrequencyStore;

// Re-export the service and HTTP surface
pub use http_server::{create_server, start_server};
pub use service::{ServiceError, SuggestionService};
