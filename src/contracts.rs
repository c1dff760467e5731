// Contract-First Design
// This module defines the contracts (preconditions, postconditions, invariants)
// between the suggestion pipeline and its collaborators.

use anyhow::{ensure, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ValidatedQuery;

/// A candidate autocomplete result paired with its historical frequency.
/// Immutable value type; ordering inside a top-K list is always frequency
/// descending with ties broken lexicographically by text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub frequency: u64,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, frequency: u64) -> Self {
        Self {
            text: text.into(),
            frequency,
        }
    }
}

/// A persisted query with its accumulated frequency counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub text: String,
    pub frequency: u64,
}

impl QueryRecord {
    /// Create a new record with validation
    ///
    /// # Contract
    /// - Text must be non-empty and lowercase a-z only
    /// - Frequency must be >= 1
    pub fn new(text: impl Into<String>, frequency: u64) -> Result<Self> {
        let text = text.into();
        ensure!(!text.is_empty(), "Query record text cannot be empty");
        ensure!(
            text.bytes().all(|b| b.is_ascii_lowercase()),
            "Query record text must be lowercase a-z only"
        );
        ensure!(frequency >= 1, "Query record frequency must be >= 1");
        Ok(Self { text, frequency })
    }
}

/// Durable counter storage keyed by exact query text.
///
/// This is the external collaborator the index rebuilds from; the serving
/// path never writes to the index directly.
#[async_trait]
pub trait QueryFrequencyStore: Send + Sync {
    /// Fetch a full snapshot of all records.
    ///
    /// # Postconditions
    /// - Returns every persisted record exactly once
    /// - Does not modify any state
    async fn find_all(&self) -> Result<Vec<QueryRecord>>;

    /// Fetch the record for an exact query text, if present.
    async fn find_by_query(&self, text: &str) -> Result<Option<QueryRecord>>;

    /// Upsert a record.
    ///
    /// # Postconditions
    /// - A subsequent `find_by_query` for the same text returns this record
    /// - A subsequent `find_all` snapshot contains it
    async fn save(&self, record: QueryRecord) -> Result<()>;
}

/// Capability seam for prefix lookups against whichever index is live.
///
/// Callers are polymorphic over the indexing strategy; the trie-backed
/// implementation is the only concrete one today.
///
/// # Postconditions
/// - Results are sorted by frequency descending, length <= K
/// - A prefix with no matching path yields an empty list, not an error
/// - Never blocks on an in-progress rebuild
pub trait SuggestionCache: Send + Sync {
    fn get_suggestions(&self, prefix: &ValidatedQuery) -> Vec<Suggestion>;
}
