// In-Memory Query Frequency Store
// One concrete implementation of the store contract, backing the binary and
// the tests. Durable persistence engines stay behind the same trait.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::contracts::{QueryFrequencyStore, QueryRecord};

/// Process-local store: query text -> frequency counter
pub struct InMemoryQueryFrequencyStore {
    records: RwLock<HashMap<String, u64>>,
}

impl InMemoryQueryFrequencyStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the store from existing records, summing duplicates
    pub async fn seed(&self, records: Vec<QueryRecord>) {
        let mut guard = self.records.write().await;
        for record in records {
            *guard.entry(record.text).or_insert(0) += record.frequency;
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryQueryFrequencyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryFrequencyStore for InMemoryQueryFrequencyStore {
    async fn find_all(&self) -> Result<Vec<QueryRecord>> {
        let guard = self.records.read().await;
        let mut snapshot: Vec<QueryRecord> = guard
            .iter()
            .map(|(text, frequency)| QueryRecord {
                text: text.clone(),
                frequency: *frequency,
            })
            .collect();
        // Stable snapshot order keeps rebuilds reproducible in logs and tests
        snapshot.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(snapshot)
    }

    async fn find_by_query(&self, text: &str) -> Result<Option<QueryRecord>> {
        let guard = self.records.read().await;
        Ok(guard.get(text).map(|frequency| QueryRecord {
            text: text.to_string(),
            frequency: *frequency,
        }))
    }

    async fn save(&self, record: QueryRecord) -> Result<()> {
        let mut guard = self.records.write().await;
        debug!(query = %record.text, frequency = record.frequency, "Saving query record");
        guard.insert(record.text, record.frequency);
        Ok(())
    }
}
