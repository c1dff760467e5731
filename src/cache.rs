// Trie-backed Suggestion Cache
// The one concrete SuggestionCache: delegates every lookup to whichever
// PrefixIndex is currently live.

use std::sync::Arc;

use crate::contracts::{Suggestion, SuggestionCache};
use crate::reload::LiveIndex;
use crate::types::ValidatedQuery;

pub struct TrieSuggestionCache {
    live: Arc<LiveIndex>,
}

impl TrieSuggestionCache {
    pub fn new(live: Arc<LiveIndex>) -> Self {
        Self { live }
    }
}

impl SuggestionCache for TrieSuggestionCache {
    fn get_suggestions(&self, prefix: &ValidatedQuery) -> Vec<Suggestion> {
        // Arc clone pins the tree; the walk itself needs no synchronization
        self.live.load().lookup(prefix.as_str())
    }
}
