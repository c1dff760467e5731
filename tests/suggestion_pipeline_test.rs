// Suggestion Pipeline Integration Tests
// Exercises the store -> builder -> live index -> cache -> service chain as
// one system, plus the atomicity of the index hot-swap under concurrency.

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use typeahead::{
    IndexBuilder, InMemoryQueryFrequencyStore, LiveIndex, MeteredCache, PrefixIndex,
    QueryFrequencyStore, QueryRecord, SuggestionService, TrieSuggestionCache, TypeaheadConfig,
    TypeaheadConfigBuilder,
};

fn config(k: usize) -> TypeaheadConfig {
    TypeaheadConfigBuilder::new()
        .max_suggestions(k)
        .max_query_length(10)
        .build()
        .expect("valid test config")
}

struct Pipeline {
    store: Arc<InMemoryQueryFrequencyStore>,
    builder: Arc<IndexBuilder>,
    service: SuggestionService,
}

fn pipeline(k: usize) -> Pipeline {
    let store = Arc::new(InMemoryQueryFrequencyStore::new());
    let live = Arc::new(LiveIndex::new(config(k)));
    let builder = Arc::new(IndexBuilder::new(
        Arc::clone(&store) as _,
        Arc::clone(&live),
        config(k),
    ));
    let cache = Arc::new(MeteredCache::new(TrieSuggestionCache::new(live), "trie"));
    let service = SuggestionService::new(cache, Arc::clone(&store) as _, config(k));
    Pipeline {
        store,
        builder,
        service,
    }
}

#[tokio::test]
async fn test_worked_example_through_service() -> Result<()> {
    let p = pipeline(2);
    for (text, frequency) in [("cat", 5), ("car", 3), ("cats", 10), ("dog", 1)] {
        p.store.save(QueryRecord::new(text, frequency)?).await?;
    }
    p.builder.reload().await?;

    let ca = p.service.get_top_suggestions("ca").unwrap();
    assert_eq!(
        ca.iter()
            .map(|s| (s.text.as_str(), s.frequency))
            .collect::<Vec<_>>(),
        vec![("cats", 10), ("cat", 5)]
    );

    let c = p.service.get_top_suggestions("c").unwrap();
    assert_eq!(c[0].text, "cats");
    assert_eq!(c[1].text, "cat");

    let d = p.service.get_top_suggestions("d").unwrap();
    assert_eq!(
        d.iter()
            .map(|s| (s.text.as_str(), s.frequency))
            .collect::<Vec<_>>(),
        vec![("dog", 1)]
    );

    assert!(p.service.get_top_suggestions("z").unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_then_reload_then_lookup() -> Result<()> {
    let p = pipeline(2);

    p.service.update_query_frequency("hello").await.unwrap();
    p.service.update_query_frequency("hello").await.unwrap();

    assert!(p.service.get_top_suggestions("he").unwrap().is_empty());

    p.builder.reload().await?;

    let he = p.service.get_top_suggestions("he").unwrap();
    assert_eq!(he.len(), 1);
    assert_eq!(he[0].text, "hello");
    assert_eq!(he[0].frequency, 2);
    Ok(())
}

#[tokio::test]
async fn test_reload_replaces_rather_than_accumulates() -> Result<()> {
    let cfg = config(5);
    let live = Arc::new(LiveIndex::new(cfg.clone()));

    let first = Arc::new(InMemoryQueryFrequencyStore::new());
    first.save(QueryRecord::new("old", 3)?).await?;
    IndexBuilder::new(first, Arc::clone(&live), cfg.clone())
        .reload()
        .await?;
    assert_eq!(live.load().lookup("o").len(), 1);

    // A rebuild from a snapshot without the record must not remember it
    let second = Arc::new(InMemoryQueryFrequencyStore::new());
    second.save(QueryRecord::new("other", 1)?).await?;
    IndexBuilder::new(second, Arc::clone(&live), cfg)
        .reload()
        .await?;

    let o = live.load().lookup("o");
    assert_eq!(o.len(), 1);
    assert_eq!(o[0].text, "other");
    assert!(live.load().lookup("ol").is_empty());
    Ok(())
}

/// Concurrent lookups during rebuilds must observe either the fully-old or
/// fully-new index. Two snapshot generations carry distinguishable
/// frequencies; a mixed result would show both generations at once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_swap_atomicity_under_concurrent_lookups() -> Result<()> {
    let cfg = config(4);
    let live = Arc::new(LiveIndex::new(cfg.clone()));

    let snapshot = |generation: u64| -> Vec<QueryRecord> {
        ["aa", "ab", "ac"]
            .iter()
            .map(|text| QueryRecord::new(*text, generation).expect("valid record"))
            .collect()
    };
    live.publish(Arc::new(PrefixIndex::build(&snapshot(1), cfg.clone())));

    let mut readers = Vec::new();
    for _ in 0..4 {
        let live = Arc::clone(&live);
        readers.push(tokio::spawn(async move {
            for _ in 0..2000 {
                let results = live.load().lookup("a");
                assert_eq!(results.len(), 3);
                let generation = results[0].frequency;
                assert!(
                    results.iter().all(|s| s.frequency == generation),
                    "observed a mix of index generations: {results:?}"
                );
                tokio::task::yield_now().await;
            }
        }));
    }

    let writer = {
        let live = Arc::clone(&live);
        let cfg = cfg.clone();
        tokio::spawn(async move {
            for generation in 2..50u64 {
                live.publish(Arc::new(PrefixIndex::build(&snapshot(generation), cfg.clone())));
                tokio::time::sleep(Duration::from_micros(200)).await;
            }
        })
    };

    for reader in readers {
        reader.await.expect("reader task panicked");
    }
    writer.await.expect("writer task panicked");
    Ok(())
}
