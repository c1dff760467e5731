//! Typeahead suggestion server
//!
//! Serves prefix lookups from an in-memory top-K trie and rebuilds it from
//! the query frequency store on a fixed interval.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use typeahead::{
    init_logging_with_level, log_operation, spawn_sync_worker, start_server, IndexBuilder,
    InMemoryQueryFrequencyStore, LiveIndex, MeteredCache, Operation, OperationContext,
    SuggestionService, TrieSuggestionCache, TypeaheadConfigBuilder,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Typeahead suggestion server")]
struct Args {
    /// Server port
    #[arg(short = 'p', long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Maximum suggestions returned per prefix (K)
    #[arg(short = 'k', long, default_value = "10", env = "TYPEAHEAD_MAX_SUGGESTIONS")]
    max_suggestions: usize,

    /// Maximum indexed query length in characters
    #[arg(long, default_value = "64", env = "TYPEAHEAD_MAX_QUERY_LENGTH")]
    max_query_length: usize,

    /// Seconds between background index reloads
    #[arg(long, default_value = "30", env = "TYPEAHEAD_RELOAD_INTERVAL_SECS")]
    reload_interval_secs: u64,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Enable quiet mode (minimal logging)
    #[arg(short = 'q', long, env = "QUIET_MODE")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging_with_level(args.verbose, args.quiet)?;

    let ctx = OperationContext::new("server.startup");
    log_operation(
        &ctx,
        &Operation::Startup {
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        &Ok(()),
    );
    info!("Port: {}", args.port);

    let config = TypeaheadConfigBuilder::new()
        .max_suggestions(args.max_suggestions)
        .max_query_length(args.max_query_length)
        .reload_interval(Duration::from_secs(args.reload_interval_secs))
        .build()?;

    let store = Arc::new(InMemoryQueryFrequencyStore::new());
    let live = Arc::new(LiveIndex::new(config.clone()));
    let builder = Arc::new(IndexBuilder::new(
        Arc::clone(&store) as _,
        Arc::clone(&live),
        config.clone(),
    ));

    // Warm up before serving so the first request never sees an unbuilt index
    builder.reload().await?;

    let _worker = spawn_sync_worker(Arc::clone(&builder));

    let cache = Arc::new(MeteredCache::new(TrieSuggestionCache::new(live), "trie"));
    let service = Arc::new(SuggestionService::new(cache, store, config));

    start_server(service, args.port).await
}
