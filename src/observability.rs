// Centralized observability infrastructure for the typeahead service.
// Structured logging, lightweight metrics, and trace-id propagation.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

// Global atomic counters for metrics
static LOOKUP_COUNTER: AtomicU64 = AtomicU64::new(0);
static UPDATE_COUNTER: AtomicU64 = AtomicU64::new(0);
static RELOAD_COUNTER: AtomicU64 = AtomicU64::new(0);
static RELOAD_FAILURE_COUNTER: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Initialize the logging and tracing infrastructure.
/// This should be called once at application startup.
pub fn init_logging() -> Result<()> {
    init_logging_with_level(false, false)
}

/// Initialize logging with configurable verbosity.
pub fn init_logging_with_level(verbose: bool, quiet: bool) -> Result<()> {
    // Determine the filter level based on flags
    let filter_level = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("typeahead=debug,info")
    } else {
        // Default: warnings and errors for this crate, errors only for dependencies.
        // Users can enable more logging with --verbose or the RUST_LOG env var.
        EnvFilter::new("typeahead=warn,error")
    };

    // Quiet takes precedence over RUST_LOG so --quiet always suppresses output
    let env_filter = if quiet {
        EnvFilter::new("error")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::try_from_default_env().unwrap_or(filter_level)
    } else {
        filter_level
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(!quiet)
        .with_thread_ids(!quiet)
        .with_line_number(!quiet)
        .with_file(!quiet)
        .with_ansi(true);

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        Ok(()) => {
            if !quiet {
                info!("Typeahead observability initialized");
            }
            Ok(())
        }
        Err(_) => {
            // Already initialized, which is fine in test environments
            Ok(())
        }
    }
}

/// Represents the operations of the suggestion pipeline for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    /// Prefix lookup against the live index
    IndexLookup {
        prefix_len: usize,
        result_count: usize,
    },
    /// Full rebuild of the prefix index from a store snapshot
    IndexReload { record_count: usize },
    /// Abandoned rebuild attempt; previous index stays in service
    IndexReloadFailed { reason: String },
    /// Frequency upsert into the backing store
    FrequencyUpdate { new_frequency: u64 },

    // System operations
    Startup { version: String },
    Shutdown { reason: String },
}

/// Metric types for performance monitoring
#[derive(Debug, Clone)]
pub enum MetricType {
    Counter {
        name: &'static str,
        value: u64,
    },
    Gauge {
        name: &'static str,
        value: f64,
    },
    Histogram {
        name: &'static str,
        value: f64,
        unit: &'static str,
    },
    Timer {
        name: &'static str,
        duration: Duration,
    },
}

/// Operation context for tracing through the system
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub trace_id: Uuid,
    pub span_id: Uuid,
    pub operation: String,
    pub start_time: Instant,
    pub attributes: Vec<(String, String)>,
}

impl OperationContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            span_id: Uuid::new_v4(),
            operation: operation.into(),
            start_time: Instant::now(),
            attributes: Vec::new(),
        }
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Log an operation with full context
#[instrument(skip(ctx))]
pub fn log_operation(ctx: &OperationContext, op: &Operation, result: &Result<()>) {
    let elapsed = ctx.elapsed();
    let attrs = ctx
        .attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");

    match result {
        Ok(()) => {
            info!(
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                operation = %ctx.operation,
                elapsed_ms = elapsed.as_millis(),
                attributes = %attrs,
                "Operation completed: {:?}", op
            );
        }
        Err(e) => {
            error!(
                trace_id = %ctx.trace_id,
                span_id = %ctx.span_id,
                operation = %ctx.operation,
                elapsed_ms = elapsed.as_millis(),
                attributes = %attrs,
                error = %e,
                "Operation failed: {:?}", op
            );
            ERROR_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
    }

    // Update specific counters
    match op {
        Operation::IndexLookup { .. } => {
            LOOKUP_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
        Operation::FrequencyUpdate { .. } => {
            UPDATE_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
        Operation::IndexReload { .. } => {
            RELOAD_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
        Operation::IndexReloadFailed { .. } => {
            RELOAD_FAILURE_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
        _ => {}
    }
}

/// Record a metric
pub fn record_metric(metric: MetricType) {
    match metric {
        MetricType::Counter { name, value } => {
            debug!("metric.counter {} = {}", name, value);
        }
        MetricType::Gauge { name, value } => {
            debug!("metric.gauge {} = {}", name, value);
        }
        MetricType::Histogram { name, value, unit } => {
            debug!("metric.histogram {} = {} {}", name, value, unit);
        }
        MetricType::Timer { name, duration } => {
            debug!("metric.timer {} = {:?}", name, duration);
        }
    }
}

/// Execute a future with a trace context
pub async fn with_trace_id<F, T>(operation: &str, f: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let ctx = OperationContext::new(operation);
    let trace_id = ctx.trace_id;
    let span_id = ctx.span_id;

    debug!(
        trace_id = %trace_id,
        span_id = %span_id,
        "Starting operation: {}", operation
    );

    let start = Instant::now();
    let result = f.await;
    let elapsed = start.elapsed();

    match &result {
        Ok(_) => {
            debug!(
                trace_id = %trace_id,
                span_id = %span_id,
                elapsed_ms = elapsed.as_millis(),
                "Completed operation: {}", operation
            );
        }
        Err(e) => {
            error!(
                trace_id = %trace_id,
                span_id = %span_id,
                elapsed_ms = elapsed.as_millis(),
                error = %e,
                "Operation failed: {}", operation
            );
            ERROR_COUNTER.fetch_add(1, Ordering::Relaxed);
        }
    }

    result
}

/// Snapshot of the global counters, used by the stats endpoint and tests
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub lookups: u64,
    pub frequency_updates: u64,
    pub reloads: u64,
    pub reload_failures: u64,
    pub errors: u64,
}

pub fn counter_snapshot() -> CounterSnapshot {
    CounterSnapshot {
        lookups: LOOKUP_COUNTER.load(Ordering::Relaxed),
        frequency_updates: UPDATE_COUNTER.load(Ordering::Relaxed),
        reloads: RELOAD_COUNTER.load(Ordering::Relaxed),
        reload_failures: RELOAD_FAILURE_COUNTER.load(Ordering::Relaxed),
        errors: ERROR_COUNTER.load(Ordering::Relaxed),
    }
}
