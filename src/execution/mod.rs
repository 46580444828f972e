//! Execution engine for evaluating column operations over many hit groups.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Validation with observer reporting, before any group is touched
//! - Parallel (chunked) evaluation of groups, with output in input order
//! - Resource limits / throttling (in-flight chunks)
//! - Real-time metrics + observer hooks for monitoring

mod observer;
mod permits;

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::error::ValidationResult;
use crate::processing::{ColumnOps, ColumnOpsOptions};
use crate::types::{FieldAccess, RecordSchema};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, StdErrExecutionObserver,
};

use permits::ChunkPermits;

/// Configuration for the [`ExecutionEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of groups per chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing chunks.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = available_threads();
        Self {
            num_threads: Some(n),
            chunk_size: 1_024,
            max_in_flight_chunks: n,
        }
    }
}

/// Evaluates validated column operations over batches of groups.
pub struct ExecutionEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl ExecutionEngine {
    /// Create a new engine with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size == 0`, `max_in_flight_chunks == 0`, or `num_threads == Some(0)`.
    pub fn new(opts: ExecutionOptions) -> Self {
        assert!(opts.chunk_size > 0, "chunk_size must be > 0");
        assert!(
            opts.max_in_flight_chunks > 0,
            "max_in_flight_chunks must be > 0"
        );
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(opts.num_threads.unwrap_or_else(available_threads))
            .build()
            .expect("failed to build rayon thread pool");

        Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        }
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Validate `options` against `schema`, reporting the outcome to the observer.
    pub fn validate<S>(&self, options: &ColumnOpsOptions, schema: &S) -> ValidationResult<ColumnOps>
    where
        S: RecordSchema + ?Sized,
    {
        let result = ColumnOps::from_options(options, schema);
        match &result {
            Ok(ops) => self.emit(ExecutionEvent::ValidationSucceeded {
                spec: ops.spec().to_string(),
            }),
            Err(error) => self.emit(ExecutionEvent::ValidationFailed {
                error: error.clone(),
            }),
        }
        result
    }

    /// Evaluate `ops` for every group, in parallel.
    ///
    /// The returned fragments are in the same order as `groups`.
    pub fn evaluate_groups<R>(&self, ops: &ColumnOps, groups: &[Vec<R>]) -> Vec<String>
    where
        R: FieldAccess + Sync,
    {
        self.pool.install(|| self.evaluate_groups_impl(ops, groups))
    }

    fn evaluate_groups_impl<R>(&self, ops: &ColumnOps, groups: &[Vec<R>]) -> Vec<String>
    where
        R: FieldAccess + Sync,
    {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted {
            groups: groups.len(),
        });

        let permits = ChunkPermits::new(self.opts.max_in_flight_chunks);
        let ranges = chunk_ranges(groups.len(), self.opts.chunk_size);

        let per_chunk: Vec<Vec<String>> = ranges
            .into_par_iter()
            .map(|range| {
                let (_permit, waited) = permits.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_chunk_start();
                self.emit(ExecutionEvent::ChunkStarted {
                    start_group: range.start,
                    group_count: range.len(),
                });

                let out: Vec<String> = groups[range]
                    .iter()
                    .map(|group| {
                        self.metrics.on_group_processed(group.len());
                        ops.evaluate(group)
                    })
                    .collect();

                self.emit(ExecutionEvent::ChunkFinished {
                    output_fragments: out.len(),
                });
                self.metrics.on_chunk_end();
                out
            })
            .collect();

        let out = per_chunk.into_iter().flatten().collect();

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        out
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}
