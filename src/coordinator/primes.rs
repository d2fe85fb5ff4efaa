//! Prime-search run orchestration

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{debug, info};

use super::partition;
use crate::sync::PauseGate;
use crate::worker::PrimeWorker;
use crate::worker::prime::DEFAULT_CHECKPOINT_EVERY;

/// Configuration for one prime-search run.
#[derive(Debug, Clone)]
pub struct PrimesConfig {
    /// Upper bound of the search interval `[0, max]`, inclusive.
    pub max: u64,
    /// Number of worker units (0 = one per CPU core).
    pub workers: usize,
    /// Gate checkpoint cadence, in candidates per checkpoint.
    pub checkpoint_every: u64,
    /// Pause the whole pool on this interval, if set.
    pub pause_every: Option<Duration>,
    /// Carry the discovered primes into the report, not just their counts.
    pub include_primes: bool,
}

impl Default for PrimesConfig {
    fn default() -> Self {
        Self {
            max: 30_000_000,
            workers: 3,
            checkpoint_every: DEFAULT_CHECKPOINT_EVERY,
            pause_every: None,
            include_primes: false,
        }
    }
}

/// Per-unit slice of the final report.
#[derive(Debug, Serialize)]
pub struct WorkerStats {
    pub id: usize,
    pub start: u64,
    pub end: u64,
    pub primes_found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<Vec<u64>>,
}

/// Aggregate result of a completed run. Built only after every unit has
/// terminated; a run that is interrupted or loses a worker produces no
/// report at all.
#[derive(Debug, Serialize)]
pub struct PrimesReport {
    pub max: u64,
    pub worker_count: usize,
    pub total_primes: usize,
    pub elapsed_ms: u128,
    pub workers: Vec<WorkerStats>,
}

/// A prime-search run in flight.
///
/// Owns the worker threads between [`start`](PrimeRun::start) and
/// [`join`](PrimeRun::join). The gate handle lets an external driver pause
/// and resume while units are running; calls landing after completion are
/// no-ops. Unit-private results are only read inside `join`, after the
/// unit's thread has terminated.
#[derive(Debug)]
pub struct PrimeRun {
    config: PrimesConfig,
    gate: Arc<PauseGate>,
    ranges: Vec<(u64, u64)>,
    counters: Vec<Arc<AtomicUsize>>,
    handles: Vec<JoinHandle<(PrimeWorker, Result<()>)>>,
    started: Instant,
}

impl PrimeRun {
    /// Partition the interval and start one worker thread per sub-range.
    pub fn start(config: PrimesConfig) -> Result<Self> {
        let workers = effective_workers(&config);
        let ranges = partition(config.max, workers)?;
        let gate = Arc::new(PauseGate::new());

        info!(max = config.max, workers, "starting prime search");

        let bounds: Vec<(u64, u64)> =
            ranges.iter().map(|r| (*r.start(), *r.end())).collect();
        let mut counters = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        let started = Instant::now();

        for (i, range) in ranges.into_iter().enumerate() {
            let mut worker =
                PrimeWorker::new(i + 1, range, config.checkpoint_every, gate.clone());
            counters.push(worker.found_counter());
            handles.push(thread::spawn(move || {
                let result = worker.run();
                (worker, result)
            }));
        }

        Ok(Self {
            config,
            gate,
            ranges: bounds,
            counters,
            handles,
            started,
        })
    }

    /// Shared gate, for external pause/resume drivers.
    pub fn gate(&self) -> Arc<PauseGate> {
        self.gate.clone()
    }

    /// Published per-unit found-counts, safe to read while units run.
    pub fn counters(&self) -> Vec<Arc<AtomicUsize>> {
        self.counters.clone()
    }

    /// Snapshot of primes found so far, one entry per unit.
    pub fn found_so_far(&self) -> Vec<usize> {
        self.counters
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }

    /// Assigned ranges, in unit order.
    pub fn ranges(&self) -> &[(u64, u64)] {
        &self.ranges
    }

    /// Wait for every unit to terminate, then aggregate.
    ///
    /// A worker that panicked or was interrupted aborts the run: the error
    /// surfaces and no partial aggregate is produced.
    pub fn join(self) -> Result<PrimesReport> {
        let include_primes = self.config.include_primes;
        let mut stats = Vec::with_capacity(self.handles.len());
        let mut total = 0;
        let mut failure: Option<anyhow::Error> = None;

        for handle in self.handles {
            match handle.join() {
                Ok((worker, Ok(()))) => {
                    total += worker.prime_count();
                    debug!(
                        id = worker.id(),
                        found = worker.prime_count(),
                        "worker joined"
                    );
                    stats.push(WorkerStats {
                        id: worker.id(),
                        start: *worker.range().start(),
                        end: *worker.range().end(),
                        primes_found: worker.prime_count(),
                        primes: include_primes.then(|| worker.primes().to_vec()),
                    });
                }
                // Keep joining the rest so no thread outlives the run, but
                // remember the first failure and report it instead of an
                // aggregate.
                Ok((_, Err(e))) => failure = failure.or(Some(e)),
                Err(_) => {
                    // The run is already lost; stop the surviving workers
                    // at their next checkpoint rather than letting them
                    // run out the full range before the remaining joins.
                    self.gate.cancel();
                    failure =
                        failure.or(Some(anyhow!("prime worker thread panicked")));
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        Ok(PrimesReport {
            max: self.config.max,
            worker_count: stats.len(),
            total_primes: total,
            elapsed_ms: self.started.elapsed().as_millis(),
            workers: stats,
        })
    }
}

fn effective_workers(config: &PrimesConfig) -> usize {
    if config.workers == 0 {
        // Auto-detection never asks for more workers than candidates; an
        // explicit over-request is a contract violation and surfaces as
        // a partition error instead of being silently shrunk.
        num_cpus::get().min(config.max.saturating_add(1).min(usize::MAX as u64) as usize)
    } else {
        config.workers
    }
}
