//! Run orchestration
//!
//! The coordinator owns the worker units and the shared gate for the
//! duration of one run: it partitions the input, spawns one thread per
//! unit, exposes the gate so an external driver can pause and resume while
//! units are running, and joins every unit before reading any of its
//! results.

pub mod primes;
pub mod race;

use std::ops::RangeInclusive;

use anyhow::{Result, ensure};

pub use primes::{PrimeRun, PrimesConfig, PrimesReport, WorkerStats};
pub use race::{RaceConfig, RaceReport, RaceRun};

/// Split `[0, max]` into `workers` disjoint contiguous sub-ranges.
///
/// The last range absorbs the remainder of the integer division, so the
/// union of the ranges is exactly `[0, max]` with no gaps or overlaps. A
/// worker count of zero, or one larger than the number of candidates, is a
/// caller contract violation.
pub fn partition(max: u64, workers: usize) -> Result<Vec<RangeInclusive<u64>>> {
    ensure!(workers > 0, "worker count must be at least 1");
    ensure!(
        workers as u64 <= max.saturating_add(1),
        "cannot split [0, {max}] across {workers} workers"
    );

    // With more workers than max/workers granularity (workers == max + 1)
    // the division yields zero; every worker then gets a singleton range.
    let range_size = (max / workers as u64).max(1);
    let mut ranges = Vec::with_capacity(workers);
    for i in 0..workers as u64 {
        let start = i * range_size;
        let end = if i == workers as u64 - 1 {
            max
        } else {
            (i + 1) * range_size - 1
        };
        ranges.push(start..=end);
    }

    verify_coverage(max, &ranges)?;
    Ok(ranges)
}

// Defence against partitioning bugs: a bad split must fail the run up
// front, never silently drop or double-count a candidate.
fn verify_coverage(max: u64, ranges: &[RangeInclusive<u64>]) -> Result<()> {
    let mut next = 0u64;
    for range in ranges {
        ensure!(
            *range.start() == next && range.start() <= range.end(),
            "malformed partition: expected range starting at {next}, got {range:?}"
        );
        next = range.end() + 1;
    }
    ensure!(
        next == max + 1,
        "malformed partition: ranges cover [0, {}] instead of [0, {max}]",
        next - 1
    );
    Ok(())
}
