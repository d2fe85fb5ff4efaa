//! # Pacer - Pausable Concurrent Workers
//!
//! A worker pool whose units can be globally paused and resumed by an
//! external controller through a shared, condvar-backed gate. Workers check
//! the gate cooperatively at a configurable cadence; pausing costs zero CPU
//! and resuming wakes every blocked unit at once.
//!
//! ## Features
//!
//! - **Cooperative pause/resume**: one shared [`sync::PauseGate`], many
//!   checkpointing workers, no busy spinning
//! - **Range-partitioned search**: disjoint contiguous sub-ranges covering
//!   the full input exactly once
//! - **Race mode**: fixed-length lanes with a mutex-guarded arrival registry
//!   handing out strictly unique finish ranks
//! - **Clean cancellation**: interruption is propagated, never swallowed,
//!   and always leaves readable partial results
//!
//! ## Quick Start
//!
//! ```bash
//! # Search for primes below 30,000,000 on 3 workers, pausing every 3s
//! pacer primes --max 30000000 --workers 3 --pause-every 3
//!
//! # Run a 6-lane race
//! pacer race --lanes 6
//! ```

pub mod cli;
pub mod coordinator;
pub mod sync;
pub mod worker;

pub use cli::{Cli, Output};
pub use coordinator::{PrimesConfig, PrimesReport, RaceConfig, RaceReport};
pub use sync::PauseGate;

/// Result type alias for Pacer operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
