//! Coordination primitives shared by the worker pool
//!
//! This module owns the only shared mutable state in the crate: the pause
//! gate every worker checkpoints against, and the arrival registry race
//! lanes report into. Both are coarse-grained (one mutex per structure) —
//! contention is at most one lock acquisition per checkpoint cadence, and a
//! worker never holds both locks at once, so there is no lock ordering to
//! get wrong.

pub mod gate;
pub mod registry;
pub mod signal;

pub use gate::{Interrupted, PauseGate};
pub use registry::ArrivalRegistry;
pub use signal::{AutoPauser, ChannelSignal, ResumeSignal, StdinSignal};
