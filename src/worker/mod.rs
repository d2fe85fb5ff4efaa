//! Worker units
//!
//! Each unit is a plain struct that owns its private state, moves into a
//! spawned thread for the duration of [`run`](prime::PrimeWorker::run), and
//! travels back to the coordinator through the join handle. The coordinator
//! never touches a unit's results before joining its thread, so there are
//! no concurrent reads of worker-private state — the only cross-thread
//! surface is the published progress counter, which is a relaxed atomic.

pub mod primality;
pub mod prime;
pub mod race;

pub use prime::PrimeWorker;
pub use race::RaceWorker;
