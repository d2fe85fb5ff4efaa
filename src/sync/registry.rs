//! Arrival registry for race lanes
//!
//! Finishing lanes report here to receive a rank. The read-increment-write
//! is a single critical section, so two lanes finishing "simultaneously"
//! still get distinct consecutive ranks, and the winner slot is written
//! exactly once — by whichever lane is assigned rank 1.

use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct ArrivalState {
    last_position: usize,
    winner: Option<String>,
}

/// Mutex-guarded finish-order registry shared by all race lanes.
#[derive(Debug, Default)]
pub struct ArrivalRegistry {
    state: Mutex<ArrivalState>,
}

impl ArrivalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ArrivalState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a finisher and hand out its 1-based rank.
    ///
    /// Over N finishers the ranks handed out are exactly `1..=N`, with no
    /// duplicates and no gaps, regardless of thread interleaving.
    pub fn register(&self, name: &str) -> usize {
        let mut state = self.lock();
        state.last_position += 1;
        let rank = state.last_position;
        if rank == 1 {
            state.winner = Some(name.to_string());
        }
        debug!(name, rank, "lane finished");
        rank
    }

    /// Name of the rank-1 finisher, if anyone has finished yet.
    pub fn winner(&self) -> Option<String> {
        self.lock().winner.clone()
    }

    /// How many lanes have finished so far.
    pub fn arrivals(&self) -> usize {
        self.lock().last_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn ranks_are_sequential() {
        let registry = ArrivalRegistry::new();
        assert_eq!(registry.register("a"), 1);
        assert_eq!(registry.register("b"), 2);
        assert_eq!(registry.register("c"), 3);
        assert_eq!(registry.winner().as_deref(), Some("a"));
        assert_eq!(registry.arrivals(), 3);
    }

    #[test]
    fn winner_is_set_once() {
        let registry = ArrivalRegistry::new();
        registry.register("first");
        registry.register("second");
        assert_eq!(registry.winner().as_deref(), Some("first"));
    }

    #[test]
    fn no_winner_before_first_arrival() {
        let registry = ArrivalRegistry::new();
        assert_eq!(registry.winner(), None);
        assert_eq!(registry.arrivals(), 0);
    }

    #[test]
    fn concurrent_registration_yields_a_permutation() {
        const LANES: usize = 16;
        let registry = Arc::new(ArrivalRegistry::new());

        let handles: Vec<_> = (0..LANES)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || registry.register(&format!("lane-{i}")))
            })
            .collect();

        let ranks: HashSet<usize> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(ranks.len(), LANES);
        assert_eq!(ranks, (1..=LANES).collect::<HashSet<_>>());
        assert!(registry.winner().is_some());
    }
}
