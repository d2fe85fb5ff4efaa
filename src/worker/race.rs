//! Race-lane worker unit
//!
//! A lane advances one step at a time along a fixed-length track, with a
//! short delay per step standing in for real work. The gate is checked on
//! every step (the delay already dominates, so checkpoint cost is noise
//! here). Crossing the finish line is one registry call that atomically
//! assigns the lane its rank.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::debug;

use crate::sync::{ArrivalRegistry, PauseGate};

/// A lane's finish record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub name: String,
    pub rank: usize,
}

/// One race lane.
pub struct RaceWorker {
    name: String,
    track_length: usize,
    step_delay: Duration,
    step: usize,
    gate: Arc<PauseGate>,
    registry: Arc<ArrivalRegistry>,
    progress: Arc<AtomicUsize>,
    bar: Option<ProgressBar>,
}

impl RaceWorker {
    pub fn new(
        name: impl Into<String>,
        track_length: usize,
        step_delay: Duration,
        gate: Arc<PauseGate>,
        registry: Arc<ArrivalRegistry>,
    ) -> Self {
        Self {
            name: name.into(),
            track_length,
            step_delay,
            step: 0,
            gate,
            registry,
            progress: Arc::new(AtomicUsize::new(0)),
            bar: None,
        }
    }

    /// Attach a progress bar that advances one tick per step.
    pub fn with_bar(mut self, bar: ProgressBar) -> Self {
        self.bar = Some(bar);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps completed so far, safe to read from any thread.
    pub fn progress_counter(&self) -> Arc<AtomicUsize> {
        self.progress.clone()
    }

    /// Current step. Post-join read; never regresses across a pause.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Run the track to the finish line and register the arrival.
    ///
    /// An `Err` means the lane was interrupted at a checkpoint; its step
    /// counter stays at the last completed step.
    pub fn run(&mut self) -> Result<Arrival> {
        debug!(name = %self.name, length = self.track_length, "lane started");

        while self.step < self.track_length {
            self.gate
                .checkpoint()
                .with_context(|| format!("lane {} interrupted", self.name))?;
            thread::sleep(self.step_delay);
            self.step += 1;
            self.progress.store(self.step, Ordering::Relaxed);
            if let Some(bar) = &self.bar {
                bar.inc(1);
            }
        }

        let rank = self.registry.register(&self.name);
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("finished #{rank}"));
        }
        Ok(Arrival {
            name: self.name.clone(),
            rank,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_track(name: &str, length: usize) -> RaceWorker {
        RaceWorker::new(
            name,
            length,
            Duration::from_millis(0),
            Arc::new(PauseGate::new()),
            Arc::new(ArrivalRegistry::new()),
        )
    }

    #[test]
    fn lane_runs_its_full_track() {
        let mut lane = open_track("rex", 10);
        let arrival = lane.run().unwrap();
        assert_eq!(lane.step(), 10);
        assert_eq!(arrival, Arrival { name: "rex".into(), rank: 1 });
    }

    #[test]
    fn zero_length_track_finishes_immediately() {
        let mut lane = open_track("rex", 0);
        assert_eq!(lane.run().unwrap().rank, 1);
        assert_eq!(lane.step(), 0);
    }

    #[test]
    fn interrupted_lane_keeps_its_step_count() {
        let gate = Arc::new(PauseGate::new());
        let registry = Arc::new(ArrivalRegistry::new());
        let mut lane = RaceWorker::new(
            "rex",
            10_000,
            Duration::from_millis(1),
            gate.clone(),
            registry.clone(),
        );

        let canceller = {
            let gate = gate.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                gate.cancel();
            })
        };

        assert!(lane.run().is_err());
        canceller.join().unwrap();
        assert!(lane.step() < 10_000);
        // Never crossed the line, so it must not hold a rank.
        assert_eq!(registry.arrivals(), 0);
    }

    #[test]
    fn pause_does_not_skip_or_repeat_steps() {
        let gate = Arc::new(PauseGate::new());
        let registry = Arc::new(ArrivalRegistry::new());
        let mut lane =
            RaceWorker::new("rex", 20, Duration::from_millis(1), gate.clone(), registry);

        let driver = {
            let gate = gate.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5));
                gate.pause();
                thread::sleep(Duration::from_millis(20));
                gate.resume();
            })
        };

        lane.run().unwrap();
        driver.join().unwrap();
        assert_eq!(lane.step(), 20);
    }
}
