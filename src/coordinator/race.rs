//! Race run orchestration

use std::collections::HashSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow, ensure};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::sync::{ArrivalRegistry, PauseGate};
use crate::worker::RaceWorker;
use crate::worker::race::Arrival;

/// Configuration for one race.
#[derive(Debug, Clone)]
pub struct RaceConfig {
    /// Number of lanes, each on its own thread.
    pub lanes: usize,
    /// Steps from the start to the finish line (same for every lane).
    pub track_length: usize,
    /// Simulated work per step.
    pub step_delay: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            lanes: 4,
            track_length: 100,
            step_delay: Duration::from_millis(100),
        }
    }
}

/// A finisher in the final report.
#[derive(Debug, Serialize)]
pub struct Finisher {
    pub rank: usize,
    pub name: String,
}

/// Aggregate result of a completed race.
#[derive(Debug, Serialize)]
pub struct RaceReport {
    pub lanes: usize,
    pub track_length: usize,
    pub winner: String,
    pub elapsed_ms: u128,
    /// Finishing order, rank 1 first.
    pub finishers: Vec<Finisher>,
}

/// A race in flight. Same ownership discipline as a prime run: the lanes
/// live on their own threads until `join`, and only the gate and the
/// registry are shared.
pub struct RaceRun {
    config: RaceConfig,
    gate: Arc<PauseGate>,
    registry: Arc<ArrivalRegistry>,
    handles: Vec<JoinHandle<Result<Arrival>>>,
    started: Instant,
}

impl RaceRun {
    /// Start one lane thread per track. The race is paused and resumed as
    /// a whole: every lane shares the one gate.
    pub fn start(config: RaceConfig, bars: Option<&MultiProgress>) -> Result<Self> {
        ensure!(config.lanes > 0, "a race needs at least one lane");

        let gate = Arc::new(PauseGate::new());
        let registry = Arc::new(ArrivalRegistry::new());
        let started = Instant::now();

        info!(
            lanes = config.lanes,
            track_length = config.track_length,
            "starting race"
        );

        let mut handles = Vec::with_capacity(config.lanes);
        for i in 1..=config.lanes {
            let mut lane = RaceWorker::new(
                format!("lane-{i}"),
                config.track_length,
                config.step_delay,
                gate.clone(),
                registry.clone(),
            );
            if let Some(mp) = bars {
                let bar = lane_bar(mp, lane.name(), config.track_length);
                lane = lane.with_bar(bar);
            }
            handles.push(thread::spawn(move || lane.run()));
        }

        Ok(Self {
            config,
            gate,
            registry,
            handles,
            started,
        })
    }

    /// Shared gate, for external pause/resume drivers.
    pub fn gate(&self) -> Arc<PauseGate> {
        self.gate.clone()
    }

    /// How many lanes have crossed the line so far.
    pub fn arrivals_so_far(&self) -> usize {
        self.registry.arrivals()
    }

    /// Wait for every lane to finish, then report the arrival order.
    pub fn join(self) -> Result<RaceReport> {
        let lane_count = self.handles.len();
        let mut arrivals = Vec::with_capacity(lane_count);
        let mut failure: Option<anyhow::Error> = None;

        for handle in self.handles {
            match handle.join() {
                Ok(Ok(arrival)) => arrivals.push(arrival),
                Ok(Err(e)) => failure = failure.or(Some(e)),
                Err(_) => {
                    // Stop the surviving lanes at their next checkpoint so
                    // the remaining joins terminate promptly.
                    self.gate.cancel();
                    failure = failure.or(Some(anyhow!("race lane thread panicked")));
                }
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        arrivals.sort_by_key(|a| a.rank);

        // Rank assignment is the registry's one hard guarantee; a hole here
        // is a bug, not a runtime condition to tolerate.
        let ranks: HashSet<usize> = arrivals.iter().map(|a| a.rank).collect();
        ensure!(
            ranks == (1..=lane_count).collect::<HashSet<_>>(),
            "arrival ranks are not a permutation of 1..={lane_count}"
        );

        let winner = self
            .registry
            .winner()
            .ok_or_else(|| anyhow!("race finished without a recorded winner"))?;
        ensure!(
            arrivals.first().map(|a| a.name.as_str()) == Some(winner.as_str()),
            "winner does not match the rank-1 finisher"
        );

        Ok(RaceReport {
            lanes: lane_count,
            track_length: self.config.track_length,
            winner,
            elapsed_ms: self.started.elapsed().as_millis(),
            finishers: arrivals
                .into_iter()
                .map(|a| Finisher {
                    rank: a.rank,
                    name: a.name,
                })
                .collect(),
        })
    }
}

fn lane_bar(mp: &MultiProgress, name: &str, length: usize) -> ProgressBar {
    let bar = mp.add(ProgressBar::new(length as u64));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix:>8} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar.set_prefix(name.to_string());
    bar
}
