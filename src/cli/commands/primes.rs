//! Prime-search command implementation

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Args;

use crate::cli::Output;
use crate::coordinator::{PrimeRun, PrimesConfig, PrimesReport};
use crate::sync::{AutoPauser, StdinSignal};
use crate::worker::prime::DEFAULT_CHECKPOINT_EVERY;

#[derive(Args)]
pub struct PrimesArgs {
    /// Upper bound of the search interval [0, MAX], inclusive
    #[arg(long, default_value = "30000000")]
    pub max: u64,

    /// Number of worker threads (0 = one per CPU core)
    #[arg(short, long, default_value = "3")]
    pub workers: usize,

    /// Candidates scanned between pause-gate checkpoints
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_EVERY)]
    pub checkpoint_every: u64,

    /// Automatically pause every SECS seconds; resume on ENTER
    #[arg(long, value_name = "SECS")]
    pub pause_every: Option<f64>,

    /// Print the primes each worker found, not just the counts
    #[arg(long)]
    pub show_primes: bool,
}

/// Execute the primes command
pub fn execute(args: PrimesArgs, format: &str, output: &Output) -> Result<()> {
    ensure!(
        matches!(format, "text" | "json"),
        "unsupported output format: {format}"
    );
    if let Some(secs) = args.pause_every {
        ensure!(secs > 0.0, "--pause-every must be positive");
    }

    // JSON mode keeps stdout machine-readable; decorations are dropped.
    let output = &Output::new(
        output.is_verbose(),
        output.is_quiet() || format == "json",
    );

    let config = PrimesConfig {
        max: args.max,
        workers: args.workers,
        checkpoint_every: args.checkpoint_every,
        pause_every: args.pause_every.map(Duration::from_secs_f64),
        include_primes: args.show_primes,
    };

    output.header("🔢 Prime Search");
    let run = PrimeRun::start(config.clone())?;
    for (i, (start, end)) in run.ranges().iter().enumerate() {
        output.step(&format!("worker {} searching {start} to {end}", i + 1));
    }
    if let Some(interval) = config.pause_every {
        output.info(&format!(
            "auto-pause every {:.1}s, press ENTER to resume",
            interval.as_secs_f64()
        ));
    }

    let pauser = config.pause_every.map(|interval| {
        let counters = run.counters();
        let pause_output = Output::new(output.is_verbose(), output.is_quiet());
        AutoPauser::start(
            run.gate(),
            interval,
            Arc::new(StdinSignal),
            move || {
                let found: usize = counters
                    .iter()
                    .map(|c| c.load(std::sync::atomic::Ordering::Relaxed))
                    .sum();
                pause_output.blank_line();
                pause_output.warning(&format!(
                    "paused, {found} primes found so far, press ENTER to resume"
                ));
            },
        )
    });

    let report = run.join()?;
    if let Some(pauser) = pauser {
        pauser.stop();
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, args.show_primes, output);
    }
    Ok(())
}

fn print_report(report: &PrimesReport, show_primes: bool, output: &Output) {
    output.separator();
    for worker in &report.workers {
        output.key_value(
            &format!("worker {} [{}, {}]:", worker.id, worker.start, worker.end),
            &format!("{} primes", worker.primes_found),
            false,
        );
        if show_primes {
            if let Some(primes) = &worker.primes {
                let rendered: Vec<String> =
                    primes.iter().map(|p| p.to_string()).collect();
                output.list_item(&rendered.join(" "));
            }
        }
    }
    output.separator();
    output.summary_stats("Total primes found:", report.total_primes);
    output.key_value(
        "Elapsed:",
        &format!("{} ms", report.elapsed_ms),
        false,
    );
    output.success(&format!(
        "searched [0, {}] with {} workers",
        report.max, report.worker_count
    ));
}
