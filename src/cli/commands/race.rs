//! Race command implementation

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Args;

use crate::cli::Output;
use crate::coordinator::{RaceConfig, RaceReport, RaceRun};
use crate::sync::{AutoPauser, StdinSignal};

#[derive(Args)]
pub struct RaceArgs {
    /// Number of lanes, one thread each
    #[arg(short, long, default_value = "4")]
    pub lanes: usize,

    /// Steps from start to finish line
    #[arg(long, default_value = "100")]
    pub track_length: usize,

    /// Milliseconds of simulated work per step
    #[arg(long, default_value = "100")]
    pub step_ms: u64,

    /// Automatically pause every SECS seconds; resume on ENTER
    #[arg(long, value_name = "SECS")]
    pub pause_every: Option<f64>,
}

/// Execute the race command
pub fn execute(args: RaceArgs, format: &str, output: &Output) -> Result<()> {
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

    let config = RaceConfig {
        lanes: args.lanes,
        track_length: args.track_length,
        step_delay: Duration::from_millis(args.step_ms),
    };

    output.header("🏁 Race");
    output.step(&format!(
        "{} lanes over {} steps",
        config.lanes, config.track_length
    ));

    let bars = output.multi_progress();
    let run = RaceRun::start(config, bars.as_ref())?;

    let pauser = args.pause_every.map(|secs| {
        let pause_output = Output::new(output.is_verbose(), output.is_quiet());
        AutoPauser::start(
            run.gate(),
            Duration::from_secs_f64(secs),
            Arc::new(StdinSignal),
            move || {
                pause_output.blank_line();
                pause_output.warning("race paused, press ENTER to resume");
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
        print_report(&report, output);
    }
    Ok(())
}

fn print_report(report: &RaceReport, output: &Output) {
    output.separator();
    for finisher in &report.finishers {
        output.key_value(
            &format!("#{}", finisher.rank),
            &finisher.name,
            finisher.rank == 1,
        );
    }
    output.separator();
    output.key_value("Winner:", &report.winner, true);
    output.key_value("Elapsed:", &format!("{} ms", report.elapsed_ms), false);
    output.success(&format!(
        "{} lanes finished a {}-step track",
        report.lanes, report.track_length
    ));
}
