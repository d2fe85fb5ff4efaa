//! Command-line interface for Pacer
//!
//! This module provides the main CLI structure and command handling for
//! Pacer. It uses clap for argument parsing and provides a clean,
//! user-friendly interface.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

/// Pacer - Pausable Concurrent Workers
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search for primes with a pausable worker pool
    Primes(commands::primes::PrimesArgs),
    /// Run a multi-lane race with a shared pause gate
    Race(commands::race::RaceArgs),
    /// Show version information
    Version,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        // Initialize output handler with global verbose and quiet settings
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Some(Commands::Primes(args)) => {
                commands::primes::execute(args, &self.format, &output)
            }
            Some(Commands::Race(args)) => {
                commands::race::execute(args, &self.format, &output)
            }
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
