//! Command implementations for Pacer CLI
//!
//! This module contains the actual implementations for each CLI command.
//! Each command is organized into its own module for better maintainability.

pub mod primes;
pub mod race;
pub mod version;
