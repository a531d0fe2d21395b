//! CLI module for Pokedex
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - seed: Rebuild the store from CSV
//! - start: Load the store and serve HTTP

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, seed, start};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
