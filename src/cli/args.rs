//! CLI argument definitions using clap
//!
//! Commands:
//! - pokedex init --config <path>
//! - pokedex seed --config <path>
//! - pokedex start --config <path> [--seed]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pokedex - a small, file-backed REST catalog of Pokemon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./pokedex.json")]
        config: PathBuf,
    },

    /// Rebuild the store from the configured CSV and image directory
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./pokedex.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./pokedex.json")]
        config: PathBuf,

        /// Re-seed the store before serving
        #[arg(long)]
        seed: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_seed_flag() {
        let cli =
            Cli::try_parse_from(["pokedex", "start", "--config", "x.json", "--seed"]).unwrap();
        match cli.command {
            Command::Start { config, seed } => {
                assert_eq!(config, PathBuf::from("x.json"));
                assert!(seed);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["pokedex", "seed"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Seed { ref config } if config == &PathBuf::from("./pokedex.json")
        ));
    }
}
