//! CLI argument definitions using clap
//!
//! Commands:
//! - goods-item-store serve [--config <path>]
//! - goods-item-store validate [--config <path>] --schema <name> <document>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Goods item trade record store
#[derive(Parser, Debug)]
#[command(name = "goods-item-store")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a JSON document against a request schema and print the
    /// violations
    Validate {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Schema name, e.g. create-record
        #[arg(long)]
        schema: String,

        /// Document to validate; `-` reads stdin
        document: PathBuf,
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
    fn test_parse_serve() {
        let cli =
            Cli::try_parse_from(["goods-item-store", "serve", "--config", "store.json"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, Some(PathBuf::from("store.json"))),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "goods-item-store",
            "validate",
            "--schema",
            "create-record",
            "record.json",
        ])
        .unwrap();
        match cli.command {
            Command::Validate {
                config,
                schema,
                document,
            } => {
                assert_eq!(config, None);
                assert_eq!(schema, "create-record");
                assert_eq!(document, PathBuf::from("record.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_schema() {
        assert!(Cli::try_parse_from(["goods-item-store", "validate", "record.json"]).is_err());
    }
}
