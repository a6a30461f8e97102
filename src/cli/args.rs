//! CLI argument definitions using clap
//!
//! Commands:
//! - edmquery query --model <path> --documents <path> [--config <path>]
//! - edmquery explain --model <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// edmquery - compiles entity-model queries into search engine queries
#[derive(Parser, Debug)]
#[command(name = "edmquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a single request read from stdin and exit
    Query {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the entity model file
        #[arg(long)]
        model: PathBuf,

        /// Path to the JSON array of stored documents
        #[arg(long)]
        documents: PathBuf,
    },

    /// Print the search call a request compiles to, without executing it
    Explain {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the entity model file
        #[arg(long)]
        model: PathBuf,
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
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "edmquery",
            "query",
            "--model",
            "model.json",
            "--documents",
            "docs.json",
        ])
        .unwrap();
        match cli.command {
            Command::Query {
                config,
                model,
                documents,
            } => {
                assert!(config.is_none());
                assert_eq!(model, PathBuf::from("model.json"));
                assert_eq!(documents, PathBuf::from("docs.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_explain_requires_model() {
        assert!(Cli::try_parse_from(["edmquery", "explain"]).is_err());
    }
}
