//! CLI module for edmquery
//!
//! Provides command-line interface for:
//! - query: one-shot request execution against an in-memory engine
//! - explain: one-shot compilation without execution

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, query, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
