//! CLI argument definitions for myterm.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// myterm -- a personal records terminal.
#[derive(Parser)]
#[command(
    name = "myterm",
    version,
    about = "myterm -- a personal records terminal",
    long_about = "An interactive shell for notes, contacts and web shortcuts, \
                  with per-account storage, PIN lock and a safe calculator. \
                  Unrecognized commands are passed to the system shell."
)]
pub struct Cli {
    /// Data directory (defaults to ~/.mypersonalterminal).
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Log in and start the interactive shell (default).
    Run,

    /// Show data directory, accounts and adapter health.
    Status,
}
