// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "requeue")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and manage the offline request queue")]
#[command(
    long_about = "Inspect and manage the offline request queue.\n\n\
    Requests that could not be sent while offline are persisted in the state \
    directory and retried when connectivity returns."
)]
pub struct Cli {
    /// State directory holding config.toml and the persisted queue
    #[arg(long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show queue length, oldest entry and connectivity
    Status {
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// List queued requests in processing order
    List {
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Drop every queued request
    Clear,
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
