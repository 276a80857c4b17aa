// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use crate::cli::ConfigCommand;
use crate::config::probe_resolves;
use crate::error::{Error, Result};

use super::Context;

/// Execute a config subcommand.
pub fn run(state_dir: Option<&Path>, cmd: ConfigCommand) -> Result<()> {
    let ctx = Context::open(state_dir)?;
    match cmd {
        ConfigCommand::Show => run_show(&ctx, &mut std::io::stdout()),
    }
}

/// Print the effective configuration, defaults included.
pub(crate) fn run_show(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let content = toml::to_string_pretty(&ctx.config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
    write!(out, "{}", content)?;

    if let Some(probe) = &ctx.config.probe {
        if !probe_resolves(&probe.address) {
            tracing::warn!(address = %probe.address, "probe address does not resolve");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
