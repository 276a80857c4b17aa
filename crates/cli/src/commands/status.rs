// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::network::ConnectivitySignal;

use super::{plural, Context};

#[derive(Debug, Serialize)]
struct StatusJson {
    state_dir: String,
    storage_key: String,
    pending: usize,
    oldest: Option<OldestJson>,
    /// `None` when no probe is configured.
    online: Option<bool>,
}

#[derive(Debug, Serialize)]
struct OldestJson {
    id: String,
    enqueued_at: Option<String>,
    retry_count: u32,
}

pub async fn run(state_dir: Option<&Path>, output: OutputFormat) -> Result<()> {
    let ctx = Context::open(state_dir)?;
    run_impl(&ctx, output, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl(
    ctx: &Context,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let queue = ctx.open_queue().await?;
    let items = queue.items().await;

    let online = match ctx.config.probe_signal() {
        Some(probe) => Some(probe.fetch().await.is_online()),
        None => None,
    };

    let oldest = items.first().map(|r| OldestJson {
        id: r.id.clone(),
        enqueued_at: r
            .enqueued_at()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        retry_count: r.retry_count,
    });

    match output {
        OutputFormat::Text => {
            writeln!(out, "State dir: {}", ctx.state_dir.display())?;
            writeln!(out, "Pending: {}", plural(items.len(), "request"))?;
            if let Some(oldest) = &oldest {
                let when = oldest.enqueued_at.as_deref().unwrap_or("unknown time");
                let retries = plural(oldest.retry_count as usize, "retry attempt");
                writeln!(out, "Oldest: {} (queued {}, {})", oldest.id, when, retries)?;
            }
            let network = match online {
                Some(true) => "online",
                Some(false) => "offline",
                None => "unknown (no probe configured)",
            };
            writeln!(out, "Network: {}", network)?;
        }
        OutputFormat::Json => {
            let status = StatusJson {
                state_dir: ctx.state_dir.display().to_string(),
                storage_key: ctx.config.storage_key.clone(),
                pending: items.len(),
                oldest,
                online,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
