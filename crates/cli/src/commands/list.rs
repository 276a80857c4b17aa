// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use rq_core::QueuedRequest;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::Context;

pub async fn run(state_dir: Option<&Path>, output: OutputFormat) -> Result<()> {
    let ctx = Context::open(state_dir)?;
    run_impl(&ctx, output, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl(
    ctx: &Context,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let items = ctx.open_queue().await?.items().await;

    match output {
        OutputFormat::Text => {
            if items.is_empty() {
                writeln!(out, "No queued requests.")?;
                return Ok(());
            }
            for item in &items {
                writeln!(out, "{}", format_line(item))?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        }
    }
    Ok(())
}

/// `<id>  <METHOD> <url>  retries=<n>  <queued at>`
fn format_line(item: &QueuedRequest) -> String {
    let queued = item
        .enqueued_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {} {}  retries={}  {}",
        item.id, item.method, item.url, item.retry_count, queued
    )
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
