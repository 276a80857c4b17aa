// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::Path;

use crate::error::Result;

use super::{plural, Context};

pub async fn run(state_dir: Option<&Path>) -> Result<()> {
    let ctx = Context::open(state_dir)?;
    run_impl(&ctx, &mut std::io::stdout()).await
}

pub(crate) async fn run_impl(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let queue = ctx.open_queue().await?;
    let dropped = queue.size();
    queue.clear().await;
    writeln!(out, "Cleared {}.", plural(dropped, "queued request"))?;
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
