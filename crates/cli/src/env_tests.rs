// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::REQUEUE_STATE_DIR, "REQUEUE_STATE_DIR");
    assert_eq!(vars::XDG_STATE_HOME, "XDG_STATE_HOME");
    assert_eq!(vars::RUST_LOG, "RUST_LOG");
}

#[test]
fn test_state_dir_set_and_empty() {
    std::env::set_var("REQUEUE_STATE_DIR", "/tmp/requeue-state");
    assert_eq!(state_dir(), Some(PathBuf::from("/tmp/requeue-state")));
    std::env::set_var("REQUEUE_STATE_DIR", "");
    assert_eq!(state_dir(), None);
    std::env::remove_var("REQUEUE_STATE_DIR");
    assert_eq!(state_dir(), None);
}
