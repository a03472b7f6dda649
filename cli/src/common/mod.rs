//! # tpmprobe Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers, kept apart from
//! command-specific logic (`commands::`) and infrastructure (`core::`).
//!
//! - **`network`**: the raw-socket HTTP probe (request building, socket I/O, response classification).
//! - **`ui`**: terminal rendering helpers for probe output.
//!

/// Raw-socket HTTP probe.
pub mod network;
/// Terminal output helpers.
pub mod ui;
