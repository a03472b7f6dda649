//! # tpmprobe Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand. Each exposes an `*Args` struct parsed
//! by Clap and an async `handle_*` function called from `main`.
//!
//! - **`probe`**: send one raw HTTP request and report the response
//! - **`endpoints`**: list the backend operations the probe knows
//!
pub mod endpoints;
pub mod probe;
