//! # tpmprobe Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every command:
//! - `config`: loading, merging and validating `.tpmprobe.toml` settings
//! - `error`: error types and the `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{ProbeError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
