//! # tpmprobe Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used by the command handlers and the
//! configuration layer. The probe itself never returns an error: every
//! network failure becomes a typed `ProbeOutcome` (see
//! `common::network::probe`). The errors here cover the problems that stop a
//! probe from being attempted at all.
//!
//! ## Architecture
//!
//! - `ProbeError`: a `thiserror` enum for the specific failure kinds
//! - `Result<T>`: a type alias for `anyhow::Result<T>` so handlers can attach context
//!
//! ## Examples
//!
//! ```rust
//! if config.target.port == 0 {
//!     return Err(ProbeError::Config("port must be between 1 and 65535".into()))?;
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the tpmprobe application.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to encode request payload: {source}")]
    Payload {
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
