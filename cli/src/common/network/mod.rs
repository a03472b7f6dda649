//! # tpmprobe Network Utilities (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//!
//! ## Overview
//!
//! A minimal HTTP/1.1 probe written directly against a TCP socket. It exists
//! to answer "what exactly does the backend send back for these exact bytes",
//! which a full HTTP client hides. It is not a general HTTP client: there is
//! no TLS, no connection reuse, no retries and no chunked decoding.
//!
//! ## Architecture
//!
//! One probe flows through the submodules in order:
//!
//! - **`endpoint`**: target host/port and a normalized request path.
//! - **`request`**: builds the request bytes for a `RequestSpec` in one of three wire formats.
//! - **`probe`**: connects, sends, and reads under a deadline, yielding a `ProbeOutcome`.
//! - **`response`**: splits the captured bytes for display and summarises the status.
//!
//! Nothing is retained between probes.
//!
//! ```rust
//! use crate::common::network::{endpoint::Endpoint, probe, request, response};
//!
//! # async fn run_example() {
//! let endpoint = Endpoint::new("127.0.0.1", 8000, "get_tpm_config");
//! let spec = request::RequestSpec::new(endpoint.clone(), request::Method::Get, request::WireFormat::Standard, None);
//! let outcome = probe::run(&endpoint, &request::build(&spec), 5000_u64).await;
//! let (parsed, summary) = response::classify(&outcome, "GET TPM Config");
//! println!("{}: {}", summary, parsed.status_line);
//! # }
//! ```

pub mod endpoint;
pub mod probe;
pub mod request;
pub mod response;
