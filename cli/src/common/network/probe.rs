//! # Socket Probe (`common::network::probe`)
//!
//! File: cli/src/common/network/probe.rs
//!
//! ## Overview
//!
//! Owns one TCP connection for the length of one probe:
//!
//! 1. **Connecting**: open `host:port`, bounded by the connect timeout. A
//!    failure ends the probe as `ConnectFailed` with no bytes.
//! 2. **Sending**: write the request bytes unchanged.
//! 3. **Receiving**: read chunks of up to `READ_CHUNK_SIZE` bytes into an
//!    accumulator until the peer closes the stream (`Closed`) or the read
//!    deadline passes (`TimedOut`).
//! 4. **Closing**: the socket is shut down and dropped on every path.
//!
//! Each read is a blocking-style `read` raced against an absolute deadline
//! with `tokio::time::timeout_at`, so the total wait is bounded without
//! polling, and whatever arrived before the deadline is kept.
//!
//! `run` never returns an error. Every failure is encoded in the returned
//! `ProbeOutcome`.
//!
use super::endpoint::Endpoint;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

/// Upper bound on a single socket read.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Connect timeout used when only a read timeout is supplied.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Terminal state of a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The peer ended the stream.
    Closed,
    /// The deadline passed before the peer ended the stream.
    TimedOut,
    /// The socket could not be opened; `reason` is the underlying error text.
    ConnectFailed { reason: String },
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Closed => f.write_str("closed by peer"),
            Completion::TimedOut => f.write_str("timed out"),
            Completion::ConnectFailed { .. } => f.write_str("connect failed"),
        }
    }
}

/// The result of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    completion: Completion,
    raw_bytes: Vec<u8>,
    elapsed_ms: u64,
}

impl ProbeOutcome {
    pub fn new(completion: Completion, raw_bytes: Vec<u8>, elapsed_ms: u64) -> Self {
        Self {
            completion,
            raw_bytes,
            elapsed_ms,
        }
    }

    fn connect_failed(reason: String) -> Self {
        Self::new(Completion::ConnectFailed { reason }, Vec::new(), 0)
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Wall-clock time spent sending and receiving. Zero when the connect failed.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}

/// Time limits for one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    /// Budget for sending plus receiving, measured from the start of the send.
    pub read: Duration,
    pub connect: Duration,
}

impl ProbeTimeouts {
    /// Uses `timeout_ms` for the exchange and the shorter of it and
    /// `DEFAULT_CONNECT_TIMEOUT` for the connect.
    pub fn from_read_ms(timeout_ms: u64) -> Self {
        let read = Duration::from_millis(timeout_ms);
        Self {
            read,
            connect: read.min(DEFAULT_CONNECT_TIMEOUT),
        }
    }
}

impl From<u64> for ProbeTimeouts {
    fn from(timeout_ms: u64) -> Self {
        Self::from_read_ms(timeout_ms)
    }
}

/// Runs a probe: connect, send `request`, collect the response, close.
///
/// `timeouts` is either a read timeout in milliseconds or a full
/// `ProbeTimeouts`.
#[instrument(skip(endpoint, request, timeouts), fields(endpoint = %endpoint))]
pub async fn run(
    endpoint: &Endpoint,
    request: &[u8],
    timeouts: impl Into<ProbeTimeouts>,
) -> ProbeOutcome {
    let timeouts = timeouts.into();
    let mut stream = match connect(endpoint, timeouts.connect).await {
        Ok(stream) => stream,
        Err(reason) => {
            warn!("Connection to {} failed: {}", endpoint.authority(), reason);
            return ProbeOutcome::connect_failed(reason);
        }
    };

    let started = Instant::now();
    let (completion, raw_bytes) = exchange(&mut stream, request, started + timeouts.read).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    close(stream).await;

    info!(
        "Probe finished: {} ({} bytes in {} ms)",
        completion,
        raw_bytes.len(),
        elapsed_ms
    );
    ProbeOutcome::new(completion, raw_bytes, elapsed_ms)
}

async fn connect(endpoint: &Endpoint, limit: Duration) -> Result<TcpStream, String> {
    debug!("Connecting to {}", endpoint.authority());
    match timeout(limit, TcpStream::connect((endpoint.host.as_str(), endpoint.port))).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "connection to {} timed out after {} ms",
            endpoint.authority(),
            limit.as_millis()
        )),
    }
}

/// Sends the request and reads until the peer closes or `deadline` passes.
async fn exchange(
    stream: &mut TcpStream,
    request: &[u8],
    deadline: Instant,
) -> (Completion, Vec<u8>) {
    let mut received = Vec::new();

    match timeout_at(deadline, stream.write_all(request)).await {
        Err(_) => {
            warn!("Timed out while sending the request");
            return (Completion::TimedOut, received);
        }
        // The server may still have answered before dropping the connection.
        Ok(Err(e)) => warn!("Failed to send request ({}); reading any response", e),
        Ok(Ok(())) => debug!("Sent {} bytes", request.len()),
    }

    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match timeout_at(deadline, stream.read(&mut chunk)).await {
            Err(_) => {
                warn!("Timeout reading response after {} bytes", received.len());
                return (Completion::TimedOut, received);
            }
            Ok(Ok(0)) => return (Completion::Closed, received),
            Ok(Ok(n)) => {
                debug!("Read chunk of {} bytes", n);
                received.extend_from_slice(&chunk[..n]);
            }
            Ok(Err(e)) => {
                // A reset ends the stream just like an orderly close.
                warn!("Read failed: {}", e);
                return (Completion::Closed, received);
            }
        }
    }
}

async fn close(mut stream: TcpStream) {
    if let Err(e) = stream.shutdown().await {
        debug!("Socket shutdown reported: {}", e);
    }
}
