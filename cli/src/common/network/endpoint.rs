//! # Probe Target (`common::network::endpoint`)
//!
//! File: cli/src/common/network/endpoint.rs
//!
//! The host, port and request path of one probe. Paths are normalized on
//! construction, so everything downstream can assume a leading `/`.
//!
use std::fmt;

/// Where a probe connects and which resource it requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    path: String,
}

impl Endpoint {
    /// Creates an endpoint, correcting a path that lacks its leading slash.
    pub fn new(host: impl Into<String>, port: u16, path: &str) -> Self {
        Self {
            host: host.into(),
            port,
            path: normalize_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The `host:port` pair used to open the socket.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.host, self.port, self.path)
    }
}

/// Prefixes `/` when missing. Idempotent.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
