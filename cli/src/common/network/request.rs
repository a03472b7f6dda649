//! # Request Builder (`common::network::request`)
//!
//! File: cli/src/common/network/request.rs
//!
//! ## Overview
//!
//! Turns a `RequestSpec` into the exact bytes written to the socket. The
//! builder is pure and total: it performs no I/O and cannot fail.
//!
//! Three wire formats are supported, differing only in header completeness:
//!
//! | Format     | Host                 | Extra headers                          | Content-Length |
//! |------------|----------------------|----------------------------------------|----------------|
//! | `Standard` | `:port` unless 80    | `User-Agent`, `Accept`, `Connection`   | with body      |
//! | `Minimal`  | `:port` unless 80    | none                                   | with body      |
//! | `Raw`      | host only            | none                                   | never          |
//!
//! `Raw` is deliberately non-conformant when a body is present (no
//! `Content-Length`, no `Connection: close`) and exists to see how lenient
//! the backend is.
//!
//! Every line ends in CRLF and exactly one empty line separates the header
//! block from the body.
//!
use super::endpoint::Endpoint;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

const CRLF: &str = "\r\n";

/// Value sent in the `User-Agent` header of `Standard` requests.
pub const USER_AGENT: &str = concat!("tpmprobe/", env!("CARGO_PKG_VERSION"));

/// The HTTP methods the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Only POST and PUT carry a request body.
    pub fn allows_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request construction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Full HTTP/1.1 request with descriptive headers and `Connection: close`.
    #[default]
    Standard,
    /// Request line, `Host`, and body framing only.
    Minimal,
    /// Request line and bare `Host`; body sent without `Content-Length`.
    Raw,
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WireFormat::Standard => "Standard HTTP/1.1",
            WireFormat::Minimal => "Minimal HTTP/1.1",
            WireFormat::Raw => "Raw Test",
        })
    }
}

/// Everything needed to build one request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    endpoint: Endpoint,
    method: Method,
    wire_format: WireFormat,
    body: Option<Vec<u8>>,
}

impl RequestSpec {
    /// Creates a spec. A body on GET/DELETE, or an empty body, is dropped.
    pub fn new(
        endpoint: Endpoint,
        method: Method,
        wire_format: WireFormat,
        body: Option<Vec<u8>>,
    ) -> Self {
        let body = match body {
            Some(bytes) if method.allows_body() && !bytes.is_empty() => Some(bytes),
            Some(_) => {
                debug!("Dropping request body for {} request", method);
                None
            }
            None => None,
        };
        Self {
            endpoint,
            method,
            wire_format,
            body,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn wire_format(&self) -> WireFormat {
        self.wire_format
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Builds the request bytes for `spec` according to its wire format.
pub fn build(spec: &RequestSpec) -> Vec<u8> {
    let endpoint = spec.endpoint();
    let mut head = format!(
        "{} {} HTTP/1.1{CRLF}",
        spec.method().as_str(),
        endpoint.path()
    );

    match spec.wire_format() {
        WireFormat::Standard => {
            head.push_str(&format!("Host: {}{CRLF}", host_header(endpoint)));
            head.push_str(&format!("User-Agent: {USER_AGENT}{CRLF}"));
            head.push_str(&format!("Accept: application/json{CRLF}"));
            push_body_headers(&mut head, spec.body());
            head.push_str(&format!("Connection: close{CRLF}"));
        }
        WireFormat::Minimal => {
            head.push_str(&format!("Host: {}{CRLF}", host_header(endpoint)));
            push_body_headers(&mut head, spec.body());
        }
        WireFormat::Raw => {
            head.push_str(&format!("Host: {}{CRLF}", endpoint.host));
            if spec.body().is_some() {
                head.push_str(&format!("Content-Type: application/json{CRLF}"));
            }
        }
    }
    head.push_str(CRLF);

    let mut bytes = head.into_bytes();
    if let Some(body) = spec.body() {
        bytes.extend_from_slice(body);
    }
    bytes
}

/// `host[:port]`, omitting the port when it is the HTTP default.
fn host_header(endpoint: &Endpoint) -> String {
    if endpoint.port == 80 {
        endpoint.host.clone()
    } else {
        endpoint.authority()
    }
}

fn push_body_headers(head: &mut String, body: Option<&[u8]>) {
    if let Some(body) = body {
        head.push_str(&format!("Content-Type: application/json{CRLF}"));
        // Byte length, not character count.
        head.push_str(&format!("Content-Length: {}{CRLF}", body.len()));
    }
}
