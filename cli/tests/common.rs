//! # tpmprobe CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: locating the compiled binary,
//! writing an isolated config file, and a one-shot fake backend that records
//! the request it receives and answers with canned bytes.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;

/// # Get tpmprobe Command (`tpmprobe_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `tpmprobe` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn tpmprobe_cmd() -> Command {
    Command::cargo_bin("tpmprobe").expect("Failed to find tpmprobe binary for testing")
}

/// Writes a config file targeting `port` on loopback, so tests never read the
/// developer's own user or project configuration.
pub fn isolated_config(port: u16) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("probe.toml");
    std::fs::write(
        &path,
        format!("[target]\nhost = \"127.0.0.1\"\nport = {}\n", port),
    )
    .expect("Failed to write config");
    (dir, path)
}

/// A backend that accepts exactly one connection.
pub struct FakeBackend {
    pub port: u16,
    handle: JoinHandle<Vec<u8>>,
}

impl FakeBackend {
    /// Answers with `response`, then keeps the socket open for `hold` before closing.
    pub fn spawn(response: &'static [u8], hold: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake backend");
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut socket, _) = listener.accept().expect("accept failed");
            socket
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut request = read_request(&mut socket);
            socket.write_all(response).unwrap();
            // Drain anything sent without a Content-Length so the close is orderly.
            socket
                .set_read_timeout(Some(Duration::from_millis(100)))
                .unwrap();
            let mut rest = [0u8; 512];
            while let Ok(n) = socket.read(&mut rest) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&rest[..n]);
            }
            thread::sleep(hold);
            request
        });
        Self { port, handle }
    }

    /// Waits for the connection to finish and returns the bytes received.
    pub fn received(self) -> Vec<u8> {
        self.handle.join().expect("fake backend panicked")
    }
}

/// Reads the header block plus `Content-Length` bytes of body, if declared.
fn read_request(socket: &mut std::net::TcpStream) -> Vec<u8> {
    let mut seen = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        if let Some(end) = find(&seen, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&seen[..end]).to_lowercase();
            let declared = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if seen.len() >= end + 4 + declared {
                return seen;
            }
        }
        match socket.read(&mut buf) {
            Ok(0) | Err(_) => return seen,
            Ok(n) => seen.extend_from_slice(&buf[..n]),
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
