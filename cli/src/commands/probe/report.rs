//! # Probe Report Rendering
//!
//! File: cli/src/commands/probe/report.rs
//!
//! ## Overview
//!
//! Formats one probe run for the terminal:
//!
//! ```text
//! --- REQUEST SENT ---            (only with --show-request)
//! PUT /update_tpm/7 HTTP/1.1
//! ...
//! --- RESPONSE ---
//! HTTP/1.1 200 OK
//! content-type: application/json
//!
//! --- JSON RESPONSE ---
//! { ... pretty printed when it parses ... }
//!
//! ✅ UPDATE TPM - SUCCESS (200 OK) - JSON response received
//! Status line: HTTP/1.1 200 OK
//! Completion: closed by peer | 143 bytes | 12 ms
//! ```
//!
use crate::common::network::probe::{Completion, ProbeOutcome};
use crate::common::network::response::{ParsedResponse, Severity, StatusSummary, Verdict};
use crate::common::ui;

/// Everything a report needs from one probe run.
pub struct Report<'a> {
    pub request: &'a [u8],
    pub show_request: bool,
    pub outcome: &'a ProbeOutcome,
    pub parsed: &'a ParsedResponse,
    pub summary: &'a StatusSummary,
}

impl Report<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.show_request {
            out.push_str(&ui::section("REQUEST SENT"));
            out.push('\n');
            out.push_str(&ui::crlf_to_lf(&String::from_utf8_lossy(self.request)));
            out.push('\n');
            out.push_str(&ui::section("RESPONSE"));
            out.push('\n');
        }

        match self.outcome.completion() {
            Completion::ConnectFailed { reason } => {
                out.push_str(&format!("Connection failed: {}\n", reason));
            }
            _ if self.parsed.looks_like_json => {
                out.push_str(ui::crlf_to_lf(&self.parsed.header_block).trim_end());
                out.push_str("\n\n");
                out.push_str(&ui::section("JSON RESPONSE"));
                out.push('\n');
                let body = ui::pretty_json(&self.parsed.body)
                    .unwrap_or_else(|| self.parsed.body.clone());
                out.push_str(&body);
                out.push('\n');
            }
            _ => {
                let text = ui::crlf_to_lf(&String::from_utf8_lossy(self.outcome.raw_bytes()));
                out.push_str(&text);
                if !text.is_empty() && !text.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out.push('\n');
        out.push_str(&format!("{} {}\n", severity_icon(self.summary.severity), self.summary));
        if self.summary.verdict == Verdict::Unrecognized {
            out.push_str("Note: no recognised HTTP/1.1 status line in the response\n");
        }
        out.push_str(&self.footer());
        out
    }

    fn footer(&self) -> String {
        let mut footer = String::new();
        if !self.parsed.status_line.is_empty() {
            footer.push_str(&format!("Status line: {}\n", self.parsed.status_line));
        }
        match self.outcome.completion() {
            Completion::ConnectFailed { .. } => footer.push_str("Completion: connect failed\n"),
            completion => footer.push_str(&format!(
                "Completion: {} | {} bytes | {} ms\n",
                completion,
                self.outcome.raw_bytes().len(),
                self.outcome.elapsed_ms()
            )),
        }
        footer
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => "✅",
        Severity::Warning => "⚠️",
        Severity::Error => "❌",
    }
}
