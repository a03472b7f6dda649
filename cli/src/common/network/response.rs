//! # Response Classifier (`common::network::response`)
//!
//! File: cli/src/common/network/response.rs
//!
//! ## Overview
//!
//! Derives a display view from the bytes captured by a probe, and a
//! one-line status summary for the operation that was attempted.
//!
//! **Not an HTTP parser.** The header/body split ignores the blank line that
//! terminates HTTP headers and instead cuts at the first `{` or `[` in the
//! text. A header value containing either character moves the split point.
//! Chunked bodies are shown with their chunk-size lines intact. This is a
//! best-effort view for a person reading probe output.
//!
//! Status recognition is a substring search for a fixed list of
//! `HTTP/1.1 <code>` patterns. Bytes with none of them are summarised as
//! "Connection successful", which distinguishes "got something" from "got
//! nothing" but says nothing about whether the server spoke HTTP.
//!
use super::probe::{Completion, ProbeOutcome};
use std::fmt;

/// Status lines the classifier recognises, checked in this order.
const KNOWN_STATUSES: [(u16, &str); 7] = [
    (200, "OK"),
    (201, "Created"),
    (204, "No Content"),
    (404, "Not Found"),
    (400, "Bad Request"),
    (422, "Validation Error"),
    (500, "Server Error"),
];

/// Read-only view over the captured bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    /// First line of the header block, without its line terminator.
    pub status_line: String,
    /// Everything before the body, status line included.
    pub header_block: String,
    /// Everything from the first `{` or `[` onward.
    pub body: String,
    pub looks_like_json: bool,
}

impl ParsedResponse {
    /// Splits `raw` at the first `{` or `[`. Invalid UTF-8 is replaced, not rejected.
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        let text = String::from_utf8_lossy(raw);
        let json_start = match (text.find('{'), text.find('[')) {
            (Some(brace), Some(bracket)) => Some(brace.min(bracket)),
            (brace, bracket) => brace.or(bracket),
        };
        let (header_block, body) = match json_start {
            Some(idx) => (&text[..idx], &text[idx..]),
            None => (&text[..], ""),
        };
        let status_line = header_block
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim_end_matches('\r')
            .to_string();

        Self {
            status_line,
            header_block: header_block.to_string(),
            body: body.to_string(),
            looks_like_json: json_start.is_some(),
        }
    }
}

/// How alarming a summary is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// What the classifier could tell about the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// A recognised status line.
    Status { code: u16, reason: &'static str },
    /// Bytes arrived but none of the known status patterns matched.
    Unrecognized,
    /// The connection succeeded but nothing came back.
    NoData,
    /// The socket never opened.
    ConnectFailed { reason: String },
}

/// Human-readable outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub verdict: Verdict,
    pub severity: Severity,
    pub text: String,
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Classifies a probe outcome: the parsed view plus its summary.
pub fn classify(outcome: &ProbeOutcome, operation_label: &str) -> (ParsedResponse, StatusSummary) {
    let parsed = ParsedResponse::from_bytes(outcome.raw_bytes());
    let summary = summarize(outcome, &parsed, operation_label);
    (parsed, summary)
}

/// Builds the status summary for `outcome`, e.g. `UPDATE TPM - SUCCESS (200 OK)`.
pub fn summarize(outcome: &ProbeOutcome, parsed: &ParsedResponse, operation_label: &str) -> StatusSummary {
    let timed_out = *outcome.completion() == Completion::TimedOut;

    if let Completion::ConnectFailed { reason } = outcome.completion() {
        return StatusSummary {
            verdict: Verdict::ConnectFailed {
                reason: reason.clone(),
            },
            severity: Severity::Error,
            text: "Connection failed".to_string(),
        };
    }

    if outcome.raw_bytes().is_empty() {
        let text = if timed_out {
            format!("Timed out after {} ms with no data", outcome.elapsed_ms())
        } else {
            "Connection closed with no data".to_string()
        };
        return StatusSummary {
            verdict: Verdict::NoData,
            severity: Severity::Warning,
            text,
        };
    }

    let text = String::from_utf8_lossy(outcome.raw_bytes());
    let (verdict, mut severity, mut summary) = match recognize_status(&text) {
        Some((code, reason)) => {
            let (kind, severity) = if code < 400 {
                ("SUCCESS", Severity::Ok)
            } else {
                ("ERROR", Severity::Error)
            };
            (
                Verdict::Status { code, reason },
                severity,
                format!("{} - {} ({} {})", operation_label, kind, code, reason),
            )
        }
        None => (
            Verdict::Unrecognized,
            Severity::Warning,
            "Connection successful".to_string(),
        ),
    };

    if parsed.looks_like_json {
        summary.push_str(" - JSON response received");
    }
    if timed_out {
        summary.push_str(" - timed out, response may be incomplete");
        if severity == Severity::Ok {
            severity = Severity::Warning;
        }
    }

    StatusSummary {
        verdict,
        severity,
        text: summary,
    }
}

fn recognize_status(text: &str) -> Option<(u16, &'static str)> {
    KNOWN_STATUSES
        .iter()
        .find(|(code, _)| text.contains(&format!("HTTP/1.1 {}", code)))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(raw: &str) -> ProbeOutcome {
        ProbeOutcome::new(Completion::Closed, raw.as_bytes().to_vec(), 12)
    }

    #[test]
    fn test_empty_bytes_parse_to_empty_view() {
        let parsed = ParsedResponse::from_bytes(b"");
        assert_eq!(parsed, ParsedResponse::default());
        assert!(!parsed.looks_like_json);
    }

    #[test]
    fn test_split_at_first_brace() {
        let parsed = ParsedResponse::from_bytes(b"HTTP/1.1 200 OK\r\n\r\n{\"a\":1}");
        assert_eq!(parsed.status_line, "HTTP/1.1 200 OK");
        assert_eq!(parsed.header_block, "HTTP/1.1 200 OK\r\n\r\n");
        assert_eq!(parsed.body, "{\"a\":1}");
        assert!(parsed.looks_like_json);
    }

    #[test]
    fn test_split_uses_earliest_of_brace_and_bracket() {
        let parsed = ParsedResponse::from_bytes(b"HTTP/1.1 200 OK\r\n\r\n[{\"id\":1}]");
        assert_eq!(parsed.body, "[{\"id\":1}]");

        let parsed = ParsedResponse::from_bytes(b"HTTP/1.1 200 OK\r\n\r\n{\"ids\":[1,2]}");
        assert_eq!(parsed.body, "{\"ids\":[1,2]}");
    }

    #[test]
    fn test_no_json_keeps_everything_in_header_block() {
        let raw = "HTTP/1.1 204 No Content\r\nserver: uvicorn\r\n\r\n";
        let parsed = ParsedResponse::from_bytes(raw.as_bytes());
        assert_eq!(parsed.header_block, raw);
        assert_eq!(parsed.status_line, "HTTP/1.1 204 No Content");
        assert!(parsed.body.is_empty());
        assert!(!parsed.looks_like_json);
    }

    #[test]
    fn test_brace_in_header_moves_split() {
        let parsed = ParsedResponse::from_bytes(b"HTTP/1.1 200 OK\r\nx-note: {x}\r\n\r\nplain");
        assert_eq!(parsed.header_block, "HTTP/1.1 200 OK\r\nx-note: ");
        assert!(parsed.looks_like_json);
    }

    #[test]
    fn test_summary_success_with_json() {
        let outcome = closed("HTTP/1.1 200 OK\r\n\r\n{\"TPM\":\"Box\"}");
        let (_, summary) = classify(&outcome, "UPDATE TPM");
        assert_eq!(
            summary.text,
            "UPDATE TPM - SUCCESS (200 OK) - JSON response received"
        );
        assert_eq!(summary.severity, Severity::Ok);
        assert_eq!(
            summary.verdict,
            Verdict::Status {
                code: 200,
                reason: "OK"
            }
        );
    }

    #[test]
    fn test_summary_known_codes() {
        let cases = [
            ("HTTP/1.1 201 Created\r\n\r\n", "CREATE TPM - SUCCESS (201 Created)", Severity::Ok),
            ("HTTP/1.1 204 No Content\r\n\r\n", "CREATE TPM - SUCCESS (204 No Content)", Severity::Ok),
            ("HTTP/1.1 400 Bad Request\r\n\r\n", "CREATE TPM - ERROR (400 Bad Request)", Severity::Error),
            ("HTTP/1.1 404 Not Found\r\n\r\n", "CREATE TPM - ERROR (404 Not Found)", Severity::Error),
            ("HTTP/1.1 422 Unprocessable Entity\r\n\r\n", "CREATE TPM - ERROR (422 Validation Error)", Severity::Error),
            ("HTTP/1.1 500 Internal Server Error\r\n\r\n", "CREATE TPM - ERROR (500 Server Error)", Severity::Error),
        ];
        for (raw, expected, severity) in cases {
            let (_, summary) = classify(&closed(raw), "CREATE TPM");
            assert_eq!(summary.text, expected);
            assert_eq!(summary.severity, severity);
        }
    }

    #[test]
    fn test_unrecognized_status_is_connection_successful() {
        let (parsed, summary) = classify(&closed("HTTP/1.0 302 Found\r\n\r\n"), "GET TPM Config");
        assert_eq!(summary.text, "Connection successful");
        assert_eq!(summary.verdict, Verdict::Unrecognized);
        assert_eq!(parsed.status_line, "HTTP/1.0 302 Found");
    }

    #[test]
    fn test_no_data_differs_from_unrecognized() {
        let (_, summary) = classify(&closed(""), "GET TPM Config");
        assert_eq!(summary.verdict, Verdict::NoData);
        assert_ne!(summary.text, "Connection successful");
    }

    #[test]
    fn test_timed_out_is_a_warning_and_keeps_status() {
        let outcome = ProbeOutcome::new(
            Completion::TimedOut,
            b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\n\r\n{\"a\"".to_vec(),
            5001,
        );
        let (parsed, summary) = classify(&outcome, "GET TPM by ID");
        assert_eq!(summary.severity, Severity::Warning);
        assert!(summary.text.starts_with("GET TPM by ID - SUCCESS (200 OK)"));
        assert!(summary.text.ends_with("timed out, response may be incomplete"));
        assert_eq!(parsed.body, "{\"a\"");
    }

    #[test]
    fn test_connect_failed_carries_reason() {
        let outcome = ProbeOutcome::new(
            Completion::ConnectFailed {
                reason: "Connection refused (os error 111)".into(),
            },
            Vec::new(),
            0,
        );
        let (parsed, summary) = classify(&outcome, "DELETE TPM");
        assert_eq!(summary.severity, Severity::Error);
        assert_eq!(summary.text, "Connection failed");
        assert!(matches!(summary.verdict, Verdict::ConnectFailed { ref reason } if reason.contains("refused")));
        assert_eq!(parsed, ParsedResponse::default());
    }
}
