//! # tpmprobe UI Utilities (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Small formatting helpers for showing wire data to a person: making line
//! terminators visible, banner lines between report sections, and JSON pretty
//! printing.
//!

/// Replaces CR and LF with the two-character escapes `\r` and `\n`, so a
/// request can be logged on one line with its terminators visible.
pub fn visible_line_endings(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

/// Converts CRLF terminators to LF for display.
pub fn crlf_to_lf(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// A section banner such as `--- RESPONSE ---`.
pub fn section(title: &str) -> String {
    format!("--- {} ---", title)
}

/// Pretty-prints `body` if it is a complete JSON document.
pub fn pretty_json(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_line_endings() {
        assert_eq!(
            visible_line_endings("GET / HTTP/1.1\r\nHost: x\r\n\r\n"),
            "GET / HTTP/1.1\\r\\nHost: x\\r\\n\\r\\n"
        );
    }

    #[test]
    fn test_crlf_to_lf_leaves_bare_lf() {
        assert_eq!(crlf_to_lf("a\r\nb\nc\r\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_section() {
        assert_eq!(section("REQUEST SENT"), "--- REQUEST SENT ---");
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(
            pretty_json("{\"a\":1}").as_deref(),
            Some("{\n  \"a\": 1\n}")
        );
        // Truncated bodies are not JSON and are shown as received.
        assert_eq!(pretty_json("{\"a\":"), None);
    }
}
