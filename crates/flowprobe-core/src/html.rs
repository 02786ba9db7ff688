// crates/flowprobe-core/src/html.rs
// ============================================================================
// Module: HTML Escaping
// Description: Minimal HTML text escaping for rendered content.
// Purpose: Match server-side encoding when asserting on page bodies.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Server-rendered identity pages HTML-encode message text, so validation
//! messages containing apostrophes arrive as `&#x27;` in the body. Assertions
//! must compare against the encoded form. This module provides the one
//! escaping function shared by flow assertions and test stubs; both sides
//! encoding identically is what keeps the comparisons literal.

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes text the way the target framework encodes rendered content.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
