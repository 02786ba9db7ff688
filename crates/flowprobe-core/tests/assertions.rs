// crates/flowprobe-core/tests/assertions.rs
// ============================================================================
// Module: Assertion And Response Tests
// Description: Coverage for body assertions, responses, and HTML escaping.
// Purpose: Ensure failures report both expected and actual content.
// Dependencies: flowprobe-core
// ============================================================================

//! ## Overview
//! Validates body-contains assertions, success-status enforcement, and the
//! escaping used to match server-rendered message text.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions are permitted."
)]

use flowprobe_core::AssertionError;
use flowprobe_core::PageResponse;
use flowprobe_core::TransportError;
use flowprobe_core::body_contains;
use flowprobe_core::html;

#[test]
fn present_content_passes() {
    let body = "<html><body>Hello user@flowprobe.test!</body></html>";
    assert!(body_contains(body, "Hello user@flowprobe.test!").is_ok());
}

#[test]
fn absent_content_reports_expected_and_excerpt() {
    let body = "<html><body>Unexpected page</body></html>";
    let error = body_contains(body, "Hello user@flowprobe.test!")
        .expect_err("assertion should fail");
    let AssertionError::MissingContent {
        expected,
        excerpt,
    } = error;
    assert_eq!(expected, "Hello user@flowprobe.test!");
    assert!(excerpt.contains("Unexpected page"));
}

#[test]
fn long_bodies_are_excerpted() {
    let body = "x".repeat(5_000);
    let error = body_contains(&body, "absent").expect_err("assertion should fail");
    let AssertionError::MissingContent {
        excerpt, ..
    } = error;
    assert!(excerpt.chars().count() <= 200);
}

#[test]
fn success_statuses_pass_ensure() {
    let response = PageResponse {
        status: 200,
        body: "ok".to_string(),
    };
    assert!(response.is_success());
    assert!(response.ensure_success().is_ok());
}

#[test]
fn failure_statuses_carry_excerpts() {
    let response = PageResponse {
        status: 400,
        body: "anti-forgery validation failed".to_string(),
    };
    assert!(!response.is_success());
    let error = response.ensure_success().expect_err("ensure should fail");
    assert_eq!(
        error,
        TransportError::UnexpectedStatus {
            status: 400,
            excerpt: "anti-forgery validation failed".to_string(),
        }
    );
}

#[test]
fn escape_encodes_rendered_text() {
    assert_eq!(html::escape("('a'-'z')"), "(&#x27;a&#x27;-&#x27;z&#x27;)");
    assert_eq!(html::escape("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    assert_eq!(html::escape("plain text"), "plain text");
}
