// crates/flowprobe-core/src/assertions.rs
// ============================================================================
// Module: Body Assertions
// Description: Content assertions over rendered response bodies.
// Purpose: Report expected and actual snippets on assertion failure.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Scenario steps assert on rendered HTML by substring. A failed assertion
//! carries both the expected snippet and a leading excerpt of the actual body
//! so a broken page contract can be diagnosed from the failure message alone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters captured in a body excerpt.
const EXCERPT_CHARS: usize = 200;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Body content assertion failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssertionError {
    /// Expected content was absent from the response body.
    #[error("expected body to contain {expected:?}; body excerpt: {excerpt:?}")]
    MissingContent {
        /// The snippet that was expected in the body.
        expected: String,
        /// Leading excerpt of the actual body.
        excerpt: String,
    },
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Asserts that a response body contains an expected snippet.
///
/// # Errors
///
/// Returns [`AssertionError::MissingContent`] with the expected snippet and a
/// body excerpt when the content is absent.
pub fn body_contains(body: &str, expected: &str) -> Result<(), AssertionError> {
    if body.contains(expected) {
        Ok(())
    } else {
        Err(AssertionError::MissingContent {
            expected: expected.to_string(),
            excerpt: excerpt(body),
        })
    }
}

/// Returns a bounded leading excerpt of a body for failure messages.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}
