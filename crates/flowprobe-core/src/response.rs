// crates/flowprobe-core/src/response.rs
// ============================================================================
// Module: Page Responses
// Description: Status and body record for one HTTP response.
// Purpose: Carry rendered page output between request and assertion steps.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`PageResponse`] is the harness-side record of one completed HTTP
//! exchange: the status code and the full body text. Responses are consumed
//! once per scenario step and never retained. `ensure_success` is the
//! fail-closed guard for requests that are expected to succeed; validation
//! failures on server-rendered forms still arrive as 2xx re-renders and are
//! checked through body assertions instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::assertions::excerpt;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport-level failures on requests expected to succeed.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server returned a non-success status.
    #[error("unexpected http status {status}; body excerpt: {excerpt:?}")]
    UnexpectedStatus {
        /// Status code returned by the server.
        status: u16,
        /// Leading excerpt of the response body for diagnosis.
        excerpt: String,
    },
}

// ============================================================================
// SECTION: Page Response
// ============================================================================

/// Status code and body text of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body text.
    pub body: String,
}

impl PageResponse {
    /// Returns true when the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Ensures the response carries a success status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UnexpectedStatus`] with a body excerpt when
    /// the status is outside the 2xx range.
    pub fn ensure_success(&self) -> Result<&Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::UnexpectedStatus {
                status: self.status,
                excerpt: excerpt(&self.body),
            })
        }
    }
}
