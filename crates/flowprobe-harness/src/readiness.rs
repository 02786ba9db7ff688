// crates/flowprobe-harness/src/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for freshly spawned application instances.
// Purpose: Ensure instances are serving without arbitrary sleeps.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! A freshly spawned instance may not accept connections on the first
//! attempt. The readiness probe polls a page until it serves a success
//! response or the deadline expires. Startup races live here, keeping the
//! flow client itself strictly single-attempt.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tokio::time::sleep;

use crate::client::FlowClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Delay between readiness poll attempts.
const POLL_DELAY: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Readiness probe failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// The instance did not serve a success response before the deadline.
    #[error("application readiness timeout after {attempts} attempts: {last_failure}")]
    TimedOut {
        /// Number of poll attempts made.
        attempts: u32,
        /// Description of the final failed attempt.
        last_failure: String,
    },
}

// ============================================================================
// SECTION: Probing
// ============================================================================

/// Polls a page until the instance serves a success response.
///
/// # Errors
///
/// Returns [`ReadinessError::TimedOut`] when the deadline expires before a
/// success response arrives.
pub async fn wait_until_ready(
    client: &FlowClient,
    path: &str,
    timeout: Duration,
) -> Result<(), ReadinessError> {
    let start = Instant::now();
    let mut attempts = 0_u32;
    loop {
        attempts = attempts.saturating_add(1);
        let failure = match client.get_page(path).await {
            Ok(response) if response.is_success() => return Ok(()),
            Ok(response) => format!("status {}", response.status),
            Err(err) => err.to_string(),
        };
        if start.elapsed() > timeout {
            return Err(ReadinessError::TimedOut {
                attempts,
                last_failure: failure,
            });
        }
        sleep(POLL_DELAY).await;
    }
}
