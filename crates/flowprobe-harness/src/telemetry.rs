// crates/flowprobe-harness/src/telemetry.rs
// ============================================================================
// Module: Harness Telemetry
// Description: Observability hooks for harness HTTP probes.
// Purpose: Provide metric events per request without hard dependencies.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for harness request events.
//! It is intentionally dependency-light so embedders can plug in Prometheus
//! or OpenTelemetry without redesign. Every GET and POST the client issues
//! produces one [`ProbeMetricEvent`] with stable string labels.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// HTTP method classification for probe events.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// HTTP GET page fetch.
    Get,
    /// HTTP POST form submission.
    Post,
}

impl ProbeMethod {
    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

/// Probe outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// Request completed and the body was read.
    Ok,
    /// Request or body read failed.
    Error,
}

impl ProbeOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

// ============================================================================
// SECTION: Metric Events
// ============================================================================

/// Probe metric event payload.
///
/// # Invariants
/// - `status` is `None` when no response arrived.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProbeMetricEvent {
    /// HTTP method of the probe.
    pub method: ProbeMethod,
    /// Request path relative to the base URL.
    pub path: String,
    /// Response status when one arrived.
    pub status: Option<u16>,
    /// Probe outcome.
    pub outcome: ProbeOutcome,
    /// Wall-clock duration of the probe.
    pub elapsed: Duration,
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Sink receiving one event per harness request.
pub trait MetricsSink: Send + Sync {
    /// Records a completed probe event.
    fn record_probe(&self, event: &ProbeMetricEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_probe(&self, _event: &ProbeMetricEvent) {}
}
