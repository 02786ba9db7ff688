// crates/flowprobe-harness/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Canonical configuration model and validation for the harness.
// Purpose: Centralize client timeouts and form conventions with validation.
// Dependencies: flowprobe-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Harness configuration is a small serde-backed structure with explicit
//! validation: timeouts must be positive and the anti-forgery field name must
//! be non-empty. Defaults match the target framework's conventions, so most
//! test suites construct `HarnessConfig::default()` and move on. TOML loading
//! exists for suites that share a config file across harness embedders.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use flowprobe_core::DEFAULT_ANTI_FORGERY_FIELD;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration parsing and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document failed to parse.
    #[error("failed to parse harness config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The request timeout was zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
    /// The anti-forgery field name was empty.
    #[error("anti_forgery_field must not be empty")]
    EmptyAntiForgeryField,
    /// A configured route did not start with a slash.
    #[error("route {path} must start with '/'")]
    RelativePath {
        /// The offending route value.
        path: String,
    },
    /// A configured form field name was empty.
    #[error("form field names must not be empty")]
    EmptyFormField,
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Form field name carrying the anti-forgery token.
    pub anti_forgery_field: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            anti_forgery_field: DEFAULT_ANTI_FORGERY_FIELD.to_string(),
        }
    }
}

impl HarnessConfig {
    /// Loads and validates configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document fails to parse or validation
    /// rejects a value.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] or
    /// [`ConfigError::EmptyAntiForgeryField`] when a value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.anti_forgery_field.trim().is_empty() {
            return Err(ConfigError::EmptyAntiForgeryField);
        }
        Ok(())
    }

    /// Returns the per-request timeout as a duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
