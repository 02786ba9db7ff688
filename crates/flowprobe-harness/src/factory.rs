// crates/flowprobe-harness/src/factory.rs
// ============================================================================
// Module: Application Factory
// Description: Boots the application under test on an isolated loopback port.
// Purpose: Provide deterministic startup and teardown for test instances.
// Dependencies: axum, tokio
// ============================================================================

//! ## Overview
//! The factory turns an injected boot function into a running application
//! instance: it builds the router for the configured environment profile,
//! binds a fresh loopback port, and serves the router on a background task.
//! Boot and bind failures are reported before any client exists, so a broken
//! configuration fails the whole collection fast instead of failing every
//! request ambiguously. Each `spawn` produces an independent instance;
//! shutting down the handle releases it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use axum::Router;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::client::ClientError;
use crate::client::FlowClient;
use crate::config::HarnessConfig;

// ============================================================================
// SECTION: Environment Profile
// ============================================================================

/// Named environment profile the application boots under.
///
/// # Invariants
/// - Variants are stable for configuration labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvProfile {
    /// Isolated test profile: in-memory stores, no external integrations.
    #[default]
    Testing,
    /// Local development profile.
    Development,
    /// Production profile.
    Production,
}

impl EnvProfile {
    /// Returns the canonical profile name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Testing => "Testing",
            Self::Development => "Development",
            Self::Production => "Production",
        }
    }
}

impl fmt::Display for EnvProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors a boot function may report while building the application.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BootError {
    /// The application does not support the requested profile.
    #[error("unsupported environment profile {profile}")]
    UnsupportedProfile {
        /// The rejected profile name.
        profile: String,
    },
    /// The application configuration was invalid.
    #[error("invalid application configuration: {0}")]
    InvalidConfiguration(String),
    /// A dependency the application needs was unavailable.
    #[error("missing application dependency: {0}")]
    MissingDependency(String),
}

/// Factory startup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The boot function rejected the profile or its configuration.
    #[error("application boot failed: {0}")]
    Boot(#[source] BootError),
    /// The loopback listener could not be bound.
    #[error("failed to bind loopback listener: {0}")]
    Bind(#[source] std::io::Error),
    /// The listener address could not be read.
    #[error("failed to read listener address: {0}")]
    ListenerAddr(#[source] std::io::Error),
}

// ============================================================================
// SECTION: Factory
// ============================================================================

/// Boot function building the application router for a profile.
type BootFn = dyn Fn(&EnvProfile) -> Result<Router, BootError> + Send + Sync;

/// Factory producing isolated application instances for tests.
#[derive(Clone)]
pub struct AppFactory {
    /// Injected boot function.
    boot: Arc<BootFn>,
    /// Profile passed to the boot function.
    profile: EnvProfile,
}

impl AppFactory {
    /// Creates a factory from a boot function, defaulting to [`EnvProfile::Testing`].
    pub fn new<F>(boot: F) -> Self
    where
        F: Fn(&EnvProfile) -> Result<Router, BootError> + Send + Sync + 'static,
    {
        Self {
            boot: Arc::new(boot),
            profile: EnvProfile::Testing,
        }
    }

    /// Overrides the environment profile.
    #[must_use]
    pub fn with_profile(mut self, profile: EnvProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Returns the profile new instances boot under.
    #[must_use]
    pub const fn profile(&self) -> EnvProfile {
        self.profile
    }

    /// Boots the application and serves it on a fresh loopback port.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Boot`] when the boot function fails and
    /// [`FactoryError::Bind`] or [`FactoryError::ListenerAddr`] when the
    /// loopback listener cannot be prepared.
    pub async fn spawn(&self) -> Result<AppHandle, FactoryError> {
        let router = (self.boot)(&self.profile).map_err(FactoryError::Boot)?;
        let listener =
            TcpListener::bind("127.0.0.1:0").await.map_err(FactoryError::Bind)?;
        let addr = listener.local_addr().map_err(FactoryError::ListenerAddr)?;
        let base_url = format!("http://{addr}");
        let join = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(AppHandle {
            base_url,
            join,
        })
    }
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for one running application instance.
#[derive(Debug)]
pub struct AppHandle {
    /// Base URL of the served instance.
    base_url: String,
    /// Background serve task.
    join: JoinHandle<()>,
}

impl AppHandle {
    /// Returns the instance base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a flow client bound to the instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the client cannot be constructed.
    pub fn client(&self, config: &HarnessConfig) -> Result<FlowClient, ClientError> {
        FlowClient::new(&self.base_url, config)
    }

    /// Shuts down the serve task and releases the instance.
    pub async fn shutdown(self) {
        self.join.abort();
        let _ = self.join.await;
    }
}

// Intentionally no Drop impl: allow runtime shutdown to cleanly tear down instances.
