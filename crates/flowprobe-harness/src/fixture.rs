// crates/flowprobe-harness/src/fixture.rs
// ============================================================================
// Module: Flow Fixture
// Description: Shared per-run state and HTTP interaction helpers.
// Purpose: Hold the client, current credentials, and token helpers.
// Dependencies: flowprobe-core
// ============================================================================

//! ## Overview
//! One fixture is shared by every step of a scenario run: it owns the
//! cookie-carrying client, the current generated credentials, and the
//! anti-forgery field name. Credentials are regenerated by explicit call
//! before each scenario that needs a fresh identity; the previous pair is
//! replaced, matching the single-credential-slot model the flows rely on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use flowprobe_core::CredentialGenerator;
use flowprobe_core::Credentials;
use flowprobe_core::PasswordPolicy;
use flowprobe_core::TokenError;
use flowprobe_core::TransportError;
use flowprobe_core::extract_hidden_field;
use thiserror::Error;

use crate::client::ClientError;
use crate::client::FlowClient;
use crate::config::HarnessConfig;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fixture-level failures while preparing scenario steps.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The underlying HTTP request failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The page fetch returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The anti-forgery token could not be extracted.
    #[error(transparent)]
    Token(#[from] TokenError),
}

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Shared test-run state for one scenario collection.
pub struct FlowFixture {
    /// Shared cookie-carrying client.
    client: FlowClient,
    /// Generator for fresh identities.
    generator: CredentialGenerator,
    /// Current credential pair, when one was generated.
    credentials: Option<Credentials>,
    /// Form field name carrying the anti-forgery token.
    anti_forgery_field: String,
}

impl FlowFixture {
    /// Creates a fixture around a client using the harness configuration.
    #[must_use]
    pub fn new(client: FlowClient, config: &HarnessConfig) -> Self {
        Self {
            client,
            generator: CredentialGenerator::default(),
            credentials: None,
            anti_forgery_field: config.anti_forgery_field.clone(),
        }
    }

    /// Replaces the credential generator.
    #[must_use]
    pub fn with_generator(mut self, generator: CredentialGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Returns the shared client.
    #[must_use]
    pub const fn client(&self) -> &FlowClient {
        &self.client
    }

    /// Returns the anti-forgery form field name.
    #[must_use]
    pub fn anti_forgery_field(&self) -> &str {
        &self.anti_forgery_field
    }

    /// Returns the policy generated passwords satisfy.
    #[must_use]
    pub const fn password_policy(&self) -> &PasswordPolicy {
        self.generator.policy()
    }

    /// Generates a fresh credential pair and stores it as current state.
    pub fn regenerate_credentials(&mut self) -> &Credentials {
        self.credentials.insert(self.generator.generate())
    }

    /// Returns the current credential pair, when one was generated.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Extracts the anti-forgery token from an HTML body.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when the hidden field is absent or empty.
    pub fn extract_anti_forgery_token(&self, html: &str) -> Result<String, TokenError> {
        extract_hidden_field(html, &self.anti_forgery_field)
    }

    /// Fetches a page and extracts its anti-forgery token.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the request fails, the page is not a
    /// success response, or the token is missing.
    pub async fn fetch_anti_forgery_token(&self, path: &str) -> Result<String, FixtureError> {
        let response = self.client.get_page(path).await?;
        let response = response.ensure_success()?;
        Ok(self.extract_anti_forgery_token(&response.body)?)
    }
}
