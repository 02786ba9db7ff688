// crates/flowprobe-harness/src/account.rs
// ============================================================================
// Module: Account Flows
// Description: Ordered registration and login scenarios over HTTP.
// Purpose: Execute the dependent user-flow steps as one explicit sequence.
// Dependencies: flowprobe-core, crate::{client, config, fixture}
// ============================================================================

//! ## Overview
//! The account flow drives the registration and login pages of the target
//! application: fetch the form, extract the anti-forgery token, submit the
//! form with the token echoed verbatim, and assert on the rendered body.
//! The dependent steps (register, then login with the same credentials, then
//! a weak-password registration) run as one multi-step scenario inside
//! `run_user_flow`, so the ordering the shared session requires is enforced
//! by control flow rather than by test-case priority metadata.

// ============================================================================
// SECTION: Imports
// ============================================================================

use flowprobe_core::AssertionError;
use flowprobe_core::Credentials;
use flowprobe_core::FormError;
use flowprobe_core::FormSubmission;
use flowprobe_core::PageResponse;
use flowprobe_core::TransportError;
use flowprobe_core::body_contains;
use flowprobe_core::html;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;
use crate::fixture::FixtureError;
use crate::fixture::FlowFixture;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Known-weak password used by the validation-failure scenario.
pub const WEAK_PASSWORD: &str = "123456";

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Paths and form field names of the account pages under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRoutes {
    /// Registration page path.
    pub register_path: String,
    /// Login page path.
    pub login_path: String,
    /// Email form field name.
    pub email_field: String,
    /// Password form field name.
    pub password_field: String,
    /// Password confirmation form field name.
    pub confirm_password_field: String,
}

impl Default for AccountRoutes {
    fn default() -> Self {
        Self {
            register_path: "/Identity/Account/Register".to_string(),
            login_path: "/Identity/Account/Login".to_string(),
            email_field: "Input.Email".to_string(),
            password_field: "Input.Password".to_string(),
            confirm_password_field: "Input.ConfirmPassword".to_string(),
        }
    }
}

impl AccountRoutes {
    /// Validates paths and field names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RelativePath`] for paths missing a leading
    /// slash and [`ConfigError::EmptyFormField`] for empty field names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.register_path, &self.login_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::RelativePath {
                    path: path.clone(),
                });
            }
        }
        let fields = [&self.email_field, &self.password_field, &self.confirm_password_field];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(ConfigError::EmptyFormField);
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scenario-level failures while running account flows.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A fixture helper failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// An HTTP request failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A form payload could not be built.
    #[error(transparent)]
    Form(#[from] FormError),
    /// A response expected to succeed did not.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Expected content was absent from a response body.
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    /// A step needed current credentials but none were generated.
    #[error("no credentials generated for the current scenario")]
    MissingCredentials,
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Identifies one step of the user flow.
///
/// # Invariants
/// - Variants are stable for reporting labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStep {
    /// Fresh registration expected to succeed.
    RegisterSuccess,
    /// Login with the credentials registered in the previous step.
    LoginSuccess,
    /// Registration with a weak password expected to re-render with errors.
    RegisterWeakPassword,
}

impl FlowStep {
    /// Returns a stable label for the step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegisterSuccess => "register-success",
            Self::LoginSuccess => "login-success",
            Self::RegisterWeakPassword => "register-weak-password",
        }
    }
}

/// Outcome record for one executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// The executed step.
    pub step: FlowStep,
    /// Response status observed by the step.
    pub status: u16,
    /// Body snippets the step verified.
    pub checks: Vec<String>,
}

/// Outcome record for one full user-flow run.
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    /// Step records in execution order.
    pub steps: Vec<StepReport>,
}

// ============================================================================
// SECTION: Account Flow
// ============================================================================

/// Returns the greeting the application renders for an authenticated user.
#[must_use]
pub fn greeting_for(email: &str) -> String {
    format!("Hello {email}!")
}

/// Drives the account pages of one application instance.
pub struct AccountFlow<'a> {
    /// Shared fixture holding the client and credentials.
    fixture: &'a mut FlowFixture,
    /// Paths and field names of the account pages.
    routes: AccountRoutes,
}

impl<'a> AccountFlow<'a> {
    /// Creates a flow over a fixture with the given routes.
    pub fn new(fixture: &'a mut FlowFixture, routes: AccountRoutes) -> Self {
        Self {
            fixture,
            routes,
        }
    }

    /// Returns the routes the flow targets.
    #[must_use]
    pub const fn routes(&self) -> &AccountRoutes {
        &self.routes
    }

    /// Submits the registration form for the given credentials.
    ///
    /// Fetches the registration page, extracts the anti-forgery token, and
    /// posts the form with the token echoed verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] when any request, extraction, or payload step
    /// fails. A validation rejection is not an error here: the server
    /// re-renders the form as a success response.
    pub async fn register_with(&self, credentials: &Credentials) -> Result<PageResponse, FlowError> {
        let token = self.fixture.fetch_anti_forgery_token(&self.routes.register_path).await?;
        let mut form = FormSubmission::new();
        form.insert(self.fixture.anti_forgery_field(), token.as_str())?;
        form.insert(self.routes.email_field.as_str(), credentials.email.as_str())?;
        form.insert(self.routes.password_field.as_str(), credentials.password.as_str())?;
        form.insert(self.routes.confirm_password_field.as_str(), credentials.password.as_str())?;
        Ok(self.fixture.client().post_form(&self.routes.register_path, &form).await?)
    }

    /// Submits the login form for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] when any request, extraction, or payload step
    /// fails.
    pub async fn login_with(&self, credentials: &Credentials) -> Result<PageResponse, FlowError> {
        let token = self.fixture.fetch_anti_forgery_token(&self.routes.login_path).await?;
        let mut form = FormSubmission::new();
        form.insert(self.fixture.anti_forgery_field(), token.as_str())?;
        form.insert(self.routes.email_field.as_str(), credentials.email.as_str())?;
        form.insert(self.routes.password_field.as_str(), credentials.password.as_str())?;
        Ok(self.fixture.client().post_form(&self.routes.login_path, &form).await?)
    }

    /// Submits the login form for the fixture's current credentials.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MissingCredentials`] when no credentials were
    /// generated, or any failure from [`AccountFlow::login_with`].
    pub async fn login_with_current(&self) -> Result<PageResponse, FlowError> {
        let credentials =
            self.fixture.credentials().ok_or(FlowError::MissingCredentials)?.clone();
        self.login_with(&credentials).await
    }

    /// Runs the full ordered user flow as one scenario.
    ///
    /// Steps execute strictly in sequence over the shared session:
    /// register-success, login-success with the same credentials, then
    /// register-weak-password with a fresh identity. The weak-password step
    /// asserts a success status plus every violation message the password
    /// policy reports, HTML-escaped the way the server renders them.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on the first failing step; later steps do not
    /// run.
    pub async fn run_user_flow(&mut self) -> Result<FlowReport, FlowError> {
        let mut steps = Vec::new();

        let credentials = self.fixture.regenerate_credentials().clone();
        let response = self.register_with(&credentials).await?;
        let response = response.ensure_success()?;
        let greeting = greeting_for(&credentials.email);
        body_contains(&response.body, &greeting)?;
        steps.push(StepReport {
            step: FlowStep::RegisterSuccess,
            status: response.status,
            checks: vec![greeting.clone()],
        });

        let response = self.login_with_current().await?;
        let response = response.ensure_success()?;
        body_contains(&response.body, &greeting)?;
        steps.push(StepReport {
            step: FlowStep::LoginSuccess,
            status: response.status,
            checks: vec![greeting],
        });

        let fresh = self.fixture.regenerate_credentials().clone();
        let weak = Credentials {
            email: fresh.email,
            password: WEAK_PASSWORD.to_string(),
        };
        let response = self.register_with(&weak).await?;
        let response = response.ensure_success()?;
        let mut checks = Vec::new();
        for violation in self.fixture.password_policy().violations(WEAK_PASSWORD) {
            let message = html::escape(&violation.to_string());
            body_contains(&response.body, &message)?;
            checks.push(message);
        }
        steps.push(StepReport {
            step: FlowStep::RegisterWeakPassword,
            status: response.status,
            checks,
        });

        Ok(FlowReport {
            steps,
        })
    }
}
