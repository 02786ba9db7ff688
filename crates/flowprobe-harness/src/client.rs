// crates/flowprobe-harness/src/client.rs
// ============================================================================
// Module: Flow Client
// Description: Cookie-carrying HTTP client for page fetches and form posts.
// Purpose: Issue GET/POST requests with session continuity and telemetry.
// Dependencies: flowprobe-core, reqwest, url
// ============================================================================

//! ## Overview
//! The flow client wraps one `reqwest` client with an enabled cookie store so
//! the session established by one request carries into the next; that
//! continuity is what lets a login step observe the account a registration
//! step created. Requests are single attempts with no internal retry: test
//! runs are deterministic and a transport failure must surface as a failure.
//! Each request emits one telemetry event through the configured sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use flowprobe_core::FormSubmission;
use flowprobe_core::PageResponse;
use thiserror::Error;
use url::Url;

use crate::config::HarnessConfig;
use crate::telemetry::MetricsSink;
use crate::telemetry::NoopMetrics;
use crate::telemetry::ProbeMethod;
use crate::telemetry::ProbeMetricEvent;
use crate::telemetry::ProbeOutcome;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP client construction and request errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL did not parse.
    #[error("invalid base url {url}: {source}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Parse failure detail.
        #[source]
        source: url::ParseError,
    },
    /// A request path did not resolve against the base URL.
    #[error("invalid request path {path}: {source}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Parse failure detail.
        #[source]
        source: url::ParseError,
    },
    /// The underlying HTTP client failed to build.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    /// A request failed or its body could not be read.
    #[error("http request to {path} failed: {source}")]
    Request {
        /// Path of the failed request.
        path: String,
        /// Transport failure detail.
        #[source]
        source: reqwest::Error,
    },
}

// ============================================================================
// SECTION: Flow Client
// ============================================================================

/// HTTP client bound to one application instance with a shared cookie jar.
#[derive(Clone)]
pub struct FlowClient {
    /// Underlying HTTP client with cookie store enabled.
    http: reqwest::Client,
    /// Base URL of the application under test.
    base_url: Url,
    /// Sink receiving one event per request.
    metrics: Arc<dyn MetricsSink>,
}

impl FlowClient {
    /// Creates a client bound to a base URL using the harness configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] when the URL does not parse and
    /// [`ClientError::Build`] when the HTTP client cannot be constructed.
    pub fn new(base_url: &str, config: &HarnessConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source: err,
        })?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url,
            metrics: Arc::new(NoopMetrics),
        })
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the base URL the client targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetches a page with GET and reads the full body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the path is invalid or the request fails.
    pub async fn get_page(&self, path: &str) -> Result<PageResponse, ClientError> {
        let url = self.join(path)?;
        let started = Instant::now();
        let result = self.http.get(url).send().await;
        self.finish(ProbeMethod::Get, path, started, result).await
    }

    /// Submits a urlencoded form with POST and reads the full body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the path is invalid or the request fails.
    pub async fn post_form(
        &self,
        path: &str,
        form: &FormSubmission,
    ) -> Result<PageResponse, ClientError> {
        let url = self.join(path)?;
        let started = Instant::now();
        let result = self.http.post(url).form(form.fields()).send().await;
        self.finish(ProbeMethod::Post, path, started, result).await
    }

    /// Resolves a request path against the base URL.
    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(|err| ClientError::InvalidPath {
            path: path.to_string(),
            source: err,
        })
    }

    /// Reads the response body and records the probe event.
    async fn finish(
        &self,
        method: ProbeMethod,
        path: &str,
        started: Instant,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<PageResponse, ClientError> {
        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => {
                        self.record(method, path, Some(status), ProbeOutcome::Ok, started);
                        Ok(PageResponse {
                            status,
                            body,
                        })
                    }
                    Err(err) => {
                        self.record(method, path, Some(status), ProbeOutcome::Error, started);
                        Err(ClientError::Request {
                            path: path.to_string(),
                            source: err,
                        })
                    }
                }
            }
            Err(err) => {
                self.record(method, path, None, ProbeOutcome::Error, started);
                Err(ClientError::Request {
                    path: path.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Emits one probe event to the metrics sink.
    fn record(
        &self,
        method: ProbeMethod,
        path: &str,
        status: Option<u16>,
        outcome: ProbeOutcome,
        started: Instant,
    ) {
        self.metrics.record_probe(&ProbeMetricEvent {
            method,
            path: path.to_string(),
            status,
            outcome,
            elapsed: started.elapsed(),
        });
    }
}
