// crates/flowprobe-core/src/lib.rs
// ============================================================================
// Module: Flowprobe Core Library
// Description: Public API surface for the Flowprobe core.
// Purpose: Expose form payloads, responses, token extraction, and credentials.
// Dependencies: crate::{assertions, credentials, form, html, response, token}
// ============================================================================

//! ## Overview
//! Flowprobe core provides the transport-free building blocks of the HTTP
//! end-to-end harness: form payload modeling, page response records,
//! anti-forgery token extraction, credential generation under a password
//! policy, and body assertions. Nothing in this crate performs network I/O;
//! the harness crate wires these pieces to an HTTP client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assertions;
pub mod credentials;
pub mod form;
pub mod html;
pub mod response;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assertions::AssertionError;
pub use assertions::body_contains;
pub use credentials::CredentialGenerator;
pub use credentials::Credentials;
pub use credentials::PasswordPolicy;
pub use credentials::PolicyViolation;
pub use form::FormError;
pub use form::FormSubmission;
pub use response::PageResponse;
pub use response::TransportError;
pub use token::DEFAULT_ANTI_FORGERY_FIELD;
pub use token::TokenError;
pub use token::extract_hidden_field;
