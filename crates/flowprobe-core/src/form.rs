// crates/flowprobe-core/src/form.rs
// ============================================================================
// Module: Form Payloads
// Description: Key/value payload model for urlencoded form submissions.
// Purpose: Build POST bodies with unique field names.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`FormSubmission`] models the body of an `application/x-www-form-urlencoded`
//! POST. Field insertion order is irrelevant to the server under test, so the
//! payload is stored sorted by field name. Each field name may appear at most
//! once per submission; a duplicate insert fails rather than silently
//! overwriting an earlier value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Form payload construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A field name was inserted twice into the same submission.
    #[error("duplicate form field {field}")]
    DuplicateField {
        /// The offending field name.
        field: String,
    },
}

// ============================================================================
// SECTION: Form Submission
// ============================================================================

/// Ephemeral key/value payload for one form POST.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    /// Field name to field value, sorted by name.
    fields: BTreeMap<String, String>,
}

impl FormSubmission {
    /// Creates an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the submission.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateField`] when the field name is already
    /// present.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let field = field.into();
        if self.fields.contains_key(&field) {
            return Err(FormError::DuplicateField {
                field,
            });
        }
        self.fields.insert(field, value.into());
        Ok(())
    }

    /// Returns the field map for serialization into a request body.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Returns the value for a field when present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns the number of fields in the submission.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the submission has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
