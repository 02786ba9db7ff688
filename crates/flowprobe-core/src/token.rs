// crates/flowprobe-core/src/token.rs
// ============================================================================
// Module: Anti-Forgery Token Extraction
// Description: Hidden-input scanner for anti-forgery tokens in HTML bodies.
// Purpose: Recover the per-session token a form POST must echo back.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! State-changing POSTs are only accepted when they echo the anti-forgery
//! token the server embedded in the preceding GET response, rendered as a
//! hidden `<input>` element. The target application exposes no token API, so
//! the harness scans the markup directly. The scanner walks `<input>` tags
//! and reads quoted attributes, tolerating attribute order and quoting style;
//! a missing or empty token is an extraction error, never silently skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Conventional anti-forgery form field name of the target framework.
pub const DEFAULT_ANTI_FORGERY_FIELD: &str = "__RequestVerificationToken";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Anti-forgery token extraction failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// No hidden input with the expected field name was found.
    #[error("anti-forgery field {field} not found in page body")]
    NotFound {
        /// The field name that was searched for.
        field: String,
    },
    /// The hidden input exists but carries no usable value.
    #[error("anti-forgery field {field} has an empty value")]
    EmptyValue {
        /// The field name that matched.
        field: String,
    },
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts the value of a hidden input field from an HTML body.
///
/// Returns the literal attribute value of the first `<input>` element whose
/// `name` attribute equals `field`.
///
/// # Errors
///
/// Returns [`TokenError::NotFound`] when no input with the field name exists
/// in the body, and [`TokenError::EmptyValue`] when the matching input has a
/// missing or empty `value` attribute.
pub fn extract_hidden_field(html: &str, field: &str) -> Result<String, TokenError> {
    let mut rest = html;
    while let Some(start) = rest.find("<input") {
        let tag_start = &rest[start..];
        let Some(end) = tag_start.find('>') else {
            break;
        };
        let tag = &tag_start[..=end];
        if attribute_value(tag, "name") == Some(field) {
            return match attribute_value(tag, "value") {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(TokenError::EmptyValue {
                    field: field.to_string(),
                }),
            };
        }
        rest = &tag_start[end + 1..];
    }
    Err(TokenError::NotFound {
        field: field.to_string(),
    })
}

/// Returns the quoted value of an attribute within a single tag.
///
/// The attribute name must be preceded by whitespace and followed by `=` and
/// a single- or double-quoted value. Returns `None` when the attribute is
/// absent or unquoted.
fn attribute_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = tag.as_bytes();
    let mut search = 0;
    while let Some(pos) = tag[search..].find(name) {
        let at = search + pos;
        let after = at + name.len();
        search = after;
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let rest = tag[after..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = rest.chars().next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value = &rest[1..];
        let end = value.find(quote)?;
        return Some(&value[..end]);
    }
    None
}
