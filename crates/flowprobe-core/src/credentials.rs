// crates/flowprobe-core/src/credentials.rs
// ============================================================================
// Module: Credentials
// Description: Credential pairs, password policy, and random generation.
// Purpose: Produce collision-free identities satisfying the target policy.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! Registration scenarios need identities that never collide with earlier
//! runs against the same application instance. The generator combines a
//! process-wide sequence number with a random fragment in the email local
//! part, and builds passwords that satisfy the configured [`PasswordPolicy`]
//! by construction. The policy also reports the canonical violation messages
//! the target framework renders on a rejected password, so weak-password
//! scenarios can assert the exact expected text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default email domain for generated identities.
const DEFAULT_EMAIL_DOMAIN: &str = "flowprobe.test";

/// Leading password characters guaranteeing one of each character class.
const PASSWORD_SEED: &str = "Aa1!";

/// Minimum random filler length appended to generated passwords.
const MIN_PASSWORD_FILLER: usize = 4;

/// Process-wide sequence number folded into generated email local parts.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// An email/password pair for one registration or login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address used as the account name.
    pub email: String,
    /// Plain-text password submitted in forms.
    pub password: String,
}

// ============================================================================
// SECTION: Password Policy
// ============================================================================

/// Password complexity rules of the application under test.
///
/// Defaults mirror the target identity framework: six characters minimum
/// with uppercase, lowercase, digit, and non-alphanumeric requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Require at least one uppercase letter.
    pub require_uppercase: bool,
    /// Require at least one lowercase letter.
    pub require_lowercase: bool,
    /// Require at least one decimal digit.
    pub require_digit: bool,
    /// Require at least one non-alphanumeric character.
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    /// Returns every rule the password breaks, in validation order.
    #[must_use]
    pub fn violations(&self, password: &str) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();
        if password.chars().count() < self.min_length {
            violations.push(PolicyViolation::TooShort {
                minimum: self.min_length,
            });
        }
        if self.require_symbol && password.chars().all(char::is_alphanumeric) {
            violations.push(PolicyViolation::MissingSymbol);
        }
        if self.require_digit && !password.chars().any(|ch| ch.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        violations
    }

    /// Returns true when the password satisfies every rule.
    #[must_use]
    pub fn satisfies(&self, password: &str) -> bool {
        self.violations(password).is_empty()
    }
}

/// One broken password rule with its canonical rendered message.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Display output matches the target framework's validation text verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolicyViolation {
    /// Password is shorter than the configured minimum.
    TooShort {
        /// Configured minimum length.
        minimum: usize,
    },
    /// Password lacks an uppercase letter.
    MissingUppercase,
    /// Password lacks a lowercase letter.
    MissingLowercase,
    /// Password lacks a decimal digit.
    MissingDigit,
    /// Password lacks a non-alphanumeric character.
    MissingSymbol,
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort {
                minimum,
            } => {
                write!(f, "Passwords must be at least {minimum} characters.")
            }
            Self::MissingUppercase => {
                write!(f, "Passwords must have at least one uppercase ('A'-'Z').")
            }
            Self::MissingLowercase => {
                write!(f, "Passwords must have at least one lowercase ('a'-'z').")
            }
            Self::MissingDigit => {
                write!(f, "Passwords must have at least one digit ('0'-'9').")
            }
            Self::MissingSymbol => {
                write!(f, "Passwords must have at least one non alphanumeric character.")
            }
        }
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Generates random credentials satisfying a password policy.
#[derive(Debug, Clone)]
pub struct CredentialGenerator {
    /// Policy the generated passwords must satisfy.
    policy: PasswordPolicy,
    /// Domain of generated email addresses.
    domain: String,
}

impl Default for CredentialGenerator {
    fn default() -> Self {
        Self::new(PasswordPolicy::default())
    }
}

impl CredentialGenerator {
    /// Creates a generator for the given policy with the default domain.
    #[must_use]
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            policy,
            domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }

    /// Overrides the email domain of generated identities.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Returns the policy generated passwords satisfy.
    #[must_use]
    pub const fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Produces a fresh credential pair.
    ///
    /// Emails embed a monotonically increasing sequence number plus a random
    /// fragment, so two calls never return the same address within one
    /// process and collisions across runs are vanishingly unlikely.
    #[must_use]
    pub fn generate(&self) -> Credentials {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let fragment = rand::random::<u64>() & 0x0000_ffff_ffff_ffff;
        let email = format!("user-{sequence:04x}{fragment:012x}@{}", self.domain);
        let filler_len =
            self.policy.min_length.saturating_sub(PASSWORD_SEED.len()).max(MIN_PASSWORD_FILLER);
        let filler: String =
            rand::thread_rng().sample_iter(&Alphanumeric).take(filler_len).map(char::from).collect();
        let password = format!("{PASSWORD_SEED}{filler}");
        Credentials {
            email,
            password,
        }
    }
}
