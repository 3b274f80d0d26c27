//! Error category classification for unified error handling.
//!
//! Categories give the embedding application a small, stable surface for
//! deciding how to react to a failure: offer a retry affordance, send the
//! viewer to sign-in, show a field-level message, or fail fast.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Catalog/network errors (connection, DNS, timeout, HTTP status).
    /// Generally transient; retry is always an explicit user action.
    Network,

    /// Remote document store errors (read, write, subscribe).
    /// Surfaced inline where the operation was user-initiated.
    Store,

    /// Authentication errors. The viewer needs to sign in (or the
    /// provider rejected their credentials).
    Auth,

    /// User action required (invalid form input). Not retryable until
    /// the input is corrected; no network call was attempted.
    User,

    /// Client-side errors (bugs, invalid state). Not retryable.
    Client,

    /// Configuration errors (invalid page size and friends).
    /// Fail-fast, not user-facing.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and a user-initiated retry can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Store)
    }

    /// Returns true if errors in this category require the user to act
    /// (sign in, fix input) rather than retry.
    pub fn requires_user_action(&self) -> bool {
        matches!(self, ErrorCategory::Auth | ErrorCategory::User)
    }

    /// Short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Store => "store",
            ErrorCategory::Auth => "auth",
            ErrorCategory::User => "user",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
