//! Identity provider error types.
//!
//! The hosted auth provider reports failures as string error codes
//! (`auth/email-already-in-use` and friends). Known codes get specific
//! user messages; everything else falls back to a generic one so an
//! unrecognized provider code never leaks raw into the UI.

use std::fmt;

/// Errors from sign-up, sign-in, and sign-out operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The email is already registered (sign-up).
    EmailAlreadyInUse,

    /// The email address is malformed.
    InvalidEmail,

    /// The provider rejected the password as too weak (sign-up).
    WeakPassword,

    /// Wrong email/password combination (sign-in). The provider
    /// deliberately does not distinguish which part was wrong.
    InvalidCredential,

    /// The provider could not be reached.
    Network { message: String },

    /// Any other provider error code.
    Other { code: String },
}

impl IdentityError {
    /// Map a provider error code string to a typed error.
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/email-already-in-use" => IdentityError::EmailAlreadyInUse,
            "auth/invalid-email" => IdentityError::InvalidEmail,
            "auth/weak-password" => IdentityError::WeakPassword,
            "auth/invalid-credential" | "auth/user-not-found" | "auth/wrong-password" => {
                IdentityError::InvalidCredential
            }
            other => IdentityError::Other {
                code: other.to_string(),
            },
        }
    }

    /// Check if a retry without changing input can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IdentityError::Network { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            IdentityError::EmailAlreadyInUse => "Email already in use".to_string(),
            IdentityError::InvalidEmail => "Invalid email address".to_string(),
            IdentityError::WeakPassword => {
                "Password should be at least 6 characters".to_string()
            }
            IdentityError::InvalidCredential => {
                "Invalid email or password. Please try again.".to_string()
            }
            IdentityError::Network { .. } => {
                "Could not reach the sign-in service. Check your connection.".to_string()
            }
            IdentityError::Other { .. } => "Sign up failed. Please try again".to_string(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentityError::EmailAlreadyInUse => "identity_email_in_use",
            IdentityError::InvalidEmail => "identity_invalid_email",
            IdentityError::WeakPassword => "identity_weak_password",
            IdentityError::InvalidCredential => "identity_invalid_credential",
            IdentityError::Network { .. } => "identity_network",
            IdentityError::Other { .. } => "identity_other",
        }
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Other { code } => write!(f, "Identity provider error: {}", code),
            IdentityError::Network { message } => {
                write!(f, "Identity provider unreachable: {}", message)
            }
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl std::error::Error for IdentityError {}
