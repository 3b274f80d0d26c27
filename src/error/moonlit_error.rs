//! Unified error type for the Moonlit core.
//!
//! `MoonlitError` consolidates the per-collaborator error types plus the
//! handful of failures the core raises itself (missing work, mutation by
//! an anonymous viewer, rejected form input, bad configuration), so the
//! embedding application handles everything through one surface.

use std::fmt;

use super::catalog::CatalogError;
use super::category::ErrorCategory;
use super::identity::IdentityError;
use super::store::StoreError;

/// Unified error type for the Moonlit core.
#[derive(Debug, Clone)]
pub enum MoonlitError {
    /// The requested resource does not exist. The application routes
    /// this to its not-found page.
    NotFound { resource: String },

    /// A mutating operation was attempted by an anonymous viewer. The
    /// application redirects to sign-in; no write was issued.
    AuthenticationRequired,

    /// A catalog fetch failed.
    Catalog(CatalogError),

    /// A document store read, write, or subscribe failed. Shown inline
    /// with a retry affordance where the operation was user-initiated.
    Remote(StoreError),

    /// An identity provider operation failed.
    Identity(IdentityError),

    /// Form input was rejected before any network call.
    Validation { field: String, message: String },

    /// The core was constructed with invalid settings. Fail-fast,
    /// not user-facing.
    InvalidConfiguration { message: String },
}

impl MoonlitError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MoonlitError::NotFound { .. } => ErrorCategory::User,
            MoonlitError::AuthenticationRequired => ErrorCategory::Auth,
            MoonlitError::Catalog(_) => ErrorCategory::Network,
            MoonlitError::Remote(_) => ErrorCategory::Store,
            MoonlitError::Identity(err) => {
                if err.is_retryable() {
                    ErrorCategory::Network
                } else {
                    ErrorCategory::Auth
                }
            }
            MoonlitError::Validation { .. } => ErrorCategory::User,
            MoonlitError::InvalidConfiguration { .. } => ErrorCategory::Configuration,
        }
    }

    /// Check if a user-initiated retry of the failed operation can
    /// succeed. Nothing in the core retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            MoonlitError::NotFound { .. } => false,
            MoonlitError::AuthenticationRequired => false,
            MoonlitError::Catalog(err) => err.is_retryable(),
            MoonlitError::Remote(err) => err.is_retryable(),
            MoonlitError::Identity(err) => err.is_retryable(),
            MoonlitError::Validation { .. } => false,
            MoonlitError::InvalidConfiguration { .. } => false,
        }
    }

    /// Check if the viewer must sign in before the operation can succeed.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, MoonlitError::AuthenticationRequired)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            MoonlitError::NotFound { .. } => "This book could not be found.".to_string(),
            MoonlitError::AuthenticationRequired => {
                "Sign in to do that.".to_string()
            }
            MoonlitError::Catalog(err) => err.user_message(),
            MoonlitError::Remote(err) => err.user_message(),
            MoonlitError::Identity(err) => err.user_message(),
            MoonlitError::Validation { message, .. } => message.clone(),
            MoonlitError::InvalidConfiguration { message } => {
                format!("Invalid configuration: {}", message)
            }
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            MoonlitError::NotFound { .. } => "not_found",
            MoonlitError::AuthenticationRequired => "authentication_required",
            MoonlitError::Catalog(err) => err.error_code(),
            MoonlitError::Remote(err) => err.error_code(),
            MoonlitError::Identity(err) => err.error_code(),
            MoonlitError::Validation { .. } => "validation_failed",
            MoonlitError::InvalidConfiguration { .. } => "invalid_configuration",
        }
    }

    /// Construct a validation failure for a named form field.
    pub fn validation(field: &str, message: &str) -> Self {
        MoonlitError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for MoonlitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoonlitError::NotFound { resource } => write!(f, "Not found: {}", resource),
            MoonlitError::AuthenticationRequired => write!(f, "Authentication required"),
            MoonlitError::Catalog(err) => write!(f, "{}", err),
            MoonlitError::Remote(err) => write!(f, "{}", err),
            MoonlitError::Identity(err) => write!(f, "{}", err),
            MoonlitError::Validation { field, message } => {
                write!(f, "Validation failed for {}: {}", field, message)
            }
            MoonlitError::InvalidConfiguration { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for MoonlitError {}

impl From<CatalogError> for MoonlitError {
    fn from(err: CatalogError) -> Self {
        // A missing work routes to the not-found page, not an inline error.
        match err {
            CatalogError::NotFound { id } => MoonlitError::NotFound { resource: id },
            other => MoonlitError::Catalog(other),
        }
    }
}

impl From<StoreError> for MoonlitError {
    fn from(err: StoreError) -> Self {
        MoonlitError::Remote(err)
    }
}

impl From<IdentityError> for MoonlitError {
    fn from(err: IdentityError) -> Self {
        MoonlitError::Identity(err)
    }
}
