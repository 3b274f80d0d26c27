//! Unified error handling for the Moonlit core.
//!
//! This module provides:
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Per-collaborator errors**: catalog, document store, and identity
//! - **Unified Error Type**: [`MoonlitError`] consolidates all error types
//! - **Result Type Alias**: [`MoonlitResult<T>`] for consistent return types
//!
//! Propagation policy: asynchronous failures are caught at the call site
//! and turned into local error state for the view that issued them; they
//! never propagate uncaught. Nothing is retried automatically; retry is
//! always an explicit user action, which is why [`MoonlitError::is_retryable`]
//! exists: it tells the view whether offering a retry affordance makes sense.

mod catalog;
mod category;
mod identity;
mod moonlit_error;
mod result;
mod store;

pub use catalog::CatalogError;
pub use category::ErrorCategory;
pub use identity::IdentityError;
pub use moonlit_error::MoonlitError;
pub use result::MoonlitResult;
pub use store::StoreError;

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Errors from every collaborator funnel into the unified type.
    #[test]
    fn test_error_unification() {
        let catalog_err: MoonlitError = CatalogError::Timeout {
            url: "https://openlibrary.org/search.json".to_string(),
        }
        .into();

        let store_err: MoonlitError = StoreError::Unavailable {
            message: "offline".to_string(),
        }
        .into();

        let identity_err: MoonlitError = IdentityError::EmailAlreadyInUse.into();

        assert_eq!(catalog_err.category(), ErrorCategory::Network);
        assert_eq!(store_err.category(), ErrorCategory::Store);
        assert_eq!(identity_err.category(), ErrorCategory::Auth);

        for err in [&catalog_err, &store_err, &identity_err] {
            assert!(!err.error_code().is_empty());
            assert!(!err.user_message().is_empty());
            assert!(!err.to_string().is_empty());
        }
    }

    /// Retry affordances are offered only for transient failures.
    #[test]
    fn test_retry_logic() {
        let retryable: Vec<MoonlitError> = vec![
            CatalogError::ConnectionFailed {
                url: "u".to_string(),
                message: "m".to_string(),
            }
            .into(),
            StoreError::Backend {
                message: "m".to_string(),
            }
            .into(),
            IdentityError::Network {
                message: "m".to_string(),
            }
            .into(),
        ];
        for err in retryable {
            assert!(err.is_retryable(), "expected {:?} to be retryable", err);
        }

        let non_retryable: Vec<MoonlitError> = vec![
            MoonlitError::AuthenticationRequired,
            MoonlitError::validation("password", "too short"),
            MoonlitError::NotFound {
                resource: "OL1W".to_string(),
            },
            IdentityError::InvalidCredential.into(),
        ];
        for err in non_retryable {
            assert!(!err.is_retryable(), "expected {:?} to not be retryable", err);
        }
    }
}
