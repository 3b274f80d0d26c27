//! Remote document store error types.

use std::fmt;

/// Errors from document store reads, writes, and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store backend could not be reached.
    Unavailable { message: String },

    /// The store rejected the operation under its security rules.
    PermissionDenied { message: String },

    /// A document did not deserialize into the expected record shape.
    Corrupt { path: String, message: String },

    /// Any other backend-reported failure.
    Backend { message: String },
}

impl StoreError {
    /// Check if a user-initiated retry of the failed operation can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Unavailable { .. } => true,
            StoreError::Backend { .. } => true,
            StoreError::PermissionDenied { .. } => false,
            StoreError::Corrupt { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Unavailable { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            StoreError::PermissionDenied { .. } => {
                "You don't have permission to do that.".to_string()
            }
            StoreError::Corrupt { .. } => "Stored data looks damaged.".to_string(),
            StoreError::Backend { .. } => "Something went wrong. Try again.".to_string(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "store_unavailable",
            StoreError::PermissionDenied { .. } => "store_permission_denied",
            StoreError::Corrupt { .. } => "store_corrupt",
            StoreError::Backend { .. } => "store_backend",
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable { message } => write!(f, "Store unavailable: {}", message),
            StoreError::PermissionDenied { message } => {
                write!(f, "Store permission denied: {}", message)
            }
            StoreError::Corrupt { path, message } => {
                write!(f, "Corrupt document at {}: {}", path, message)
            }
            StoreError::Backend { message } => write!(f, "Store backend error: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(StoreError::Unavailable {
            message: "m".to_string()
        }
        .is_retryable());
        assert!(StoreError::Backend {
            message: "m".to_string()
        }
        .is_retryable());
        assert!(!StoreError::PermissionDenied {
            message: "m".to_string()
        }
        .is_retryable());
        assert!(!StoreError::Corrupt {
            path: "p".to_string(),
            message: "m".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_display() {
        let err = StoreError::Unavailable {
            message: "offline".to_string(),
        };
        assert_eq!(err.to_string(), "Store unavailable: offline");
    }

    #[test]
    fn test_messages_not_empty() {
        let errors = vec![
            StoreError::Unavailable {
                message: "m".to_string(),
            },
            StoreError::PermissionDenied {
                message: "m".to_string(),
            },
            StoreError::Corrupt {
                path: "p".to_string(),
                message: "m".to_string(),
            },
            StoreError::Backend {
                message: "m".to_string(),
            },
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
            assert!(!err.error_code().is_empty());
        }
    }
}
