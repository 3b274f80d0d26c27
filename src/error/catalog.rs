//! Catalog API error types.
//!
//! Errors from the third-party book catalog: connection problems, HTTP
//! status failures, and malformed responses. A missing work id is its own
//! variant because the application routes it to a not-found page rather
//! than an inline error.

use std::fmt;

/// Errors from catalog fetch operations.
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// Connection to the catalog host failed.
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    Timeout { url: String },

    /// Non-2xx HTTP status other than a work-lookup 404.
    HttpStatus { status: u16, message: String },

    /// The requested work id does not exist in the catalog.
    NotFound { id: String },

    /// The response body did not match the expected shape.
    Decode { message: String },
}

impl CatalogError {
    /// Check if this error is likely transient and a user-initiated
    /// retry can succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::ConnectionFailed { .. } => true,
            CatalogError::Timeout { .. } => true,
            CatalogError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            CatalogError::NotFound { .. } => false,
            CatalogError::Decode { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::ConnectionFailed { .. } => {
                "Could not reach the book catalog. Check your connection and try again.".to_string()
            }
            CatalogError::Timeout { .. } => {
                "The book catalog took too long to respond. Try again.".to_string()
            }
            CatalogError::HttpStatus { status, .. } => {
                format!("The book catalog returned an error ({}). Try again later.", status)
            }
            CatalogError::NotFound { .. } => "This book could not be found.".to_string(),
            CatalogError::Decode { .. } => {
                "Received an unexpected response from the book catalog.".to_string()
            }
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::ConnectionFailed { .. } => "catalog_connection_failed",
            CatalogError::Timeout { .. } => "catalog_timeout",
            CatalogError::HttpStatus { .. } => "catalog_http_status",
            CatalogError::NotFound { .. } => "catalog_not_found",
            CatalogError::Decode { .. } => "catalog_decode",
        }
    }

    /// Classify a reqwest error against the URL it was issued for.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            CatalogError::ConnectionFailed {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            CatalogError::Decode {
                message: err.to_string(),
            }
        } else {
            CatalogError::ConnectionFailed {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::ConnectionFailed { url, message } => {
                write!(f, "Connection to {} failed: {}", url, message)
            }
            CatalogError::Timeout { url } => write!(f, "Request to {} timed out", url),
            CatalogError::HttpStatus { status, message } => {
                write!(f, "Catalog returned HTTP {}: {}", status, message)
            }
            CatalogError::NotFound { id } => write!(f, "Work {} not found in catalog", id),
            CatalogError::Decode { message } => {
                write!(f, "Failed to decode catalog response: {}", message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}
