//! Result type alias for Moonlit operations.

use super::moonlit_error::MoonlitError;

/// Type alias for Results using MoonlitError.
///
/// Use this type for operations that can fail with any Moonlit-related
/// error.
///
/// # Example
///
/// ```ignore
/// use moonlit::error::MoonlitResult;
///
/// fn load_detail(id: &str) -> MoonlitResult<WorkDetail> {
///     // Implementation that may return various error types
///     Ok(detail)
/// }
/// ```
pub type MoonlitResult<T> = Result<T, MoonlitError>;
