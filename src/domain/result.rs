//! Result type alias for the erasure engine

use super::errors::ErasureError;

/// Result type alias using [`ErasureError`] as the error type
///
/// # Examples
///
/// ```
/// use cascade_erasure::domain::result::Result;
/// use cascade_erasure::domain::errors::ErasureError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ErasureError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ErasureError>;
