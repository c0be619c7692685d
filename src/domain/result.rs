//! Result type alias for Anonymizator

use super::errors::AnonymizatorError;

/// Result type alias for Anonymizator operations
///
/// # Examples
///
/// ```
/// use anonymizator::domain::result::Result;
/// use anonymizator::domain::errors::AnonymizatorError;
///
/// fn needs_cipher(active: bool) -> Result<()> {
///     if active {
///         Ok(())
///     } else {
///         Err(AnonymizatorError::NoActiveCipher)
///     }
/// }
///
/// assert!(needs_cipher(true).is_ok());
/// assert!(needs_cipher(false).is_err());
/// ```
pub type Result<T> = std::result::Result<T, AnonymizatorError>;
