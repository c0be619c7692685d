//! CLI command implementations
//!
//! Commands return the process exit code: 0 on success, 2 for configuration
//! errors and 5 for fatal errors.

pub mod init;
pub mod keys;
pub mod transform;
pub mod validate;

/// Exit code of a successful command
pub const EXIT_OK: i32 = 0;

/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;

/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;
