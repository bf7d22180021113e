//! # Error Types
//!
//! General error handling for echolog.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use std::io;

use thiserror::Error;

/// Main error type for echolog operations
///
/// Every failure is local and synchronous: it is returned at the point of the
/// offending call, never retried, and never downgraded to a warning. Output
/// lines that were already written before the failure stay written.
///
/// ## Error Categories
///
/// 1. **Configuration errors**: InvalidFormat, InvalidLevel, InvalidColorMode
/// 2. **Namespace errors**: LevelConflict
/// 3. **Reflection errors**: IntrospectionFailure
/// 4. **Setup errors**: InitializationFailed
/// 5. **I/O errors**: Io (explicit flushes only)
#[derive(Error, Debug)]
pub enum EchologError
{
    /// Unrecognized format variant
    ///
    /// Only `short`, `short-time`, `long` and `long-time` are accepted. The
    /// factory validates the format before it touches any logger, so this
    /// error never leaves a logger half-configured.
    #[error("Invalid format string: {0}. Use 'short', 'short-time', 'long' or 'long-time'")]
    InvalidFormat(String),

    /// Unparseable severity level (neither a known name nor a number)
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Unrecognized color mode (expected `auto`, `always` or `never`)
    #[error("Invalid color mode: {0}")]
    InvalidColorMode(String),

    /// The custom level name or its log method is already bound elsewhere
    ///
    /// This is raised when something other than echolog's own registry bound
    /// `name` first. It is fatal to the configuration attempt that hit it.
    #[error("{name} already defined in the level namespace ({existing})")]
    LevelConflict
    {
        /// Name (level or method) that could not be bound
        name: String,
        /// What the name is currently bound to
        existing: String,
    },

    /// The echo primitive could not recover the caller's source text
    ///
    /// Raised when no source context is available for the call site, or when
    /// the source line has no balanced parenthesized argument list.
    #[error("Call-site introspection failed: {0}")]
    IntrospectionFailure(String),

    /// Failed to install a global subscriber
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// I/O error while flushing a handler
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience type alias for `Result<T, EchologError>`
pub type Result<T> = std::result::Result<T, EchologError>;
