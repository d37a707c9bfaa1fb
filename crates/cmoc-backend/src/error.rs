//! Backend error types.

use std::path::PathBuf;

use cmoc_targets::TargetError;

/// Errors that can occur while driving the device compiler.
///
/// All of them invalidate the current compilation; none are retried.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The compiler shared library could not be loaded.
    #[error("failed to load {}: {message}", path.display())]
    LibraryLoad { path: PathBuf, message: String },

    /// A required entry point is missing from the loaded library.
    #[error("{symbol} symbol is missing")]
    SymbolMissing { symbol: &'static str },

    /// A foreign entry point reported a non-zero status.
    #[error("call to {call} failed with status {status}")]
    ForeignCallFailed { call: &'static str, status: i32 },

    /// An invariant the caller or the compiler guarantees did not hold.
    #[error("contract violation: {detail}")]
    ContractViolation { detail: String },

    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error in a configuration file.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<TargetError> for BackendError {
    fn from(e: TargetError) -> Self {
        BackendError::ContractViolation {
            detail: e.to_string(),
        }
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
