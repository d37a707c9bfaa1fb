//! Error types for platform translation.

/// Errors that can occur while translating or describing platforms.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The platform id has no entry in the device table.
    #[error("unexpected CPU model '{platform}'")]
    UnmappedPlatform {
        /// The platform id that was looked up.
        platform: String,
    },

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
