//! Error types for RESCACHE.
//!
//! The cache itself can only fail on a malformed key. Everything else here is
//! reported through a [`Resource`](crate::types::ResourceState) read or by the binaries.

use thiserror::Error;

/// Result type alias using `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Main error type for all RESCACHE operations.
#[derive(Debug, Error)]
pub enum CacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // KEY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Lookup key is empty or blank.
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // RESOURCE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Resource is still pending; the reader should suspend and retry later.
    #[error("Resource is still pending")]
    Suspended,

    /// The computation behind a resource failed.
    #[error("Resource failed: {0}")]
    ResourceFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File or stream I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CacheError {
    /// Returns true if reading again later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CacheError::Suspended)
    }

    /// Returns true if the caller supplied a bad key.
    pub fn is_key_error(&self) -> bool {
        matches!(self, CacheError::InvalidKey(_))
    }
}
