//! Error types for bundle operations.

use thiserror::Error;

/// Errors that can occur while resolving targets, handling manifests or
/// writing archives.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failure while walking the staged directory.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Manifest validation error.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Platform key not present in the target registry.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),

    /// Missing required file.
    #[error("Missing required file: {0}")]
    MissingFile(String),
}
