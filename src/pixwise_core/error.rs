use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PixwiseError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Filesystem errors
    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Sidecar errors
    #[error("Malformed sidecar {path}: {reason}")]
    MalformedSidecar { path: PathBuf, reason: String },

    // Metadata errors
    #[error("Exiftool error: {0}")]
    Exiftool(String),

    #[error("Failed to extract metadata from {path}: {reason}")]
    MetadataExtraction { path: PathBuf, reason: String },

    #[error("Failed to write metadata to {path}: {reason}")]
    MetadataWrite { path: PathBuf, reason: String },

    // Transcription errors
    #[error("ffmpeg error: {0}")]
    Transcoder(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PixwiseError {
    pub fn malformed_sidecar(path: &std::path::Path, reason: impl Into<String>) -> Self {
        PixwiseError::MalformedSidecar {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Result type for pixwise operations.
pub type Result<T> = std::result::Result<T, PixwiseError>;
