//! Error types for lazer-link-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lazer-link operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk output directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hash {hash:?}: {reason}")]
    InvalidHash { hash: String, reason: String },

    #[error("osu!lazer directory not found at: {0}")]
    LibraryNotFound(PathBuf),

    #[error("Realm database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    #[error("File store directory not found at: {0}")]
    FilesNotFound(PathBuf),

    #[error("Output path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Output directory not found at: {0}")]
    OutputNotFound(PathBuf),

    #[error("Beatmap not found: {0}")]
    BeatmapNotFound(String),

    #[error("Source file for {filename} is missing from the file store: {path}")]
    MissingSource { filename: String, path: PathBuf },

    #[error("Refusing to place file outside its set directory: {0}")]
    UnsafeFilename(String),

    #[error("Export target is a directory: {0}")]
    ExportTargetIsDirectory(PathBuf),

    #[error(
        "String of {len} bytes does not fit a 1-byte length prefix (max 255); use the binary2 format instead"
    )]
    StringTooLong { len: usize },

    #[error("Malformed catalog data: {0}")]
    MalformedCatalog(String),

    #[error("Invalid replay file {path}: {reason}")]
    InvalidReplay { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for lazer-link operations
pub type Result<T> = std::result::Result<T, Error>;
