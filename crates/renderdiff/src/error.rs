//! Error types for renderdiff.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Errors that can occur while loading comparison inputs.
///
/// Content mismatches are never errors: they are reported as difference
/// counts or as [`crate::GRID_INCOMPARABLE`].
#[derive(Debug, Error)]
pub enum CompareError {
    /// The input file could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image library could not decode the raster.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The grid document is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required top-level field is absent from the grid document.
    #[error("missing field `{field}` in {}", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// The `grid` field does not have the row/cell shape.
    #[error("invalid grid in {}: {reason}", path.display())]
    InvalidGrid { path: PathBuf, reason: String },

    /// The grid has no rows, so its width is undefined.
    #[error("grid in {} has no rows", path.display())]
    EmptyGrid { path: PathBuf },

    /// The file extension names no supported comparison.
    #[error("unsupported input {}: expected .png or .json", path.display())]
    Unsupported { path: PathBuf },

    /// The comparison config file is not valid TOML.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CompareError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the input the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::Json { path, .. }
            | Self::MissingField { path, .. }
            | Self::InvalidGrid { path, .. }
            | Self::EmptyGrid { path }
            | Self::Unsupported { path }
            | Self::Config { path, .. } => path,
        }
    }
}
