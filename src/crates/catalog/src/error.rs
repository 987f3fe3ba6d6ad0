//! Error types for the catalog crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while reading catalog data or validating filters.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The data file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not a JSON array of items.
    #[error("malformed catalog {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// A single entry violates the item invariants.
    #[error("invalid menu item: {0}")]
    InvalidItem(String),

    /// A search filter cannot be evaluated.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}
