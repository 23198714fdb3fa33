//! Error types for resolution and compositing.

use thiserror::Error;

/// Errors that can occur when resolving or rendering a portrait.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index decoding error.
    #[error("{0}")]
    Lsf(#[from] tachie_lsf::Error),

    /// The index has no base image groups, so nothing can be resolved.
    #[error("index {name:?} has no base images")]
    EmptyIndex { name: String },

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for compositing operations.
pub type Result<T> = std::result::Result<T, Error>;
