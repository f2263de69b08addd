// SPDX-License-Identifier: LGPL-3.0-only
//! Error types for the icon system.

use std::path::PathBuf;

/// Errors that can occur in the icon system.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// Icon name is not registered.
    #[error("Icon '{0}' is not registered")]
    NotFound(String),

    /// Icon name was empty.
    #[error("Icon name must not be empty")]
    EmptyName,

    /// Icon source is empty, missing or unreadable.
    #[error("Invalid icon source '{location}': {reason}")]
    InvalidSource {
        /// Source location as given at registration.
        location: String,
        /// Why the source was rejected.
        reason: String,
    },

    /// Rasterizing a registered icon failed.
    #[error("Failed to render icon '{name}': {reason}")]
    RenderFailure {
        /// Icon name.
        name: String,
        /// Underlying rasterizer error.
        reason: String,
    },

    /// Icon directory could not be scanned.
    #[error("Invalid icon directory: {0}")]
    InvalidDirectory(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Error returned by a [`Rasterizer`](super::Rasterizer).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct RasterError(pub String);

impl From<usvg::Error> for RasterError {
    fn from(err: usvg::Error) -> Self {
        Self(err.to_string())
    }
}
