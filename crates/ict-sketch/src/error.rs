//! Error types for sketch conversion.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while converting sketches.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// The directory to read sketches from does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Another source image in the same folder maps to the same PNG.
    #[error("{} also converts to {}, which is taken by {}", input.display(), output.display(), kept.display())]
    OutputConflict {
        /// The image that was not converted.
        input: PathBuf,
        /// The shared output path.
        output: PathBuf,
        /// The image converted to `output` instead.
        kept: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A source image could not be decoded.
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        /// The unreadable image.
        path: PathBuf,
        /// The underlying error.
        source: image::ImageError,
    },

    /// The converted image could not be encoded as PNG.
    #[error("cannot encode {}: {source}", path.display())]
    Encode {
        /// The destination that was being written.
        path: PathBuf,
        /// The underlying error.
        source: image::ImageError,
    },
}

/// Convenience result type for sketch conversion.
pub type SketchResult<T> = Result<T, SketchError>;
