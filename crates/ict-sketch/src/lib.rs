//! Sketch conversion for Iradeh campaign tools.
//!
//! Turns grayscale sketches into transparent-background PNGs by mapping
//! darkness to opacity. [`alpha`] holds the pure pixel transform;
//! [`batch`] walks a directory tree and converts whatever is out of date.

pub mod alpha;
pub mod batch;
pub mod error;

pub use alpha::{AlphaOptions, DEFAULT_THRESHOLD, alpha_channel, luminance, to_transparent};
pub use batch::{
    BatchConfig, BatchReport, FailedImage, SketchJob, find_images, needs_processing,
    process_images, resolve_conflicts,
};
pub use error::{SketchError, SketchResult};
