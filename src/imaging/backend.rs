//! Resizer backend trait and its error type.
//!
//! The [`ImageBackend`] trait is the single seam between thumbnail planning
//! and pixel work. The production implementation is
//! [`ImageMagickBackend`](super::imagemagick::ImageMagickBackend), which runs
//! an external `convert`/`magick` process. Tests use the recording
//! [`MockBackend`](tests::MockBackend).

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to locate ImageMagick (looked for `{0}`)")]
    ExecutableNotFound(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for resizer backends.
///
/// `Sync` so build steps can be run in parallel against one backend.
pub trait ImageBackend: Sync {
    /// Produce `params.output` from `params.source`, auto-oriented and scaled
    /// (or filled and center-cropped) to the requested box.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
