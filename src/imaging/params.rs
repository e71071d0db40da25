//! Parameter types for thumbnail operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides names and sizes) and the [`backend`](super::backend) (which runs
//! the resizer). This separation allows swapping backends (e.g. for testing
//! with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality (1–100). Clamped on construction.
//! - [`ThumbnailRequest`] — What a template asked for: box, crop flag, quality.
//! - [`ResizeParams`] — Full specification for one resizer invocation.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// A thumbnail request as it arrives from a template.
///
/// `height` is optional: without it the thumbnail keeps the source aspect
/// ratio at the requested width, and cropping is not possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub width: u32,
    pub height: Option<u32>,
    pub crop: bool,
    pub quality: Option<Quality>,
}

impl ThumbnailRequest {
    /// Proportional thumbnail at `width`, no crop, default quality.
    pub fn width(width: u32) -> Self {
        Self {
            width,
            height: None,
            crop: false,
            quality: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn cropped(mut self) -> Self {
        self.crop = true;
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }
}

/// Parameters for a single resizer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: Option<u32>,
    /// Fill the box and center-crop instead of fitting inside it.
    pub crop: bool,
    pub quality: Quality,
}

impl ResizeParams {
    /// The `WxH` (or bare `W`) geometry token handed to the resizer.
    pub fn geometry(&self) -> String {
        match self.height {
            Some(height) => format!("{}x{}", self.width, height),
            None => self.width.to_string(),
        }
    }
}
