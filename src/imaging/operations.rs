//! High-level thumbnail operations.
//!
//! Thumbnailing is two-phase. [`make_thumbnail`] sniffs the source, decides
//! the thumbnail's URL and reported size, and returns immediately; no pixels
//! are touched. The returned [`ThumbnailBuild`] is the deferred resize step,
//! which the caller runs later (or never, when the output is already cached)
//! against an [`ImageBackend`].

use super::backend::{BackendError, ImageBackend};
use super::calculations::{computed_size, default_quality, thumbnail_ext, thumbnail_suffix};
use super::exif_reader::read_exif_path;
use super::params::{Quality, ResizeParams, ThumbnailRequest};
use super::sniff::image_info_from_path;
use crate::naming::dependent_url;
use crate::types::{ImageFormat, ImageInfo, Thumbnail};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot process unknown image format: {}", .0.display())]
    UnknownFormat(PathBuf),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for thumbnail operations.
pub type Result<T> = std::result::Result<T, ThumbnailError>;

/// Whether the resizer's auto-orient step will turn `source` by 90°.
///
/// Only JPEG orientation is honored; unreadable files count as upright.
pub fn is_rotated(source: &Path, format: ImageFormat) -> bool {
    format == ImageFormat::Jpeg && read_exif_path(source).is_rotated()
}

/// Resize `source` into `dst` through `backend`.
///
/// Without an explicit quality the source extension picks the default
/// (75 for PNG, 85 otherwise).
pub fn process_image(
    backend: &impl ImageBackend,
    source: &Path,
    dst: &Path,
    width: u32,
    height: Option<u32>,
    crop: bool,
    quality: Option<Quality>,
) -> std::result::Result<(), BackendError> {
    let quality = quality.unwrap_or_else(|| {
        let file_name = source.file_name().unwrap_or_default();
        default_quality(&file_name.to_string_lossy())
    });
    backend.resize(&ResizeParams {
        source: source.to_path_buf(),
        output: dst.to_path_buf(),
        width,
        height,
        crop,
        quality,
    })
}

/// Deferred resize producing one thumbnail file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailBuild {
    pub source: PathBuf,
    /// URL path of the artifact, relative to the output root.
    pub url_path: String,
    pub width: u32,
    pub height: Option<u32>,
    pub crop: bool,
    pub quality: Option<Quality>,
}

impl ThumbnailBuild {
    /// Write the thumbnail to `dst_filename`, creating its directory.
    pub fn run(
        &self,
        backend: &impl ImageBackend,
        dst_filename: &Path,
    ) -> std::result::Result<(), BackendError> {
        if let Some(parent) = dst_filename.parent() {
            std::fs::create_dir_all(parent)?;
        }
        process_image(
            backend,
            &self.source,
            dst_filename,
            self.width,
            self.height,
            self.crop,
            self.quality,
        )
    }

    /// Where the artifact lands below `output_root`.
    pub fn destination(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.url_path.trim_start_matches('/'))
    }
}

/// A thumbnail descriptor plus the build step that produces it.
///
/// `build` is `None` for SVG sources, which browsers scale themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedThumbnail {
    pub thumbnail: Thumbnail,
    pub build: Option<ThumbnailBuild>,
}

/// Plan a thumbnail from already-sniffed facts about its source.
///
/// The suffix is built from the request as given. Cropping needs a full box,
/// so a crop request without height is sized and built as a plain fit.
pub fn plan_thumbnail(
    source: &Path,
    source_url_path: &str,
    info: ImageInfo,
    rotated: bool,
    request: &ThumbnailRequest,
) -> Result<PlannedThumbnail> {
    if info.format == ImageFormat::Unknown {
        return Err(ThumbnailError::UnknownFormat(source.to_path_buf()));
    }

    if info.format == ImageFormat::Svg {
        return Ok(PlannedThumbnail {
            thumbnail: Thumbnail::new(source_url_path, request.width, request.height),
            build: None,
        });
    }

    let suffix = thumbnail_suffix(request.width, request.height, request.crop, request.quality);
    let url_path = dependent_url(
        source_url_path,
        &suffix,
        thumbnail_ext(&source.to_string_lossy()),
    );

    let crop = request.crop && request.height.is_some();
    let (width, height) = match info.dimensions() {
        Some(actual) if !crop => {
            let (w, h) = computed_size(request.width, request.height, actual, rotated);
            (w, Some(h))
        }
        _ => (request.width, request.height),
    };

    Ok(PlannedThumbnail {
        thumbnail: Thumbnail::new(url_path.clone(), width, height),
        build: Some(ThumbnailBuild {
            source: source.to_path_buf(),
            url_path,
            width: request.width,
            height: request.height,
            crop,
            quality: request.quality,
        }),
    })
}

/// Sniff `source` and plan its thumbnail.
///
/// # Errors
/// [`ThumbnailError::Io`] when the source cannot be opened and
/// [`ThumbnailError::UnknownFormat`] when it is not PNG, GIF, JPEG or SVG.
pub fn make_thumbnail(
    source: &Path,
    source_url_path: &str,
    request: &ThumbnailRequest,
) -> Result<PlannedThumbnail> {
    let info = image_info_from_path(source).map_err(|source_err| ThumbnailError::Io {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let rotated = is_rotated(source, info.format);
    plan_thumbnail(source, source_url_path, info, rotated, request)
}
