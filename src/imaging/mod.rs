//! Image inspection and thumbnailing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | header bytes, JPEG marker walk, `quick-xml` for SVG |
//! | **EXIF** | `kamadak-exif`, flattened into [`ExifInfo`](crate::metadata::ExifInfo) |
//! | **Size & name** | pure integer math + `stem@suffix.ext` naming |
//! | **Resize** | external ImageMagick (`convert -auto-orient ...`) |
//!
//! The module is split into:
//! - **Sniff**: Format and native size from leading bytes, never failing
//! - **EXIF reader**: Container bytes to the tag table the metadata layer reads
//! - **Calculations**: Pure functions for suffixes and dimension math (unit testable)
//! - **Parameters**: Data structures describing requests and resizer invocations
//! - **Backend**: [`ImageBackend`] trait + [`ImageMagickBackend`]
//! - **Operations**: Two-phase thumbnail planning plus the deferred build step

pub mod backend;
mod calculations;
pub mod exif_reader;
pub mod imagemagick;
pub mod operations;
mod params;
pub mod sniff;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{computed_size, default_quality, thumbnail_ext, thumbnail_suffix};
pub use exif_reader::{read_exif, read_exif_path};
pub use imagemagick::{ImageMagickBackend, find_imagemagick};
pub use operations::{
    PlannedThumbnail, ThumbnailBuild, ThumbnailError, is_rotated, make_thumbnail, plan_thumbnail,
    process_image,
};
pub use params::{Quality, ResizeParams, ThumbnailRequest};
pub use sniff::{image_info, image_info_from_path};
