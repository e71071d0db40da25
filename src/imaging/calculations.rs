//! Pure calculation functions for thumbnail names and dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Quality;
use crate::naming::source_extension;

/// Build the cache-stable suffix that names a thumbnail.
///
/// Tokens are appended in a fixed order: width, `x` height, `_crop`,
/// `_q` quality. Equal inputs always produce the same suffix, which makes it
/// usable as a cache key.
///
/// # Examples
/// ```
/// # use thumbsmith::imaging::{Quality, thumbnail_suffix};
/// assert_eq!(thumbnail_suffix(200, None, false, None), "200");
/// assert_eq!(
///     thumbnail_suffix(200, Some(100), true, Some(Quality::new(80))),
///     "200x100_crop_q80"
/// );
/// ```
pub fn thumbnail_suffix(
    width: u32,
    height: Option<u32>,
    crop: bool,
    quality: Option<Quality>,
) -> String {
    let mut suffix = width.to_string();
    if let Some(height) = height {
        suffix.push_str(&format!("x{height}"));
    }
    if crop {
        suffix.push_str("_crop");
    }
    if let Some(quality) = quality {
        suffix.push_str(&format!("_q{}", quality.value()));
    }
    suffix
}

/// Extensions browsers display directly; thumbnails of these keep their format.
const WEB_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Extension override for a thumbnail of `source_filename`.
///
/// Returns `None` when the source is already a web format, otherwise
/// `Some(".jpeg")` so the resizer converts it.
pub fn thumbnail_ext(source_filename: &str) -> Option<&'static str> {
    let ext = source_extension(source_filename);
    if WEB_EXTENSIONS.contains(&ext.as_str()) {
        None
    } else {
        Some(".jpeg")
    }
}

/// Encoding quality used when a request does not specify one.
pub fn default_quality(source_filename: &str) -> Quality {
    if source_extension(source_filename) == "png" {
        Quality(75)
    } else {
        Quality(85)
    }
}

/// `floor(other * target / same)` in 64-bit, saturating into `u32`.
fn scale_proportionally(same: u32, other: u32, target: u32) -> u32 {
    (u64::from(other) * u64::from(target))
        .checked_div(u64::from(same))
        .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Compute the size a non-cropped thumbnail will actually have.
///
/// # Arguments
/// * `width` - Requested thumbnail width
/// * `height` - Requested thumbnail height, if any
/// * `actual` - Native source dimensions (width, height)
/// * `rotated` - Whether EXIF orientation turns the image by 90°
///
/// The resizer auto-orients before scaling, so a rotated source is measured
/// upright: its width and height are swapped first.
///
/// Without a height the thumbnail is exactly `width` wide. With both bounds
/// each side is fitted independently and clamped to its bound, so the
/// result never exceeds the requested box.
///
/// # Examples
/// ```
/// # use thumbsmith::imaging::computed_size;
/// assert_eq!(computed_size(256, None, (512, 384), false), (256, 192));
/// assert_eq!(computed_size(256, Some(150), (512, 384), false), (200, 150));
/// ```
pub fn computed_size(
    width: u32,
    height: Option<u32>,
    actual: (u32, u32),
    rotated: bool,
) -> (u32, u32) {
    let (actual_w, actual_h) = if rotated {
        (actual.1, actual.0)
    } else {
        actual
    };

    match height {
        None => (width, scale_proportionally(actual_w, actual_h, width)),
        Some(height) => (
            scale_proportionally(actual_h, actual_w, height).min(width),
            scale_proportionally(actual_w, actual_h, width).min(height),
        ),
    }
}
