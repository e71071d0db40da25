//! Shared value types returned by the sniffing and thumbnail operations.
//!
//! Everything here is immutable once built and serializes to JSON for the
//! CLI's `--json` output.

use serde::Serialize;
use std::fmt;

/// Container format detected from an image's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Gif,
    Jpeg,
    Svg,
    Unknown,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
            ImageFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sniffing an image header.
///
/// Width and height are both present or both absent. The one exception is a
/// JPEG whose marker stream could not be walked: the format is still
/// reported as [`ImageFormat::Jpeg`] with no dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageInfo {
    pub fn unknown() -> Self {
        Self::without_size(ImageFormat::Unknown)
    }

    pub fn without_size(format: ImageFormat) -> Self {
        Self {
            format,
            width: None,
            height: None,
        }
    }

    pub fn sized(format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width: Some(width),
            height: Some(height),
        }
    }

    /// Native `(width, height)` when both are known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// A planned thumbnail: where it will live and the size it reports.
///
/// For cropped thumbnails the size is exactly the requested box. Otherwise it
/// is the size the auto-orienting resizer will actually produce, so templates
/// can emit correct `width`/`height` attributes before the file exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    /// URL path of the generated file (or of the source, for SVG).
    pub url_path: String,
    pub width: u32,
    pub height: Option<u32>,
}

impl Thumbnail {
    pub fn new(url_path: impl Into<String>, width: u32, height: Option<u32>) -> Self {
        Self {
            url_path: url_path.into(),
            width,
            height,
        }
    }
}

/// Displays as the final path segment of the URL, e.g. `test@192.jpg`.
impl fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::naming::url_basename(&self.url_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_displays_lowercase_tag() {
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(ImageFormat::Unknown.to_string(), "unknown");
    }

    #[test]
    fn format_serializes_lowercase() {
        let json = serde_json::to_string(&ImageInfo::sized(ImageFormat::Png, 4, 3)).unwrap();
        assert_eq!(json, r#"{"format":"png","width":4,"height":3}"#);
    }

    #[test]
    fn dimensions_require_both_sides() {
        assert_eq!(
            ImageInfo::sized(ImageFormat::Gif, 10, 20).dimensions(),
            Some((10, 20))
        );
        assert_eq!(ImageInfo::without_size(ImageFormat::Jpeg).dimensions(), None);
    }

    #[test]
    fn thumbnail_displays_basename() {
        let thumb = Thumbnail::new("/blog/post/test@192.jpg", 192, Some(256));
        assert_eq!(thumb.to_string(), "test@192.jpg");
    }

    #[test]
    fn thumbnail_without_directory_displays_itself() {
        let thumb = Thumbnail::new("test@192.jpg", 192, None);
        assert_eq!(thumb.to_string(), "test@192.jpg");
    }
}
