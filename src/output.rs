//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! album/broken.jpg  jpeg (size unknown)
//! album/dawn.jpg    jpeg 4032x3024
//! album/notes.txt   unknown
//! missing.png       error: No such file or directory (os error 2)
//!
//! 4 files: 2 images, 1 unrecognized, 1 unreadable
//! ```
//!
//! ## Exif
//!
//! ```text
//! camera        Apple iPhone 6
//! f             ƒ/2.2
//! exposure_time 1/33
//! artist        -
//! ```
//!
//! ## Thumbnail
//!
//! ```text
//! test@256x150_crop.jpg 256x150
//!     URL: /content/test@256x150_crop.jpg
//!     Written: thumbs/content/test@256x150_crop.jpg
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::imaging::PlannedThumbnail;
use crate::metadata::{ExifInfo, FieldValue, format_float};
use crate::scan::{ScanReport, display_path};
use crate::types::{ImageFormat, ImageInfo};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// `jpeg 512x384`, `jpeg (size unknown)` or `unknown`.
pub fn format_image_info(info: &ImageInfo) -> String {
    match (info.format, info.dimensions()) {
        (ImageFormat::Unknown, _) => info.format.to_string(),
        (format, Some((w, h))) => format!("{format} {w}x{h}"),
        (format, None) => format!("{format} (size unknown)"),
    }
}

// ============================================================================
// Info
// ============================================================================

/// Format a scan report: one aligned line per file, then a summary.
pub fn format_info_output(report: &ScanReport, root: Option<&Path>) -> Vec<String> {
    let mut rows: Vec<(String, String)> = report
        .entries
        .iter()
        .map(|e| (display_path(&e.path, root).into_owned(), format_image_info(&e.info)))
        .collect();
    rows.extend(report.failures.iter().map(|f| {
        (
            display_path(&f.path, root).into_owned(),
            format!("error: {}", f.error),
        )
    }));
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let width = rows.iter().map(|(p, _)| p.chars().count()).max().unwrap_or(0);
    let mut lines: Vec<String> = rows
        .into_iter()
        .map(|(path, detail)| format!("{path:<width$}  {detail}"))
        .collect();

    let images = report
        .entries
        .iter()
        .filter(|e| e.info.format != ImageFormat::Unknown)
        .count();
    let unrecognized = report.entries.len() - images;
    let total = report.entries.len() + report.failures.len();

    let mut summary = format!("{}: {}", plural(total, "file"), plural(images, "image"));
    if unrecognized > 0 {
        summary.push_str(&format!(", {unrecognized} unrecognized"));
    }
    if !report.failures.is_empty() {
        summary.push_str(&format!(", {} unreadable", report.failures.len()));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(summary);
    lines
}

/// Print info output to stdout.
pub fn print_info_output(report: &ScanReport, root: Option<&Path>) {
    for line in format_info_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Exif
// ============================================================================

/// Display text for one derived field.
pub fn format_field_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Number(n) => format_float(*n),
        FieldValue::Integer(i) => i.to_string(),
        FieldValue::Flag(b) => b.to_string(),
        FieldValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        FieldValue::Location(lat, long) => {
            format!("{}, {}", format_float(*lat), format_float(*long))
        }
    }
}

/// Format every derived field as `name value`, `-` when absent.
///
/// Fields keep their declaration order so related values sit together.
pub fn format_exif_output(exif: &ExifInfo) -> Vec<String> {
    let width = ExifInfo::field_names().map(str::len).max().unwrap_or(0);
    ExifInfo::field_names()
        .map(|name| {
            let value = exif
                .field(name)
                .map(|v| format_field_value(&v))
                .unwrap_or_else(|| "-".to_string());
            format!("{name:<width$} {value}")
        })
        .collect()
}

/// Print exif output to stdout.
pub fn print_exif_output(exif: &ExifInfo) {
    for line in format_exif_output(exif) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnail
// ============================================================================

/// Format a planned thumbnail, plus where it was written if it was built.
///
/// SVG sources have no build step and are reported as served as-is.
pub fn format_thumbnail_output(planned: &PlannedThumbnail, written: Option<&Path>) -> Vec<String> {
    let thumb = &planned.thumbnail;
    let size = match thumb.height {
        Some(h) => format!("{}x{}", thumb.width, h),
        None => format!("{}w", thumb.width),
    };
    let mut lines = vec![
        format!("{} {}", thumb, size),
        format!("{}URL: {}", indent(1), thumb.url_path),
    ];
    match (&planned.build, written) {
        (None, _) => lines.push(format!("{}Served as-is (vector source)", indent(1))),
        (Some(_), Some(path)) => {
            lines.push(format!("{}Written: {}", indent(1), path.display()))
        }
        (Some(build), None) => lines.push(format!(
            "{}Not built (source: {})",
            indent(1),
            build.source.display()
        )),
    }
    lines
}

/// Print thumbnail output to stdout.
pub fn print_thumbnail_output(planned: &PlannedThumbnail, written: Option<&Path>) {
    for line in format_thumbnail_output(planned, written) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Quality, ThumbnailBuild};
    use crate::metadata::TagValue;
    use crate::scan::{ScanEntry, ScanFailure};
    use crate::types::Thumbnail;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn image_info_with_size() {
        let info = ImageInfo::sized(ImageFormat::Jpeg, 512, 384);
        assert_eq!(format_image_info(&info), "jpeg 512x384");
    }

    #[test]
    fn image_info_without_size() {
        let info = ImageInfo::without_size(ImageFormat::Jpeg);
        assert_eq!(format_image_info(&info), "jpeg (size unknown)");
    }

    #[test]
    fn image_info_unknown() {
        assert_eq!(format_image_info(&ImageInfo::unknown()), "unknown");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "file"), "1 file");
        assert_eq!(plural(0, "file"), "0 files");
        assert_eq!(plural(3, "image"), "3 images");
    }

    // =========================================================================
    // Info output tests
    // =========================================================================

    fn report() -> ScanReport {
        ScanReport {
            entries: vec![
                ScanEntry {
                    path: "/photos/album/dawn.jpg".into(),
                    info: ImageInfo::sized(ImageFormat::Jpeg, 4032, 3024),
                },
                ScanEntry {
                    path: "/photos/notes.txt".into(),
                    info: ImageInfo::unknown(),
                },
            ],
            failures: vec![ScanFailure {
                path: "/photos/gone.png".into(),
                error: "denied".into(),
            }],
        }
    }

    #[test]
    fn info_lines_are_aligned_and_sorted() {
        let lines = format_info_output(&report(), Some(Path::new("/photos")));
        assert_eq!(
            lines,
            vec![
                "album/dawn.jpg  jpeg 4032x3024",
                "gone.png        error: denied",
                "notes.txt       unknown",
                "",
                "3 files: 1 image, 1 unrecognized, 1 unreadable",
            ]
        );
    }

    #[test]
    fn info_without_root_shows_full_paths() {
        let lines = format_info_output(&report(), None);
        assert!(lines[0].starts_with("/photos/album/dawn.jpg  "));
    }

    #[test]
    fn info_empty_report() {
        let lines = format_info_output(&ScanReport::default(), None);
        assert_eq!(lines, vec!["0 files: 0 images"]);
    }

    // =========================================================================
    // Exif output tests
    // =========================================================================

    #[test]
    fn field_value_text_forms() {
        assert_eq!(format_field_value(&FieldValue::Text("Apple".into())), "Apple");
        assert_eq!(format_field_value(&FieldValue::Number(29.0)), "29.0");
        assert_eq!(format_field_value(&FieldValue::Number(2.2)), "2.2");
        assert_eq!(format_field_value(&FieldValue::Integer(160)), "160");
        assert_eq!(format_field_value(&FieldValue::Flag(true)), "true");
        assert_eq!(
            format_field_value(&FieldValue::Location(46.6383, -13.4048)),
            "46.6383, -13.4048"
        );
    }

    #[test]
    fn field_value_datetime() {
        let dt = NaiveDate::from_ymd_opt(2015, 12, 6)
            .unwrap()
            .and_hms_opt(11, 37, 38)
            .unwrap();
        assert_eq!(
            format_field_value(&FieldValue::DateTime(dt)),
            "2015-12-06 11:37:38"
        );
    }

    #[test]
    fn exif_output_lists_every_field() {
        let lines = format_exif_output(&ExifInfo::default());
        assert_eq!(lines.len(), ExifInfo::field_names().count());
        let artist = lines.iter().find(|l| l.starts_with("artist ")).unwrap();
        assert!(artist.ends_with(" -"));
        let rotated = lines.iter().find(|l| l.starts_with("is_rotated")).unwrap();
        assert!(rotated.ends_with(" false"));
    }

    #[test]
    fn exif_output_shows_values() {
        let mut tags = HashMap::new();
        tags.insert("Image Make".to_string(), TagValue::Text("Apple".into()));
        tags.insert("Image Model".to_string(), TagValue::Text("iPhone 6".into()));
        let lines = format_exif_output(&ExifInfo::new(tags));
        let camera = lines.iter().find(|l| l.starts_with("camera ")).unwrap();
        assert!(camera.ends_with(" Apple iPhone 6"), "{camera}");
    }

    #[test]
    fn exif_output_values_share_a_column() {
        let lines = format_exif_output(&ExifInfo::default());
        let columns: Vec<usize> = lines.iter().map(|l| l.rfind(' ').unwrap()).collect();
        assert!(columns.windows(2).all(|w| w[0] == w[1]));
    }

    // =========================================================================
    // Thumbnail output tests
    // =========================================================================

    fn planned(build: bool) -> PlannedThumbnail {
        PlannedThumbnail {
            thumbnail: Thumbnail::new("/content/test@256x150_crop.jpg", 256, Some(150)),
            build: build.then(|| ThumbnailBuild {
                source: PathBuf::from("/src/test.jpg"),
                url_path: "/content/test@256x150_crop.jpg".into(),
                width: 256,
                height: Some(150),
                crop: true,
                quality: Some(Quality::new(85)),
            }),
        }
    }

    #[test]
    fn thumbnail_written() {
        let lines = format_thumbnail_output(
            &planned(true),
            Some(Path::new("thumbs/content/test@256x150_crop.jpg")),
        );
        assert_eq!(
            lines,
            vec![
                "test@256x150_crop.jpg 256x150",
                "    URL: /content/test@256x150_crop.jpg",
                "    Written: thumbs/content/test@256x150_crop.jpg",
            ]
        );
    }

    #[test]
    fn thumbnail_planned_only() {
        let lines = format_thumbnail_output(&planned(true), None);
        assert_eq!(lines[2], "    Not built (source: /src/test.jpg)");
    }

    #[test]
    fn thumbnail_svg_served_as_is() {
        let planned = PlannedThumbnail {
            thumbnail: Thumbnail::new("/content/logo.svg", 192, None),
            build: None,
        };
        let lines = format_thumbnail_output(&planned, None);
        assert_eq!(lines[0], "logo.svg 192w");
        assert_eq!(lines[2], "    Served as-is (vector source)");
    }
}
