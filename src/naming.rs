//! URL naming for generated thumbnails.
//!
//! A thumbnail lives next to its source and is named from the source stem,
//! an `@`, and the deterministic suffix built by
//! [`thumbnail_suffix`](crate::imaging::thumbnail_suffix):
//!
//! ```text
//! /blog/post/test.jpg  + "192x256_q20"            → /blog/post/test@192x256_q20.jpg
//! /blog/post/scan.tiff + "800" (ext override .jpeg) → /blog/post/scan@800.jpeg
//! ```
//!
//! The `@` separator and the suffix token order are an on-disk contract:
//! changing either renames every previously generated thumbnail.
//!
//! URL paths always use `/`, independent of the host platform, so this
//! module works on strings rather than [`std::path::Path`].

/// Split a URL path into `(directory, filename)` at the last `/`.
///
/// Trailing slashes are stripped from the directory unless it consists only
/// of slashes (the root).
fn split_url(url_path: &str) -> (&str, &str) {
    let cut = url_path.rfind('/').map_or(0, |i| i + 1);
    let (head, tail) = url_path.split_at(cut);
    if !head.is_empty() && !head.bytes().all(|b| b == b'/') {
        (head.trim_end_matches('/'), tail)
    } else {
        (head, tail)
    }
}

/// Split a filename into `(stem, extension)`, the extension keeping its dot.
///
/// Leading dots do not start an extension: `.profile` has none.
fn split_ext(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(dot) if filename[..dot].bytes().any(|b| b != b'.') => filename.split_at(dot),
        _ => (filename, ""),
    }
}

fn join_url(directory: &str, filename: &str) -> String {
    if directory.is_empty() || directory.ends_with('/') {
        format!("{directory}{filename}")
    } else {
        format!("{directory}/{filename}")
    }
}

/// Final path segment of a URL path.
pub fn url_basename(url_path: &str) -> &str {
    split_url(url_path).1
}

/// Build the URL of an artifact derived from `url_path`.
///
/// The result sits in the same directory, named `stem@suffix` followed by
/// `ext` when given, or by the source's own extension otherwise.
pub fn dependent_url(url_path: &str, suffix: &str, ext: Option<&str>) -> String {
    let (directory, filename) = split_url(url_path);
    let (stem, source_ext) = split_ext(filename);
    let ext = ext.unwrap_or(source_ext);
    join_url(directory, &format!("{stem}@{suffix}{ext}"))
}

/// Lowercased text after the last `.` of a filename.
///
/// A name without any dot is returned whole, lowercased, which never matches
/// a known extension.
pub fn source_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map_or(filename, |(_, ext)| ext)
        .to_lowercase()
}
