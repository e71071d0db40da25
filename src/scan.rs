//! Bulk header sniffing for the `info` command.
//!
//! Inputs may be files or directories. Directories are walked recursively
//! (hidden entries skipped) and every regular file found is sniffed; files
//! are sniffed in parallel on the rayon pool. Results come back sorted by
//! path so output is stable regardless of scheduling.

use crate::imaging::image_info_from_path;
use crate::types::ImageInfo;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// One sniffed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanEntry {
    pub path: PathBuf,
    #[serde(flatten)]
    pub info: ImageInfo,
}

/// A file that could not be opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
    pub failures: Vec<ScanFailure>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Expand `paths` into the sorted list of regular files below them.
///
/// Unreadable directory entries are logged and skipped.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).into_iter().filter_entry(|e| !is_hidden(e)) {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "skipping unreadable entry"),
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Sniff every file below `paths`.
pub fn scan(paths: &[PathBuf]) -> ScanReport {
    let results: Vec<(PathBuf, std::io::Result<ImageInfo>)> = collect_files(paths)
        .into_par_iter()
        .map(|path| {
            let info = image_info_from_path(&path);
            (path, info)
        })
        .collect();

    let mut report = ScanReport::default();
    for (path, result) in results {
        match result {
            Ok(info) => report.entries.push(ScanEntry { path, info }),
            Err(err) => report.failures.push(ScanFailure {
                path,
                error: err.to_string(),
            }),
        }
    }
    report
}

/// Path shown for `path` relative to the scanned root, if below it.
pub fn display_path<'a>(path: &'a Path, root: Option<&Path>) -> std::borrow::Cow<'a, str> {
    match root.and_then(|r| path.strip_prefix(r).ok()) {
        Some(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy(),
        _ => path.to_string_lossy(),
    }
}
