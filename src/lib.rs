//! # thumbsmith
//!
//! Image inspection and thumbnail planning for static site builds.
//! Headers are read without decoding pixels, EXIF is exposed as typed
//! camera/lens/GPS fields, and thumbnails are named and sized before the
//! actual resize is handed to ImageMagick.
//!
//! # Architecture: Plan, Then Build
//!
//! Thumbnailing is split in two so a site generator can emit HTML with the
//! correct `width`/`height` attributes long before any pixels exist:
//!
//! ```text
//! 1. Plan    source + request  →  Thumbnail { url_path, width, height }
//! 2. Build   ThumbnailBuild    →  ImageMagick writes the file
//! ```
//!
//! Planning only reads the first bytes of the source (plus EXIF orientation
//! for JPEG). The build step can be skipped when the output is already
//! cached, since the URL is derived deterministically from the request.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Header sniffing, EXIF reading, size math, the resizer backend, planning |
//! | [`metadata`] | Typed accessors over a flattened EXIF tag table |
//! | [`naming`] | `stem@suffix.ext` URLs for derived files |
//! | [`types`] | Shared result types (`ImageInfo`, `Thumbnail`) |
//! | [`scan`] | Bulk sniffing of files and directory trees |
//! | [`config`] | `thumbsmith.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Sizes Follow the Resizer
//!
//! The reported size of a non-cropped thumbnail is what `convert -auto-orient
//! -resize WxH` will produce, including the side swap for sources whose EXIF
//! orientation is 5–8. Reporting the requested box instead would give wrong
//! layout hints for every portrait photo taken on a phone.
//!
//! ## Sniffing Never Fails
//!
//! A file that is not PNG, GIF, JPEG or SVG is reported as `unknown`, and a
//! JPEG whose marker stream cannot be walked is reported as `jpeg` without a
//! size. Only opening the file can fail.

pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
