//! Shared test utilities for the thumbsmith test suite.
//!
//! Builds small synthetic image files byte by byte, so header sniffing and
//! EXIF decoding can be tested against exact, known layouts without shipping
//! binary fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let jpeg = jpeg_bytes(512, 384);
//! let tagged = jpeg_with_exif(512, 384, &tiff_bytes(&[(ORIENTATION, Val::Short(6))], &[], &[]));
//! let tmp = write_fixture("photo.jpg", &tagged);
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

// =========================================================================
// Fixture files
// =========================================================================

/// Write `bytes` to `name` inside a fresh temp directory.
///
/// Returns the directory guard (keep it alive) and the file path.
pub fn write_fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (tmp, path)
}

// =========================================================================
// Container builders
// =========================================================================

/// Minimal PNG: signature plus an IHDR chunk.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 2, 0, 0, 0]);
    data.extend_from_slice(&[0; 4]); // CRC, never checked
    data
}

/// Minimal GIF89a: header plus logical screen descriptor and trailer.
pub fn gif_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[0, 0, 0]);
    data.extend_from_slice(&[0; 16]);
    data.push(0x3B);
    data
}

/// A JPEG marker segment: `FF code`, big-endian length, payload.
pub fn segment(code: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, code];
    data.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    data.extend_from_slice(payload);
    data
}

/// SOFn payload: precision, height, width, three components.
pub fn sof_payload(width: u16, height: u16) -> Vec<u8> {
    let mut payload = vec![8];
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    payload
}

fn jfif_segment() -> Vec<u8> {
    segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0")
}

/// Baseline JPEG header: SOI, APP0/JFIF, DQT, DHT, SOF0, then SOS/EOI.
///
/// The DHT marker (`C4`) sits inside the `C0..CF` range without being a
/// start-of-frame, which exercises the SOF filter.
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    jpeg_from_segments(&[
        jfif_segment(),
        segment(0xDB, &[0; 65]),
        segment(0xC4, &[0; 30]),
        segment(0xC0, &sof_payload(width, height)),
    ])
}

/// JPEG with an APP1/Exif segment holding `tiff` ahead of the frame header.
pub fn jpeg_with_exif(width: u16, height: u16, tiff: &[u8]) -> Vec<u8> {
    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(tiff);
    jpeg_from_segments(&[
        segment(0xE1, &app1),
        segment(0xDB, &[0; 65]),
        segment(0xC0, &sof_payload(width, height)),
    ])
}

/// SOI, the given segments, a tiny scan, EOI.
pub fn jpeg_from_segments(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    for seg in segments {
        data.extend_from_slice(seg);
    }
    data.extend_from_slice(&segment(0xDA, &[1, 1, 0, 0, 0x3F, 0]));
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0xD9]);
    data
}

/// SVG document with an XML declaration and the given root attributes.
pub fn svg_bytes(root_attributes: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" {root_attributes}>\
         <rect width=\"10\" height=\"10\"/></svg>\n"
    )
    .into_bytes()
}

// =========================================================================
// TIFF / EXIF builder
// =========================================================================

pub const DOCUMENT_NAME: u16 = 0x010D;
pub const IMAGE_DESCRIPTION: u16 = 0x010E;
pub const MAKE: u16 = 0x010F;
pub const MODEL: u16 = 0x0110;
pub const ORIENTATION: u16 = 0x0112;
pub const DATE_TIME: u16 = 0x0132;
pub const ARTIST: u16 = 0x013B;
pub const EXPOSURE_TIME: u16 = 0x829A;
pub const F_NUMBER: u16 = 0x829D;
pub const ISO_SPEED: u16 = 0x8827;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const SHUTTER_SPEED: u16 = 0x9201;
pub const APERTURE: u16 = 0x9202;
pub const FLASH: u16 = 0x9209;
pub const FOCAL_LENGTH: u16 = 0x920A;
pub const FOCAL_LENGTH_35MM: u16 = 0xA405;
pub const LENS_MAKE: u16 = 0xA433;
pub const LENS_MODEL: u16 = 0xA434;
pub const GPS_LATITUDE_REF: u16 = 0x0001;
pub const GPS_LATITUDE: u16 = 0x0002;
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
pub const GPS_LONGITUDE: u16 = 0x0004;
pub const GPS_ALTITUDE_REF: u16 = 0x0005;
pub const GPS_ALTITUDE: u16 = 0x0006;

const EXIF_IFD_POINTER: u16 = 0x8769;
const GPS_IFD_POINTER: u16 = 0x8825;

/// A TIFF field value, little-endian encoded by [`tiff_bytes`].
#[derive(Debug, Clone)]
pub enum Val {
    Ascii(&'static str),
    Byte(u8),
    Short(u16),
    Long(u32),
    Rational(Vec<(u32, u32)>),
    SRational(i32, i32),
}

impl Val {
    /// `(type id, count, payload)`.
    fn encode(&self) -> (u16, u32, Vec<u8>) {
        match self {
            Val::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Val::Byte(b) => (1, 1, vec![*b]),
            Val::Short(v) => (3, 1, v.to_le_bytes().to_vec()),
            Val::Long(v) => (4, 1, v.to_le_bytes().to_vec()),
            Val::Rational(parts) => {
                let bytes = parts
                    .iter()
                    .flat_map(|(n, d)| n.to_le_bytes().into_iter().chain(d.to_le_bytes()))
                    .collect();
                (5, parts.len() as u32, bytes)
            }
            Val::SRational(n, d) => {
                let bytes = n.to_le_bytes().into_iter().chain(d.to_le_bytes()).collect();
                (10, 1, bytes)
            }
        }
    }
}

/// Encode one IFD starting at byte `start` of the TIFF stream.
fn write_ifd(entries: &[(u16, Val)], start: u32) -> Vec<u8> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|(tag, _)| *tag);

    let table_len = 2 + 12 * sorted.len() as u32 + 4;
    let mut table = (sorted.len() as u16).to_le_bytes().to_vec();
    let mut data = Vec::new();

    for (tag, val) in &sorted {
        let (typ, count, bytes) = val.encode();
        table.extend_from_slice(&tag.to_le_bytes());
        table.extend_from_slice(&typ.to_le_bytes());
        table.extend_from_slice(&count.to_le_bytes());
        if bytes.len() <= 4 {
            let mut inline = bytes;
            inline.resize(4, 0);
            table.extend_from_slice(&inline);
        } else {
            let offset = start + table_len + data.len() as u32;
            table.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&bytes);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }

    table.extend_from_slice(&0u32.to_le_bytes());
    table.extend_from_slice(&data);
    table
}

/// Little-endian TIFF stream with IFD0 and optional Exif and GPS sub-IFDs.
pub fn tiff_bytes(ifd0: &[(u16, Val)], exif: &[(u16, Val)], gps: &[(u16, Val)]) -> Vec<u8> {
    let with_pointers = |exif_at: u32, gps_at: u32| {
        let mut entries = ifd0.to_vec();
        if !exif.is_empty() {
            entries.push((EXIF_IFD_POINTER, Val::Long(exif_at)));
        }
        if !gps.is_empty() {
            entries.push((GPS_IFD_POINTER, Val::Long(gps_at)));
        }
        entries
    };

    // Pointer values are inline LONGs, so IFD0's size does not depend on them.
    let ifd0_len = write_ifd(&with_pointers(0, 0), 8).len() as u32;
    let exif_at = 8 + ifd0_len;
    let exif_ifd = if exif.is_empty() {
        Vec::new()
    } else {
        write_ifd(exif, exif_at)
    };
    let gps_at = exif_at + exif_ifd.len() as u32;
    let gps_ifd = if gps.is_empty() {
        Vec::new()
    } else {
        write_ifd(gps, gps_at)
    };

    let mut data = b"II*\0".to_vec();
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&write_ifd(&with_pointers(exif_at, gps_at), 8));
    data.extend_from_slice(&exif_ifd);
    data.extend_from_slice(&gps_ifd);
    data
}

/// EXIF block modelled on an iPhone 6 photo taken near Villach, Austria.
pub fn iphone_tiff() -> Vec<u8> {
    tiff_bytes(
        &[
            (DOCUMENT_NAME, Val::Ascii("testName")),
            (IMAGE_DESCRIPTION, Val::Ascii("testDescription")),
            (MAKE, Val::Ascii("Apple")),
            (MODEL, Val::Ascii("iPhone 6")),
            (ORIENTATION, Val::Short(6)),
            (DATE_TIME, Val::Ascii("2015:12:06 11:37:38")),
        ],
        &[
            (EXPOSURE_TIME, Val::Rational(vec![(1, 33)])),
            (F_NUMBER, Val::Rational(vec![(11, 5)])),
            (ISO_SPEED, Val::Short(160)),
            (DATE_TIME_ORIGINAL, Val::Ascii("2015:12:06 11:37:38")),
            (SHUTTER_SPEED, Val::SRational(5045, 1000)),
            (APERTURE, Val::Rational(vec![(2275, 1000)])),
            (FLASH, Val::Short(16)),
            (FOCAL_LENGTH, Val::Rational(vec![(21, 5)])),
            (FOCAL_LENGTH_35MM, Val::Short(29)),
            (LENS_MAKE, Val::Ascii("Apple")),
            (LENS_MODEL, Val::Ascii("iPhone 6 back camera 4.15mm f/2.2")),
        ],
        &[
            (GPS_LATITUDE_REF, Val::Ascii("N")),
            (
                GPS_LATITUDE,
                Val::Rational(vec![(46, 1), (38, 1), (18, 10)]),
            ),
            (GPS_LONGITUDE_REF, Val::Ascii("E")),
            (
                GPS_LONGITUDE,
                Val::Rational(vec![(13, 1), (24, 1), (174, 10)]),
            ),
            (GPS_ALTITUDE_REF, Val::Byte(0)),
            (GPS_ALTITUDE, Val::Rational(vec![(7_790_293, 10_000)])),
        ],
    )
}
