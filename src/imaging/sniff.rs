//! Header sniffing: format and native size from an image's leading bytes.
//!
//! Only the first 32 bytes are inspected for PNG and GIF. JPEG dimensions
//! require walking the marker segments up to the first start-of-frame, and
//! SVG dimensions come from the root element's `width`/`height` attributes.
//!
//! Sniffing never fails: anything unrecognized, truncated or malformed comes
//! back as [`ImageInfo::unknown`] (or, for a JPEG whose segments cannot be
//! walked, as a JPEG without dimensions). The stream is always left at
//! offset 0 afterwards, so callers can hand it straight to a decoder.

use crate::types::{ImageFormat, ImageInfo};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};
use std::path::Path;

const HEAD_LEN: u64 = 32;
const MIN_HEAD_LEN: usize = 24;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const SVG_NAMESPACE: &[u8] = b"http://www.w3.org/2000/svg";

/// Start-of-frame markers; `C4`, `C8` and `CC` share the range but are not frames.
const SOF_MARKERS: [u8; 13] = [
    0xC0, 0xC1, 0xC2, 0xC3, 0xC5, 0xC6, 0xC7, 0xC9, 0xCA, 0xCB, 0xCD, 0xCE, 0xCF,
];

/// Seeks the wrapped stream back to offset 0 when dropped.
struct Rewind<'a, R: Seek>(&'a mut R);

impl<R: Seek> Drop for Rewind<'_, R> {
    fn drop(&mut self) {
        let _ = self.0.seek(SeekFrom::Start(0));
    }
}

impl<R: Seek> Deref for Rewind<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.0
    }
}

impl<R: Seek> DerefMut for Rewind<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.0
    }
}

/// Determine format and native size of the image in `reader`.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use thumbsmith::imaging::image_info;
/// # use thumbsmith::types::ImageFormat;
/// let mut bytes = b"GIF89a\x40\x01\xf0\x00".to_vec();
/// bytes.resize(32, 0);
/// let mut gif = Cursor::new(bytes);
/// let info = image_info(&mut gif);
/// assert_eq!(info.format, ImageFormat::Gif);
/// assert_eq!(info.dimensions(), Some((320, 240)));
/// assert_eq!(gif.position(), 0);
/// ```
pub fn image_info<R: Read + Seek>(reader: &mut R) -> ImageInfo {
    let mut stream = Rewind(reader);

    let mut head = Vec::with_capacity(HEAD_LEN as usize);
    let read = stream
        .seek(SeekFrom::Start(0))
        .and_then(|_| Read::by_ref(&mut *stream).take(HEAD_LEN).read_to_end(&mut head));
    if read.is_err() || head.len() < MIN_HEAD_LEN {
        return ImageInfo::unknown();
    }

    if head.trim_ascii_start().starts_with(b"<?xml ") {
        if stream.seek(SeekFrom::Start(0)).is_err() {
            return ImageInfo::unknown();
        }
        return svg_info(&mut *stream);
    }

    match detect_format(&head) {
        ImageFormat::Png => png_info(&head),
        ImageFormat::Gif => gif_info(&head),
        ImageFormat::Jpeg => match jpeg_dimensions(&mut *stream) {
            Ok((width, height)) => ImageInfo::sized(ImageFormat::Jpeg, width, height),
            Err(_) => ImageInfo::without_size(ImageFormat::Jpeg),
        },
        _ => ImageInfo::unknown(),
    }
}

/// Open `path` and sniff it.
pub fn image_info_from_path(path: &Path) -> io::Result<ImageInfo> {
    let mut file = BufReader::new(File::open(path)?);
    Ok(image_info(&mut file))
}

/// Classify a raster header by its signature bytes.
fn detect_format(head: &[u8]) -> ImageFormat {
    if head.starts_with(PNG_SIGNATURE) {
        ImageFormat::Png
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        ImageFormat::Gif
    } else if head.starts_with(&[0xFF, 0xD8, 0xFF])
        || matches!(head.get(6..10), Some(b"JFIF" | b"Exif"))
    {
        ImageFormat::Jpeg
    } else {
        ImageFormat::Unknown
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// IHDR width and height; the IHDR chunk always comes first.
///
/// The `0D 0A 1A 0A` check word at offset 4 is part of the signature matched
/// in [`detect_format`].
fn png_info(head: &[u8]) -> ImageInfo {
    ImageInfo::sized(ImageFormat::Png, be_u32(&head[16..20]), be_u32(&head[20..24]))
}

/// Logical screen size, little-endian.
fn gif_info(head: &[u8]) -> ImageInfo {
    let width = u16::from_le_bytes([head[6], head[7]]);
    let height = u16::from_le_bytes([head[8], head[9]]);
    ImageInfo::sized(ImageFormat::Gif, u32::from(width), u32::from(height))
}

fn read_u8<R: Read>(stream: &mut R) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    stream.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn read_u16_be<R: Read>(stream: &mut R) -> io::Result<u16> {
    let mut bytes = [0u8; 2];
    stream.read_exact(&mut bytes)?;
    Ok(u16::from_be_bytes(bytes))
}

/// Walk marker segments from just after SOI until a start-of-frame.
///
/// Any number of `FF` fill bytes may precede a marker code. Each segment
/// length counts its own two bytes, so a length below 2 is malformed.
fn jpeg_dimensions<R: Read + Seek>(stream: &mut R) -> io::Result<(u32, u32)> {
    stream.seek(SeekFrom::Start(0))?;
    let mut skip: i64 = 2;
    loop {
        stream.seek(SeekFrom::Current(skip))?;
        let mut marker = read_u8(stream)?;
        while marker == 0xFF {
            marker = read_u8(stream)?;
        }
        let length = read_u16_be(stream)?;
        if length < 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JPEG segment {marker:02X} has length {length}"),
            ));
        }
        if SOF_MARKERS.contains(&marker) {
            break;
        }
        skip = i64::from(length - 2);
    }

    // Sample precision, then height before width.
    stream.seek(SeekFrom::Current(1))?;
    let height = read_u16_be(stream)?;
    let width = read_u16_be(stream)?;
    Ok((u32::from(width), u32::from(height)))
}

/// Size from the root `<svg>` element of an XML document.
fn svg_info<R: Read>(stream: R) -> ImageInfo {
    let mut reader = NsReader::from_reader(BufReader::new(stream));
    let mut buf = Vec::new();
    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(root) | Event::Empty(root))) => {
                return match svg_root_size(&ns, &root) {
                    Some((width, height)) => ImageInfo::sized(ImageFormat::Svg, width, height),
                    None => ImageInfo::unknown(),
                };
            }
            Ok((_, Event::Eof)) | Err(_) => return ImageInfo::unknown(),
            Ok(_) => {}
        }
        buf.clear();
    }
}

fn svg_root_size(ns: &ResolveResult, root: &BytesStart) -> Option<(u32, u32)> {
    let in_svg_namespace = matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SVG_NAMESPACE);
    if !in_svg_namespace || root.local_name().as_ref() != b"svg" {
        return None;
    }
    Some((svg_length(root, "width")?, svg_length(root, "height")?))
}

/// A plain integer attribute; units, percentages and fractions are rejected.
fn svg_length(root: &BytesStart, name: &str) -> Option<u32> {
    let attr = root.try_get_attribute(name).ok()??;
    let value = attr.unescape_value().ok()?;
    value.trim().parse().ok()
}
