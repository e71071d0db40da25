//! EXIF tag source backed by `kamadak-exif`.
//!
//! Parses the EXIF block of a JPEG, TIFF, PNG, HEIF or WebP container into the
//! flat `"<group> <TagName>"` table that [`ExifInfo`] reads. Groups are
//! `Image` (IFD0), `Thumbnail` (IFD1), `EXIF`, `GPS` and `Interoperability`.
//!
//! The tags [`ExifInfo`] consumes are named from a local table together with
//! the value shape they are converted to, so e.g. `Flash` always arrives as
//! readable text. Every other tag is passed through under the crate's own tag
//! name with its shape inferred from the stored value type.
//!
//! Reading never fails: a container without EXIF, an unsupported format or an
//! I/O error all produce an empty [`ExifInfo`].

use crate::metadata::{ExifInfo, Ratio, TagValue};
use exif::{Context, Exif, Field, In, Tag, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Int,
    Rational,
    Printable,
}

const KNOWN_TAGS: &[(Tag, &str, Kind)] = &[
    (Tag(Context::Tiff, 0x010D), "DocumentName", Kind::Text),
    (Tag(Context::Tiff, 0x010E), "ImageDescription", Kind::Text),
    (Tag(Context::Tiff, 0x010F), "Make", Kind::Text),
    (Tag(Context::Tiff, 0x0110), "Model", Kind::Text),
    (Tag(Context::Tiff, 0x0112), "Orientation", Kind::Int),
    (Tag(Context::Tiff, 0x0132), "DateTime", Kind::Text),
    (Tag(Context::Tiff, 0x013B), "Artist", Kind::Text),
    (Tag(Context::Tiff, 0x8298), "Copyright", Kind::Text),
    (Tag(Context::Tiff, 0x9003), "DateTimeOriginal", Kind::Text),
    (Tag(Context::Exif, 0x829A), "ExposureTime", Kind::Rational),
    (Tag(Context::Exif, 0x829D), "FNumber", Kind::Rational),
    (Tag(Context::Exif, 0x8827), "ISOSpeedRatings", Kind::Int),
    (Tag(Context::Exif, 0x9003), "DateTimeOriginal", Kind::Text),
    (Tag(Context::Exif, 0x9004), "DateTimeDigitized", Kind::Text),
    (Tag(Context::Exif, 0x9201), "ShutterSpeedValue", Kind::Rational),
    (Tag(Context::Exif, 0x9202), "ApertureValue", Kind::Rational),
    (Tag(Context::Exif, 0x9209), "Flash", Kind::Printable),
    (Tag(Context::Exif, 0x920A), "FocalLength", Kind::Rational),
    (Tag(Context::Exif, 0xA405), "FocalLengthIn35mmFilm", Kind::Int),
    (Tag(Context::Exif, 0xA433), "LensMake", Kind::Text),
    (Tag(Context::Exif, 0xA434), "LensModel", Kind::Text),
    (Tag(Context::Gps, 0x0001), "GPSLatitudeRef", Kind::Text),
    (Tag(Context::Gps, 0x0002), "GPSLatitude", Kind::Rational),
    (Tag(Context::Gps, 0x0003), "GPSLongitudeRef", Kind::Text),
    (Tag(Context::Gps, 0x0004), "GPSLongitude", Kind::Rational),
    (Tag(Context::Gps, 0x0005), "GPSAltitudeRef", Kind::Int),
    (Tag(Context::Gps, 0x0006), "GPSAltitude", Kind::Rational),
    (Tag(Context::Gps, 0x001D), "GPSDate", Kind::Text),
];

/// Sub-IFD groups; TIFF tags split into `Image` and `Thumbnail` by IFD.
const GROUPS: &[(Context, &str)] = &[
    (Context::Exif, "EXIF"),
    (Context::Gps, "GPS"),
    (Context::Interop, "Interoperability"),
];

fn group_name(field: &Field) -> Option<&'static str> {
    let context = field.tag.context();
    if context == Context::Tiff {
        return Some(if field.ifd_num == In::PRIMARY {
            "Image"
        } else {
            "Thumbnail"
        });
    }
    GROUPS
        .iter()
        .find(|(group, _)| *group == context)
        .map(|(_, name)| *name)
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|s| String::from_utf8_lossy(s).trim_end_matches('\0').to_string()),
        _ => None,
    }
}

fn int_values(value: &Value) -> Option<Vec<i64>> {
    let values = match value {
        Value::Byte(v) => v.iter().map(|&x| i64::from(x)).collect(),
        Value::Short(v) => v.iter().map(|&x| i64::from(x)).collect(),
        Value::Long(v) => v.iter().map(|&x| i64::from(x)).collect(),
        Value::SByte(v) => v.iter().map(|&x| i64::from(x)).collect(),
        Value::SShort(v) => v.iter().map(|&x| i64::from(x)).collect(),
        Value::SLong(v) => v.iter().map(|&x| i64::from(x)).collect(),
        _ => return None,
    };
    Some(values)
}

fn ratio_values(value: &Value) -> Option<Vec<Ratio>> {
    let values = match value {
        Value::Rational(v) => v
            .iter()
            .map(|r| Ratio::new(i64::from(r.num), i64::from(r.denom)))
            .collect(),
        Value::SRational(v) => v
            .iter()
            .map(|r| Ratio::new(i64::from(r.num), i64::from(r.denom)))
            .collect(),
        _ => return None,
    };
    Some(values)
}

fn printable(field: &Field) -> TagValue {
    TagValue::Printable(field.display_value().to_string())
}

/// Convert to the declared shape, falling back to what the value holds.
fn convert(field: &Field, kind: Option<Kind>) -> TagValue {
    let declared = kind.and_then(|kind| match kind {
        Kind::Text => text_value(&field.value).map(TagValue::Text),
        Kind::Int => int_values(&field.value).map(TagValue::IntList),
        Kind::Rational => ratio_values(&field.value).map(TagValue::Rational),
        Kind::Printable => Some(printable(field)),
    });
    declared
        .or_else(|| text_value(&field.value).map(TagValue::Text))
        .or_else(|| int_values(&field.value).map(TagValue::IntList))
        .or_else(|| ratio_values(&field.value).map(TagValue::Rational))
        .unwrap_or_else(|| printable(field))
}

fn collect_tags(exif: &Exif) -> HashMap<String, TagValue> {
    let mut tags = HashMap::new();
    for field in exif.fields() {
        let Some(group) = group_name(field) else {
            continue;
        };
        let known = KNOWN_TAGS.iter().find(|(tag, ..)| *tag == field.tag);
        let name = match known {
            Some((_, name, _)) => format!("{group} {name}"),
            None => format!("{group} {}", field.tag),
        };
        tags.entry(name)
            .or_insert_with(|| convert(field, known.map(|(_, _, kind)| *kind)));
    }
    tags
}

/// Read EXIF tags from a container stream.
pub fn read_exif<R: BufRead + Seek>(reader: &mut R) -> ExifInfo {
    match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => ExifInfo::new(collect_tags(&exif)),
        Err(err) => {
            debug!(error = %err, "no EXIF data");
            ExifInfo::default()
        }
    }
}

/// Read EXIF tags from a file; unreadable files have no tags.
pub fn read_exif_path(path: &Path) -> ExifInfo {
    match File::open(path) {
        Ok(file) => read_exif(&mut BufReader::new(file)),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "cannot open for EXIF");
            ExifInfo::default()
        }
    }
}
