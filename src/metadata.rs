//! Typed, null-safe access to EXIF metadata.
//!
//! An [`ExifInfo`] wraps the raw tag table produced by the tag source
//! ([`imaging::exif_reader`](crate::imaging::exif_reader)). Tags are keyed
//! `"<group> <TagName>"`, e.g. `Image Make`, `EXIF FNumber`, `GPS GPSLatitude`.
//! Every derived field is computed on demand and is optional: a missing tag or
//! a value that does not convert yields `None`, never an error. Templates can
//! therefore ask for `lens` or `location` on any image, EXIF or not.
//!
//! ## Derived fields
//!
//! | field | source |
//! |---|---|
//! | `artist`, `copyright`, `camera_make`, `camera_model` | `Image Artist`, `Image Copyright`, `Image Make`, `Image Model` |
//! | `lens_make`, `lens_model` | `EXIF LensMake`, `EXIF LensModel` |
//! | `documentname`, `description` | `Image DocumentName`, `Image ImageDescription` |
//! | `camera`, `lens` | make and model combined without repeating the brand |
//! | `aperture`, `f_num`, `focal_length`, `focal_length_35mm` | numeric tags, rationals rounded to 4 places |
//! | `f` | `ƒ/` followed by `f_num` |
//! | `exposure_time`, `shutter_speed` | `EXIF ExposureTime` as `num/den`; APEX `EXIF ShutterSpeedValue` as `1/N` |
//! | `iso`, `flash_info` | `EXIF ISOSpeedRatings`, `EXIF Flash` |
//! | `created_at` | first parseable date of GPS date, original, digitized, modified |
//! | `latitude`, `longitude`, `altitude`, `location` | GPS IFD, signed by hemisphere/reference |
//! | `is_rotated` | `Image Orientation` in 5..=8 |
//!
//! ## Snapshot
//!
//! [`ExifInfo::to_dict`] walks a static `(name, accessor)` table, so the
//! snapshot and the accessors can never disagree.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// EXIF date layout: `2015:12:06 11:37:38`.
const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Date tags in priority order for [`ExifInfo::created_at`].
const DATE_TAGS: &[&str] = &[
    "GPS GPSDate",
    "Image DateTimeOriginal",
    "EXIF DateTimeOriginal",
    "EXIF DateTimeDigitized",
    "Image DateTime",
];

/// One rational component; signed so APEX values can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub num: i64,
    pub den: i64,
}

impl Ratio {
    pub fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// `num / den`, or `None` for a zero denominator.
    pub fn to_f64(self) -> Option<f64> {
        (self.den != 0).then(|| self.num as f64 / self.den as f64)
    }
}

/// A raw tag value as decoded from the EXIF container.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Rational(Vec<Ratio>),
    IntList(Vec<i64>),
    /// Human-readable rendering of an enumerated tag, e.g. `Flash`.
    Printable(String),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) | TagValue::Printable(s) => Some(s),
            _ => None,
        }
    }

    pub fn first_int(&self) -> Option<i64> {
        match self {
            TagValue::IntList(values) => values.first().copied(),
            _ => None,
        }
    }

    pub fn rationals(&self) -> Option<&[Ratio]> {
        match self {
            TagValue::Rational(values) => Some(values),
            _ => None,
        }
    }

    pub fn first_ratio(&self) -> Option<Ratio> {
        self.rationals()?.first().copied()
    }

    /// Integers pass through; rationals are divided and rounded to 4 places.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TagValue::IntList(values) => values.first().map(|&v| v as f64),
            TagValue::Rational(values) => values.first()?.to_f64().map(|v| round_to(v, 4)),
            _ => None,
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Float text the way templates expect it: whole numbers keep one decimal.
pub(crate) fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Join a make and a model without repeating the brand.
///
/// `("Apple", "iPhone 6")` gives `Apple iPhone 6`, while
/// `("Canon", "Canon EOS 5D")` gives just `Canon`. The model alone names
/// the device when the make is missing.
fn combine_make(make: Option<String>, model: Option<String>) -> Option<String> {
    if make.is_none() && model.is_none() {
        return None;
    }
    let make = make.unwrap_or_default();
    let model = model.unwrap_or_default();
    if !make.is_empty() && model.starts_with(&make) {
        return Some(make);
    }
    Some(format!("{make} {model}").trim().to_string())
}

/// A derived field value, as it appears in [`ExifInfo::to_dict`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Flag(bool),
    DateTime(NaiveDateTime),
    /// `(latitude, longitude)`.
    Location(f64, f64),
}

type Accessor = fn(&ExifInfo) -> Option<FieldValue>;

fn entry(name: &'static str, accessor: Accessor) -> (&'static str, Accessor) {
    (name, accessor)
}

static FIELDS: LazyLock<Vec<(&'static str, Accessor)>> = LazyLock::new(|| {
    vec![
        entry("artist", |e| e.artist().map(FieldValue::Text)),
        entry("copyright", |e| e.copyright().map(FieldValue::Text)),
        entry("camera_make", |e| e.camera_make().map(FieldValue::Text)),
        entry("camera_model", |e| e.camera_model().map(FieldValue::Text)),
        entry("camera", |e| e.camera().map(FieldValue::Text)),
        entry("lens_make", |e| e.lens_make().map(FieldValue::Text)),
        entry("lens_model", |e| e.lens_model().map(FieldValue::Text)),
        entry("lens", |e| e.lens().map(FieldValue::Text)),
        entry("aperture", |e| e.aperture().map(FieldValue::Number)),
        entry("f_num", |e| e.f_num().map(FieldValue::Number)),
        entry("f", |e| e.f_stop().map(FieldValue::Text)),
        entry("exposure_time", |e| e.exposure_time().map(FieldValue::Text)),
        entry("shutter_speed", |e| e.shutter_speed().map(FieldValue::Text)),
        entry("focal_length", |e| e.focal_length().map(FieldValue::Number)),
        entry("focal_length_35mm", |e| {
            e.focal_length_35mm().map(FieldValue::Number)
        }),
        entry("flash_info", |e| e.flash_info().map(FieldValue::Text)),
        entry("iso", |e| e.iso().map(FieldValue::Integer)),
        entry("created_at", |e| e.created_at().map(FieldValue::DateTime)),
        entry("longitude", |e| e.longitude().map(FieldValue::Number)),
        entry("latitude", |e| e.latitude().map(FieldValue::Number)),
        entry("altitude", |e| e.altitude().map(FieldValue::Number)),
        entry("location", |e| {
            e.location().map(|(lat, long)| FieldValue::Location(lat, long))
        }),
        entry("documentname", |e| e.document_name().map(FieldValue::Text)),
        entry("description", |e| e.description().map(FieldValue::Text)),
        entry("is_rotated", |e| Some(FieldValue::Flag(e.is_rotated()))),
    ]
});

/// EXIF metadata of one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifInfo {
    tags: HashMap<String, TagValue>,
}

impl ExifInfo {
    pub fn new(tags: HashMap<String, TagValue>) -> Self {
        Self { tags }
    }

    /// True when the image carried no EXIF tags at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Raw tag lookup by `"<group> <TagName>"`.
    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.tag(name)?.as_text().map(str::to_owned)
    }

    fn float(&self, name: &str) -> Option<f64> {
        self.tag(name)?.as_float()
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.tag(name)?.first_int()
    }

    pub fn artist(&self) -> Option<String> {
        self.text("Image Artist")
    }

    pub fn copyright(&self) -> Option<String> {
        self.text("Image Copyright")
    }

    pub fn camera_make(&self) -> Option<String> {
        self.text("Image Make")
    }

    pub fn camera_model(&self) -> Option<String> {
        self.text("Image Model")
    }

    pub fn camera(&self) -> Option<String> {
        combine_make(self.camera_make(), self.camera_model())
    }

    pub fn lens_make(&self) -> Option<String> {
        self.text("EXIF LensMake")
    }

    pub fn lens_model(&self) -> Option<String> {
        self.text("EXIF LensModel")
    }

    pub fn lens(&self) -> Option<String> {
        combine_make(self.lens_make(), self.lens_model())
    }

    pub fn document_name(&self) -> Option<String> {
        self.text("Image DocumentName")
    }

    pub fn description(&self) -> Option<String> {
        self.text("Image ImageDescription")
    }

    pub fn aperture(&self) -> Option<f64> {
        self.float("EXIF ApertureValue")
    }

    pub fn f_num(&self) -> Option<f64> {
        self.float("EXIF FNumber")
    }

    /// The f-number as photographers write it: `ƒ/2.2`.
    pub fn f_stop(&self) -> Option<String> {
        self.f_num().map(|n| format!("ƒ/{}", format_float(n)))
    }

    pub fn focal_length(&self) -> Option<f64> {
        self.float("EXIF FocalLength")
    }

    pub fn focal_length_35mm(&self) -> Option<f64> {
        self.float("EXIF FocalLengthIn35mmFilm")
    }

    /// Exposure as the stored fraction, e.g. `1/33`.
    pub fn exposure_time(&self) -> Option<String> {
        let ratio = self.tag("EXIF ExposureTime")?.first_ratio()?;
        Some(format!("{}/{}", ratio.num, ratio.den))
    }

    /// APEX shutter speed `v` as `1/N`, where `N = round(2^v)`.
    pub fn shutter_speed(&self) -> Option<String> {
        let apex = self.float("EXIF ShutterSpeedValue")?;
        let denominator = (1.0 / 2f64.powf(-apex)).round();
        denominator
            .is_finite()
            .then(|| format!("1/{}", denominator as i64))
    }

    pub fn iso(&self) -> Option<i64> {
        self.int("EXIF ISOSpeedRatings")
    }

    pub fn flash_info(&self) -> Option<String> {
        self.text("EXIF Flash")
    }

    /// Capture time from the first date tag that is present and parses.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        DATE_TAGS.iter().find_map(|name| {
            let text = self.tag(name)?.as_text()?;
            NaiveDateTime::parse_from_str(text.trim(), DATE_FORMAT).ok()
        })
    }

    /// Degrees/minutes/seconds triplet to signed decimal degrees.
    fn gps_coordinate(&self, value_tag: &str, ref_tag: &str) -> Option<f64> {
        let [deg, min, sec] = self.tag(value_tag)?.rationals()? else {
            return None;
        };
        let hemisphere = self.tag(ref_tag)?.as_text()?;
        let value = deg.to_f64()? + min.to_f64()? / 60.0 + sec.to_f64()? / 3600.0;
        Some(if matches!(hemisphere.trim(), "S" | "W") {
            -value
        } else {
            value
        })
    }

    pub fn latitude(&self) -> Option<f64> {
        self.gps_coordinate("GPS GPSLatitude", "GPS GPSLatitudeRef")
    }

    pub fn longitude(&self) -> Option<f64> {
        self.gps_coordinate("GPS GPSLongitude", "GPS GPSLongitudeRef")
    }

    /// Metres above sea level; reference `1` means below.
    pub fn altitude(&self) -> Option<f64> {
        let altitude = self.float("GPS GPSAltitude")?;
        let below_sea_level = self.int("GPS GPSAltitudeRef").unwrap_or(0) == 1;
        Some(if below_sea_level { -altitude } else { altitude })
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        Some((self.latitude()?, self.longitude()?))
    }

    /// Orientations 5 to 8 turn the image by 90°; auto-orienting resizers
    /// swap its width and height.
    pub fn is_rotated(&self) -> bool {
        matches!(self.int("Image Orientation"), Some(5..=8))
    }

    /// Names of all derived fields, in table order.
    pub fn field_names() -> impl Iterator<Item = &'static str> {
        FIELDS.iter().map(|(name, _)| *name)
    }

    /// One derived field by name; unknown names are `None` as well.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .and_then(|(_, accessor)| accessor(self))
    }

    /// Snapshot of every derived field.
    pub fn to_dict(&self) -> BTreeMap<&'static str, Option<FieldValue>> {
        FIELDS
            .iter()
            .map(|(name, accessor)| (*name, accessor(self)))
            .collect()
    }
}
