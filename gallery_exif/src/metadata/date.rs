use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How Exif writes its timestamps, like `2024:06:01 12:30:45`.
pub const EXIF_DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// How valid timestamps are written out, like `2024-06-01T12:30:45`.
const ISO_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A timestamp from an Exif date field.
///
/// Exif timestamps carry no time zone. Cameras also write placeholders like
/// `0000:00:00 00:00:00` when their clock isn't set, so anything that doesn't
/// parse is kept as written.
///
/// Both variants serialize as a plain string. Reading one back gives `Parsed`
/// only when the string is exactly what a `Parsed` value writes, so an
/// `Unparsed` value survives the trip unless it already held that form.
/// [`ExifDateTime::parse`] never builds such an `Unparsed` value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifDateTime {
    /// A valid timestamp. Serializes as `YYYY-MM-DDTHH:MM:SS`.
    Parsed(NaiveDateTime),

    /// The original text, for values that aren't valid timestamps.
    Unparsed(String),
}

impl ExifDateTime {
    /// Reads an Exif date string.
    ///
    /// Empty strings give `None`. Timestamps already written out as
    /// `YYYY-MM-DDTHH:MM:SS` are accepted too.
    ///
    /// ```
    /// use gallery_exif::metadata::ExifDateTime;
    ///
    /// let parsed = ExifDateTime::parse("2024:06:01 12:30:45").unwrap();
    /// assert_eq!(parsed.to_string(), "2024-06-01T12:30:45");
    ///
    /// let unparsed = ExifDateTime::parse("sometime in June").unwrap();
    /// assert_eq!(unparsed, ExifDateTime::Unparsed("sometime in June".into()));
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(dt) = from_iso(raw) {
            return Some(Self::Parsed(dt));
        }

        if !has_exif_shape(raw) {
            log::trace!("Date `{raw}` isn't shaped like an Exif date. Keeping it as-is.");
            return Some(Self::Unparsed(raw.to_owned()));
        }

        match NaiveDateTime::parse_from_str(raw, EXIF_DATE_TIME_FORMAT) {
            Ok(dt) => Some(Self::Parsed(dt)),
            Err(e) => {
                log::warn!("Date `{raw}` is shaped like an Exif date, but isn't valid. err: {e}");
                Some(Self::Unparsed(raw.to_owned()))
            }
        }
    }

    /// The timestamp, if it was valid.
    pub fn as_naive(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Parsed(dt) => Some(*dt),
            Self::Unparsed(_) => None,
        }
    }

    /// The timestamp read as UTC, if it was valid.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.as_naive().map(|dt| dt.and_utc())
    }
}

impl core::fmt::Display for ExifDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parsed(dt) => write!(f, "{}", dt.format(ISO_DATE_TIME_FORMAT)),
            Self::Unparsed(s) => f.write_str(s),
        }
    }
}

impl Serialize for ExifDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExifDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match from_iso(&s) {
            Some(dt) => Self::Parsed(dt),
            None => Self::Unparsed(s),
        })
    }
}

/// Reads a timestamp in the exact form `Parsed` values are written in.
fn from_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_DATE_TIME_FORMAT)
        .ok()
        .filter(|dt| dt.format(ISO_DATE_TIME_FORMAT).to_string() == s)
}

/// Checks for `YYYY:MM:DD HH:MM:SS`: digits, with separators in fixed spots.
fn has_exif_shape(s: &str) -> bool {
    s.len() == 19
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 | 13 | 16 => b == b':',
            10 => b == b' ',
            _ => b.is_ascii_digit(),
        })
}
