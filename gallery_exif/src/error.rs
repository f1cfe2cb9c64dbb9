use crate::{exif::error::ExifFatalError, providers::jpeg::JpegScanError};

/// Why no Exif could be read from a file.
///
/// Some of these are ordinary: plenty of images just don't carry Exif. Check
/// [`ExtractionError::is_degraded`] to tell those apart from damaged files.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExtractionError {
    /// The input didn't start with a JPEG `SOI` marker.
    NotAJpeg(JpegScanError),

    /// The JPEG had no `APP1` segment holding Exif.
    NoExifSegment,

    /// An Exif segment was found, but its TIFF header was invalid.
    BadTiffHeader(ExifFatalError),

    /// The TIFF header was fine, but IFD 0 couldn't be read.
    Unreadable(ExifFatalError),
}

impl ExtractionError {
    /// Whether this is an expected outcome for an image without (usable)
    /// Exif, rather than a sign of a damaged file.
    pub fn is_degraded(&self) -> bool {
        match self {
            Self::NotAJpeg(_) | Self::NoExifSegment | Self::BadTiffHeader(_) => true,
            Self::Unreadable(_) => false,
        }
    }
}

impl From<JpegScanError> for ExtractionError {
    fn from(value: JpegScanError) -> Self {
        Self::NotAJpeg(value)
    }
}

impl From<ExifFatalError> for ExtractionError {
    fn from(value: ExifFatalError) -> Self {
        if value.is_header_error() {
            Self::BadTiffHeader(value)
        } else {
            Self::Unreadable(value)
        }
    }
}

impl core::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAJpeg(e) => write!(f, "Not a JPEG file. err: {e}"),
            Self::NoExifSegment => f.write_str("The JPEG file has no Exif segment."),
            Self::BadTiffHeader(e) => {
                write!(f, "The Exif segment's TIFF header is invalid. err: {e}")
            }
            Self::Unreadable(e) => write!(f, "Failed to read the Exif data. err: {e}"),
        }
    }
}

impl core::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::NotAJpeg(e) => Some(e),
            Self::BadTiffHeader(e) | Self::Unreadable(e) => Some(e),
            Self::NoExifSegment => None,
        }
    }
}
