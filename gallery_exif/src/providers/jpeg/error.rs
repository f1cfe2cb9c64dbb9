#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum JpegScanError {
    /// The first marker in a JPEG file should be a `SOI`.
    ///
    /// However, this file started with other bytes.
    NotAJpeg {
        /// The file's first two bytes.
        first_bytes: [u8; 2],
    },

    /// The input doesn't even have room for the `SOI` marker.
    TooShortForSoi {
        /// How long the input was.
        len: usize,
    },
}

impl core::fmt::Display for JpegScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAJpeg { first_bytes } => write!(
                f,
                "A JPEG file's first marker should be SOI (`FF D8`), \
                but the file started with: `{first_bytes:x?}`"
            ),

            Self::TooShortForSoi { len } => write!(
                f,
                "The input is too short to be a JPEG file. len: `{len}`"
            ),
        }
    }
}

impl core::error::Error for JpegScanError {}
