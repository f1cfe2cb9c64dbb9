//! JPEG is an older image format designed with old-school compression in mind.
//!
//! It uses an unfortunate internal structure that's difficult to parse and
//! edit, so this module treads lightly: it only walks the marker segments to
//! find where the Exif payload lives.

mod error;
mod parse;

pub use error::JpegScanError;
pub use parse::scan;

/// One marker segment found in a JPEG file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawSegment {
    /// An identifier for the marker, like `0xE1` for `APP1`.
    pub marker_code: u8,

    /// Where the segment's `0xFF` byte sits in the file.
    pub offset: usize,

    /// The segment's declared length, including its two length bytes.
    ///
    /// Standalone markers have no length, so this is zero for them.
    pub size: u16,
}

/// What we learned from walking a JPEG's segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct JpegScan {
    /// Every segment we walked past, in file order.
    pub segments: Vec<RawSegment>,

    /// Where the Exif payload (the TIFF header) starts within the file.
    pub exif_payload: Option<usize>,
}

impl JpegScan {
    /// Grabs the Exif payload's bytes, from the TIFF header to the end of its
    /// segment.
    pub fn exif_block<'input>(&self, input: &'input [u8]) -> Option<&'input [u8]> {
        let start = self.exif_payload?;

        let segment = self.segments.iter().find(|s| {
            s.marker_code == parse::APP1_MARKER_CODE && s.offset + parse::EXIF_HEADER_LEN == start
        })?;

        // marker (2 bytes) + the length bytes and payload
        input.get(start..segment.offset + 2 + usize::from(segment.size))
    }
}
