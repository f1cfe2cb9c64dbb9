//! # `gallery_exif`
//!
//! A library to pull camera metadata (Exif) out of JPEG files for a media
//! gallery: when a photo was taken, what took it, its exposure settings, and
//! where it was.
//!
//! ## Usage
//!
//! Hand [`extract_exif`] the file's bytes and a fallback timestamp (usually
//! the upload or modification time). It always gives back an
//! [`ExtractedMetadata`] record - files without Exif just have fewer fields.
//!
//! ```
//! use chrono::Utc;
//!
//! let not_a_photo = b"hello world";
//! let meta = gallery_exif::extract_exif(not_a_photo, Utc::now());
//!
//! assert!(!meta.has_exif);
//! assert!(meta.extraction_error.is_none());
//! ```
//!
//! For lower-level access, [`parse_exif`] yields every decoded IFD entry, and
//! [`providers::jpeg::scan`] lists a JPEG's segments.
//!
//! ## Layout
//!
//! Parsing happens in stages:
//!
//! 1. [`providers::jpeg`] walks the JPEG segments to find the Exif payload.
//! 2. [`exif::Exif::new`] reads the TIFF header, then walks IFD 0 and the
//!    sub-IFDs it points to, decoding each entry's value.
//! 3. [`metadata::ExtractedMetadata::from_exif`] names the fields a gallery
//!    cares about.
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};

use crate::exif::Exif;

pub mod error;
pub mod exif;
pub mod metadata;
pub mod providers;

mod file;

pub use error::ExtractionError;
pub use file::extract_exif_from_path;
pub use metadata::ExtractedMetadata;

/// Finds and decodes the Exif block of a JPEG file.
///
/// # Errors
///
/// Fails when the input isn't a JPEG, has no Exif segment, or its Exif can't
/// be read. A damaged sub-IFD isn't an error here; it's listed in
/// [`Exif::sub_ifd_errors`].
pub fn parse_exif(input: &impl AsRef<[u8]>) -> Result<Exif, ExtractionError> {
    let input: &[u8] = input.as_ref();

    let scan = providers::jpeg::scan(input)?;
    let Some(block) = scan.exif_block(input) else {
        log::trace!("No Exif segment in this JPEG.");
        return Err(ExtractionError::NoExifSegment);
    };
    log::trace!("Found `{}` bytes of Exif.", block.len());

    Ok(Exif::new(block)?)
}

/// Extracts gallery metadata from a JPEG file's bytes.
///
/// This never fails. Files without usable Exif give a record holding just the
/// fallback timestamp; damaged files also get an `extraction_error`.
pub fn extract_exif(input: &impl AsRef<[u8]>, fallback: DateTime<Utc>) -> ExtractedMetadata {
    match parse_exif(input) {
        Ok(exif) => ExtractedMetadata::from_exif(&exif, fallback),

        Err(e) if e.is_degraded() => {
            log::trace!("No usable Exif. reason: {e}");
            ExtractedMetadata::without_exif(fallback, &e)
        }

        Err(e) => {
            log::error!("Failed to extract Exif! err: {e}");
            ExtractedMetadata::without_exif(fallback, &e)
        }
    }
}

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
