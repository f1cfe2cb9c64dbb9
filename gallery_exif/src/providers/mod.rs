//! # Providers
//!
//! Providers represent a source of metadata, such as a media file format.
//!
//! Only JPEG is supported: its provider finds the Exif payload inside the
//! file, which [`crate::exif::Exif`] then decodes.

pub mod jpeg;
