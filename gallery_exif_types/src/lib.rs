//! # `gallery_exif_types`
//!
//! Plain data types shared by the `gallery_exif` parser.
//!
//! Nothing in here touches raw bytes. You'll find the primitive types Exif
//! stores, the decoded shape of each IFD entry, and the tag tables used to
//! give numeric tag IDs a name.

#![forbid(unsafe_code)]

pub mod exif;
