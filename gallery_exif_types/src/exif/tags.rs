//! Definitions for tags in an IFD group.
//!
//! # `tags`
//!
//! Contains the tags we give names to, per [`IfdGroup`].
//!
//! Only a practical subset of the Exif tag set is listed: what a gallery shows
//! about a photo, plus the pointer tags needed to reach the sub-IFDs. Entries
//! with other tag IDs are still decoded and kept by their numeric ID.
//!
//! ## For contributors
//!
//! To add a tag, add a listing to the matching `make_key_list_for_group!`
//! call. Let's say `YourNewKey` has a tag ID of `1000`, uses ASCII text, and
//! can be any length:
//!
//! ```no_compile
//! make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
//!     // ...snip!
//!
//!     YourNewKey = 1000 => {
//!         name: "Your New Key",
//!         types: &[Pt::Ascii],
//!         count: Pc::Any,
//!     },
//! );
//! ```

use crate::exif::{
    ifd::IfdGroup,
    primitives::{PrimitiveCount, PrimitiveTy},
};

/// Anything that names a tag ID.
///
/// Lets [`crate::exif::ifd::IfdMap`] accept both the tag enums below and raw
/// `u16` IDs.
pub trait TagId {
    /// The numeric tag ID, as written in the file.
    fn tag_id(&self) -> u16;
}

impl TagId for u16 {
    fn tag_id(&self) -> u16 {
        *self
    }
}

/// Creates a "key list" for an IFD group.
///
/// These may include duplicate tag IDs from other groups.
macro_rules! make_key_list_for_group {
    (enum $enum_name:ident => $ifd_group:expr,
        $( $key_ident:ident = $key_tag:expr => {
            name: $tag_name:expr,
            types: $types:expr,
            count: $count:expr,
        },
    )+) => {
        #[doc = "A list of all keys present in the matching `IfdGroup` variant."]
        #[repr(u16)]
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Returns the number of primitives this key's value may store.
            pub const fn count(&self) -> PrimitiveCount {
                match self {
                    $( Self::$key_ident => $count, )+
                }
            }

            /// Returns the `IfdGroup` that this enum represents.
            pub const fn ifd_group() -> IfdGroup {
                $ifd_group
            }

            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs a key's tag name as defined in the standard.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => $tag_name, )+
                }
            }

            /// Returns the type(s) this key's value may have.
            pub const fn types(&self) -> &'static [PrimitiveTy] {
                match self {
                    $( Self::$key_ident => $types, )+
                }
            }
        }

        impl TagId for $enum_name {
            fn tag_id(&self) -> u16 {
                *self as u16
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok($enum_name::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

use {PrimitiveCount as Pc, PrimitiveTy as Pt};

/// A set of all known tags and their IFD groups.
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum KnownTag {
    Ifd0Tag(Ifd0Tag),
    ExifIfdTag(ExifIfdTag),
    GpsIfdTag(GpsIfdTag),
}

impl KnownTag {
    /// Returns the number of primitives this tag's value may store.
    ///
    /// ```
    /// use gallery_exif_types::exif::{
    ///     tags::{KnownTag, GpsIfdTag},
    ///     primitives::PrimitiveCount
    /// };
    ///
    /// let lat: KnownTag = KnownTag::GpsIfdTag(GpsIfdTag::GPSLatitude);
    /// assert_eq!(lat.count(), PrimitiveCount::Known(3));
    /// ```
    pub const fn count(&self) -> PrimitiveCount {
        match self {
            KnownTag::Ifd0Tag(k) => k.count(),
            KnownTag::ExifIfdTag(k) => k.count(),
            KnownTag::GpsIfdTag(k) => k.count(),
        }
    }

    /// Returns the `IfdGroup` that this tag lives in.
    ///
    /// ```
    /// use gallery_exif_types::exif::{tags::{KnownTag, Ifd0Tag}, ifd::IfdGroup};
    ///
    /// let make: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::Make);
    /// assert_eq!(make.ifd_group(), IfdGroup::_0);
    /// ```
    pub const fn ifd_group(self) -> IfdGroup {
        match self {
            KnownTag::Ifd0Tag(_) => Ifd0Tag::ifd_group(),
            KnownTag::ExifIfdTag(_) => ExifIfdTag::ifd_group(),
            KnownTag::GpsIfdTag(_) => GpsIfdTag::ifd_group(),
        }
    }

    /// Returns this tag's tag ID.
    ///
    /// ```
    /// use gallery_exif_types::exif::tags::{KnownTag, Ifd0Tag};
    ///
    /// let make: KnownTag = KnownTag::Ifd0Tag(Ifd0Tag::Make);
    /// assert_eq!(make.tag_id(), 0x010F_u16);
    /// ```
    pub const fn tag_id(&self) -> u16 {
        match self {
            KnownTag::Ifd0Tag(k) => *k as u16,
            KnownTag::ExifIfdTag(k) => *k as u16,
            KnownTag::GpsIfdTag(k) => *k as u16,
        }
    }

    /// Grabs a tag's name as defined in the standard.
    pub const fn tag_name(&self) -> &'static str {
        match self {
            KnownTag::Ifd0Tag(k) => k.tag_name(),
            KnownTag::ExifIfdTag(k) => k.tag_name(),
            KnownTag::GpsIfdTag(k) => k.tag_name(),
        }
    }

    /// Returns the type(s) this tag's value may have.
    ///
    /// ```
    /// use gallery_exif_types::exif::{
    ///     tags::{KnownTag, ExifIfdTag},
    ///     primitives::PrimitiveTy
    /// };
    ///
    /// let bias: KnownTag = KnownTag::ExifIfdTag(ExifIfdTag::ExposureBiasValue);
    /// assert_eq!(bias.types(), &[PrimitiveTy::SRational]);
    /// ```
    pub const fn types(&self) -> &'static [PrimitiveTy] {
        match self {
            KnownTag::Ifd0Tag(k) => k.types(),
            KnownTag::ExifIfdTag(k) => k.types(),
            KnownTag::GpsIfdTag(k) => k.types(),
        }
    }
}

impl TryFrom<(IfdGroup, u16)> for KnownTag {
    type Error = ();

    fn try_from(value: (IfdGroup, u16)) -> Result<Self, Self::Error> {
        let (ifd_group, tag_id): (IfdGroup, u16) = value;

        match ifd_group {
            IfdGroup::_0 => Ifd0Tag::try_from(tag_id).map(KnownTag::Ifd0Tag),
            IfdGroup::Exif => ExifIfdTag::try_from(tag_id).map(KnownTag::ExifIfdTag),
            IfdGroup::Gps => GpsIfdTag::try_from(tag_id).map(KnownTag::GpsIfdTag),
        }
    }
}

impl core::fmt::Display for KnownTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "`{}` (tag ID: `{}`)", self.tag_name(), self.tag_id())
    }
}

/// The "pointer tags" in IFD 0, and the group each one points to.
pub const SUB_IFD_POINTER_TAGS: &[(Ifd0Tag, IfdGroup)] = &[
    (Ifd0Tag::ExifIfdPointer, IfdGroup::Exif),
    (Ifd0Tag::GpsInfoIfdPointer, IfdGroup::Gps),
];

/*
 *
 *
 *  TIFF Rev. 6.0 Attribute List (subset)
 *
 *
 */
make_key_list_for_group!(enum Ifd0Tag => IfdGroup::_0,
    //
    // image data structure
    ImageWidth = 256 => {
        name: "Image width",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    ImageLength = 257 => {
        name: "Image height",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    Orientation = 274 => {
        name: "Orientation of image",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    XResolution = 282 => {
        name: "Image resolution in width direction",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    YResolution = 283 => {
        name: "Image resolution in height direction",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ResolutionUnit = 296 => {
        name: "Unit of X and Y resolution",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },

    //
    // other tags
    ImageDescription = 270 => {
        name: "Description of Image",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Make = 271 => {
        name: "Image input equipment manufacturer",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Model = 272 => {
        name: "Image input equipment model",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Software = 305 => {
        name: "Software used",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    DateTime = 306 => {
        name: "File change date and time",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    Artist = 315 => {
        name: "Person who created the image",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    Copyright = 33432 => {
        name: "Copyright holder",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },

    // IFD pointers.
    //
    // WARNING: if you add any additional pointer tags here, add them to the
    // `SUB_IFD_POINTER_TAGS` const above as well.
    ExifIfdPointer = 34665 => {
        name: "Exif IFD Pointer",
        types: &[Pt::Long, Pt::Ifd],
        count: Pc::Known(1),
    },
    GpsInfoIfdPointer = 34853 => {
        name: "GPS Info IFD Pointer",
        types: &[Pt::Long, Pt::Ifd],
        count: Pc::Known(1),
    },
);

/*
 *
 *
 *  Exif IFD Attribute List (subset)
 *
 *
 */
make_key_list_for_group!(enum ExifIfdTag => IfdGroup::Exif,
    //
    // picture-taking conditions
    ExposureTime = 33434 => {
        name: "Exposure time",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    FNumber = 33437 => {
        name: "F number",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureProgram = 34850 => {
        name: "Exposure program",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    PhotographicSensitivity = 34855 => {
        name: "ISO speed ratings",
        types: &[Pt::Short],
        count: Pc::Any,
    },
    ShutterSpeedValue = 37377 => {
        name: "Shutter speed",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    ApertureValue = 37378 => {
        name: "Aperture",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    ExposureBiasValue = 37380 => {
        name: "Exposure bias",
        types: &[Pt::SRational],
        count: Pc::Known(1),
    },
    MaxApertureValue = 37381 => {
        name: "Maximum lens aperture",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    MeteringMode = 37383 => {
        name: "Metering mode",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    Flash = 37385 => {
        name: "Flash",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FocalLength = 37386 => {
        name: "Lens focal length",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    WhiteBalance = 41987 => {
        name: "White balance",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },
    FocalLengthIn35mmFilm = 41989 => {
        name: "Focal length in 35 mm film",
        types: &[Pt::Short],
        count: Pc::Known(1),
    },

    //
    // date and time
    DateTimeOriginal = 36867 => {
        name: "Date and time of original data generation",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },
    DateTimeDigitized = 36868 => {
        name: "Date and time of digital data generation",
        types: &[Pt::Ascii],
        count: Pc::Known(20),
    },

    //
    // version and image configuration
    ExifVersion = 36864 => {
        name: "Exif version",
        types: &[Pt::Undefined],
        count: Pc::Known(4),
    },
    PixelXDimension = 40962 => {
        name: "Valid image width",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },
    PixelYDimension = 40963 => {
        name: "Valid image height",
        types: &[Pt::Short, Pt::Long],
        count: Pc::Known(1),
    },

    //
    // lens
    LensMake = 42035 => {
        name: "Lens Make",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
    LensModel = 42036 => {
        name: "Lens Model",
        types: &[Pt::Ascii, Pt::Utf8],
        count: Pc::Any,
    },
);

/*
 *
 *
 *  GPS Attribute List (subset)
 *
 *
 */
make_key_list_for_group!(enum GpsIfdTag => IfdGroup::Gps,
    GPSVersionID = 0 => {
        name: "GPS tag version",
        types: &[Pt::Byte],
        count: Pc::Known(4),
    },
    GPSLatitudeRef = 1 => {
        name: "North or South Latitude",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLatitude = 2 => {
        name: "Latitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSLongitudeRef = 3 => {
        name: "East or West Longitude",
        types: &[Pt::Ascii],
        count: Pc::Known(2),
    },
    GPSLongitude = 4 => {
        name: "Longitude",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSAltitudeRef = 5 => {
        name: "Altitude reference",
        types: &[Pt::Byte],
        count: Pc::Known(1),
    },
    GPSAltitude = 6 => {
        name: "Altitude",
        types: &[Pt::Rational],
        count: Pc::Known(1),
    },
    GPSTimeStamp = 7 => {
        name: "GPS time (atomic clock)",
        types: &[Pt::Rational],
        count: Pc::Known(3),
    },
    GPSMapDatum = 18 => {
        name: "Geodetic survey data used",
        types: &[Pt::Ascii],
        count: Pc::Any,
    },
    GPSDateStamp = 29 => {
        name: "GPS date",
        types: &[Pt::Ascii],
        count: Pc::Known(11),
    },
);

#[cfg(test)]
mod tests {
    use super::{ExifIfdTag, GpsIfdTag, Ifd0Tag, KnownTag, SUB_IFD_POINTER_TAGS, TagId};
    use crate::exif::ifd::IfdGroup;

    #[test]
    fn lookups_depend_on_group() {
        // tag `2` only means something in the GPS IFD
        assert_eq!(
            KnownTag::try_from((IfdGroup::Gps, 2_u16)),
            Ok(KnownTag::GpsIfdTag(GpsIfdTag::GPSLatitude))
        );
        assert_eq!(KnownTag::try_from((IfdGroup::_0, 2_u16)), Err(()));

        assert_eq!(
            KnownTag::try_from((IfdGroup::Exif, 0x9003_u16)),
            Ok(KnownTag::ExifIfdTag(ExifIfdTag::DateTimeOriginal))
        );
    }

    #[test]
    fn pointer_tags_live_in_ifd0() {
        for (tag, group) in SUB_IFD_POINTER_TAGS {
            assert_eq!(Ifd0Tag::ifd_group(), IfdGroup::_0);
            assert_ne!(*group, IfdGroup::_0);
            assert_eq!(Ifd0Tag::try_from(TagId::tag_id(tag)), Ok(*tag));
        }

        assert_eq!(Ifd0Tag::ExifIfdPointer.tag_id(), 0x8769);
        assert_eq!(Ifd0Tag::GpsInfoIfdPointer.tag_id(), 0x8825);
    }
}
