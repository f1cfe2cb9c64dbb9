//! Contains stuff related to IFDs.
//!
//! For more info, see the [`IfdGroup`] enumeration and the [`IfdMap`] type.

use rustc_hash::FxHashMap;

use crate::exif::{Field, FieldData, primitives::Primitive, tags::TagId};

/// An IFD is a set of keys found within a media file's Exif metadata.
///
/// An IFD group is NOT an abstraction - they are _literally_ present in the
/// file.
///
/// IFD 0 will (optionally) contain keys indicating the locations of sub-IFDs
/// within the metadata slice. These are like pointers, not direct embeds.
///
/// That means that IFD 0 is always required if Exif metadata is present, as
/// other groups have no way to self-describe.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// Refers to "IFD 0".
    ///
    /// Holds the TIFF-level tags: camera make, model, and so on.
    #[doc(alias = "IFD0")]
    #[doc(alias = "TIFF")]
    _0,

    /// The "Exif" IFD provides camera-based metadata.
    ///
    /// For example, it's home to important values like exposure information.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// The GPS IFD contains location metadata.
    #[doc(alias = "GPSIFD")]
    Gps,
}

impl core::fmt::Display for IfdGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            IfdGroup::_0 => "IFD0",
            IfdGroup::Exif => "Exif IFD",
            IfdGroup::Gps => "GPS IFD",
        })
    }
}

/// All the decoded entries of one IFD, keyed by tag ID.
///
/// The accessors short-circuit: a missing tag, a wrong type, or an empty
/// value all come back as `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfdMap {
    fields: FxHashMap<u16, Field>,
}

impl IfdMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    ///
    /// If a field with the same tag is already present, the new one is
    /// dropped and this returns `false`.
    pub fn insert(&mut self, field: Field) -> bool {
        match self.fields.entry(field.tag) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(field);
                true
            }
        }
    }

    /// Grabs the field with the given tag.
    pub fn get(&self, tag: impl TagId) -> Option<&Field> {
        self.fields.get(&tag.tag_id())
    }

    /// How many fields are stored.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all fields, in no particular order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// The field's data, if present.
    pub fn data(&self, tag: impl TagId) -> Option<&FieldData> {
        self.get(tag).map(|f| &f.data)
    }

    /// The field's text, if present and non-empty.
    pub fn text(&self, tag: impl TagId) -> Option<&str> {
        self.data(tag)?.as_text()
    }

    /// The field's (first) value as a float.
    pub fn f64(&self, tag: impl TagId) -> Option<f64> {
        self.data(tag)?.first()?.as_f64()
    }

    /// The field's (first) value as an unsigned integer.
    pub fn u32(&self, tag: impl TagId) -> Option<u32> {
        self.data(tag)?.first()?.as_u32()
    }

    /// The field's (first) value, if it's a single byte.
    pub fn byte(&self, tag: impl TagId) -> Option<u8> {
        match *self.data(tag)?.first()? {
            Primitive::Byte(b) | Primitive::Undefined(b) => Some(b),
            _ => None,
        }
    }

    /// Every value of the field, as floats.
    pub fn f64_list(&self, tag: impl TagId) -> Option<Vec<f64>> {
        self.data(tag)?.as_f64_list()
    }
}
