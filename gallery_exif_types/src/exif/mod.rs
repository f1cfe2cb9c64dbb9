use crate::exif::primitives::{Primitive, PrimitiveTy};

pub mod ifd;
pub mod primitives;
pub mod tags;

/// One entry of an image file directory, with its value decoded.
#[repr(C)]
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Field {
    /// A number to identify the field we're talking about.
    pub tag: u16,

    /// The raw type code, as written in the file.
    ///
    /// This is kept even when we can't decode the type.
    pub ty: u16,

    /// How many primitives the entry said it stores.
    pub count: u32,

    /// Data stored with this tag.
    pub data: FieldData,
}

impl Field {
    /// Describes which primitive is stored inside, if it's one we know.
    pub fn primitive_ty(&self) -> Option<PrimitiveTy> {
        PrimitiveTy::try_from(self.ty).ok()
    }
}

/// Data associated with a field.
#[repr(C)]
#[derive(Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FieldData {
    /// There's no primitive stored here (the count was zero).
    None(PrimitiveTy),

    /// ASCII or UTF-8 text, cut at its terminator and trimmed.
    Text(String),

    /// Stores one primitive.
    Primitive(Primitive),

    /// Stores a number of primitives, in file order.
    List {
        /// The actual list of primitives.
        list: Vec<Primitive>,

        /// The type of primitive we're storing.
        ty: PrimitiveTy,
    },

    /// The entry used a type code we don't decode.
    ///
    /// Holds that raw code.
    Unsupported(u16),
}

impl FieldData {
    /// Returns the text, if this is non-empty text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldData::Text(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the lone primitive, or the first one in a list.
    pub fn first(&self) -> Option<&Primitive> {
        match self {
            FieldData::Primitive(p) => Some(p),
            FieldData::List { list, .. } => list.first(),
            FieldData::None(_) | FieldData::Text(_) | FieldData::Unsupported(_) => None,
        }
    }

    /// Reads every primitive as a float.
    ///
    /// Gives `None` if any of them isn't a number.
    pub fn as_f64_list(&self) -> Option<Vec<f64>> {
        match self {
            FieldData::Primitive(p) => p.as_f64().map(|v| vec![v]),
            FieldData::List { list, .. } => list.iter().map(Primitive::as_f64).collect(),
            FieldData::None(_) | FieldData::Text(_) | FieldData::Unsupported(_) => None,
        }
    }
}

/// Each blob of Exif will start with a byte order marker - its endianness.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

#[cfg(test)]
mod tests {
    use super::{
        FieldData,
        primitives::{Primitive, PrimitiveTy, Rational},
    };

    #[test]
    fn empty_text_is_absent() {
        assert_eq!(FieldData::Text(String::new()).as_text(), None);
        assert_eq!(FieldData::Text("Acme".into()).as_text(), Some("Acme"));
        assert_eq!(FieldData::Primitive(Primitive::Short(1)).as_text(), None);
    }

    #[test]
    fn float_lists() {
        let dms = FieldData::List {
            list: vec![
                Primitive::Rational(Rational {
                    numerator: 40,
                    denominator: 1,
                }),
                Primitive::Rational(Rational {
                    numerator: 26,
                    denominator: 1,
                }),
                Primitive::Rational(Rational {
                    numerator: 4600,
                    denominator: 100,
                }),
            ],
            ty: PrimitiveTy::Rational,
        };
        assert_eq!(dms.as_f64_list(), Some(vec![40.0, 26.0, 46.0]));

        let bytes = FieldData::List {
            list: vec![Primitive::Undefined(0), Primitive::Undefined(1)],
            ty: PrimitiveTy::Undefined,
        };
        assert_eq!(bytes.as_f64_list(), None);
        assert_eq!(FieldData::Unsupported(11).as_f64_list(), None);
    }
}
