/// An enumeration of the primitive types a field may store.
///
/// Used in each IFD entry. Type codes not listed here are still legal in a
/// file, but we don't decode them - see [`crate::exif::FieldData::Unsupported`].
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    Undefined = 7,
    SLong = 9,
    SRational = 10,
    /// An offset to another IFD. Reads just like a `Long`.
    Ifd = 13,
    Utf8 = 129,
}

impl PrimitiveTy {
    /// Grabs the primitive type's size in bytes.
    ///
    /// ```
    /// use gallery_exif_types::exif::primitives::PrimitiveTy;
    ///
    /// let slong: PrimitiveTy = PrimitiveTy::SLong;
    /// assert_eq!(slong.size_bytes(), 4_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            PrimitiveTy::Byte | PrimitiveTy::Ascii | PrimitiveTy::Utf8 | PrimitiveTy::Undefined => {
                1_u8
            }
            PrimitiveTy::Short => 2_u8,
            PrimitiveTy::Long | PrimitiveTy::SLong | PrimitiveTy::Ifd => 4_u8,
            PrimitiveTy::Rational | PrimitiveTy::SRational => 8_u8,
        }
    }

    /// Whether this type holds text rather than numbers.
    ///
    /// Text fields decode to one string, no matter their count.
    pub const fn is_text(&self) -> bool {
        matches!(self, PrimitiveTy::Ascii | PrimitiveTy::Utf8)
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            7 => Ok(Self::Undefined),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            13 => Ok(Self::Ifd),
            129 => Ok(Self::Utf8),

            _ => Err(()),
        }
    }
}

/// One decoded, non-text value.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Primitive {
    Byte(Byte),
    Short(Short),
    Long(Long),
    Rational(Rational),
    Undefined(Undefined),
    SLong(SLong),
    SRational(SRational),
    Ifd(Long),
}

impl Primitive {
    /// Grabs the type describing this primitive.
    pub fn ty(&self) -> PrimitiveTy {
        match self {
            Primitive::Byte(_) => PrimitiveTy::Byte,
            Primitive::Short(_) => PrimitiveTy::Short,
            Primitive::Long(_) => PrimitiveTy::Long,
            Primitive::Rational(_) => PrimitiveTy::Rational,
            Primitive::Undefined(_) => PrimitiveTy::Undefined,
            Primitive::SLong(_) => PrimitiveTy::SLong,
            Primitive::SRational(_) => PrimitiveTy::SRational,
            Primitive::Ifd(_) => PrimitiveTy::Ifd,
        }
    }

    /// Reads this primitive as a floating-point number.
    ///
    /// Rationals are divided out. Opaque (`Undefined`) bytes aren't numbers,
    /// so they give `None`.
    ///
    /// ```
    /// use gallery_exif_types::exif::primitives::{Primitive, Rational};
    ///
    /// let half = Primitive::Rational(Rational { numerator: 1, denominator: 2 });
    /// assert_eq!(half.as_f64(), Some(0.5));
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Primitive::Byte(b) => Some(f64::from(b)),
            Primitive::Short(s) => Some(f64::from(s)),
            Primitive::Long(l) | Primitive::Ifd(l) => Some(f64::from(l)),
            Primitive::SLong(l) => Some(f64::from(l)),
            Primitive::Rational(r) => Some(r.value()),
            Primitive::SRational(r) => Some(r.value()),
            Primitive::Undefined(_) => None,
        }
    }

    /// Reads this primitive as an unsigned integer.
    ///
    /// Fractions and negative numbers give `None`.
    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Primitive::Byte(b) | Primitive::Undefined(b) => Some(u32::from(b)),
            Primitive::Short(s) => Some(u32::from(s)),
            Primitive::Long(l) | Primitive::Ifd(l) => Some(l),
            Primitive::SLong(l) => u32::try_from(l).ok(),
            Primitive::Rational(_) | Primitive::SRational(_) => None,
        }
    }
}

/// A `u8` to represent a byte.
pub type Byte = u8;

/// A `u16`.
pub type Short = u16;

/// A `u32`.
pub type Long = u32;

/// A fraction that can't be negative.
///
/// Both the numerator (top number) and denominator (bottom number) are always
/// positive numbers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    /// Divides the fraction out.
    ///
    /// A zero denominator gives `0.0` instead of infinity or NaN.
    ///
    /// ```
    /// use gallery_exif_types::exif::primitives::Rational;
    ///
    /// assert_eq!(Rational { numerator: 7, denominator: 0 }.value(), 0.0);
    /// ```
    pub fn value(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }

        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

/// A byte with no defined meaning.
///
/// Proprietary extensions (like maker notes) tend to be stored as lists of
/// these.
pub type Undefined = u8;

/// A signed long - just a `i32`.
pub type SLong = i32;

/// A signed fraction.
///
/// Both the numerator (top number) and denominator (bottom number) can be
/// negative.
#[repr(C)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SRational {
    /// Divides the fraction out. A zero denominator gives `0.0`.
    pub fn value(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }

        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

/// How many primitives a known tag is expected to store.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveCount {
    /// There are `n` primitives.
    Known(u32),

    /// Any number of primitives.
    Any,
}

impl PrimitiveCount {
    /// Whether a field holding `count` primitives fits this expectation.
    ///
    /// ```
    /// use gallery_exif_types::exif::primitives::PrimitiveCount;
    ///
    /// assert!(PrimitiveCount::Known(3).allows(3));
    /// assert!(!PrimitiveCount::Known(3).allows(2));
    /// assert!(PrimitiveCount::Any.allows(0));
    /// ```
    pub const fn allows(&self, count: u32) -> bool {
        match *self {
            PrimitiveCount::Known(n) => n == count,
            PrimitiveCount::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Primitive, PrimitiveCount, PrimitiveTy, Rational, SRational};

    #[test]
    fn rational_division() {
        assert_eq!(
            Rational {
                numerator: 1,
                denominator: 2
            }
            .value(),
            0.5
        );
        assert_eq!(
            Rational {
                numerator: 300,
                denominator: 0
            }
            .value(),
            0.0,
            "zero denominators should not blow up"
        );
        assert_eq!(
            SRational {
                numerator: -2,
                denominator: 3
            }
            .value(),
            -2.0 / 3.0
        );
        assert_eq!(
            SRational {
                numerator: i32::MIN,
                denominator: 0
            }
            .value(),
            0.0
        );
    }

    #[test]
    fn type_codes() {
        for code in [1_u16, 2, 3, 4, 5, 7, 9, 10, 13, 129] {
            let ty = PrimitiveTy::try_from(code).expect("listed codes are supported");
            assert_eq!(ty as u16, code);
        }

        // signed byte, signed short, float, double
        for code in [0_u16, 6, 8, 11, 12, 128, u16::MAX] {
            assert_eq!(PrimitiveTy::try_from(code), Err(()));
        }
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Primitive::Short(400).as_u32(), Some(400));
        assert_eq!(Primitive::SLong(-1).as_u32(), None);
        assert_eq!(Primitive::SLong(-1).as_f64(), Some(-1.0));
        assert_eq!(Primitive::Undefined(3).as_f64(), None);
        assert_eq!(Primitive::Ifd(26).as_u32(), Some(26));
        assert_eq!(PrimitiveTy::Ifd.size_bytes(), 4);
        assert_eq!(
            Primitive::Rational(Rational {
                numerator: 28,
                denominator: 10
            })
            .as_u32(),
            None
        );
    }

    #[test]
    fn expected_counts() {
        assert!(PrimitiveCount::Known(1).allows(1));
        assert!(!PrimitiveCount::Known(20).allows(21));
        assert!(PrimitiveCount::Any.allows(u32::MAX));
    }
}
