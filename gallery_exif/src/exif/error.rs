use gallery_exif_types::exif::{Field, ifd::IfdGroup, primitives::PrimitiveTy};

/// This type describes the parsing result of a TIFF block or one of its IFDs.
///
/// If it's the `Err` variant, that whole block (or directory) is lost.
pub type ExifFatalResult<T> = Result<T, ExifFatalError>;

/// Parsing a field may fail due to an incorrect save by another metadata
/// writer, a cut-off file, or other problems.
///
/// In that case, only that one field is skipped.
pub type ExifFieldResult = Result<Field, ExifFieldError>;

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFatalError {
    /// The input was too short to provide a byte order marker.
    NoByteOrderMarker { len: usize },

    /// The byte order marker was weird - it's not one of the two expected
    /// values (in ASCII, should be either `II` or `MM`).
    WeirdByteOrderMarker { found: [u8; 2] },

    /// Didn't find the TIFF magic number.
    NoTiffMagicNumber,

    /// The magic number indexes had a weird value. It's not TIFF's.
    MagicNumberWasntTiff { found: u16 },

    /// No offset to IFD 0 was found.
    NoTiffHeaderOffset,

    /// The IFD 0 offset would place us inside the header! That doesn't make
    /// any sense, so we can't keep parsing.
    HeaderOffsetBeforeHeader { offset: u32 },

    /// An IFD offset pointed past the end of the TIFF block.
    IfdOffsetOutOfBounds { offset: u32 },

    /// The IFD didn't say how many entries it has.
    IfdNoEntryCount,

    /// A sub-IFD pointer tag didn't hold a usable offset.
    BadSubIfdPointer,
}

impl ExifFatalError {
    /// Whether this error came from the 8-byte TIFF header.
    ///
    /// A bad header means there's no usable Exif at all, as opposed to Exif
    /// that's present but damaged.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::NoByteOrderMarker { .. }
                | Self::WeirdByteOrderMarker { .. }
                | Self::NoTiffMagicNumber
                | Self::MagicNumberWasntTiff { .. }
                | Self::NoTiffHeaderOffset
                | Self::HeaderOffsetBeforeHeader { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum ExifFieldError {
    //
    // field stuff
    /// The field did not provide a tag.
    FieldNoTag,

    /// The field didn't provide a primitive type.
    FieldNoTy,

    /// The field didn't specify how many primitives it contains.
    FieldNoCount,

    /// The field didn't provide an offset or value.
    FieldNoOffsetOrValue,

    //
    // value parsing stuff
    /// Couldn't move to the value's offset. It was likely too far (malformed).
    OffsetTooFar { offset: u32 },

    /// The value is bigger than this platform can address.
    ValueTooLarge { count: u32, ty: PrimitiveTy },

    /// Couldn't parse primitive - no more data.
    OuttaData { ty: PrimitiveTy },

    /// Text types aren't parsed one primitive at a time.
    NotAPrimitive { ty: PrimitiveTy },
}

impl ExifFieldError {
    /// Whether the 12-byte entry itself was cut off.
    ///
    /// When this happens, the rest of the directory is gone too.
    pub fn is_truncated_entry(&self) -> bool {
        matches!(
            self,
            Self::FieldNoTag | Self::FieldNoTy | Self::FieldNoCount | Self::FieldNoOffsetOrValue
        )
    }
}

/// A sub-IFD that IFD 0 pointed to, but that we couldn't read.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub struct SubIfdError {
    /// Which sub-IFD was lost.
    pub group: IfdGroup,

    /// What went wrong.
    pub error: ExifFatalError,
}

impl core::fmt::Display for ExifFatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoByteOrderMarker { len } => {
                write!(f, "No byte order marker was found. len: `{len}`")
            }
            Self::WeirdByteOrderMarker { found } => match core::str::from_utf8(found.as_slice()) {
                Ok(found_utf8_bom) => {
                    write!(f, "Got a weird byte-order marker: `{found_utf8_bom}`")
                }
                Err(_) => write!(f, "Got a weird byte-order marker - wasn't ASCII: {found:?}"),
            },

            Self::NoTiffMagicNumber => {
                f.write_str("No TIFF magic number found - the slice was likely cut short.")
            }
            Self::MagicNumberWasntTiff { found } => {
                write!(f, "Magic number was not TIFF! got: `{found}`")
            }
            Self::NoTiffHeaderOffset => f.write_str("No offset to IFD 0 was found."),
            Self::HeaderOffsetBeforeHeader { offset } => write!(
                f,
                "IFD 0 offset asked us to move inside the TIFF header. Likely a \
                broken file - cannot continue parsing. offset: `{offset}`"
            ),
            Self::IfdOffsetOutOfBounds { offset } => write!(
                f,
                "An IFD offset pointed past the end of the TIFF block. offset: `{offset}`"
            ),
            Self::IfdNoEntryCount => f.write_str("The IFD didn't say how many entries it has."),
            Self::BadSubIfdPointer => {
                f.write_str("A sub-IFD pointer didn't hold an unsigned offset.")
            }
        }
    }
}

impl core::fmt::Display for ExifFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExifFieldError::FieldNoTag => f.write_str("The field did not provide a tag."),
            ExifFieldError::FieldNoTy => f.write_str("The field didn't provide a primitive type."),
            ExifFieldError::FieldNoCount => {
                f.write_str("The field didn't specify how many primitives it contains.")
            }
            ExifFieldError::FieldNoOffsetOrValue => {
                f.write_str("The field didn't provide an offset or value.")
            }

            ExifFieldError::OffsetTooFar { offset } => write!(
                f,
                "Couldn't skip to offset - no more data in blob. offset: `{offset}`"
            ),
            ExifFieldError::ValueTooLarge { count, ty } => write!(
                f,
                "Field value is too large to address. count: `{count}`, ty: `{ty:?}`"
            ),
            ExifFieldError::OuttaData { ty } => write!(
                f,
                "Couldn't parse primitive - no more data in blob. ty: `{ty:?}`"
            ),
            ExifFieldError::NotAPrimitive { ty } => write!(
                f,
                "Text type `{ty:?}` can't be parsed as a single primitive."
            ),
        }
    }
}

impl core::fmt::Display for SubIfdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to read the {}. err: {}", self.group, self.error)
    }
}

impl core::error::Error for ExifFatalError {}
impl core::error::Error for ExifFieldError {}

impl core::error::Error for SubIfdError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}
