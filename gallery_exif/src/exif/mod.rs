//! Exif is a media metadata format primarily used by cameras.
//!
//! It's a structured binary format laid out like a tiny TIFF file: an 8-byte
//! header, then IFDs (Image File Directories). Each entry of an IFD contains a
//! tag ID, primitive data type, and count saying how many primitives are
//! stored. That makes it somewhat self-describing - we can decode entries
//! without knowing what they mean.
//!
//! IFD 0 holds the TIFF-level tags, plus pointers to two sub-IFDs: the Exif
//! IFD (camera settings) and the GPS IFD (location).

pub use gallery_exif_types::exif::{
    Endianness, Field, FieldData,
    ifd::{IfdGroup, IfdMap},
    primitives::*,
    tags::{ExifIfdTag, GpsIfdTag, Ifd0Tag, KnownTag, TagId},
};

use winnow::{
    Parser as _, Stateful,
    binary::{Endianness as WinnowEndianness, u16, u32},
    error::EmptyError,
    token::take,
};

use self::{
    error::{ExifFatalError, ExifFatalResult, SubIfdError},
    ifd::walk_ifd,
};
use gallery_exif_types::exif::tags::SUB_IFD_POINTER_TAGS;

pub mod error;
mod ifd;
mod value;

/// The TIFF header is always this long.
const TIFF_HEADER_LEN: u32 = 8;

/// Extracted information from an Exif metadata block.
#[derive(Clone, Debug, PartialEq)]
pub struct Exif {
    /// The endianness of the Exif block.
    pub endianness: Endianness,

    /// The entries of IFD 0.
    pub ifd0: IfdMap,

    /// The Exif sub-IFD, if IFD 0 pointed to one and it was readable.
    pub exif_ifd: Option<IfdMap>,

    /// The GPS sub-IFD, if IFD 0 pointed to one and it was readable.
    pub gps_ifd: Option<IfdMap>,

    /// Sub-IFDs that IFD 0 pointed to, but that we couldn't read.
    pub sub_ifd_errors: Vec<SubIfdError>,
}

impl Exif {
    /// Parses the given TIFF block into our `Exif` structure.
    ///
    /// The block must begin at the TIFF header, as all offsets inside it are
    /// relative to that point.
    ///
    /// ```
    /// use gallery_exif::exif::{Exif, Endianness, Ifd0Tag};
    ///
    /// let mut blob = Vec::new();
    /// blob.extend_from_slice(b"II");
    /// blob.extend_from_slice(&42_u16.to_le_bytes());
    /// blob.extend_from_slice(&8_u32.to_le_bytes());
    ///
    /// // one entry: Make = "Acme"
    /// blob.extend_from_slice(&1_u16.to_le_bytes());
    /// blob.extend_from_slice(&0x010F_u16.to_le_bytes());
    /// blob.extend_from_slice(&2_u16.to_le_bytes());
    /// blob.extend_from_slice(&4_u32.to_le_bytes());
    /// blob.extend_from_slice(b"Acme");
    ///
    /// let exif = Exif::new(&blob).unwrap();
    /// assert_eq!(exif.endianness, Endianness::Little);
    /// assert_eq!(exif.ifd0.text(Ifd0Tag::Make), Some("Acme"));
    /// assert!(exif.exif_ifd.is_none());
    /// ```
    pub fn new(blob: &[u8]) -> ExifFatalResult<Self> {
        let input = &mut &blob[..];

        // parse the endianness
        let endianness: Endianness = parse_blob_endianness(input)?;

        let winnow_endianness: WinnowEndianness = match endianness {
            Endianness::Little => WinnowEndianness::Little,
            Endianness::Big => WinnowEndianness::Big,
        };

        // alright. from here on out, we've got to account for the endianness
        // of everything.
        //
        // to do so, our input is wrapped in `Stateful`
        let stateful_input = &mut Stream {
            input: *input,
            state: State {
                endianness: winnow_endianness,
                blob,
                current_ifd: IfdGroup::_0, // we always start with IFD 0
            },
        };

        // ensure we've got a TIFF marker (magic number)
        parse_tiff_magic_number(stateful_input)?;

        // grab the offset where IFD 0 starts
        let ifd0_offset: u32 = parse_tiff_header_offset(stateful_input)?;

        // a failure here means there's no usable Exif at all
        let ifd0 = match walk_ifd(blob, ifd0_offset, winnow_endianness, IfdGroup::_0) {
            Ok(map) => map,
            Err(e) => {
                log::error!("Failed to parse Exif! The first IFD failed to parse! err: {e}");
                return Err(e);
            }
        };
        log::trace!("Completed IFD 0 with `{}` fields.", ifd0.len());

        let mut exif = Self {
            endianness,
            ifd0,
            exif_ifd: None,
            gps_ifd: None,
            sub_ifd_errors: Vec::new(),
        };

        // now, follow the pointers to each sub-IFD
        for (pointer_tag, group) in SUB_IFD_POINTER_TAGS {
            let Some(pointer) = exif.ifd0.get(*pointer_tag) else {
                log::trace!("No pointer to the {group}.");
                continue;
            };

            let sub_ifd = match pointer.data.first().and_then(Primitive::as_u32) {
                Some(offset) => walk_ifd(blob, offset, winnow_endianness, *group),
                None => Err(ExifFatalError::BadSubIfdPointer),
            };

            match sub_ifd {
                Ok(map) => match group {
                    IfdGroup::Exif => exif.exif_ifd = Some(map),
                    IfdGroup::Gps => exif.gps_ifd = Some(map),
                    IfdGroup::_0 => unreachable!("IFD 0 can't be a sub-IFD"),
                },

                Err(error) => {
                    log::warn!("Lost the {group}! Keeping IFD 0 anyway. err: {error}");
                    exif.sub_ifd_errors.push(SubIfdError {
                        group: *group,
                        error,
                    });
                }
            }
        }

        Ok(exif)
    }

    /// Grabs the entries of the given IFD, if we have them.
    pub fn ifd(&self, group: IfdGroup) -> Option<&IfdMap> {
        match group {
            IfdGroup::_0 => Some(&self.ifd0),
            IfdGroup::Exif => self.exif_ifd.as_ref(),
            IfdGroup::Gps => self.gps_ifd.as_ref(),
        }
    }
}

/// Finds the endianness of the Exif blob.
fn parse_blob_endianness(input: &mut &[u8]) -> ExifFatalResult<Endianness> {
    let input_len = input.len();

    // ensure we've got two good bytes
    log::trace!("Looking for the BOM bytes...");
    let two_ascii_bytes: &[u8] = take(2_usize)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find endianness marker!");
            ExifFatalError::NoByteOrderMarker { len: input_len }
        })?;
    log::trace!("Found two BOM bytes!");

    // parse the bytes we found
    log::trace!("Grabbing BOM...");
    match *two_ascii_bytes {
        [b'I', b'I'] => Ok(Endianness::Little).inspect(|f| log::trace!("It's LE: {f:?}")),
        [b'M', b'M'] => Ok(Endianness::Big).inspect(|f| log::trace!("It's BE: {f:?}")),

        // found a weird bom!
        [a, b] => {
            let e = ExifFatalError::WeirdByteOrderMarker { found: [a, b] };
            log::error!("Couldn't parse out Exif! err: {e}");
            Err(e)
        }

        _ => unreachable!("winnow verified the size"),
    }
}

/*
*
*
*
  NOTE:

  all parsers from here on out generally require knowing the endianness. so,
  it's stored inside a custom state struct + a stream wrapper.

  this allows us to easily pass our state between pieces of the parser, all
  without globals or other nasty stuff
*
*
*
*
*/

#[derive(Clone, Debug)]
struct State<'a> {
    current_ifd: IfdGroup,
    endianness: WinnowEndianness,
    blob: &'a [u8],
}

/// A stream of the blob wrapped with our endianness.
type Stream<'s> = Stateful<&'s [u8], State<'s>>;

/// Ensures we're working with the correct kind of file.
fn parse_tiff_magic_number(input: &mut Stream) -> ExifFatalResult<()> {
    // we account for endianness from here on out
    let endianness = input.state.endianness;

    // grab the magic number bytes as a u16
    log::trace!("Getting magic number...");
    let magic_number: u16 = u16(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find TIFF magic number!");
            ExifFatalError::NoTiffMagicNumber
        })?;

    // check the magic number
    log::trace!("Checking magic number...");
    if magic_number != 42 {
        log::error!("Magic number wasn't for TIFF. got: `{magic_number}`");
        return Err(ExifFatalError::MagicNumberWasntTiff {
            found: magic_number,
        });
    }

    log::trace!("Magic number was good!");
    Ok(())
}

/// Grabs the offset of IFD 0, measured from the start of the blob.
///
/// Offsets that would place IFD 0 inside the header itself are rejected.
fn parse_tiff_header_offset(input: &mut Stream) -> ExifFatalResult<u32> {
    let endianness = input.state.endianness;

    let offset: u32 = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Didn't find a TIFF header offset!");
            ExifFatalError::NoTiffHeaderOffset
        })
        .inspect(|offset| log::trace!("found offset: `{offset}`"))?;

    if offset < TIFF_HEADER_LEN {
        log::error!("Exif blob placed IFD 0 inside the header! Can't continue parsing.");
        return Err(ExifFatalError::HeaderOffsetBeforeHeader { offset });
    }

    Ok(offset)
}
