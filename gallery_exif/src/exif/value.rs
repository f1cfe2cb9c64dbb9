use winnow::{
    Parser as _, Stateful,
    binary::{Endianness as WinnowEndianness, i32, u8, u16, u32},
    error::EmptyError,
    token::take,
};

use super::{
    Stream,
    error::{ExifFieldError, ExifFieldResult},
};
use gallery_exif_types::exif::{Field, FieldData, primitives::*, tags::KnownTag};

/// Parses out one 12-byte entry from an IFD, decoding its value.
///
/// Values of up to four bytes live inside the entry. Anything larger is
/// stored elsewhere in the blob, and the entry holds its offset instead.
pub fn parse_value(input: &mut Stream) -> ExifFieldResult {
    let endianness = input.state.endianness;

    // grab tag (2 bytes)
    let tag: u16 = u16(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoTag)?;

    // type (2 bytes)
    let raw_ty: u16 = u16(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoTy)?;

    // count (4 bytes)
    let count: u32 = u32(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoCount)?;

    // grab the value or offset (4 bytes. we'll handle deciding in a sec)
    let value_or_offset: &[u8] = take(4_usize)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| ExifFieldError::FieldNoOffsetOrValue)?;

    let known_tag: Option<KnownTag> = KnownTag::try_from((input.state.current_ifd, tag)).ok();

    log::trace!(
        "(field info...
    tag: {tag} ({known_tag:?}),
    ty: {raw_ty},
    count: {count},
    value or offset: {value_or_offset:x?}
)"
    );

    // types we can't decode still get an entry, just without a value
    let Ok(ty) = PrimitiveTy::try_from(raw_ty) else {
        log::warn!(
            "Field with tag ID `{tag}` uses an unsupported type: `{raw_ty}`. \
            Keeping it without a value."
        );
        return Ok(Field {
            tag,
            ty: raw_ty,
            count,
            data: FieldData::Unsupported(raw_ty),
        });
    };

    // warn if the real type or count isn't what the tag should have
    if let Some(known_tag) = known_tag {
        if !known_tag.types().contains(&ty) {
            log::warn!(
                "Field {known_tag} had a type mismatch! \
                Continuing parsing with wrong type anyway... \
                got: `{ty:?}`, \
                expected: {:?}",
                known_tag.types()
            );
        }

        if !known_tag.count().allows(count) {
            log::warn!(
                "Field {known_tag} had a count mismatch! \
                Parsing all of its values anyway... \
                got: `{count}`, \
                expected: {:?}",
                known_tag.count()
            );
        }
    }

    // check how large the stored data is.
    //
    // (this can't overflow - it's at most `8 * u32::MAX`)
    let total_size: u64 = u64::from(ty.size_bytes()) * u64::from(count);
    log::trace!("total size for field: `{total_size}`");

    let is_offset_instead_of_inline_value: bool = total_size > 4_u64;
    log::trace!("field has offset instead of inline data..? `{is_offset_instead_of_inline_value}`");

    // if the value is an offset, find the data in the blob. (offsets are
    // relative to the beginning of the blob, which is the TIFF header)
    //
    // if it's not, just use our value field and leave :)
    let data: &[u8] = match is_offset_instead_of_inline_value {
        true => {
            let offset: u32 = u32(endianness)
                .parse_next(&mut &*value_or_offset)
                .map_err(|_: EmptyError| ExifFieldError::FieldNoOffsetOrValue)?;

            out_of_line_data(input.state.blob, offset, total_size, count, ty)?
        }

        false => {
            log::trace!("No value offset detected.");
            value_or_offset
                .get(..total_size as usize)
                .ok_or(ExifFieldError::OuttaData { ty })?
        }
    };

    let field_data = match (count, ty.is_text()) {
        // if the count is zero, we won't perform any work at all
        (0_u32, _) => {
            log::trace!("There are no stored primitives in this field. Returning early!");
            FieldData::None(ty)
        }

        // text is one value, no matter how many bytes it has
        (_, true) => FieldData::Text(parse_text(data)),

        // when we just have one, parse it alone and return immediately
        (1_u32, false) => FieldData::Primitive(parse_primitive(&mut PrimitiveStream {
            input: data,
            state: PrimitiveState {
                tag,
                endianness,
                count,
                ty,
            },
        })?),

        // other counts are higher; we'll make a list
        (_, false) => {
            log::trace!("Asked to parse list of primitives. value ct: `{count}`");
            FieldData::List {
                list: parse_primitive_list(&mut PrimitiveStream {
                    input: data,
                    state: PrimitiveState {
                        tag,
                        endianness,
                        count,
                        ty,
                    },
                })?,
                ty,
            }
        }
    };

    Ok(Field {
        tag,
        ty: raw_ty,
        count,
        data: field_data,
    })
}

/// Finds a value stored away from its entry.
fn out_of_line_data(
    blob: &[u8],
    offset: u32,
    total_size: u64,
    count: u32,
    ty: PrimitiveTy,
) -> Result<&[u8], ExifFieldError> {
    log::trace!("Using reference to blob for value's offset.");

    let too_large = || ExifFieldError::ValueTooLarge { count, ty };
    let start: usize = usize::try_from(offset).map_err(|_| too_large())?;
    let len: usize = usize::try_from(total_size).map_err(|_| too_large())?;
    let end: usize = start.checked_add(len).ok_or_else(too_large)?;

    if start > blob.len() {
        log::error!(
            "Field said its data is stored outside the blob! \
            That's not possible. Can't continue parsing this field. \
            offset: `{offset}`, blob len: `{}`",
            blob.len()
        );
        return Err(ExifFieldError::OffsetTooFar { offset });
    }

    blob.get(start..end).ok_or_else(|| {
        log::error!(
            "Field data runs past the end of the blob. \
            offset: `{offset}`, len: `{len}`, blob len: `{}`",
            blob.len()
        );
        ExifFieldError::OuttaData { ty }
    })
}

/// Reads text up to its NUL terminator (or the end of the data), then trims
/// it.
fn parse_text(data: &[u8]) -> String {
    let until_nul: &[u8] = data.split(|b| *b == 0).next().unwrap_or_default();
    String::from_utf8_lossy(until_nul).trim().to_owned()
}

#[derive(Clone, Debug)]
struct PrimitiveState {
    tag: u16,
    endianness: WinnowEndianness,
    count: u32,
    ty: PrimitiveTy,
}
type PrimitiveStream<'s> = Stateful<&'s [u8], PrimitiveState>;

/// Parses a list of primitives.
fn parse_primitive_list(input: &mut PrimitiveStream) -> Result<Vec<Primitive>, ExifFieldError> {
    let mut v: Vec<Primitive> = Vec::with_capacity(input.state.count as usize);

    for i in 0..input.state.count {
        v.push(parse_primitive(input).inspect_err(|e| {
            log::error!(
                "Failed to create primitive #{i} on tag `{}`. err: {e}",
                input.state.tag
            )
        })?);
    }

    Ok(v)
}

/// Parses a single primitive.
fn parse_primitive(input: &mut PrimitiveStream) -> Result<Primitive, ExifFieldError> {
    let endianness = input.state.endianness;
    let ty = input.state.ty;

    // endianness should never be native!
    debug_assert!(
        endianness != WinnowEndianness::Native,
        "endianness should never be native. this is a bug - please report it!"
    );

    let outta_data = move |_: EmptyError| ExifFieldError::OuttaData { ty };

    match ty {
        PrimitiveTy::Byte => Ok(Primitive::Byte(u8.parse_next(input).map_err(outta_data)?)),

        PrimitiveTy::Short => Ok(Primitive::Short(
            u16(endianness).parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::Long => Ok(Primitive::Long(
            u32(endianness).parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::Rational => Ok(Primitive::Rational(Rational {
            numerator: u32(endianness).parse_next(input).map_err(outta_data)?,
            denominator: u32(endianness).parse_next(input).map_err(outta_data)?,
        })),

        PrimitiveTy::Undefined => Ok(Primitive::Undefined(
            u8.parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::SLong => Ok(Primitive::SLong(
            i32(endianness).parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::SRational => Ok(Primitive::SRational(SRational {
            numerator: i32(endianness).parse_next(input).map_err(outta_data)?,
            denominator: i32(endianness).parse_next(input).map_err(outta_data)?,
        })),

        PrimitiveTy::Ifd => Ok(Primitive::Ifd(
            u32(endianness).parse_next(input).map_err(outta_data)?,
        )),

        PrimitiveTy::Ascii | PrimitiveTy::Utf8 => Err(ExifFieldError::NotAPrimitive { ty }),
    }
}
