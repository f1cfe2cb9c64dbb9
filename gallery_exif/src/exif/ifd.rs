use winnow::{
    Parser,
    binary::{Endianness as WinnowEndianness, u16},
    error::EmptyError,
};

use super::{
    State, Stream,
    error::{ExifFatalError, ExifFatalResult},
    value::parse_value,
};
use gallery_exif_types::exif::ifd::{IfdGroup, IfdMap};

/// Reads the IFD found at `offset` within the blob.
pub fn walk_ifd(
    blob: &[u8],
    offset: u32,
    endianness: WinnowEndianness,
    group: IfdGroup,
) -> ExifFatalResult<IfdMap> {
    log::trace!("Walking the {group} at offset `{offset}`...");

    let Some(input) = usize::try_from(offset).ok().and_then(|o| blob.get(o..)) else {
        log::error!(
            "The {group} is placed outside the blob! offset: `{offset}`, blob len: `{}`",
            blob.len()
        );
        return Err(ExifFatalError::IfdOffsetOutOfBounds { offset });
    };

    parse_ifd(&mut Stream {
        input,
        state: State {
            current_ifd: group,
            endianness,
            blob,
        },
    })
}

/// Parses out an entire IFD.
///
/// Entries that fail to decode are skipped. If the directory is cut off, the
/// entries before the cut are kept.
///
/// The trailing next-IFD pointer isn't read; thumbnail directories aren't
/// useful to us.
pub fn parse_ifd(input: &mut Stream) -> Result<IfdMap, ExifFatalError> {
    let endianness = input.state.endianness;
    let group = input.state.current_ifd;

    let entry_count: u16 = u16(endianness)
        .parse_next(&mut input.input)
        .map_err(|_: EmptyError| {
            log::error!("Couldn't find count on IFD - ran out of data!");
            ExifFatalError::IfdNoEntryCount
        })?;

    log::trace!("Parsing `{entry_count}` fields...");
    let mut map = IfdMap::new();
    for i in 0..entry_count {
        match parse_value(input) {
            Ok(field) => {
                let tag = field.tag;
                if !map.insert(field) {
                    log::warn!(
                        "The {group} has a duplicate entry for tag `{tag}`. \
                        Keeping the first one."
                    );
                }
            }

            Err(e) if e.is_truncated_entry() => {
                log::warn!(
                    "The {group} was cut off at entry #{i} of `{entry_count}`. \
                    Keeping the `{}` entries read so far. err: {e}",
                    map.len()
                );
                break;
            }

            Err(e) => {
                log::warn!("Skipping entry #{i} in the {group}. err: {e}");
            }
        }
    }
    log::trace!("Completed field parsing!");

    Ok(map)
}

#[cfg(test)]
mod tests {
    use gallery_exif_types::exif::{
        FieldData,
        ifd::{IfdGroup, IfdMap},
        primitives::Primitive,
        tags::{GpsIfdTag, Ifd0Tag, TagId},
    };
    use winnow::binary::Endianness as WinnowEndianness;

    use super::walk_ifd;
    use crate::{exif::error::ExifFatalError, util::logger};

    /// helper: one big-endian entry
    fn be_entry(v: &mut Vec<u8>, tag: impl TagId, ty: u16, count: u32, value: [u8; 4]) {
        v.extend_from_slice(tag.tag_id().to_be_bytes().as_slice());
        v.extend_from_slice(ty.to_be_bytes().as_slice());
        v.extend_from_slice(count.to_be_bytes().as_slice());
        v.extend_from_slice(value.as_slice());
    }

    fn short_value(s: u16) -> [u8; 4] {
        let mut value = [0_u8; 4];
        value[..2].copy_from_slice(s.to_be_bytes().as_slice());
        value
    }

    /// helper: walk a big-endian directory at the start of `blob`
    fn walk_be(blob: &[u8], group: IfdGroup) -> IfdMap {
        walk_ifd(blob, 0, WinnowEndianness::Big, group).unwrap()
    }

    #[test]
    fn empty_directory_is_an_empty_map() {
        logger();

        let blob = [0_u8, 0, 0, 0, 0, 0];
        let map = walk_be(&blob, IfdGroup::_0);
        assert!(map.is_empty());
    }

    #[test]
    fn cut_off_directory_keeps_complete_entries() {
        logger();

        let mut blob = Vec::new();
        blob.extend_from_slice(3_u16.to_be_bytes().as_slice()); // claims three
        be_entry(&mut blob, Ifd0Tag::ImageWidth, 3, 1, short_value(1920));
        be_entry(&mut blob, Ifd0Tag::ImageLength, 3, 1, short_value(1080));
        blob.extend_from_slice([0x01, 0x12, 0x00].as_slice()); // half an entry

        let map = walk_be(&blob, IfdGroup::_0);
        assert_eq!(map.len(), 2);
        assert_eq!(map.u32(Ifd0Tag::ImageWidth), Some(1920));
        assert_eq!(map.u32(Ifd0Tag::ImageLength), Some(1080));
    }

    #[test]
    fn duplicates_keep_the_first_entry() {
        logger();

        let mut blob = Vec::new();
        blob.extend_from_slice(2_u16.to_be_bytes().as_slice());
        be_entry(&mut blob, Ifd0Tag::Orientation, 3, 1, short_value(6));
        be_entry(&mut blob, Ifd0Tag::Orientation, 3, 1, short_value(1));

        let map = walk_be(&blob, IfdGroup::_0);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.data(Ifd0Tag::Orientation),
            Some(&FieldData::Primitive(Primitive::Short(6)))
        );
    }

    #[test]
    fn broken_entries_are_skipped() {
        logger();

        let mut blob = Vec::new();
        blob.extend_from_slice(2_u16.to_be_bytes().as_slice());
        // this one points way past the end
        be_entry(&mut blob, Ifd0Tag::Make, 2, 40, 9000_u32.to_be_bytes());
        be_entry(&mut blob, Ifd0Tag::Model, 2, 3, *b"X1\0\0");

        let map = walk_be(&blob, IfdGroup::_0);
        assert_eq!(map.text(Ifd0Tag::Make), None);
        assert_eq!(map.text(Ifd0Tag::Model), Some("X1"));
    }

    #[test]
    fn tags_are_read_within_their_group() {
        logger();

        let mut blob = Vec::new();
        blob.extend_from_slice(1_u16.to_be_bytes().as_slice());
        be_entry(&mut blob, GpsIfdTag::GPSLatitudeRef, 2, 2, *b"N\0\0\0");

        let map = walk_be(&blob, IfdGroup::Gps);
        assert_eq!(map.text(GpsIfdTag::GPSLatitudeRef), Some("N"));
    }

    #[test]
    fn offsets_must_land_in_the_blob() {
        logger();

        let blob = [0_u8; 16];
        assert_eq!(
            walk_ifd(&blob, 17, WinnowEndianness::Little, IfdGroup::Exif),
            Err(ExifFatalError::IfdOffsetOutOfBounds { offset: 17 })
        );
        assert_eq!(
            walk_ifd(&blob, 15, WinnowEndianness::Little, IfdGroup::Exif),
            Err(ExifFatalError::IfdNoEntryCount)
        );
    }
}
