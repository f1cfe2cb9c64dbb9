use winnow::{
    Parser,
    binary::{be_u16, u8},
    error::EmptyError,
    token::{take, take_till, take_while},
};

use super::{JpegScan, JpegScanError, RawSegment};

/// A marker code indicating that an APP1 marker is present.
pub(super) const APP1_MARKER_CODE: u8 = 0xE1;

/// The first marker code, `SOI` (start of image).
const SOI_MARKER_CODE: u8 = 0xD8;

/// The last marker code, `EOI` (end of image).
const EOI_MARKER_CODE: u8 = 0xD9;

/// The start of scan code, `SOS`.
const SOS_MARKER_CODE: u8 = 0xDA;

/// Markers with no length or payload.
///
/// (`RST0` to `RST7`, `SOI`, `EOI`, and `TEM`)
const STANDALONE_MARKERS: &[u8] = &[
    0xD0, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0x01,
];

/// Restart markers may show up in entropy-coded data.
const RESTART_MARKERS: core::ops::RangeInclusive<u8> = 0xD0..=0xD7;

/// The signature an APP1 payload starts with when it holds Exif.
const EXIF_SIG: &[u8] = b"Exif\0\0";

/// From a segment's `0xFF` byte to its TIFF header: the marker (2 bytes), the
/// length (2 bytes), and the signature (6 bytes).
pub(super) const EXIF_HEADER_LEN: usize = 10;

/// Walks the marker segments of a JPEG file, looking for its Exif payload.
///
/// Only a missing `SOI` marker is an error. Damage after that point ends the
/// walk early (or skips the damaged part), and we keep what we found.
pub fn scan(input: &[u8]) -> Result<JpegScan, JpegScanError> {
    let original_len: usize = input.len();
    let input: &mut &[u8] = &mut &*input;

    // take first marker, which should be `SOI`
    let soi: &[u8] = take(2_usize)
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::warn!("Input is too short to be a JPEG. len: `{original_len}`");
            JpegScanError::TooShortForSoi { len: original_len }
        })?;

    match *soi {
        [0xFF, SOI_MARKER_CODE] => (),
        [a, b] => {
            log::warn!(
                "The first marker of a JPEG file should be `SOI`, \
                but it wasn't! \
                got: `{:x?}`",
                [a, b]
            );
            return Err(JpegScanError::NotAJpeg {
                first_bytes: [a, b],
            });
        }
        _ => unreachable!("winnow verified the size"),
    }

    let mut scan = JpegScan {
        segments: vec![RawSegment {
            marker_code: SOI_MARKER_CODE,
            offset: 0,
            size: 0,
        }],
        exif_payload: None,
    };

    // loop until the end of the file.
    while let Some((offset, marker_code)) = next_marker(input, original_len) {
        // handle end of image
        if marker_code == EOI_MARKER_CODE {
            log::trace!("EOI detected! Stopping loop.");
            scan.segments.push(RawSegment {
                marker_code,
                offset,
                size: 0,
            });
            break;
        }

        // skip other standalone markers
        if STANDALONE_MARKERS.contains(&marker_code) {
            // note: we don't actually skip anything since we've already
            // consumed the marker code bytes lol
            log::trace!("Got standalone marker with code `{marker_code:x?}`. Skipping...");
            scan.segments.push(RawSegment {
                marker_code,
                offset,
                size: 0,
            });
            continue;
        }

        // everything else says how long it is
        let Ok(size) = be_u16::<_, EmptyError>.parse_next(input) else {
            log::warn!("Marker `{marker_code:x?}` at `{offset}` has no length. Stopping.");
            break;
        };

        // the length includes its own two bytes, so it can't be less than
        // that. skip past the bad length and look for the next marker.
        let Some(payload_len) = size.checked_sub(2) else {
            log::warn!(
                "Marker `{marker_code:x?}` at `{offset}` has a malformed length: `{size}`. \
                Skipping it..."
            );
            continue;
        };

        let remaining_input_len: usize = input.len();
        let Ok(payload) = take::<_, _, EmptyError>(payload_len).parse_next(input) else {
            log::warn!(
                "Segment ran past the end of the file. Stopping. \
                marker code: `{marker_code:x?}`, len: `{size}` bytes, \
                remaining input len: `{remaining_input_len}` bytes"
            );
            break;
        };

        log::trace!("Got full marker! code: `{marker_code:x?}`, len: `{size}`");
        scan.segments.push(RawSegment {
            marker_code,
            offset,
            size,
        });

        // APP1 can contain Exif. check for its signature!
        if marker_code == APP1_MARKER_CODE && payload.starts_with(EXIF_SIG) {
            match scan.exif_payload {
                None => {
                    log::trace!("Found Exif in JPEG!");
                    scan.exif_payload = Some(offset + EXIF_HEADER_LEN);
                }
                Some(first) => log::warn!(
                    "Found more than one Exif payload in JPEG... \
                    keeping the one at `{first}`, ignoring the one at `{offset}`."
                ),
            }
        }

        // for the `SOS` marker, we have to consume tokens until we reach
        // the next marker.
        if marker_code == SOS_MARKER_CODE {
            skip_entropy_coded_data(input);
        }
    }

    Ok(scan)
}

/// Finds the next marker, returning the offset of its `0xFF` byte and its
/// code.
///
/// Gives `None` when the input runs out.
fn next_marker(input: &mut &[u8], original_len: usize) -> Option<(usize, u8)> {
    loop {
        // each marker must begin with an `0xFF` byte. skip junk until we
        // find one
        let junk: &[u8] = take_till::<_, _, EmptyError>(0.., 0xFF_u8)
            .parse_next(input)
            .ok()?;
        if !junk.is_empty() {
            log::warn!(
                "Skipped `{}` junk bytes while looking for a marker.",
                junk.len()
            );
        }

        // a marker may have any number of `0xFF`/255 bytes before its code
        take_while::<_, _, EmptyError>(1.., 0xFF_u8)
            .parse_next(input)
            .ok()?;
        let offset: usize = original_len - input.len() - 1;

        let marker_code: u8 = u8::<_, EmptyError>.parse_next(input).ok()?;

        // `FF 00` is a stuffed byte, not a marker
        if marker_code == 0x00 {
            log::trace!("Skipping stuffed byte outside of a scan at `{offset}`.");
            continue;
        }

        return Some((offset, marker_code));
    }
}

/// Skips entropy-coded data after `SOS`, stopping right before the next real
/// marker.
fn skip_entropy_coded_data(input: &mut &[u8]) {
    loop {
        // nothing but `0xFF` matters
        let _: Result<&[u8], EmptyError> = take_till(0.., 0xFF_u8).parse_next(input);

        match **input {
            // stuffed zero or restart marker. keep going
            [0xFF, b, ..] if b == 0x00 || RESTART_MARKERS.contains(&b) => {
                let _: Result<&[u8], EmptyError> = take(2_usize).parse_next(input);
            }

            // a new marker! (or the end)
            [0xFF, _, ..] | [] => return,

            // a lone `0xFF` at the very end
            _ => {
                let _: Result<u8, EmptyError> = u8.parse_next(input);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scan;
    use crate::{
        providers::jpeg::{JpegScanError, RawSegment},
        util::logger,
    };

    /// helper: a segment with the given payload
    fn segment(marker_code: u8, payload: &[u8]) -> Vec<u8> {
        let mut v = vec![0xFF, marker_code];
        v.extend_from_slice((payload.len() as u16 + 2).to_be_bytes().as_slice());
        v.extend_from_slice(payload);
        v
    }

    fn exif_payload(tiff: &[u8]) -> Vec<u8> {
        let mut v = b"Exif\0\0".to_vec();
        v.extend_from_slice(tiff);
        v
    }

    #[test]
    fn not_a_jpeg() {
        logger();

        assert_eq!(
            scan(b"\x89PNG\r\n\x1a\n"),
            Err(JpegScanError::NotAJpeg {
                first_bytes: [0x89, b'P']
            })
        );
        assert_eq!(scan(&[0xFF]), Err(JpegScanError::TooShortForSoi { len: 1 }));
        assert_eq!(scan(&[]), Err(JpegScanError::TooShortForSoi { len: 0 }));
    }

    #[test]
    fn bare_soi_is_fine() {
        logger();

        let scan = scan(&[0xFF, 0xD8]).unwrap();
        assert_eq!(scan.exif_payload, None);
        assert_eq!(scan.segments.len(), 1);
    }

    #[test]
    fn finds_exif_after_other_segments() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend(segment(0xE0, b"JFIF\0\x01\x02"));
        let app1_at = file.len();
        file.extend(segment(0xE1, &exif_payload(b"MM\0*")));
        file.extend([0xFF, 0xD9]);

        let scan = scan(&file).unwrap();
        assert_eq!(scan.exif_payload, Some(app1_at + 10));
        assert_eq!(
            scan.segments.iter().map(|s| s.marker_code).collect::<Vec<_>>(),
            vec![0xD8, 0xE0, 0xE1, 0xD9]
        );
        assert_eq!(
            scan.segments[2],
            RawSegment {
                marker_code: 0xE1,
                offset: app1_at,
                size: 12
            }
        );
    }

    #[test]
    fn app1_without_exif_signature_is_ignored() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend(segment(0xE1, b"http://ns.adobe.com/xap/1.0/\0<x/>"));
        file.extend([0xFF, 0xD9]);

        assert_eq!(scan(&file).unwrap().exif_payload, None);
    }

    #[test]
    fn first_exif_segment_wins() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend(segment(0xE1, &exif_payload(b"II*\0")));
        file.extend(segment(0xE1, &exif_payload(b"MM\0*")));

        assert_eq!(scan(&file).unwrap().exif_payload, Some(12));
    }

    #[test]
    fn fill_bytes_and_junk_are_skipped() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend([0x12, 0x34]); // junk
        file.extend([0xFF, 0xFF, 0xFF]); // fill
        let app1_at = file.len() - 1;
        file.extend(segment(0xE1, &exif_payload(b"II*\0")).into_iter().skip(1));

        let scan = scan(&file).unwrap();
        assert_eq!(scan.segments[1].offset, app1_at);
        assert_eq!(scan.exif_payload, Some(app1_at + 10));
    }

    #[test]
    fn short_lengths_are_skipped() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend([0xFF, 0xE0, 0x00, 0x01]); // length can't be 1
        let app1_at = file.len();
        file.extend(segment(0xE1, &exif_payload(b"II*\0")));

        let scan = scan(&file).unwrap();
        assert_eq!(scan.exif_payload, Some(app1_at + 10));
    }

    #[test]
    fn truncated_segment_ends_the_scan() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend(segment(0xE0, b"JFIF\0"));
        file.extend([0xFF, 0xE1, 0x40, 0x00, b'E', b'x']); // says 16 KiB

        let scan = scan(&file).unwrap();
        assert_eq!(scan.exif_payload, None);
        assert_eq!(scan.segments.len(), 2, "SOI and APP0 survive");
    }

    #[test]
    fn eoi_stops_the_scan() {
        logger();

        let mut file = vec![0xFF, 0xD8, 0xFF, 0xD9];
        file.extend(segment(0xE1, &exif_payload(b"II*\0")));

        assert_eq!(scan(&file).unwrap().exif_payload, None);
    }

    #[test]
    fn entropy_coded_data_is_skipped() {
        logger();

        let mut file = vec![0xFF, 0xD8];
        file.extend(segment(0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]));

        // scan data with a stuffed byte and a restart marker
        file.extend([0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD3, 0x56, 0xFF, 0xE1]);
        file.truncate(file.len() - 2);

        let app1_at = file.len();
        file.extend(segment(0xE1, &exif_payload(b"II*\0")));
        file.extend([0xFF, 0xD9]);

        let scan = scan(&file).unwrap();
        assert_eq!(scan.exif_payload, Some(app1_at + 10));
        assert_eq!(
            scan.segments.iter().map(|s| s.marker_code).collect::<Vec<_>>(),
            vec![0xD8, 0xDA, 0xE1, 0xD9],
            "restart markers inside the scan aren't segments"
        );
    }
}
