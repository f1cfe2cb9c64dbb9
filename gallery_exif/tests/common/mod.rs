//! Builds small JPEG files with hand-laid-out Exif for the integration tests.

#![allow(dead_code)]

pub fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// Byte order for the TIFF block.
#[derive(Clone, Copy, Debug)]
pub enum Order {
    /// `II`
    Little,
    /// `MM`
    Big,
}

impl Order {
    fn u16(self, v: u16) -> [u8; 2] {
        match self {
            Order::Little => v.to_le_bytes(),
            Order::Big => v.to_be_bytes(),
        }
    }

    fn u32(self, v: u32) -> [u8; 4] {
        match self {
            Order::Little => v.to_le_bytes(),
            Order::Big => v.to_be_bytes(),
        }
    }

    fn i32(self, v: i32) -> [u8; 4] {
        match self {
            Order::Little => v.to_le_bytes(),
            Order::Big => v.to_be_bytes(),
        }
    }
}

/// An entry's value, before it's laid out.
#[derive(Clone, Debug)]
pub enum Value {
    /// NUL-terminated text.
    Ascii(&'static str),
    Bytes(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    SRationals(Vec<(i32, i32)>),
    /// Anything else: a raw type code and count, with its bytes as written.
    Raw { ty: u16, count: u32, bytes: Vec<u8> },
}

impl Value {
    fn encode(&self, order: Order) -> (u16, u32, Vec<u8>) {
        match self {
            Value::Ascii(s) => {
                let mut b = s.as_bytes().to_vec();
                b.push(0);
                (2, b.len() as u32, b)
            }
            Value::Bytes(v) => (1, v.len() as u32, v.clone()),
            Value::Shorts(v) => (
                3,
                v.len() as u32,
                v.iter().flat_map(|s| order.u16(*s)).collect(),
            ),
            Value::Longs(v) => (
                4,
                v.len() as u32,
                v.iter().flat_map(|l| order.u32(*l)).collect(),
            ),
            Value::Rationals(v) => (
                5,
                v.len() as u32,
                v.iter()
                    .flat_map(|(n, d)| [order.u32(*n), order.u32(*d)].concat())
                    .collect(),
            ),
            Value::SRationals(v) => (
                10,
                v.len() as u32,
                v.iter()
                    .flat_map(|(n, d)| [order.i32(*n), order.i32(*d)].concat())
                    .collect(),
            ),
            Value::Raw { ty, count, bytes } => (*ty, *count, bytes.clone()),
        }
    }
}

/// Lays out a TIFF block: header, IFD 0, then the Exif and GPS IFDs (when
/// they have entries), then every out-of-line value.
#[derive(Clone, Debug, Default)]
pub struct TiffBuilder {
    ifd0: Vec<(u16, Value)>,
    exif: Vec<(u16, Value)>,
    gps: Vec<(u16, Value)>,
}

const EXIF_IFD_POINTER: u16 = 0x8769;
const GPS_IFD_POINTER: u16 = 0x8825;

fn ifd_len(entries: usize) -> usize {
    2 + 12 * entries + 4
}

impl TiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ifd0(mut self, tag: u16, value: Value) -> Self {
        self.ifd0.push((tag, value));
        self
    }

    pub fn exif(mut self, tag: u16, value: Value) -> Self {
        self.exif.push((tag, value));
        self
    }

    pub fn gps(mut self, tag: u16, value: Value) -> Self {
        self.gps.push((tag, value));
        self
    }

    pub fn build(&self, order: Order) -> Vec<u8> {
        let has_exif = !self.exif.is_empty();
        let has_gps = !self.gps.is_empty();

        let ifd0_at = 8;
        let ifd0_entries = self.ifd0.len() + usize::from(has_exif) + usize::from(has_gps);
        let exif_at = ifd0_at + ifd_len(ifd0_entries);
        let gps_at = exif_at + if has_exif { ifd_len(self.exif.len()) } else { 0 };
        let data_at = gps_at + if has_gps { ifd_len(self.gps.len()) } else { 0 };

        let mut ifd0 = self.ifd0.clone();
        if has_exif {
            ifd0.push((EXIF_IFD_POINTER, Value::Longs(vec![exif_at as u32])));
        }
        if has_gps {
            ifd0.push((GPS_IFD_POINTER, Value::Longs(vec![gps_at as u32])));
        }

        let mut out = Vec::new();
        out.extend_from_slice(match order {
            Order::Little => b"II",
            Order::Big => b"MM",
        });
        out.extend_from_slice(&order.u16(42));
        out.extend_from_slice(&order.u32(ifd0_at as u32));

        let mut data = Vec::new();
        for (i, entries) in [&ifd0, &self.exif, &self.gps].into_iter().enumerate() {
            // IFD 0 is always written, even when empty
            if i > 0 && entries.is_empty() {
                continue;
            }

            out.extend_from_slice(&order.u16(entries.len() as u16));
            for (tag, value) in entries.iter() {
                let (ty, count, bytes) = value.encode(order);
                out.extend_from_slice(&order.u16(*tag));
                out.extend_from_slice(&order.u16(ty));
                out.extend_from_slice(&order.u32(count));

                if bytes.len() <= 4 {
                    let mut inline = [0_u8; 4];
                    inline[..bytes.len()].copy_from_slice(&bytes);
                    out.extend_from_slice(&inline);
                } else {
                    let offset = (data_at + data.len()) as u32;
                    out.extend_from_slice(&order.u32(offset));
                    data.extend_from_slice(&bytes);
                }
            }
            out.extend_from_slice(&order.u32(0)); // no next IFD
        }

        assert_eq!(out.len(), data_at, "IFDs should end where data begins");
        out.extend_from_slice(&data);
        out
    }
}

/// Wraps a TIFF block in a minimal JPEG: `SOI`, `APP0`, `APP1` with Exif, a
/// tiny scan, then `EOI`.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(tiff);

    let mut out = vec![0xFF, 0xD8];
    out.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    out.extend(segment(0xE1, &app1));
    out.extend(scan());
    out.extend([0xFF, 0xD9]);
    out
}

/// A minimal JPEG with no Exif at all.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    out.extend(scan());
    out.extend([0xFF, 0xD9]);
    out
}

pub fn segment(marker_code: u8, payload: &[u8]) -> Vec<u8> {
    let mut v = vec![0xFF, marker_code];
    v.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    v.extend_from_slice(payload);
    v
}

/// `SOS` plus a few bytes of entropy-coded data, including a stuffed byte
/// and a restart marker.
fn scan() -> Vec<u8> {
    let mut v = segment(0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    v.extend([0xA1, 0xFF, 0x00, 0x5C, 0xFF, 0xD0, 0x13]);
    v
}
