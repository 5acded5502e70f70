//! Binary format definitions for escape-time volume files.

use std::io::{self, Read, Write};

/// On-disk byte order of a volume file.
///
/// Applied uniformly to every header field and payload value. The format
/// carries no endianness tag, so writer and reader must agree out of band;
/// reading with the wrong order garbles the dimensions rather than failing
/// outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first.
    LittleEndian,
    /// Most significant byte first (network order).
    BigEndian,
}

impl ByteOrder {
    #[inline]
    pub fn u32_to_bytes(self, v: u32) -> [u8; 4] {
        match self {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        }
    }

    #[inline]
    pub fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn u64_to_bytes(self, v: u64) -> [u8; 8] {
        match self {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        }
    }

    #[inline]
    pub fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn f64_to_bytes(self, v: f64) -> [u8; 8] {
        match self {
            ByteOrder::LittleEndian => v.to_le_bytes(),
            ByteOrder::BigEndian => v.to_be_bytes(),
        }
    }

    #[inline]
    pub fn f64_from_bytes(self, bytes: [u8; 8]) -> f64 {
        match self {
            ByteOrder::LittleEndian => f64::from_le_bytes(bytes),
            ByteOrder::BigEndian => f64::from_be_bytes(bytes),
        }
    }
}

/// File header for escape-time volume files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeHeader {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Total number of frames.
    pub frames: u64,
}

impl VolumeHeader {
    /// Size of header in bytes.
    /// Width(4) + Height(4) + FrameCount(8) = 16
    pub const SIZE: usize = 16;

    /// Payload length in values, or `None` when it overflows `u64`.
    pub fn volume_len(&self) -> Option<u64> {
        (u64::from(self.width) * u64::from(self.height)).checked_mul(self.frames)
    }

    /// Write header to output in the given byte order.
    pub fn write_to<W: Write>(&self, w: &mut W, order: ByteOrder) -> io::Result<()> {
        w.write_all(&order.u32_to_bytes(self.width))?;
        w.write_all(&order.u32_to_bytes(self.height))?;
        w.write_all(&order.u64_to_bytes(self.frames))?;
        Ok(())
    }

    /// Read header from input in the given byte order.
    pub fn read_from<R: Read>(r: &mut R, order: ByteOrder) -> io::Result<Self> {
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf4)?;
        let width = order.u32_from_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let height = order.u32_from_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let frames = order.u64_from_bytes(buf8);

        Ok(Self {
            width,
            height,
            frames,
        })
    }
}

/// Encode f64 values to bytes in the given byte order.
///
/// Clears `out` first, so one scratch buffer can be reused across frames.
pub fn encode_values_into(values: &[f64], order: ByteOrder, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(values.len() * 8);
    for &v in values {
        out.extend_from_slice(&order.f64_to_bytes(v));
    }
}

/// Decode bytes to f64 values in the given byte order.
pub fn decode_values(bytes: &[u8], order: ByteOrder, output: &mut [f64]) -> io::Result<()> {
    if bytes.len() != output.len() * 8 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Payload size mismatch: {} bytes vs {} values",
                bytes.len(),
                output.len()
            ),
        ));
    }
    let mut buf8 = [0u8; 8];
    for (i, v) in output.iter_mut().enumerate() {
        buf8.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
        *v = order.f64_from_bytes(buf8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_header_roundtrip() {
        let header = VolumeHeader {
            width: 1200,
            height: 900,
            frames: 150,
        };

        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let mut buf = Vec::new();
            header.write_to(&mut buf, order).unwrap();
            assert_eq!(buf.len(), VolumeHeader::SIZE);

            let mut cursor = Cursor::new(&buf);
            let decoded = VolumeHeader::read_from(&mut cursor, order).unwrap();
            assert_eq!(decoded, header);
        }
    }

    #[test]
    fn test_header_layout_big_endian() {
        let header = VolumeHeader {
            width: 1,
            height: 2,
            frames: 3,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf, ByteOrder::BigEndian).unwrap();
        assert_eq!(buf, [0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_header_layout_little_endian() {
        let header = VolumeHeader {
            width: 1,
            height: 2,
            frames: 3,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf, ByteOrder::LittleEndian).unwrap();
        assert_eq!(buf, [1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_values_encode_decode() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.37 - 1.0).collect();

        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let mut encoded = Vec::new();
            encode_values_into(&values, order, &mut encoded);
            assert_eq!(encoded.len(), values.len() * 8);

            let mut decoded = vec![0.0f64; 100];
            decode_values(&encoded, order, &mut decoded).unwrap();
            for (a, b) in values.iter().zip(decoded.iter()) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }

    #[test]
    fn test_decode_rejects_size_mismatch() {
        let bytes = [0u8; 20];
        let mut output = vec![0.0f64; 3];
        assert!(decode_values(&bytes, ByteOrder::LittleEndian, &mut output).is_err());
    }

    #[test]
    fn test_scratch_buffer_is_reusable() {
        let mut scratch = Vec::new();
        encode_values_into(&[1.0, 2.0, 3.0], ByteOrder::LittleEndian, &mut scratch);
        assert_eq!(scratch.len(), 24);
        encode_values_into(&[4.0], ByteOrder::LittleEndian, &mut scratch);
        assert_eq!(scratch.len(), 8);
        assert_eq!(scratch, 4.0f64.to_le_bytes());
    }

    proptest! {
        #[test]
        fn prop_values_roundtrip_bit_exact(
            values in prop::collection::vec(any::<f64>(), 0..64),
            big in any::<bool>(),
        ) {
            let order = if big {
                ByteOrder::BigEndian
            } else {
                ByteOrder::LittleEndian
            };
            let mut encoded = Vec::new();
            encode_values_into(&values, order, &mut encoded);
            let mut decoded = vec![0.0f64; values.len()];
            decode_values(&encoded, order, &mut decoded).unwrap();
            for (a, b) in values.iter().zip(decoded.iter()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }

        #[test]
        fn prop_header_roundtrips(
            width in any::<u32>(),
            height in any::<u32>(),
            frames in any::<u64>(),
            big in any::<bool>(),
        ) {
            let order = if big {
                ByteOrder::BigEndian
            } else {
                ByteOrder::LittleEndian
            };
            let header = VolumeHeader { width, height, frames };
            let mut buf = Vec::new();
            header.write_to(&mut buf, order).unwrap();
            let decoded = VolumeHeader::read_from(&mut Cursor::new(&buf), order).unwrap();
            prop_assert_eq!(decoded, header);
        }
    }
}
