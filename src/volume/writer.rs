//! Writing escape-time volumes to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use super::VolumeError;
use super::format::{ByteOrder, VolumeHeader, encode_values_into};
use crate::compute::EscapeVolume;

/// Write a rendered volume to `path` in the given byte order.
///
/// The header goes first, then every frame's values, encoded through a
/// reused scratch buffer so the caller's data is left untouched. A payload
/// failure reports how many values reached the file before it.
pub fn write_volume<P: AsRef<Path>>(
    path: P,
    volume: &EscapeVolume,
    order: ByteOrder,
) -> Result<(), VolumeError> {
    let header = VolumeHeader {
        width: volume.width,
        height: volume.height,
        frames: volume.frames,
    };
    let expected = header.volume_len().ok_or(VolumeError::Oversized {
        width: volume.width,
        height: volume.height,
        frames: volume.frames,
    })?;
    if expected != volume.values.len() as u64 {
        return Err(VolumeError::LengthMismatch {
            expected,
            actual: volume.values.len(),
        });
    }

    let file = File::create(path.as_ref()).map_err(|source| VolumeError::Open {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    header.write_to(&mut writer, order)?;

    // Encode frame by frame through one scratch buffer.
    let mut scratch = Vec::new();
    let mut written = 0u64;
    for frame in 0..volume.frames {
        let values = volume.frame_values(frame);
        encode_values_into(values, order, &mut scratch);
        writer
            .write_all(&scratch)
            .map_err(|source| VolumeError::ShortWrite {
                expected,
                written,
                source,
            })?;
        written += values.len() as u64;
    }
    writer.flush()?;

    debug!(
        "wrote {written} values to {} ({order:?})",
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn test_volume(width: u32, height: u32, frames: u64) -> EscapeVolume {
        let len = width as usize * height as usize * frames as usize;
        EscapeVolume {
            values: (0..len).map(|i| i as f64 * 0.37 - 1.0).collect(),
            width,
            height,
            frames,
        }
    }

    #[test]
    fn test_write_produces_header_and_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("volume.dat");

        let volume = test_volume(4, 3, 2);
        write_volume(&path, &volume, ByteOrder::LittleEndian).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), VolumeHeader::SIZE + 4 * 3 * 2 * 8);

        let header =
            VolumeHeader::read_from(&mut Cursor::new(&bytes), ByteOrder::LittleEndian).unwrap();
        assert_eq!(header.width, 4);
        assert_eq!(header.height, 3);
        assert_eq!(header.frames, 2);
    }

    #[test]
    fn test_big_endian_file_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.dat");

        let volume = EscapeVolume {
            values: vec![1.0],
            width: 1,
            height: 1,
            frames: 1,
        };
        write_volume(&path, &volume, ByteOrder::BigEndian).unwrap();

        let bytes = fs::read(&path).unwrap();
        // Header: width 1, height 1, frame count 1; payload: 1.0f64.
        assert_eq!(
            bytes,
            [
                0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0x3F, 0xF0, 0, 0, 0, 0, 0, 0
            ]
        );
    }

    #[test]
    fn test_write_rejects_length_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.dat");

        let volume = EscapeVolume {
            values: vec![0.0; 5],
            width: 2,
            height: 2,
            frames: 2,
        };
        match write_volume(&path, &volume, ByteOrder::BigEndian) {
            Err(VolumeError::LengthMismatch { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 5);
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_write_reports_open_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("volume.dat");

        let volume = test_volume(2, 2, 1);
        match write_volume(&path, &volume, ByteOrder::BigEndian) {
            Err(VolumeError::Open { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Open, got {other:?}"),
        }
    }
}
