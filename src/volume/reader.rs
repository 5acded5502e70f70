//! Reading escape-time volumes from disk.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::debug;

use super::VolumeError;
use super::format::{ByteOrder, VolumeHeader, decode_values};
use crate::compute::EscapeVolume;

fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, VolumeError> {
    let file = File::open(path.as_ref()).map_err(|source| VolumeError::Open {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Read just the header of a volume file.
pub fn read_header<P: AsRef<Path>>(path: P, order: ByteOrder) -> Result<VolumeHeader, VolumeError> {
    let mut reader = open(path)?;
    Ok(VolumeHeader::read_from(&mut reader, order)?)
}

/// Read a volume file into `dst`, resizing it to the payload length.
///
/// Returns the decoded header. `dst`'s capacity is reused when it
/// suffices; growth is fallible, so a header demanding more memory than
/// the machine has reports [`VolumeError::Allocation`] instead of
/// aborting. A file shorter than its header promises reports
/// [`VolumeError::ShortRead`] with the value counts.
pub fn read_volume_into<P: AsRef<Path>>(
    path: P,
    order: ByteOrder,
    dst: &mut Vec<f64>,
) -> Result<VolumeHeader, VolumeError> {
    let mut reader = open(path.as_ref())?;
    let header = VolumeHeader::read_from(&mut reader, order)?;

    let expected = header.volume_len().ok_or(VolumeError::Oversized {
        width: header.width,
        height: header.height,
        frames: header.frames,
    })?;
    let len = usize::try_from(expected).map_err(|_| VolumeError::Oversized {
        width: header.width,
        height: header.height,
        frames: header.frames,
    })?;

    dst.clear();
    dst.try_reserve_exact(len)
        .map_err(|_| VolumeError::Allocation { values: expected })?;
    dst.resize(len, 0.0);

    // Decode frame by frame through one scratch buffer.
    let frame_len = header.width as usize * header.height as usize;
    let mut read = 0u64;
    if len > 0 {
        let mut scratch = vec![0u8; frame_len * 8];
        for frame in 0..header.frames {
            if let Err(source) = reader.read_exact(&mut scratch) {
                return Err(match source.kind() {
                    io::ErrorKind::UnexpectedEof => VolumeError::ShortRead { expected, read },
                    _ => VolumeError::Io(source),
                });
            }
            let start = frame as usize * frame_len;
            decode_values(&scratch, order, &mut dst[start..start + frame_len])?;
            read += frame_len as u64;
        }
    }

    debug!(
        "read {read} values from {} ({order:?})",
        path.as_ref().display()
    );
    Ok(header)
}

/// Read a whole volume file.
pub fn read_volume<P: AsRef<Path>>(path: P, order: ByteOrder) -> Result<EscapeVolume, VolumeError> {
    let mut values = Vec::new();
    let header = read_volume_into(path, order, &mut values)?;
    Ok(EscapeVolume {
        values,
        width: header.width,
        height: header.height,
        frames: header.frames,
    })
}
