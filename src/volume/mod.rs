//! Escape-time volume storage.
//!
//! This module reads and writes rendered zoom sequences as flat binary
//! files, so heavy renders can be computed once and post-processed later.
//!
//! # File Format
//!
//! A volume file is a 16-byte header followed by the raw payload:
//!
//! ```text
//! Header (16 bytes):
//!   Width: u32
//!   Height: u32
//!   Frame count: u64
//!
//! Payload (width * height * frame_count * 8 bytes):
//!   Smoothed escape counts as f64, flattened as
//!   frame * (width * height) + y * width + x
//! ```
//!
//! Every field and value uses one caller-selected byte order; the file
//! itself carries no magic, version, or endianness tag. A file written in
//! one order must be read back with the same order.

mod format;
mod reader;
mod writer;

pub use format::{ByteOrder, VolumeHeader, decode_values, encode_values_into};
pub use reader::{read_header, read_volume, read_volume_into};
pub use writer::write_volume;

use std::io;
use std::path::PathBuf;

/// Volume I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    /// The file could not be created or opened.
    #[error("Could not open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The header describes a payload no buffer can hold.
    #[error("Header describes an unaddressable {width}x{height}x{frames} volume")]
    Oversized {
        width: u32,
        height: u32,
        frames: u64,
    },
    /// A volume's value count disagrees with its dimensions.
    #[error("Volume holds {actual} values but its dimensions describe {expected}")]
    LengthMismatch { expected: u64, actual: usize },
    /// The payload could not be written in full.
    #[error("Wrote {written} of {expected} values")]
    ShortWrite {
        expected: u64,
        written: u64,
        #[source]
        source: io::Error,
    },
    /// The file ended before the payload the header describes.
    #[error("File ended after {read} of {expected} values")]
    ShortRead { expected: u64, read: u64 },
    /// The payload buffer could not be reserved.
    #[error("Could not reserve memory for {values} values")]
    Allocation { values: u64 },
    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
