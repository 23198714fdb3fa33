//! LSF header and record structures.
//!
//! Both structures are read straight out of the file with zerocopy. Every
//! multi-byte field is little-endian and every field has alignment 1, so the
//! structs carry no padding.

use zerocopy::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Size of the fixed LSF header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Size of one layer record in bytes.
pub const RECORD_SIZE: usize = 164;

/// Size of the NUL-padded name field at the start of a record.
pub const NAME_SIZE: usize = 20;

/// Offset of the placement and role fields within a record.
pub const RECORD_TAIL_OFFSET: usize = 128;

/// LSF file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct LsfHeader {
    /// Unknown leading bytes.
    pub reserved0: [u8; 10],
    /// Number of layer records following the header.
    pub entry_count: u8,
    /// Unknown.
    pub reserved1: u8,
    /// Canvas width in pixels.
    pub width: U16,
    /// Unknown.
    pub reserved2: [u8; 2],
    /// Canvas height in pixels.
    pub height: U16,
    /// Unknown.
    pub reserved3: [u8; 7],
    /// File kind (informational only).
    pub file_kind: u8,
    /// Unknown trailing bytes.
    pub reserved4: [u8; 2],
}

impl LsfHeader {
    /// Total byte length of a file declaring this many records.
    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.entry_count as usize * RECORD_SIZE
    }
}

/// One raw 164-byte layer record.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct LsfRecord {
    /// Layer name, NUL-padded.
    pub name: [u8; NAME_SIZE],
    /// Unknown.
    pub reserved0: [u8; 108],
    /// Horizontal placement on the canvas.
    pub x: U16,
    /// Unknown.
    pub reserved1: [u8; 2],
    /// Vertical placement on the canvas.
    pub y: U16,
    /// Unknown.
    pub reserved2: [u8; 18],
    /// Role code.
    pub kind: u8,
    /// Group or slot member id.
    pub group_id: u8,
    /// Non-zero for inactive records.
    pub mode: u8,
    /// Unknown trailing bytes.
    pub reserved3: [u8; 9],
}

/// A single byte position where two headers disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDifference {
    /// Byte offset within the header.
    pub offset: usize,
    /// Value in the left header.
    pub left: u8,
    /// Value in the right header.
    pub right: u8,
}

/// Compare two raw headers byte by byte.
///
/// Used when reverse-engineering the unknown header fields across files.
pub fn header_diff(left: &[u8; HEADER_SIZE], right: &[u8; HEADER_SIZE]) -> Vec<HeaderDifference> {
    left.iter()
        .zip(right.iter())
        .enumerate()
        .filter(|(_, (l, r))| l != r)
        .map(|(offset, (&left, &right))| HeaderDifference {
            offset,
            left,
            right,
        })
        .collect()
}
