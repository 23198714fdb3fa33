//! Builder for writing LSF files.
//!
//! Produces byte buffers in the same fixed layout the parser reads. Unknown
//! header and record bytes are written as zero.

use zerocopy::{FromZeros, IntoBytes};

use crate::header::{LsfHeader, LsfRecord, NAME_SIZE};

/// Maximum number of records a single file can declare.
pub const MAX_RECORDS: usize = u8::MAX as usize;

/// A record waiting to be serialized.
#[derive(Debug, Clone)]
struct BuilderRecord {
    name: String,
    x: u16,
    y: u16,
    kind: u8,
    group_id: u8,
    mode: u8,
}

/// Builder for `.lsf` buffers.
///
/// # Example
///
/// ```
/// use tachie_lsf::{builder::LsfBuilder, AssetIndex};
///
/// let bytes = LsfBuilder::new(200, 300)
///     .record("BASE", 10, 20, 0, 0, 0)
///     .build();
///
/// let index = AssetIndex::parse(&bytes).unwrap();
/// assert_eq!(index.base_image_keys(), vec![0]);
/// ```
#[derive(Debug, Clone)]
pub struct LsfBuilder {
    width: u16,
    height: u16,
    file_kind: u8,
    records: Vec<BuilderRecord>,
}

impl LsfBuilder {
    /// Start a file with the given canvas size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            file_kind: 0,
            records: Vec::new(),
        }
    }

    /// Set the header's file kind byte.
    pub fn file_kind(mut self, file_kind: u8) -> Self {
        self.file_kind = file_kind;
        self
    }

    /// Append a layer record.
    ///
    /// Names longer than 20 bytes are cut to fit the name field.
    pub fn record(
        mut self,
        name: impl Into<String>,
        x: u16,
        y: u16,
        kind: u8,
        group_id: u8,
        mode: u8,
    ) -> Self {
        self.records.push(BuilderRecord {
            name: name.into(),
            x,
            y,
            kind,
            group_id,
            mode,
        });
        self
    }

    /// Serialize the header and record table.
    ///
    /// Only the first [`MAX_RECORDS`] records are written, since the count
    /// field is a single byte.
    pub fn build(&self) -> Vec<u8> {
        let records = &self.records[..self.records.len().min(MAX_RECORDS)];

        let mut header = LsfHeader::new_zeroed();
        header.entry_count = records.len() as u8;
        header.width.set(self.width);
        header.height.set(self.height);
        header.file_kind = self.file_kind;

        let mut output = Vec::with_capacity(header.file_size());
        output.extend_from_slice(header.as_bytes());

        for record in records {
            let mut raw = LsfRecord::new_zeroed();
            let name = record.name.as_bytes();
            let len = name.len().min(NAME_SIZE);
            raw.name[..len].copy_from_slice(&name[..len]);
            raw.x.set(record.x);
            raw.y.set(record.y);
            raw.kind = record.kind;
            raw.group_id = record.group_id;
            raw.mode = record.mode;
            output.extend_from_slice(raw.as_bytes());
        }

        output
    }
}
