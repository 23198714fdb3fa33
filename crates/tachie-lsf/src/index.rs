//! LSF asset index decoding and classification.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tachie_common::BinaryReader;
use zerocopy::IntoBytes;

use crate::entry::{Entry, Role};
use crate::header::{LsfHeader, LsfRecord, HEADER_SIZE, RECORD_SIZE, RECORD_TAIL_OFFSET};
use crate::{Error, Result};

/// A decoded `.lsf` portrait index.
///
/// The index is built once from a byte buffer and never mutated. All
/// groupings are keyed by ordered maps, so key enumeration is ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssetIndex {
    name: String,
    raw_header: [u8; HEADER_SIZE],
    canvas_width: u16,
    canvas_height: u16,
    file_kind: u8,
    entries: Vec<Entry>,
    #[cfg_attr(feature = "serde", serde(skip))]
    raw_records: Vec<[u8; RECORD_SIZE]>,
    base_images: BTreeMap<u8, Vec<Entry>>,
    face_differences: BTreeMap<u8, BTreeMap<u8, Entry>>,
    face_effects: BTreeMap<u8, BTreeMap<u8, Entry>>,
    holy_light: BTreeMap<u8, Entry>,
    naked_image: Option<Entry>,
}

impl AssetIndex {
    /// Check whether a buffer is large enough to hold an LSF header.
    pub fn has_header(data: &[u8]) -> bool {
        data.len() >= HEADER_SIZE
    }

    /// Read just the header of an LSF buffer.
    pub fn read_header(data: &[u8]) -> Result<LsfHeader> {
        if !Self::has_header(data) {
            return Err(Error::HeaderTooShort {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        Ok(BinaryReader::new(data).read_struct()?)
    }

    /// Parse an index from bytes, without a display name.
    ///
    /// Without a name the naked-image rule never applies.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_named(String::new(), data)
    }

    /// Parse an index from bytes, attaching a display name.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name, normally the file stem of the source path
    /// * `data` - The raw bytes of the `.lsf` file
    pub fn parse_named(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let name = name.into();
        let header = Self::read_header(data)?;

        let count = header.entry_count as usize;
        let needed = header.file_size();
        if data.len() < needed {
            return Err(Error::Truncated {
                entries: count,
                needed,
                available: data.len(),
            });
        }

        let mut reader = BinaryReader::new_at(data, HEADER_SIZE);
        let mut entries = Vec::with_capacity(count);
        let mut raw_records = Vec::with_capacity(count);
        for index in 0..count {
            let record: LsfRecord = reader.read_struct()?;
            entries.push(Entry::from_record(index, &record)?);

            let mut raw = [0u8; RECORD_SIZE];
            raw.copy_from_slice(record.as_bytes());
            raw_records.push(raw);
        }

        let mut raw_header = [0u8; HEADER_SIZE];
        raw_header.copy_from_slice(&data[..HEADER_SIZE]);

        let mut index = Self {
            name,
            raw_header,
            canvas_width: header.width.get(),
            canvas_height: header.height.get(),
            file_kind: header.file_kind,
            entries,
            raw_records,
            base_images: BTreeMap::new(),
            face_differences: BTreeMap::new(),
            face_effects: BTreeMap::new(),
            holy_light: BTreeMap::new(),
            naked_image: None,
        };
        index.classify();

        Ok(index)
    }

    /// Read and parse an `.lsf` file from disk.
    ///
    /// The file stem becomes the display name.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if extension != "lsf" {
            return Err(Error::InvalidExtension {
                expected: "lsf".to_string(),
                actual: extension,
            });
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = fs::read(path)?;

        Self::parse_named(name, &data)
    }

    /// Sort active entries into their groups.
    ///
    /// Two format quirks apply here. When the first record belongs to group
    /// 0, it is prepended to every base group as it is created. When the
    /// display name starts with `'0'`, a kind-0 first record is the naked
    /// silhouette that every composite includes.
    fn classify(&mut self) {
        let shared = self.entries.first().filter(|e| e.group_id == 0).cloned();
        let has_naked_name = self.name.starts_with('0');

        for entry in &self.entries {
            if has_naked_name && entry.index == 0 && entry.kind == 0 {
                self.naked_image = Some(entry.clone());
            }

            if !entry.is_active() {
                continue;
            }

            match entry.role() {
                Role::BaseImage => {
                    let group = self.base_images.entry(entry.group_id).or_insert_with(|| {
                        shared
                            .iter()
                            .filter(|s| s.index != entry.index)
                            .cloned()
                            .collect()
                    });
                    group.push(entry.clone());
                }
                Role::FaceDifference { slot } => {
                    self.face_differences
                        .entry(slot)
                        .or_default()
                        .entry(entry.group_id)
                        .or_insert_with(|| entry.clone());
                }
                Role::FaceEffect { slot } => {
                    self.face_effects
                        .entry(slot)
                        .or_default()
                        .insert(entry.group_id, entry.clone());
                }
                Role::HolyLight => {
                    self.holy_light.insert(entry.group_id, entry.clone());
                }
                Role::Unclassified => {}
            }
        }
    }

    /// Display name of the index.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 28 raw header bytes.
    #[inline]
    pub fn raw_header(&self) -> &[u8; HEADER_SIZE] {
        &self.raw_header
    }

    /// Canvas width in pixels.
    #[inline]
    pub fn canvas_width(&self) -> u16 {
        self.canvas_width
    }

    /// Canvas height in pixels.
    #[inline]
    pub fn canvas_height(&self) -> u16 {
        self.canvas_height
    }

    /// Canvas size as `(width, height)`.
    #[inline]
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width as u32, self.canvas_height as u32)
    }

    /// File kind byte from the header.
    #[inline]
    pub fn file_kind(&self) -> u8 {
        self.file_kind
    }

    /// All decoded entries in record order, including inactive ones.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Raw bytes of a record from its placement field to the end.
    ///
    /// Most of this range is undocumented, so it is kept verbatim for
    /// format analysis.
    pub fn record_tail(&self, index: usize) -> Option<&[u8]> {
        self.raw_records
            .get(index)
            .map(|raw| &raw[RECORD_TAIL_OFFSET..])
    }

    /// Base image groups.
    #[inline]
    pub fn base_images(&self) -> &BTreeMap<u8, Vec<Entry>> {
        &self.base_images
    }

    /// Face-difference slots.
    #[inline]
    pub fn face_differences(&self) -> &BTreeMap<u8, BTreeMap<u8, Entry>> {
        &self.face_differences
    }

    /// Face-effect slots.
    #[inline]
    pub fn face_effects(&self) -> &BTreeMap<u8, BTreeMap<u8, Entry>> {
        &self.face_effects
    }

    /// Holy-light overlays.
    #[inline]
    pub fn holy_light(&self) -> &BTreeMap<u8, Entry> {
        &self.holy_light
    }

    /// The naked silhouette entry, if the file has one.
    #[inline]
    pub fn naked_image(&self) -> Option<&Entry> {
        self.naked_image.as_ref()
    }

    /// Base group ids, ascending.
    pub fn base_image_keys(&self) -> Vec<u8> {
        self.base_images.keys().copied().collect()
    }

    /// Member ids of each face-difference slot.
    pub fn face_difference_keys(&self) -> BTreeMap<u8, Vec<u8>> {
        slot_keys(&self.face_differences)
    }

    /// Member ids of each face-effect slot.
    pub fn face_effect_keys(&self) -> BTreeMap<u8, Vec<u8>> {
        slot_keys(&self.face_effects)
    }

    /// Holy-light ids, ascending.
    pub fn holy_light_keys(&self) -> Vec<u8> {
        self.holy_light.keys().copied().collect()
    }
}

fn slot_keys(slots: &BTreeMap<u8, BTreeMap<u8, Entry>>) -> BTreeMap<u8, Vec<u8>> {
    slots
        .iter()
        .map(|(&slot, members)| (slot, members.keys().copied().collect()))
        .collect()
}
