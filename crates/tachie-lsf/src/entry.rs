//! Decoded layer entries and their role classification.

use std::fmt;

use tachie_common::BinaryReader;

use crate::header::{LsfRecord, NAME_SIZE};
use crate::Result;

/// Kind code for holy-light overlays.
pub const HOLY_LIGHT_KIND: u8 = 255;

/// One compositable layer decoded from an LSF record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Position of the record in the file's record table.
    pub index: usize,
    /// Layer name; the pixel data lives in `{name}.png`.
    pub name: String,
    /// Horizontal placement on the canvas.
    pub x: u16,
    /// Vertical placement on the canvas.
    pub y: u16,
    /// Role code, see [`Role::classify`].
    pub kind: u8,
    /// Group (base images, holy light) or member id (face slots).
    pub group_id: u8,
    /// Non-zero marks an inactive record.
    pub mode: u8,
}

impl Entry {
    /// Decode an entry from a raw record.
    pub(crate) fn from_record(index: usize, record: &LsfRecord) -> Result<Self> {
        let name_bytes = record.name;
        let name = BinaryReader::new(&name_bytes).read_name_in_buffer(NAME_SIZE)?;

        Ok(Self {
            index,
            name,
            x: record.x.get(),
            y: record.y.get(),
            kind: record.kind,
            group_id: record.group_id,
            mode: record.mode,
        })
    }

    /// Whether the record takes part in classification.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.mode == 0
    }

    /// The role this entry's kind code maps to.
    #[inline]
    pub fn role(&self) -> Role {
        Role::classify(self.kind)
    }

    /// File name of the companion image.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ({}, {}) kind={} id={}",
            self.name, self.x, self.y, self.kind, self.group_id
        )
    }
}

/// Semantic role of a layer, decoded from its kind code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Part of a base pose group.
    BaseImage,
    /// Member of a face-difference slot.
    FaceDifference { slot: u8 },
    /// Member of a face-effect slot.
    FaceEffect { slot: u8 },
    /// Holy-light overlay.
    HolyLight,
    /// Kind code with no known role.
    Unclassified,
}

impl Role {
    /// Map a kind code to its role.
    ///
    /// Rules are tried in order, first match wins. `1` and `2` are slot-0
    /// aliases for face differences and face effects respectively.
    pub const fn classify(kind: u8) -> Self {
        if kind == 0 || kind == 3 {
            Role::BaseImage
        } else if kind % 10 == 0 || kind == 1 {
            Role::FaceDifference { slot: kind / 10 }
        } else if kind % 10 == 1 || kind == 2 {
            Role::FaceEffect {
                slot: (kind - 1) / 10,
            }
        } else if kind == HOLY_LIGHT_KIND {
            Role::HolyLight
        } else {
            Role::Unclassified
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::BaseImage => write!(f, "base"),
            Role::FaceDifference { slot } => write!(f, "face[{}]", slot),
            Role::FaceEffect { slot } => write!(f, "effect[{}]", slot),
            Role::HolyLight => write!(f, "holy-light"),
            Role::Unclassified => write!(f, "unclassified"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_base() {
        assert_eq!(Role::classify(0), Role::BaseImage);
        assert_eq!(Role::classify(3), Role::BaseImage);
    }

    #[test]
    fn test_classify_face_differences() {
        assert_eq!(Role::classify(1), Role::FaceDifference { slot: 0 });
        assert_eq!(Role::classify(10), Role::FaceDifference { slot: 1 });
        assert_eq!(Role::classify(30), Role::FaceDifference { slot: 3 });
    }

    #[test]
    fn test_classify_face_effects() {
        assert_eq!(Role::classify(2), Role::FaceEffect { slot: 0 });
        assert_eq!(Role::classify(11), Role::FaceEffect { slot: 1 });
        assert_eq!(Role::classify(21), Role::FaceEffect { slot: 2 });
    }

    #[test]
    fn test_classify_holy_light_and_unknown() {
        assert_eq!(Role::classify(255), Role::HolyLight);
        assert_eq!(Role::classify(4), Role::Unclassified);
        assert_eq!(Role::classify(15), Role::Unclassified);
        assert_eq!(Role::classify(254), Role::Unclassified);
    }

    #[test]
    fn test_from_record() {
        use zerocopy::FromZeros;

        let mut record = LsfRecord::new_zeroed();
        record.name[..5].copy_from_slice(b"ST_01");
        record.x.set(12);
        record.y.set(340);
        record.kind = 10;
        record.group_id = 2;

        let entry = Entry::from_record(4, &record).unwrap();
        assert_eq!(entry.index, 4);
        assert_eq!(entry.name, "ST_01");
        assert_eq!((entry.x, entry.y), (12, 340));
        assert_eq!(entry.role(), Role::FaceDifference { slot: 1 });
        assert!(entry.is_active());
        assert_eq!(entry.file_name(), "ST_01.png");
    }
}
