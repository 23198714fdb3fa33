//! Enumeration of face-difference variants for batch export.

use tachie_lsf::AssetIndex;

use crate::resolve::Selection;

/// One combination of base pose and face-difference member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Base image group.
    pub base_id: u8,
    /// Face-difference slot being varied.
    pub slot: u8,
    /// Member selected in that slot.
    pub face_id: u8,
    /// Selection that renders this variant. Other slots use their defaults.
    pub selection: Selection,
    /// Output file stem, `{base layer}_{base}_{slot}_{member}`.
    pub file_stem: String,
}

/// Every face-difference member of every slot, crossed with every base pose.
///
/// Order is slot, then member, then base id, all ascending.
pub fn face_difference_variants(index: &AssetIndex) -> Vec<Variant> {
    let mut variants = Vec::new();

    for (slot, ids) in index.face_difference_keys() {
        for face_id in ids {
            for (&base_id, group) in index.base_images() {
                let base_name = group
                    .first()
                    .map(|e| e.name.as_str())
                    .unwrap_or_else(|| index.name());

                variants.push(Variant {
                    base_id,
                    slot,
                    face_id,
                    selection: Selection::new(base_id).with_face(slot, face_id),
                    file_stem: format!("{}_{}_{}_{}", base_name, base_id, slot, face_id),
                });
            }
        }
    }

    variants
}
