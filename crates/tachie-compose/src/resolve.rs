//! Variant selection and layer resolution.
//!
//! A [`Selection`] is what the caller asks for: a base pose, a member per
//! face slot, and an optional holy-light overlay. It may be partial or point
//! at ids the index does not have. [`resolve`] clamps it against an
//! [`AssetIndex`] and returns the concrete layers in paint order.

use std::collections::BTreeMap;

use tachie_lsf::{AssetIndex, Entry};

use crate::{Error, Result};

/// Face-difference member used when a slot has no valid selection.
pub const DEFAULT_FACE_DIFFERENCE: u8 = 1;

/// Selection value meaning "no overlay" for face effects and holy light.
pub const NONE: u8 = 0;

/// The variant keys a caller wants composited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    /// Base image group.
    pub base_id: u8,
    /// Face-difference slot → member id.
    pub face_differences: BTreeMap<u8, u8>,
    /// Face-effect slot → member id, `0` for none.
    pub face_effects: BTreeMap<u8, u8>,
    /// Holy-light id, `0` for none.
    pub holy_light: u8,
}

impl Selection {
    /// A selection of just a base pose.
    pub fn new(base_id: u8) -> Self {
        Self {
            base_id,
            ..Self::default()
        }
    }

    /// Select a face-difference member for a slot.
    pub fn with_face(mut self, slot: u8, id: u8) -> Self {
        self.face_differences.insert(slot, id);
        self
    }

    /// Select a face-effect member for a slot.
    pub fn with_effect(mut self, slot: u8, id: u8) -> Self {
        self.face_effects.insert(slot, id);
        self
    }

    /// Select a holy-light overlay.
    pub fn with_holy_light(mut self, id: u8) -> Self {
        self.holy_light = id;
        self
    }

    /// Clamp this selection against an index.
    ///
    /// The result names exactly the index's slots:
    /// - an unknown base id becomes the smallest base id
    /// - a face-difference slot with no valid choice gets member `1`, or the
    ///   slot's smallest member when it has no `1`
    /// - a face-effect slot with no valid choice gets `0` (none)
    /// - an unknown holy-light id becomes `0` (none)
    ///
    /// Slots the index does not have are dropped.
    pub fn normalized(&self, index: &AssetIndex) -> Result<Self> {
        let base_images = index.base_images();
        let base_id = if base_images.contains_key(&self.base_id) {
            self.base_id
        } else {
            *base_images.keys().next().ok_or_else(|| Error::EmptyIndex {
                name: index.name().to_string(),
            })?
        };

        let face_differences = index
            .face_differences()
            .iter()
            .filter_map(|(&slot, members)| {
                let id = self
                    .face_differences
                    .get(&slot)
                    .copied()
                    .filter(|id| members.contains_key(id))
                    .or_else(|| {
                        Some(DEFAULT_FACE_DIFFERENCE).filter(|id| members.contains_key(id))
                    })
                    .or_else(|| members.keys().next().copied())?;
                Some((slot, id))
            })
            .collect();

        let face_effects = index
            .face_effects()
            .iter()
            .map(|(&slot, members)| {
                let id = self
                    .face_effects
                    .get(&slot)
                    .copied()
                    .filter(|id| members.contains_key(id))
                    .unwrap_or(NONE);
                (slot, id)
            })
            .collect();

        let holy_light = if index.holy_light().contains_key(&self.holy_light) {
            self.holy_light
        } else {
            NONE
        };

        Ok(Self {
            base_id,
            face_differences,
            face_effects,
            holy_light,
        })
    }
}

/// Resolve a selection into the ordered list of layers to paint.
///
/// Layers are gathered as base group, face effects, face differences, the
/// naked silhouette and holy light, then stably sorted by name. The name
/// order is the paint order: later names are drawn on top.
pub fn resolve(index: &AssetIndex, selection: &Selection) -> Result<Vec<Entry>> {
    let selection = selection.normalized(index)?;

    let mut layers: Vec<Entry> = index
        .base_images()
        .get(&selection.base_id)
        .cloned()
        .unwrap_or_default();

    for (slot, &id) in &selection.face_effects {
        if id == NONE {
            continue;
        }
        if let Some(entry) = index.face_effects().get(slot).and_then(|m| m.get(&id)) {
            layers.push(entry.clone());
        }
    }

    for (slot, id) in &selection.face_differences {
        if let Some(entry) = index.face_differences().get(slot).and_then(|m| m.get(id)) {
            layers.push(entry.clone());
        }
    }

    if let Some(naked) = index.naked_image() {
        layers.push(naked.clone());
    }

    if selection.holy_light != NONE {
        if let Some(entry) = index.holy_light().get(&selection.holy_light) {
            layers.push(entry.clone());
        }
    }

    sort_layers(&mut layers);
    Ok(layers)
}

/// The layers of one base group on their own, in stored order.
///
/// Unknown ids fall back to the smallest base id, as in [`resolve`].
pub fn base_layers(index: &AssetIndex, base_id: u8) -> Result<Vec<Entry>> {
    let selection = Selection::new(base_id).normalized(index)?;
    Ok(index
        .base_images()
        .get(&selection.base_id)
        .cloned()
        .unwrap_or_default())
}

/// Stable sort of layers into paint order.
pub fn sort_layers(layers: &mut [Entry]) {
    layers.sort_by(|a, b| a.name.cmp(&b.name));
}
