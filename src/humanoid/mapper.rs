use crate::humanoid::bone_map::BoneMap;
use crate::humanoid::bones::BoneSlot;
use crate::scene::{BoneHandle, Rig};

/// Lowercases a node name and strips the separators rigs commonly use
/// (space, `_`, `-`, `.`, `:`).
///
/// `"mixamorig:Left_Arm"` becomes `"mixamorigleftarm"`.
#[must_use]
pub fn normalize_bone_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.' | ':'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Identifies humanoid bones in an arbitrarily named rig.
///
/// Nodes are visited in hierarchical pre-order. Each node is tested against the
/// patterns of every still-empty slot in [`BoneSlot`] order, and the first slot
/// with a pattern that equals or is contained in the normalized name claims it.
/// Ambiguous names therefore resolve to the earliest slot. A mapped node is never
/// re-tested and a filled slot is never re-filled.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoneMapper;

impl BoneMapper {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the bone map for the subtree rooted at `root`.
    ///
    /// An unknown root yields an empty map.
    #[must_use]
    pub fn map(&self, rig: &Rig, root: BoneHandle) -> BoneMap {
        let mut map = BoneMap::new();

        for handle in rig.traverse(root) {
            let Some(name) = rig.name(handle) else {
                continue;
            };
            let normalized = normalize_bone_name(name);

            if let Some(slot) = Self::match_slot(&normalized, &map) {
                log::debug!("Mapped '{name}' to {slot:?}");
                map.insert(slot, handle);
            }
        }

        map
    }

    fn match_slot(normalized: &str, map: &BoneMap) -> Option<BoneSlot> {
        BoneSlot::all().filter(|slot| !map.contains(*slot)).find(|slot| {
            slot.name_patterns()
                .iter()
                .any(|pattern| normalized == *pattern || normalized.contains(pattern))
        })
    }
}
