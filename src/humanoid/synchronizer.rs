use crate::humanoid::bone_map::BoneMap;
use crate::humanoid::bones::{BONE_SLOT_COUNT, BoneSlot};
use crate::scene::{BoneHandle, Rig};

/// Source and target bone maps of one retargeting binding.
///
/// Only `source` is read and only `target` is written during synchronization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetargetPair {
    pub source: BoneMap,
    pub target: BoneMap,
}

impl RetargetPair {
    #[must_use]
    pub fn new(source: BoneMap, target: BoneMap) -> Self {
        Self { source, target }
    }

    /// Clears every entry of both maps.
    pub fn clear(&mut self) {
        self.source.clear();
        self.target.clear();
    }

    /// Slots mapped on both sides.
    pub fn shared_slots(&self) -> impl Iterator<Item = BoneSlot> + '_ {
        BoneSlot::all().filter(|&slot| self.source.contains(slot) && self.target.contains(slot))
    }
}

/// Copies pose data from a source rig to a target rig every tick.
///
/// Hips is transferred in world space (position and rotation). Every other slot
/// mapped on both sides gets the source's local rotation. The slot arrays are
/// flattened at [`setup`](Self::setup), so the per-tick copy is plain indexing.
#[derive(Debug, Clone)]
pub struct PoseSynchronizer {
    source_hips: Option<BoneHandle>,
    target_hips: Option<BoneHandle>,
    source_bones: [Option<BoneHandle>; BONE_SLOT_COUNT],
    target_bones: [Option<BoneHandle>; BONE_SLOT_COUNT],
    enabled: bool,
}

impl Default for PoseSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSynchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source_hips: None,
            target_hips: None,
            source_bones: [None; BONE_SLOT_COUNT],
            target_bones: [None; BONE_SLOT_COUNT],
            enabled: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggles synchronization. Bindings are kept while disabled.
    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Binds the synchronizer to a pair of bone maps.
    pub fn setup(&mut self, pair: &RetargetPair) {
        self.reset();
        self.source_hips = pair.source.hips();
        self.target_hips = pair.target.hips();
        self.source_bones = *pair.source.as_slots();
        self.target_bones = *pair.target.as_slots();
    }

    /// Drops every binding, leaving a "nothing mapped" baseline.
    pub fn reset(&mut self) {
        self.source_hips = None;
        self.target_hips = None;
        self.source_bones = [None; BONE_SLOT_COUNT];
        self.target_bones = [None; BONE_SLOT_COUNT];
    }

    /// `true` when at least one slot is bound on both sides.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.source_bones
            .iter()
            .zip(&self.target_bones)
            .any(|(s, t)| s.is_some() && t.is_some())
    }

    #[inline]
    #[must_use]
    pub fn source_bones(&self) -> &[Option<BoneHandle>; BONE_SLOT_COUNT] {
        &self.source_bones
    }

    #[inline]
    #[must_use]
    pub fn target_bones(&self) -> &[Option<BoneHandle>; BONE_SLOT_COUNT] {
        &self.target_bones
    }

    /// Per-tick entry point. Does nothing while disabled.
    pub fn update(&self, source: &Rig, target: &mut Rig) {
        if !self.enabled {
            return;
        }
        self.synchronize(source, target);
    }

    /// Copies the current source pose onto the target rig.
    ///
    /// Handles that no longer resolve in their rig are skipped.
    pub fn synchronize(&self, source: &Rig, target: &mut Rig) {
        if let (Some(source_hips), Some(target_hips)) = (self.source_hips, self.target_hips)
            && source.contains(source_hips)
            && target.contains(target_hips)
        {
            target.set_world_position(target_hips, source.world_position(source_hips));
            target.set_world_rotation(target_hips, source.world_rotation(source_hips));
        }

        for (source_bone, target_bone) in self.source_bones.iter().zip(&self.target_bones) {
            let (Some(source_bone), Some(target_bone)) = (*source_bone, *target_bone) else {
                continue;
            };
            if Some(source_bone) == self.source_hips {
                continue;
            }

            let Some(rotation) = source.transform(source_bone).map(|t| t.rotation) else {
                continue;
            };
            if let Some(transform) = target.transform_mut(target_bone) {
                transform.rotation = rotation;
            }
        }
    }
}
