use rustc_hash::FxHashMap;

use crate::humanoid::bones::{BONE_SLOT_COUNT, BoneSlot};
use crate::scene::BoneHandle;

/// Slot → node assignment for one rig.
///
/// Stored densely, one entry per [`BoneSlot`]. A node occupies at most one slot
/// and a slot holds at most one node. Handles refer to the rig the map was built
/// from and are meaningless against any other rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneMap {
    slots: [Option<BoneHandle>; BONE_SLOT_COUNT],
}

impl Default for BoneMap {
    fn default() -> Self {
        Self::new()
    }
}

impl BoneMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [None; BONE_SLOT_COUNT],
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, slot: BoneSlot) -> Option<BoneHandle> {
        self.slots[slot.index()]
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, slot: BoneSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Assigns `node` to `slot`, returning the node previously held by the slot.
    ///
    /// If `node` already fills another slot, that slot is cleared first.
    pub fn insert(&mut self, slot: BoneSlot, node: BoneHandle) -> Option<BoneHandle> {
        if let Some(previous) = self.slot_of(node)
            && previous != slot
        {
            self.slots[previous.index()] = None;
        }
        self.slots[slot.index()].replace(node)
    }

    pub fn remove(&mut self, slot: BoneSlot) -> Option<BoneHandle> {
        self.slots[slot.index()].take()
    }

    /// Slot currently held by `node`.
    #[must_use]
    pub fn slot_of(&self, node: BoneHandle) -> Option<BoneSlot> {
        self.iter().find_map(|(slot, h)| (h == node).then_some(slot))
    }

    #[inline]
    #[must_use]
    pub fn hips(&self) -> Option<BoneHandle> {
        self.get(BoneSlot::Hips)
    }

    /// Number of filled slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.slots = [None; BONE_SLOT_COUNT];
    }

    /// Filled slots in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneSlot, BoneHandle)> + '_ {
        BoneSlot::all().zip(self.slots.iter()).filter_map(|(slot, h)| h.map(|h| (slot, h)))
    }

    /// The dense slot array, indexed by [`BoneSlot::index`].
    #[inline]
    #[must_use]
    pub fn as_slots(&self) -> &[Option<BoneHandle>; BONE_SLOT_COUNT] {
        &self.slots
    }

    /// Re-keys this map through a node correspondence, typically the one produced
    /// while cloning a skeleton. Entries without a counterpart are dropped.
    #[must_use]
    pub fn remap(&self, correspondence: &FxHashMap<BoneHandle, BoneHandle>) -> Self {
        let mut mapped = Self::new();
        for (slot, handle) in self.iter() {
            if let Some(&target) = correspondence.get(&handle) {
                mapped.slots[slot.index()] = Some(target);
            }
        }
        mapped
    }

    /// Required slots that are still empty, in enumeration order.
    pub fn missing_required(&self) -> impl Iterator<Item = BoneSlot> + '_ {
        BoneSlot::all().filter(|slot| slot.is_required() && !self.contains(*slot))
    }
}
