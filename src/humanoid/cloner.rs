use rustc_hash::FxHashMap;

use crate::errors::{Result, RetargetError};
use crate::humanoid::bone_map::BoneMap;
use crate::scene::{BoneHandle, BoneNode, Rig, Transform};

/// Source handle → cloned handle, built while copying a hierarchy.
pub type CloneCorrespondence = FxHashMap<BoneHandle, BoneHandle>;

/// A skeleton copied out of a decoded rig.
#[derive(Debug, Clone)]
pub struct ClonedSkeleton {
    /// The new, independently owned rig.
    pub rig: Rig,
    /// Container node the cloned hierarchy hangs from.
    pub root: BoneHandle,
    /// Bone map of the clone, re-keyed from the source map.
    pub map: BoneMap,
}

/// Deep-copies a source skeleton into an isolated rig.
///
/// Cloning starts at the source map's Hips node. Every node below it is copied
/// with its local position and scale. Local rotations are reset to identity;
/// the T-pose normalizer establishes them afterwards.
#[derive(Debug, Clone)]
pub struct SkeletonCloner {
    root_name: String,
}

impl Default for SkeletonCloner {
    fn default() -> Self {
        Self::new("HumanAvatarSkeleton")
    }
}

impl SkeletonCloner {
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
        }
    }

    /// Clones the skeleton rooted at `source_map`'s Hips into a new rig.
    ///
    /// Fails with [`RetargetError::MappingError`] when Hips is not mapped or no
    /// longer part of `source`. The source rig is not modified.
    pub fn clone_skeleton(&self, source: &Rig, source_map: &BoneMap) -> Result<ClonedSkeleton> {
        let hips = source_map
            .hips()
            .filter(|&h| source.contains(h))
            .ok_or_else(|| RetargetError::MappingError("Hips bone not found in source skeleton.".to_string()))?;

        let mut rig = Rig::new();
        let root = rig.create_node(&self.root_name);

        let correspondence = Self::clone_hierarchy(source, hips, &mut rig, root);
        let map = source_map.remap(&correspondence);

        log::debug!(
            "Cloned {} nodes into '{}' ({} mapped bones)",
            correspondence.len(),
            self.root_name,
            map.len()
        );

        Ok(ClonedSkeleton { rig, root, map })
    }

    /// Copies the subtree at `source_root` under `dest_parent` and returns the
    /// node correspondence.
    pub fn clone_hierarchy(
        source: &Rig,
        source_root: BoneHandle,
        dest: &mut Rig,
        dest_parent: BoneHandle,
    ) -> CloneCorrespondence {
        let mut correspondence = CloneCorrespondence::default();
        let mut stack: Vec<(BoneHandle, BoneHandle)> = vec![(source_root, dest_parent)];

        while let Some((original, parent)) = stack.pop() {
            let Some(node) = source.get_node(original) else {
                continue;
            };

            let transform = Transform {
                position: node.transform.position,
                rotation: glam::Quat::IDENTITY,
                scale: node.transform.scale,
            };
            let clone = dest.add_to_parent(
                BoneNode::new(node.name.as_str()).with_kind(node.kind).with_transform(transform),
                parent,
            );
            correspondence.insert(original, clone);

            // Reverse push keeps sibling order identical to the source
            stack.extend(node.children().iter().rev().map(|&child| (child, clone)));
        }

        correspondence
    }
}
