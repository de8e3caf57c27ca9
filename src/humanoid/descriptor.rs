use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::humanoid::bone_map::BoneMap;
use crate::humanoid::bones::BoneSlot;
use crate::scene::{BoneHandle, Rig, Transform};

/// Rotation limits of one human bone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumanLimit {
    /// Let the solver pick its built-in limits. The remaining fields are ignored
    /// while this is set.
    pub use_default_values: bool,
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub axis_length: f32,
}

impl Default for HumanLimit {
    fn default() -> Self {
        Self {
            use_default_values: true,
            min: Vec3::ZERO,
            max: Vec3::ZERO,
            center: Vec3::ZERO,
            axis_length: 0.0,
        }
    }
}

/// Canonical slot ↔ rig node name association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanBone {
    pub slot: BoneSlot,
    pub human_name: String,
    pub bone_name: String,
    pub limit: HumanLimit,
}

/// Rest transform of one rig node, relative to its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonBone {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// Everything a pose solver needs to build a humanoid avatar for a rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanoidDescriptor {
    pub human: Vec<HumanBone>,
    /// The root first, then every mapped bone in slot order.
    pub skeleton: Vec<SkeletonBone>,
    pub upper_arm_twist: f32,
    pub lower_arm_twist: f32,
    pub upper_leg_twist: f32,
    pub lower_leg_twist: f32,
    pub arm_stretch: f32,
    pub leg_stretch: f32,
    pub feet_spacing: f32,
    pub has_translation_dof: bool,
}

impl HumanoidDescriptor {
    pub const TWIST: f32 = 0.5;
    pub const STRETCH: f32 = 0.05;

    /// Human bone entry for `slot`, if mapped.
    #[must_use]
    pub fn human_bone(&self, slot: BoneSlot) -> Option<&HumanBone> {
        self.human.iter().find(|b| b.slot == slot)
    }

    #[must_use]
    pub fn skeleton_bone(&self, name: &str) -> Option<&SkeletonBone> {
        self.skeleton.iter().find(|b| b.name == name)
    }
}

/// Builds [`HumanoidDescriptor`]s from normalized rigs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvatarDescriptorBuilder;

impl AvatarDescriptorBuilder {
    /// Returns `None` when `root` is not part of `rig` or `map` is empty.
    ///
    /// Mapped handles that no longer resolve are left out of both lists.
    #[must_use]
    pub fn build(rig: &Rig, root: BoneHandle, map: &BoneMap) -> Option<HumanoidDescriptor> {
        let Some(root_node) = rig.get_node(root) else {
            log::error!("Invalid arguments for building human avatar: unknown root");
            return None;
        };
        if map.is_empty() {
            log::error!("Invalid arguments for building human avatar: empty bone map");
            return None;
        }

        let mut human = Vec::with_capacity(map.len());
        let mut skeleton = Vec::with_capacity(map.len() + 1);
        skeleton.push(skeleton_bone(&root_node.name, &root_node.transform));

        for (slot, handle) in map.iter() {
            let Some(node) = rig.get_node(handle) else {
                log::warn!("{slot:?} refers to a node that is no longer in the rig");
                continue;
            };
            human.push(HumanBone {
                slot,
                human_name: slot.human_name().to_string(),
                bone_name: node.name.clone(),
                limit: HumanLimit::default(),
            });
            skeleton.push(skeleton_bone(&node.name, &node.transform));
        }

        Some(HumanoidDescriptor {
            human,
            skeleton,
            upper_arm_twist: HumanoidDescriptor::TWIST,
            lower_arm_twist: HumanoidDescriptor::TWIST,
            upper_leg_twist: HumanoidDescriptor::TWIST,
            lower_leg_twist: HumanoidDescriptor::TWIST,
            arm_stretch: HumanoidDescriptor::STRETCH,
            leg_stretch: HumanoidDescriptor::STRETCH,
            feet_spacing: 0.0,
            has_translation_dof: false,
        })
    }
}

fn skeleton_bone(name: &str, transform: &Transform) -> SkeletonBone {
    SkeletonBone {
        name: name.to_string(),
        position: transform.position,
        rotation: transform.rotation,
        scale: transform.scale,
    }
}
