//! Pose-solver boundary.
//!
//! Humanoid IK and muscle-space conversion are provided by an external solver.
//! This module defines what the crate expects from it and how an avatar is
//! built from a normalized rig.

use glam::{Quat, Vec3};

use crate::errors::{Result, RetargetError};
use crate::humanoid::bone_map::BoneMap;
use crate::humanoid::descriptor::{AvatarDescriptorBuilder, HumanoidDescriptor};
use crate::scene::{BoneHandle, Rig};

/// Number of muscle values in a [`HumanPose`].
pub const MUSCLE_COUNT: usize = 95;

/// Rig-independent humanoid pose in muscle space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanPose {
    pub body_position: Vec3,
    pub body_rotation: Quat,
    pub muscles: [f32; MUSCLE_COUNT],
}

impl Default for HumanPose {
    fn default() -> Self {
        Self {
            body_position: Vec3::ZERO,
            body_rotation: Quat::IDENTITY,
            muscles: [0.0; MUSCLE_COUNT],
        }
    }
}

/// Opaque avatar handle produced by a [`PoseSolver`].
pub trait Avatar {
    fn is_valid(&self) -> bool;
    fn is_human(&self) -> bool;
}

/// External humanoid pose solver.
pub trait PoseSolver {
    type Avatar: Avatar;

    /// Builds an avatar for the rig at `root`. May return an avatar that
    /// reports itself invalid; callers check before use.
    fn build_avatar(&mut self, rig: &Rig, root: BoneHandle, descriptor: &HumanoidDescriptor) -> Self::Avatar;

    /// Reads the current pose of the rig at `root` into `pose`.
    fn get_human_pose(&mut self, avatar: &Self::Avatar, rig: &Rig, root: BoneHandle, pose: &mut HumanPose);

    /// Poses the rig at `root` from `pose`.
    fn set_human_pose(&mut self, avatar: &Self::Avatar, rig: &mut Rig, root: BoneHandle, pose: &HumanPose);
}

/// Builds a descriptor for a normalized rig and hands it to `solver`.
///
/// Fails with [`RetargetError::AvatarBuildError`] when no descriptor can be built
/// or the solver rejects it.
pub fn build_human_avatar<S: PoseSolver>(
    solver: &mut S,
    rig: &Rig,
    root: BoneHandle,
    map: &BoneMap,
) -> Result<S::Avatar> {
    let descriptor = AvatarDescriptorBuilder::build(rig, root, map)
        .ok_or_else(|| RetargetError::AvatarBuildError("Invalid arguments for building human avatar.".to_string()))?;

    let avatar = solver.build_avatar(rig, root, &descriptor);
    if !avatar.is_valid() || !avatar.is_human() {
        log::error!("Failed to build a human avatar.");
        return Err(RetargetError::AvatarBuildError("Failed to build a human avatar.".to_string()));
    }

    Ok(avatar)
}
