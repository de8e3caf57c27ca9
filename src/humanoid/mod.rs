//! Humanoid retargeting core.
//!
//! # Overview
//!
//! The import-time pipeline runs leaf-first:
//!
//! 1. [`BoneMapper`] matches rig node names to canonical [`BoneSlot`]s
//! 2. [`SkeletonCloner`] copies the mapped skeleton into an isolated rig
//! 3. [`TPoseNormalizer`] rotates the clone into the reference T-pose
//! 4. [`AvatarDescriptorBuilder`] describes the clone for the pose solver
//!
//! At playback time [`PoseSynchronizer`] copies the source pose onto the clone
//! once per tick, after the animation has been sampled.

pub mod bone_map;
pub mod bones;
pub mod cloner;
pub mod descriptor;
pub mod mapper;
pub mod solver;
pub mod synchronizer;
pub mod tpose;

pub use bone_map::BoneMap;
pub use bones::{BONE_SLOT_COUNT, BoneGroup, BoneSlot};
pub use cloner::{CloneCorrespondence, ClonedSkeleton, SkeletonCloner};
pub use descriptor::{AvatarDescriptorBuilder, HumanBone, HumanLimit, HumanoidDescriptor, SkeletonBone};
pub use mapper::{BoneMapper, normalize_bone_name};
pub use solver::{Avatar, HumanPose, MUSCLE_COUNT, PoseSolver, build_human_avatar};
pub use synchronizer::{PoseSynchronizer, RetargetPair};
pub use tpose::{BoneChain, TPoseNormalizer, build_bone_chains, look_rotation, safe_from_to_rotation};
