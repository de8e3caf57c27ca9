//! Canonical humanoid bone set.
//!
//! # Overview
//!
//! [`BoneSlot`] enumerates the fixed humanoid layout. Its declaration order is
//! significant: it is the dense index used by [`BoneMap`](super::BoneMap) and the
//! synchronizer arrays, and it is the tie-break order when a node name matches the
//! patterns of more than one slot.
//!
//! Per-slot metadata lives in read-only tables indexed by that order:
//!
//! | Table | Accessor |
//! |---|---|
//! | Name patterns (normalized) | [`BoneSlot::name_patterns`] |
//! | Expected T-pose direction | [`BoneSlot::expected_direction`] |
//! | Required / optional | [`BoneSlot::is_required`] |
//! | Bone group | [`BoneSlot::group`] |
//! | Solver-facing human name | [`BoneSlot::human_name`] |
//!
//! Directions use a right-handed frame with +Y up and +Z forward. World-left is
//! −X and world-right is +X.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};

/// One slot of the canonical humanoid layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumCount, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
pub enum BoneSlot {
    // Trunk
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,

    // Left arm
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,

    // Right arm
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,

    // Left leg
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,

    // Right leg
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,

    // Left fingers
    #[strum(serialize = "Left Thumb Proximal")]
    LeftThumbProximal,
    #[strum(serialize = "Left Thumb Intermediate")]
    LeftThumbIntermediate,
    #[strum(serialize = "Left Thumb Distal")]
    LeftThumbDistal,
    #[strum(serialize = "Left Index Proximal")]
    LeftIndexProximal,
    #[strum(serialize = "Left Index Intermediate")]
    LeftIndexIntermediate,
    #[strum(serialize = "Left Index Distal")]
    LeftIndexDistal,
    #[strum(serialize = "Left Middle Proximal")]
    LeftMiddleProximal,
    #[strum(serialize = "Left Middle Intermediate")]
    LeftMiddleIntermediate,
    #[strum(serialize = "Left Middle Distal")]
    LeftMiddleDistal,
    #[strum(serialize = "Left Ring Proximal")]
    LeftRingProximal,
    #[strum(serialize = "Left Ring Intermediate")]
    LeftRingIntermediate,
    #[strum(serialize = "Left Ring Distal")]
    LeftRingDistal,
    #[strum(serialize = "Left Little Proximal")]
    LeftLittleProximal,
    #[strum(serialize = "Left Little Intermediate")]
    LeftLittleIntermediate,
    #[strum(serialize = "Left Little Distal")]
    LeftLittleDistal,

    // Right fingers
    #[strum(serialize = "Right Thumb Proximal")]
    RightThumbProximal,
    #[strum(serialize = "Right Thumb Intermediate")]
    RightThumbIntermediate,
    #[strum(serialize = "Right Thumb Distal")]
    RightThumbDistal,
    #[strum(serialize = "Right Index Proximal")]
    RightIndexProximal,
    #[strum(serialize = "Right Index Intermediate")]
    RightIndexIntermediate,
    #[strum(serialize = "Right Index Distal")]
    RightIndexDistal,
    #[strum(serialize = "Right Middle Proximal")]
    RightMiddleProximal,
    #[strum(serialize = "Right Middle Intermediate")]
    RightMiddleIntermediate,
    #[strum(serialize = "Right Middle Distal")]
    RightMiddleDistal,
    #[strum(serialize = "Right Ring Proximal")]
    RightRingProximal,
    #[strum(serialize = "Right Ring Intermediate")]
    RightRingIntermediate,
    #[strum(serialize = "Right Ring Distal")]
    RightRingDistal,
    #[strum(serialize = "Right Little Proximal")]
    RightLittleProximal,
    #[strum(serialize = "Right Little Intermediate")]
    RightLittleIntermediate,
    #[strum(serialize = "Right Little Distal")]
    RightLittleDistal,

    // Face
    LeftEye,
    RightEye,
    Jaw,
}

/// Number of canonical slots.
pub const BONE_SLOT_COUNT: usize = BoneSlot::COUNT;

/// Coarse anatomical grouping of slots.
///
/// Clavicles belong to the trunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneGroup {
    Trunk,
    Arm,
    Leg,
    Finger,
    Face,
}

impl BoneGroup {
    /// Axis for the 180° turn used when a measured bone direction is exactly
    /// opposite its expected direction.
    #[must_use]
    pub fn fallback_axis(self) -> Vec3 {
        match self {
            Self::Arm | Self::Finger => Vec3::Y,
            Self::Trunk | Self::Leg | Self::Face => Vec3::Z,
        }
    }
}

impl BoneSlot {
    /// Dense index of this slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot at a dense index, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// All slots in enumeration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Name used by the pose solver ("LeftUpperArm", "Left Thumb Proximal", ...).
    #[inline]
    #[must_use]
    pub fn human_name(self) -> &'static str {
        self.into()
    }

    /// Normalized substrings that identify this slot in a rig's node names.
    #[inline]
    #[must_use]
    pub fn name_patterns(self) -> &'static [&'static str] {
        BONE_NAME_PATTERNS[self.index()]
    }

    /// Expected world-space direction from this bone's parent to this bone in
    /// the canonical T-pose. `None` for slots that never end a chain.
    #[inline]
    #[must_use]
    pub fn expected_direction(self) -> Option<Vec3> {
        EXPECTED_DIRECTIONS[self.index()]
    }

    /// Slots a humanoid avatar cannot be built without.
    #[inline]
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::Hips
                | Self::Spine
                | Self::Head
                | Self::LeftUpperArm
                | Self::LeftLowerArm
                | Self::LeftHand
                | Self::RightUpperArm
                | Self::RightLowerArm
                | Self::RightHand
                | Self::LeftUpperLeg
                | Self::LeftLowerLeg
                | Self::LeftFoot
                | Self::RightUpperLeg
                | Self::RightLowerLeg
                | Self::RightFoot
        )
    }

    /// Slots that may be absent from a rig.
    #[inline]
    #[must_use]
    pub fn is_optional(self) -> bool {
        !self.is_required()
    }

    /// Anatomical group, which selects the degenerate fallback axis.
    #[must_use]
    pub fn group(self) -> BoneGroup {
        match self {
            Self::Hips
            | Self::Spine
            | Self::Chest
            | Self::UpperChest
            | Self::Neck
            | Self::Head
            | Self::LeftShoulder
            | Self::RightShoulder => BoneGroup::Trunk,
            Self::LeftUpperArm
            | Self::LeftLowerArm
            | Self::LeftHand
            | Self::RightUpperArm
            | Self::RightLowerArm
            | Self::RightHand => BoneGroup::Arm,
            Self::LeftUpperLeg
            | Self::LeftLowerLeg
            | Self::LeftFoot
            | Self::LeftToes
            | Self::RightUpperLeg
            | Self::RightLowerLeg
            | Self::RightFoot
            | Self::RightToes => BoneGroup::Leg,
            Self::LeftEye | Self::RightEye | Self::Jaw => BoneGroup::Face,
            _ => BoneGroup::Finger,
        }
    }

    /// Shorthand for `self.group().fallback_axis()`.
    #[inline]
    #[must_use]
    pub fn fallback_axis(self) -> Vec3 {
        self.group().fallback_axis()
    }
}

// ============================================================================
// Tables
// ============================================================================

const UP: Option<Vec3> = Some(Vec3::Y);
const DOWN: Option<Vec3> = Some(Vec3::NEG_Y);
const LEFT: Option<Vec3> = Some(Vec3::NEG_X);
const RIGHT: Option<Vec3> = Some(Vec3::X);
/// normalize(0, -0.4, 0.9)
const TOES: Option<Vec3> = Some(Vec3::new(0.0, -0.406_138_5, 0.913_811_6));
/// normalize(-0.707, 0, 0.707)
const LEFT_THUMB: Option<Vec3> = Some(Vec3::new(-0.707_106_77, 0.0, 0.707_106_77));
/// normalize(0.707, 0, 0.707)
const RIGHT_THUMB: Option<Vec3> = Some(Vec3::new(0.707_106_77, 0.0, 0.707_106_77));

#[rustfmt::skip]
static EXPECTED_DIRECTIONS: [Option<Vec3>; BONE_SLOT_COUNT] = [
    // Hips, Spine, Chest, UpperChest, Neck, Head
    None, UP, UP, UP, UP, UP,
    // Left arm
    LEFT, LEFT, LEFT, LEFT,
    // Right arm
    RIGHT, RIGHT, RIGHT, RIGHT,
    // Left leg
    DOWN, DOWN, DOWN, TOES,
    // Right leg
    DOWN, DOWN, DOWN, TOES,
    // Left fingers
    LEFT_THUMB, LEFT_THUMB, LEFT_THUMB,
    LEFT, LEFT, LEFT,
    LEFT, LEFT, LEFT,
    LEFT, LEFT, LEFT,
    LEFT, LEFT, LEFT,
    // Right fingers
    RIGHT_THUMB, RIGHT_THUMB, RIGHT_THUMB,
    RIGHT, RIGHT, RIGHT,
    RIGHT, RIGHT, RIGHT,
    RIGHT, RIGHT, RIGHT,
    RIGHT, RIGHT, RIGHT,
    // LeftEye, RightEye, Jaw
    None, None, None,
];

#[rustfmt::skip]
static BONE_NAME_PATTERNS: [&[&str]; BONE_SLOT_COUNT] = [
    &["hips", "hip", "pelvis"],
    &["spine", "spine0", "spine1", "spine01"],
    &["chest", "spine1", "spine01", "spine2", "spine02"],
    &["upperchest", "spine2", "spine02", "spine3", "spine03"],
    &["neck"],
    &["head"],

    &["leftshoulder", "shoulderleft"],
    &["leftupperarm", "leftarm", "armleft"],
    &["leftlowerarm", "leftforearm", "forearmleft"],
    &["lefthand", "handleft"],

    &["rightshoulder", "shoulderright"],
    &["rightupperarm", "rightarm", "armright"],
    &["rightlowerarm", "rightforearm", "forearmright"],
    &["righthand", "handright"],

    &["leftupperleg", "leftupleg", "uplegleft"],
    &["leftlowerleg", "leftleg", "legleft"],
    &["leftfoot", "footleft"],
    &["lefttoes", "lefttoebase", "toesleft"],

    &["rightupperleg", "rightupleg", "uplegright"],
    &["rightlowerleg", "rightleg", "legright"],
    &["rightfoot", "footright"],
    &["righttoes", "righttoebase", "toesright"],

    &["lefthandthumb1", "thumbfinger0left"],
    &["lefthandthumb2", "thumbfinger1left"],
    &["lefthandthumb3", "thumbfinger2left"],
    &["lefthandindex1", "indexfinger1left"],
    &["lefthandindex2", "indexfinger2left"],
    &["lefthandindex3", "indexfinger3left"],
    &["lefthandmiddle1", "middlefinger1left"],
    &["lefthandmiddle2", "middlefinger2left"],
    &["lefthandmiddle3", "middlefinger3left"],
    &["lefthandring1", "ringfinger1left"],
    &["lefthandring2", "ringfinger2left"],
    &["lefthandring3", "ringfinger3left"],
    &["lefthandpinky1", "pinkyfinger1left"],
    &["lefthandpinky2", "pinkyfinger2left"],
    &["lefthandpinky3", "pinkyfinger3left"],

    &["righthandthumb1", "thumbfinger0right"],
    &["righthandthumb2", "thumbfinger1right"],
    &["righthandthumb3", "thumbfinger2right"],
    &["righthandindex1", "indexfinger1right"],
    &["righthandindex2", "indexfinger2right"],
    &["righthandindex3", "indexfinger3right"],
    &["righthandmiddle1", "middlefinger1right"],
    &["righthandmiddle2", "middlefinger2right"],
    &["righthandmiddle3", "middlefinger3right"],
    &["righthandring1", "ringfinger1right"],
    &["righthandring2", "ringfinger2right"],
    &["righthandring3", "ringfinger3right"],
    &["righthandpinky1", "pinkyfinger1right"],
    &["righthandpinky2", "pinkyfinger2right"],
    &["righthandpinky3", "pinkyfinger3right"],

    &["lefteye", "eyeleft"],
    &["righteye", "eyeright"],
    &["jaw"],
];
