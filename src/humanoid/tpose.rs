//! T-pose normalization.
//!
//! # Overview
//!
//! A freshly cloned skeleton has correct bone offsets but identity rotations, so
//! it stands in whatever pose its offsets imply. [`TPoseNormalizer`] rotates it
//! into the canonical reference pose:
//!
//! 1. **Hips**: one corrective rotation maps the rig's measured (forward, up)
//!    frame onto world (+Z, +Y).
//! 2. **Chains**: for each parent → child pair from [`build_bone_chains`], the
//!    parent is rotated so the parent → child vector points along the child's
//!    expected direction. Pairs are processed proximal first so distal
//!    corrections see the already-corrected parents.
//! 3. **Grounding**: Hips is lifted or lowered so the lowest toe (or foot) sits
//!    at world Y = 0.
//!
//! # Skipped pairs
//!
//! A parent can only satisfy one child direction. Hips → UpperLeg is never
//! corrected (legs are aimed through UpperLeg → LowerLeg), and neither is
//! Chest/UpperChest → Shoulder or Chest/UpperChest → UpperArm.

use glam::{Mat3, Quat, Vec3};
use smallvec::SmallVec;

use crate::humanoid::bone_map::BoneMap;
use crate::humanoid::bones::BoneSlot;
use crate::scene::{BoneHandle, Rig};

/// Squared length below which a measured offset is treated as degenerate.
const DEGENERATE_SQ: f32 = 1e-8;
/// |dot| above which two unit directions count as parallel.
const PARALLEL_DOT: f32 = 0.99999;

/// One parent → child correction unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneChain {
    pub parent: BoneSlot,
    pub child: BoneSlot,
}

impl BoneChain {
    #[must_use]
    pub const fn new(parent: BoneSlot, child: BoneSlot) -> Self {
        Self { parent, child }
    }

    /// Pairs whose correction would fight a sibling chain and is never applied.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        use BoneSlot as B;
        match self.parent {
            B::Hips => matches!(self.child, B::LeftUpperLeg | B::RightUpperLeg),
            B::Chest | B::UpperChest => matches!(
                self.child,
                B::LeftShoulder | B::RightShoulder | B::LeftUpperArm | B::RightUpperArm
            ),
            _ => false,
        }
    }
}

pub type BoneChains = SmallVec<[BoneChain; 64]>;

/// Builds the ordered chain list for a mapped rig.
///
/// UpperChest and the shoulders are optional: when absent, the chain bridges
/// straight to the next present bone.
#[must_use]
pub fn build_bone_chains(map: &BoneMap) -> BoneChains {
    use BoneSlot as B;

    let mut chains = BoneChains::new();
    let mut push = |parent, child| chains.push(BoneChain::new(parent, child));

    // Trunk
    push(B::Hips, B::Spine);
    push(B::Spine, B::Chest);

    // Legs
    push(B::Hips, B::LeftUpperLeg);
    push(B::LeftUpperLeg, B::LeftLowerLeg);
    push(B::LeftLowerLeg, B::LeftFoot);
    push(B::LeftFoot, B::LeftToes);

    push(B::Hips, B::RightUpperLeg);
    push(B::RightUpperLeg, B::RightLowerLeg);
    push(B::RightLowerLeg, B::RightFoot);
    push(B::RightFoot, B::RightToes);

    // Neck and head
    let has_upper_chest = map.contains(B::UpperChest);
    if has_upper_chest {
        push(B::Chest, B::UpperChest);
        push(B::UpperChest, B::Neck);
    } else {
        push(B::Chest, B::Neck);
    }
    push(B::Neck, B::Head);

    let shoulder_parent = if has_upper_chest { B::UpperChest } else { B::Chest };

    for side in [Side::Left, Side::Right] {
        let [shoulder, upper_arm, lower_arm, hand] = side.arm();
        if map.contains(shoulder) {
            push(shoulder_parent, shoulder);
            push(shoulder, upper_arm);
        } else {
            push(shoulder_parent, upper_arm);
        }
        push(upper_arm, lower_arm);
        push(lower_arm, hand);

        for [proximal, intermediate, distal] in side.fingers() {
            push(hand, proximal);
            push(proximal, intermediate);
            push(intermediate, distal);
        }
    }

    chains
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn arm(self) -> [BoneSlot; 4] {
        use BoneSlot as B;
        match self {
            Side::Left => [B::LeftShoulder, B::LeftUpperArm, B::LeftLowerArm, B::LeftHand],
            Side::Right => [B::RightShoulder, B::RightUpperArm, B::RightLowerArm, B::RightHand],
        }
    }

    fn fingers(self) -> [[BoneSlot; 3]; 5] {
        use BoneSlot as B;
        match self {
            Side::Left => [
                [B::LeftThumbProximal, B::LeftThumbIntermediate, B::LeftThumbDistal],
                [B::LeftIndexProximal, B::LeftIndexIntermediate, B::LeftIndexDistal],
                [B::LeftMiddleProximal, B::LeftMiddleIntermediate, B::LeftMiddleDistal],
                [B::LeftRingProximal, B::LeftRingIntermediate, B::LeftRingDistal],
                [B::LeftLittleProximal, B::LeftLittleIntermediate, B::LeftLittleDistal],
            ],
            Side::Right => [
                [B::RightThumbProximal, B::RightThumbIntermediate, B::RightThumbDistal],
                [B::RightIndexProximal, B::RightIndexIntermediate, B::RightIndexDistal],
                [B::RightMiddleProximal, B::RightMiddleIntermediate, B::RightMiddleDistal],
                [B::RightRingProximal, B::RightRingIntermediate, B::RightRingDistal],
                [B::RightLittleProximal, B::RightLittleIntermediate, B::RightLittleDistal],
            ],
        }
    }
}

// ============================================================================
// Rotation helpers
// ============================================================================

/// Rotation whose +Z axis is `forward` and whose +Y axis is the part of `up`
/// orthogonal to it.
///
/// A zero `forward` yields identity. When `up` is parallel to `forward` the
/// shortest arc from +Z is used.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let x = up.cross(z);
    if x.length_squared() < 1e-12 {
        return Quat::from_rotation_arc(Vec3::Z, z);
    }
    let x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Shortest-arc rotation from `from` to `to` with explicit handling of the
/// parallel cases.
///
/// Nearly parallel directions give identity. Nearly opposite directions give a
/// half turn about `fallback_axis`, where the shortest arc is ill-conditioned.
#[must_use]
pub fn safe_from_to_rotation(from: Vec3, to: Vec3, fallback_axis: Vec3) -> Quat {
    let from = from.normalize_or_zero();
    let to = to.normalize_or_zero();
    let dot = from.dot(to);

    if dot > PARALLEL_DOT {
        Quat::IDENTITY
    } else if dot < -PARALLEL_DOT {
        Quat::from_axis_angle(fallback_axis.normalize_or(Vec3::Z), std::f32::consts::PI)
    } else {
        Quat::from_rotation_arc(from, to)
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Rotates a mapped rig into the canonical T-pose in place.
#[derive(Debug, Clone, Copy)]
pub struct TPoseNormalizer {
    pub adjust_height_to_ground: bool,
}

impl Default for TPoseNormalizer {
    fn default() -> Self {
        Self {
            adjust_height_to_ground: true,
        }
    }
}

impl TPoseNormalizer {
    #[must_use]
    pub fn new(adjust_height_to_ground: bool) -> Self {
        Self { adjust_height_to_ground }
    }

    /// Applies the T-pose to the bones in `map`.
    ///
    /// Returns `false` without touching the rig when the map is empty or has no
    /// Hips. Reporting that as an error is left to the caller.
    pub fn apply(&self, rig: &mut Rig, map: &BoneMap) -> bool {
        if map.is_empty() {
            log::error!("T-pose requested for an empty bone map");
            return false;
        }
        let Some(hips) = map.hips().filter(|&h| rig.contains(h)) else {
            log::warn!("T-pose skipped: Hips is not mapped");
            return false;
        };

        Self::orient_hips(rig, map, hips);

        for chain in build_bone_chains(map) {
            Self::apply_chain(rig, map, chain);
        }

        if self.adjust_height_to_ground {
            Self::ground(rig, map, hips);
        }

        true
    }

    fn orient_hips(rig: &mut Rig, map: &BoneMap, hips: BoneHandle) {
        let hips_position = rig.world_position(hips);

        let mut up = Vec3::Y;
        if let Some(spine) = map.get(BoneSlot::Spine) {
            let offset = rig.world_position(spine) - hips_position;
            if offset.length_squared() > DEGENERATE_SQ {
                up = offset.normalize();
            }
        }

        let mut right = Vec3::X;
        if let (Some(left_leg), Some(right_leg)) = (map.get(BoneSlot::LeftUpperLeg), map.get(BoneSlot::RightUpperLeg)) {
            let offset = rig.world_position(right_leg) - rig.world_position(left_leg);
            if offset.length_squared() > DEGENERATE_SQ {
                right = offset.normalize();
            }
        }

        let forward = right.cross(up).try_normalize().unwrap_or(Vec3::Z);

        let current = look_rotation(forward, up);
        let expected = look_rotation(Vec3::Z, Vec3::Y);
        let correction = expected * current.inverse();

        let rotation = rig.world_rotation(hips);
        rig.set_world_rotation(hips, correction * rotation);
    }

    fn apply_chain(rig: &mut Rig, map: &BoneMap, chain: BoneChain) {
        if chain.is_skipped() {
            return;
        }
        let (Some(parent), Some(child)) = (map.get(chain.parent), map.get(chain.child)) else {
            return;
        };
        let Some(expected) = chain.child.expected_direction() else {
            return;
        };

        let offset = rig.world_position(child) - rig.world_position(parent);
        if offset.length_squared() < DEGENERATE_SQ {
            log::debug!("Skipping degenerate chain {:?} -> {:?}", chain.parent, chain.child);
            return;
        }
        let current = offset.normalize();

        let correction = safe_from_to_rotation(current, expected, chain.child.fallback_axis());
        let rotation = rig.world_rotation(parent);
        rig.set_world_rotation(parent, correction * rotation);
    }

    fn ground(rig: &mut Rig, map: &BoneMap, hips: BoneHandle) {
        let ground_y = lowest_foot_height(rig, map);
        let hips_height = rig.world_position(hips).y - ground_y;
        if let Some(transform) = rig.transform_mut(hips) {
            transform.position = Vec3::new(0.0, hips_height, 0.0);
        }
    }
}

/// Lowest world Y among the toes, else the feet, else 0.
#[must_use]
pub fn lowest_foot_height(rig: &Rig, map: &BoneMap) -> f32 {
    let lowest = |slots: [BoneSlot; 2]| {
        slots
            .iter()
            .filter_map(|&slot| map.get(slot))
            .map(|h| rig.world_position(h).y)
            .reduce(f32::min)
    };

    lowest([BoneSlot::LeftToes, BoneSlot::RightToes])
        .or_else(|| lowest([BoneSlot::LeftFoot, BoneSlot::RightFoot]))
        .unwrap_or(0.0)
}
