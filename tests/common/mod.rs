//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::f32::consts::FRAC_PI_4;

use anyhow::anyhow;
use glam::{Quat, Vec3};

use myth_retarget::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData};
use myth_retarget::humanoid::{Avatar, BoneSlot, HumanPose, HumanoidDescriptor, PoseSolver};
use myth_retarget::import::{AnimationDecoder, CancellationToken, DecodeStep, DecodeTask, DecodedScene};
use myth_retarget::scene::{BoneHandle, Rig, Transform};

pub const EPSILON: f32 = 1e-4;

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

pub fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

/// Rotation equality up to quaternion sign.
pub fn quat_approx(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - EPSILON
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn find(rig: &Rig, root: BoneHandle, name: &str) -> anyhow::Result<BoneHandle> {
    rig.find_by_name(root, name).ok_or_else(|| anyhow!("node '{name}' not found"))
}

fn child(rig: &mut Rig, parent: BoneHandle, name: &str, offset: Vec3) -> BoneHandle {
    rig.create_child(parent, name, Transform::from_position(offset))
}

// ============================================================================
// Rig fixtures
// ============================================================================

/// Angle the arms hang below horizontal in [`mixamo_rig`].
pub const ARM_DROP: f32 = FRAC_PI_4;

/// Mixamo-named rig in an A-pose: arms dropped by [`ARM_DROP`], legs straight,
/// feet pointing forward. All local rotations are identity.
///
/// Hierarchy: `Armature` → `mixamorig:Hips` → spine chain, both legs; `Spine2`
/// carries the neck and both shoulders. Each hand has a single index finger.
pub fn mixamo_rig() -> (Rig, BoneHandle) {
    build_mixamo_rig("mixamorig:", ARM_DROP)
}

pub fn build_mixamo_rig(prefix: &str, arm_drop: f32) -> (Rig, BoneHandle) {
    let name = |n: &str| format!("{prefix}{n}");

    let mut rig = Rig::new();
    let root = rig.create_node("Armature");

    let hips = child(&mut rig, root, &name("Hips"), Vec3::new(0.0, 1.0, 0.0));
    let spine = child(&mut rig, hips, &name("Spine"), Vec3::new(0.0, 0.1, 0.0));
    let spine1 = child(&mut rig, spine, &name("Spine1"), Vec3::new(0.0, 0.1, 0.0));
    let spine2 = child(&mut rig, spine1, &name("Spine2"), Vec3::new(0.0, 0.1, 0.0));
    let neck = child(&mut rig, spine2, &name("Neck"), Vec3::new(0.0, 0.15, 0.0));
    let head = child(&mut rig, neck, &name("Head"), Vec3::new(0.0, 0.1, 0.0));
    child(&mut rig, head, &name("HeadTop_End"), Vec3::new(0.0, 0.2, 0.0));

    for (side, sign) in [("Left", -1.0_f32), ("Right", 1.0)] {
        let arm_dir = Vec3::new(sign * arm_drop.cos(), -arm_drop.sin(), 0.0);

        let shoulder = child(&mut rig, spine2, &name(&format!("{side}Shoulder")), Vec3::new(sign * 0.05, 0.1, 0.0));
        let arm = child(&mut rig, shoulder, &name(&format!("{side}Arm")), Vec3::new(sign * 0.1, 0.0, 0.0));
        let fore_arm = child(&mut rig, arm, &name(&format!("{side}ForeArm")), arm_dir * 0.25);
        let hand = child(&mut rig, fore_arm, &name(&format!("{side}Hand")), arm_dir * 0.25);
        let index1 = child(&mut rig, hand, &name(&format!("{side}HandIndex1")), arm_dir * 0.05);
        let index2 = child(&mut rig, index1, &name(&format!("{side}HandIndex2")), arm_dir * 0.03);
        let index3 = child(&mut rig, index2, &name(&format!("{side}HandIndex3")), arm_dir * 0.02);
        child(&mut rig, index3, &name(&format!("{side}HandIndex4")), arm_dir * 0.02);

        let up_leg = child(&mut rig, hips, &name(&format!("{side}UpLeg")), Vec3::new(sign * 0.1, -0.05, 0.0));
        let leg = child(&mut rig, up_leg, &name(&format!("{side}Leg")), Vec3::new(0.0, -0.45, 0.0));
        let foot = child(&mut rig, leg, &name(&format!("{side}Foot")), Vec3::new(0.0, -0.45, 0.0));
        let toe = child(&mut rig, foot, &name(&format!("{side}ToeBase")), Vec3::new(0.0, -0.08, 0.12));
        child(&mut rig, toe, &name(&format!("{side}Toe_End")), Vec3::new(0.0, 0.0, 0.08));
    }

    (rig, root)
}

/// Slots [`mixamo_rig`] is expected to fill.
pub const MIXAMO_MAPPED_SLOTS: usize = 28;

// ============================================================================
// Clips
// ============================================================================

/// Two-second clip: Hips moves forward one unit, LeftArm swings a quarter turn
/// about Z.
pub fn walk_clip() -> AnimationClip {
    let hips = Track::new(
        "mixamorig:Hips",
        TargetPath::Translation,
        TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, 2.0],
            vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)],
            InterpolationMode::Linear,
        )),
    );
    let arm = Track::new(
        "mixamorig:LeftArm",
        TargetPath::Rotation,
        TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, 2.0],
            vec![Quat::IDENTITY, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)],
            InterpolationMode::Linear,
        )),
    );
    AnimationClip::new("walk", vec![hips, arm])
}

// ============================================================================
// Pose solver
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MockAvatar {
    pub valid: bool,
    pub human: bool,
    pub hips_name: Option<String>,
}

impl Avatar for MockAvatar {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn is_human(&self) -> bool {
        self.human
    }
}

/// Solver that validates the descriptor's required slots and reads/writes the
/// Hips world transform as the "human pose".
#[derive(Debug, Default)]
pub struct MockSolver {
    pub reject: bool,
    pub descriptors: Vec<HumanoidDescriptor>,
}

impl PoseSolver for MockSolver {
    type Avatar = MockAvatar;

    fn build_avatar(&mut self, _rig: &Rig, _root: BoneHandle, descriptor: &HumanoidDescriptor) -> MockAvatar {
        self.descriptors.push(descriptor.clone());
        let human = BoneSlot::all()
            .filter(|slot| slot.is_required())
            .all(|slot| descriptor.human_bone(slot).is_some());
        MockAvatar {
            valid: !self.reject,
            human,
            hips_name: descriptor.human_bone(BoneSlot::Hips).map(|b| b.bone_name.clone()),
        }
    }

    fn get_human_pose(&mut self, avatar: &MockAvatar, rig: &Rig, root: BoneHandle, pose: &mut HumanPose) {
        let Some(hips) = avatar.hips_name.as_deref().and_then(|n| rig.find_by_name(root, n)) else {
            return;
        };
        pose.body_position = rig.world_position(hips);
        pose.body_rotation = rig.world_rotation(hips);
    }

    fn set_human_pose(&mut self, avatar: &MockAvatar, rig: &mut Rig, root: BoneHandle, pose: &HumanPose) {
        let Some(hips) = avatar.hips_name.as_deref().and_then(|n| rig.find_by_name(root, n)) else {
            return;
        };
        rig.set_world_position(hips, pose.body_position);
        rig.set_world_rotation(hips, pose.body_rotation);
    }
}

// ============================================================================
// Decoder
// ============================================================================

#[derive(Debug, Clone)]
pub enum MockOutcome {
    Finish(DecodedScene),
    Cancel,
    Fail(String),
}

/// Decoder that reports `pending_steps` pending steps before its outcome.
///
/// When `cancel_at` is set the token is cancelled on that step.
#[derive(Debug, Clone)]
pub struct MockDecoder {
    pub pending_steps: usize,
    pub outcome: MockOutcome,
    pub cancel_at: Option<(CancellationToken, usize)>,
}

impl MockDecoder {
    pub fn finishing(scene: DecodedScene) -> Self {
        Self {
            pending_steps: 3,
            outcome: MockOutcome::Finish(scene),
            cancel_at: None,
        }
    }
}

pub struct MockTask {
    step: usize,
    decoder: MockDecoder,
}

impl DecodeTask for MockTask {
    fn step(&mut self) -> DecodeStep {
        if let Some((token, at)) = &self.decoder.cancel_at
            && self.step == *at
        {
            token.cancel();
        }

        if self.step < self.decoder.pending_steps {
            self.step += 1;
            return DecodeStep::Pending;
        }

        match &self.decoder.outcome {
            MockOutcome::Finish(scene) => DecodeStep::Finished(scene.clone()),
            MockOutcome::Cancel => DecodeStep::Canceled,
            MockOutcome::Fail(message) => DecodeStep::Failed(message.clone()),
        }
    }

    fn progress(&self) -> f32 {
        self.step as f32 / (self.decoder.pending_steps + 1) as f32
    }
}

impl AnimationDecoder for MockDecoder {
    type Task = MockTask;

    fn begin(&self, _bytes: Vec<u8>) -> MockTask {
        MockTask {
            step: 0,
            decoder: self.clone(),
        }
    }
}

/// Decoded Mixamo rig with [`walk_clip`].
pub fn decoded_mixamo_scene() -> DecodedScene {
    let (rig, root) = mixamo_rig();
    DecodedScene {
        rig,
        root: Some(root),
        clips: vec![walk_clip()],
    }
}
