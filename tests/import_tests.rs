//! Import Pipeline Tests
//!
//! Tests for:
//! - Input validation (empty bytes, empty path, missing file)
//! - Decode failure and cooperative cancellation
//! - Retargeting failures (no root, no clips, no hips, rejected avatar)
//! - A successful import end to end: stripping, cloning, playback wiring
//! - RetargetedActor ticking, binding and pose transfer

mod common;

use std::cell::RefCell;
use std::path::PathBuf;

use glam::{Quat, Vec3};
use pollster::block_on;

use myth_retarget::animation::PlaybackState;
use myth_retarget::humanoid::{BoneSlot, HumanPose, RetargetPair};
use myth_retarget::import::{AnimationImporter, CancellationToken, DecodedScene, ImportSource, RetargetedActor};
use myth_retarget::scene::{BoneNode, NodeKind, Rig, Transform};
use myth_retarget::settings::RetargetSettings;
use myth_retarget::{Result, RetargetError};

use common::{
    MIXAMO_MAPPED_SLOTS, MockAvatar, MockDecoder, MockOutcome, MockSolver, decoded_mixamo_scene, find, init_logger,
    mixamo_rig, quat_approx, vec3_approx, walk_clip,
};

const BYTES: &[u8] = b"animation";

fn import_with(decoder: MockDecoder, settings: RetargetSettings) -> Result<RetargetedActor<MockAvatar>> {
    let importer = AnimationImporter::new(decoder, settings);
    let mut solver = MockSolver::default();
    block_on(importer.load_async(
        ImportSource::Bytes(BYTES.to_vec()),
        &mut solver,
        &CancellationToken::new(),
        None,
    ))
}

fn import_scene(scene: DecodedScene) -> Result<RetargetedActor<MockAvatar>> {
    import_with(MockDecoder::finishing(scene), RetargetSettings::default())
}

fn failing(outcome: MockOutcome) -> MockDecoder {
    MockDecoder {
        pending_steps: 1,
        outcome,
        cancel_at: None,
    }
}

// ============================================================================
// Input validation
// ============================================================================

#[test]
fn empty_bytes_are_a_stream_error() {
    init_logger();
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();

    let err = block_on(importer.load_async(ImportSource::Bytes(Vec::new()), &mut solver, &CancellationToken::new(), None))
        .unwrap_err();

    assert!(matches!(err, RetargetError::StreamError(_)));
    assert!(err.to_string().contains("Stream is null or empty."));
}

#[tokio::test]
async fn empty_path_is_a_stream_error() {
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();

    let err = importer
        .load_async(ImportSource::Path(PathBuf::new()), &mut solver, &CancellationToken::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, RetargetError::StreamError(_)));
    assert!(err.to_string().contains("File path is null or empty."));
}

#[tokio::test]
async fn missing_file_is_a_stream_error() {
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();
    let path = std::env::temp_dir().join("myth_retarget_missing_clip.fbx");

    let err = importer
        .load_async(ImportSource::from(path), &mut solver, &CancellationToken::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, RetargetError::StreamError(_)));
    assert!(err.to_string().contains("File not found at path"));
}

#[tokio::test]
async fn file_on_disk_is_imported() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("myth_retarget_clip_{}.fbx", std::process::id()));
    tokio::fs::write(&path, BYTES).await?;

    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();
    let result = importer
        .load_async(ImportSource::from(path.clone()), &mut solver, &CancellationToken::new(), None)
        .await;
    tokio::fs::remove_file(&path).await?;

    let actor = result?;
    assert!(actor.is_bound());
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn decoder_failure_is_a_decode_error() {
    let err = import_with(failing(MockOutcome::Fail("bad header".to_string())), RetargetSettings::default())
        .unwrap_err();

    assert!(matches!(err, RetargetError::DecodeError(ref m) if m == "bad header"));
}

#[test]
fn decoder_cancel_is_reported_as_cancelled() {
    let err = import_with(failing(MockOutcome::Cancel), RetargetSettings::default()).unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn pre_cancelled_token_stops_before_decoding() {
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();
    let token = CancellationToken::new();
    token.cancel();

    let err = block_on(importer.load_async(ImportSource::Bytes(BYTES.to_vec()), &mut solver, &token, None)).unwrap_err();

    assert!(matches!(err, RetargetError::Cancelled));
    assert!(solver.descriptors.is_empty());
}

#[test]
fn cancelling_mid_decode_stops_at_next_step() {
    let token = CancellationToken::new();
    let decoder = MockDecoder {
        pending_steps: 3,
        outcome: MockOutcome::Finish(decoded_mixamo_scene()),
        cancel_at: Some((token.clone(), 1)),
    };
    let importer = AnimationImporter::new(decoder, RetargetSettings::default());
    let mut solver = MockSolver::default();

    let progress = RefCell::new(Vec::new());
    let report = |p: f32| progress.borrow_mut().push(p);

    let err =
        block_on(importer.load_async(ImportSource::Bytes(BYTES.to_vec()), &mut solver, &token, Some(&report))).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(*progress.borrow(), vec![0.25, 0.5]);
    assert!(solver.descriptors.is_empty());
}

#[test]
fn progress_is_reported_until_finished() -> anyhow::Result<()> {
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver::default();

    let progress = RefCell::new(Vec::new());
    let report = |p: f32| progress.borrow_mut().push(p);

    block_on(importer.load_async(
        ImportSource::Bytes(BYTES.to_vec()),
        &mut solver,
        &CancellationToken::new(),
        Some(&report),
    ))?;

    assert_eq!(*progress.borrow(), vec![0.25, 0.5, 0.75, 1.0]);
    Ok(())
}

// ============================================================================
// Retargeting failures
// ============================================================================

#[test]
fn missing_root_is_a_decode_error() {
    let mut scene = decoded_mixamo_scene();
    scene.root = None;

    let err = import_scene(scene).unwrap_err();
    assert!(matches!(err, RetargetError::DecodeError(_)));
    assert!(err.to_string().contains("root object was not found"));
}

#[test]
fn scene_without_clips_has_no_animation() {
    let mut scene = decoded_mixamo_scene();
    scene.clips.clear();

    let err = import_scene(scene).unwrap_err();
    assert!(matches!(err, RetargetError::NoAnimationError(_)));
}

#[test]
fn empty_clips_do_not_count() {
    let mut scene = decoded_mixamo_scene();
    scene.clips = vec![myth_retarget::AnimationClip::new("empty", vec![])];

    let err = import_scene(scene).unwrap_err();
    assert!(matches!(err, RetargetError::NoAnimationError(_)));
}

#[test]
fn rig_without_hips_is_a_mapping_error() {
    let mut rig = Rig::new();
    let root = rig.create_node("Root");
    rig.create_child(root, "Bone001", Transform::IDENTITY);

    let scene = DecodedScene {
        rig,
        root: Some(root),
        clips: vec![walk_clip()],
    };

    let err = import_scene(scene).unwrap_err();
    assert!(matches!(err, RetargetError::MappingError(_)));
}

#[test]
fn rejected_avatar_is_an_avatar_error() {
    let importer = AnimationImporter::new(MockDecoder::finishing(decoded_mixamo_scene()), RetargetSettings::default());
    let mut solver = MockSolver {
        reject: true,
        ..MockSolver::default()
    };

    let err = block_on(importer.load_async(
        ImportSource::Bytes(BYTES.to_vec()),
        &mut solver,
        &CancellationToken::new(),
        None,
    ))
    .unwrap_err();

    assert!(matches!(err, RetargetError::AvatarBuildError(_)));
}

// ============================================================================
// Successful import
// ============================================================================

#[test]
fn import_strips_cameras_and_lights_and_resets_root() -> anyhow::Result<()> {
    let mut scene = decoded_mixamo_scene();
    let root = scene.root.ok_or_else(|| anyhow::anyhow!("fixture has a root"))?;
    scene
        .rig
        .add_to_parent(BoneNode::new("Camera").with_kind(NodeKind::Camera), root);
    scene
        .rig
        .add_to_parent(BoneNode::new("Sun").with_kind(NodeKind::Light), root);
    scene
        .rig
        .add_to_parent(BoneNode::new("Body").with_kind(NodeKind::Mesh), root);
    if let Some(t) = scene.rig.transform_mut(root) {
        t.position = Vec3::new(5.0, 0.0, 0.0);
        t.rotation = Quat::from_rotation_y(1.0);
    }

    let actor = import_scene(scene)?;
    let source = actor.source_rig();

    assert!(source.find_by_name(actor.source_root(), "Camera").is_none());
    assert!(source.find_by_name(actor.source_root(), "Sun").is_none());
    assert!(source.find_by_name(actor.source_root(), "Body").is_some());
    assert_eq!(source.transform(actor.source_root()), Some(&Transform::IDENTITY));
    Ok(())
}

#[test]
fn import_builds_skeleton_pair_and_controller() -> anyhow::Result<()> {
    let actor = import_scene(decoded_mixamo_scene())?;

    let skeleton = actor.skeleton();
    assert_eq!(skeleton.rig.name(skeleton.root), Some("HumanAvatarSkeleton"));
    assert_eq!(actor.pair().source.len(), MIXAMO_MAPPED_SLOTS);
    assert_eq!(actor.pair().target, skeleton.map);
    assert!(actor.synchronizer().is_bound());

    assert_eq!(actor.controller().clip_count(), 1);
    assert_eq!(actor.controller().root(), Some(actor.source_root()));
    assert_eq!(actor.state(), PlaybackState::Stopped);
    assert!(actor.avatar().is_some_and(|a| a.human));

    // Normalized skeleton stands on the ground
    let toes = skeleton
        .map
        .get(BoneSlot::LeftToes)
        .ok_or_else(|| anyhow::anyhow!("toes not mapped"))?;
    assert!(skeleton.rig.world_position(toes).y.abs() < 1e-3);
    Ok(())
}

#[test]
fn first_frame_is_sampled_before_mapping() -> anyhow::Result<()> {
    let mut scene = decoded_mixamo_scene();
    let root = scene.root.ok_or_else(|| anyhow::anyhow!("fixture has a root"))?;
    let hips = find(&scene.rig, root, "mixamorig:Hips")?;
    if let Some(t) = scene.rig.transform_mut(hips) {
        t.position = Vec3::new(0.0, 3.0, 0.0);
    }

    let actor = import_scene(scene)?;
    let source_hips = find(actor.source_rig(), actor.source_root(), "mixamorig:Hips")?;

    assert!(vec3_approx(
        actor.source_rig().world_position(source_hips),
        Vec3::new(0.0, 1.0, 0.0)
    ));
    Ok(())
}

#[test]
fn settings_control_skeleton_name_and_auto_play() -> anyhow::Result<()> {
    let mut settings = RetargetSettings {
        skeleton_root_name: "Retargeted".to_string(),
        ..RetargetSettings::default()
    };
    settings.playback.auto_play = true;
    settings.playback.looping = true;

    let actor = import_with(MockDecoder::finishing(decoded_mixamo_scene()), settings)?;

    assert_eq!(actor.skeleton().rig.name(actor.skeleton().root), Some("Retargeted"));
    assert_eq!(actor.state(), PlaybackState::Playing);
    assert!(actor.controller().looping);
    Ok(())
}

#[test]
fn settings_deserialize_with_defaults() -> anyhow::Result<()> {
    let settings: RetargetSettings = serde_json::from_str(r#"{ "playback": { "speed": 0.5 } }"#)?;

    assert_eq!(settings.skeleton_root_name, "HumanAvatarSkeleton");
    assert!(settings.adjust_height_to_ground);
    assert_eq!(settings.playback.speed, 0.5);
    assert!(settings.playback.auto_update);
    Ok(())
}

// ============================================================================
// RetargetedActor
// ============================================================================

#[test]
fn tick_samples_source_then_synchronizes_skeleton() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;
    actor.play();
    actor.tick(1.0);

    let source_hips = find(actor.source_rig(), actor.source_root(), "mixamorig:Hips")?;
    let source_arm = find(actor.source_rig(), actor.source_root(), "mixamorig:LeftArm")?;
    let skeleton = actor.skeleton();
    let target_hips = skeleton.map.hips().ok_or_else(|| anyhow::anyhow!("no hips"))?;
    let target_arm = skeleton
        .map
        .get(BoneSlot::LeftUpperArm)
        .ok_or_else(|| anyhow::anyhow!("no arm"))?;

    assert!(vec3_approx(
        actor.source_rig().world_position(source_hips),
        Vec3::new(0.0, 1.0, 0.5)
    ));
    assert!(vec3_approx(
        skeleton.rig.world_position(target_hips),
        actor.source_rig().world_position(source_hips)
    ));

    let arm_rotation = skeleton.rig.transform(target_arm).map_or(Quat::NAN, |t| t.rotation);
    assert!(quat_approx(arm_rotation, Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)));
    Ok(())
}

#[test]
fn actor_playback_wrappers() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;

    actor.seek(1.5);
    assert_eq!(actor.state(), PlaybackState::Paused);
    assert_eq!(actor.controller().time(), 1.5);

    actor.seek_normalized(0.25);
    assert_eq!(actor.controller().time(), 0.5);

    actor.play();
    actor.pause();
    assert_eq!(actor.state(), PlaybackState::Paused);

    actor.stop();
    assert_eq!(actor.state(), PlaybackState::Stopped);
    assert_eq!(actor.controller().time(), 0.0);

    assert!(actor.select_clip(0));
    assert!(!actor.select_clip(1));
    Ok(())
}

#[test]
fn unbind_releases_skeleton_but_keeps_playback() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;
    let before = actor.skeleton().rig.clone();

    actor.unbind();

    assert!(!actor.is_bound());
    assert!(!actor.synchronizer().is_bound());
    assert!(actor.pair().source.is_empty() && actor.pair().target.is_empty());
    assert!(actor.avatar().is_none());

    let mut solver = MockSolver::default();
    let mut pose = HumanPose {
        body_position: Vec3::ONE,
        ..HumanPose::default()
    };
    assert!(!actor.try_get_human_pose(&mut solver, &mut pose));
    assert_eq!(pose, HumanPose::default());

    actor.play();
    actor.tick(1.0);
    assert_eq!(actor.controller().time(), 1.0);
    for handle in before.traverse(actor.skeleton().root) {
        assert_eq!(before.transform(handle), actor.skeleton().rig.transform(handle));
    }
    Ok(())
}

#[test]
fn rebind_restores_synchronization() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;
    let pair: RetargetPair = *actor.pair();
    let avatar = actor.avatar().cloned().ok_or_else(|| anyhow::anyhow!("no avatar"))?;

    actor.unbind();
    actor.rebind(pair, avatar);

    assert!(actor.is_bound());
    assert!(actor.synchronizer().is_bound());
    assert_eq!(*actor.pair(), pair);
    Ok(())
}

#[test]
fn human_pose_is_read_from_skeleton() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;
    actor.play();
    actor.tick(1.0);

    let mut solver = MockSolver::default();
    let mut pose = HumanPose::default();
    assert!(actor.try_get_human_pose(&mut solver, &mut pose));

    let hips = actor.skeleton().map.hips().ok_or_else(|| anyhow::anyhow!("no hips"))?;
    assert!(vec3_approx(pose.body_position, actor.skeleton().rig.world_position(hips)));
    assert!(vec3_approx(pose.body_position, Vec3::new(0.0, 1.0, 0.5)));
    Ok(())
}

#[test]
fn retarget_onto_poses_other_rig() -> anyhow::Result<()> {
    let mut actor = import_scene(decoded_mixamo_scene())?;
    actor.play();
    actor.tick(1.0);

    let (mut target_rig, target_root) = mixamo_rig();
    let target_avatar = MockAvatar {
        valid: true,
        human: true,
        hips_name: Some("mixamorig:Hips".to_string()),
    };
    let mut solver = MockSolver::default();

    assert!(actor.retarget_onto(&mut solver, &target_avatar, &mut target_rig, target_root));

    let target_hips = find(&target_rig, target_root, "mixamorig:Hips")?;
    assert!(vec3_approx(target_rig.world_position(target_hips), Vec3::new(0.0, 1.0, 0.5)));
    Ok(())
}

#[test]
fn retarget_onto_rejects_non_human_target() -> anyhow::Result<()> {
    let actor = import_scene(decoded_mixamo_scene())?;
    let (mut target_rig, target_root) = mixamo_rig();
    let target_avatar = MockAvatar {
        valid: true,
        human: false,
        hips_name: None,
    };
    let mut solver = MockSolver::default();

    assert!(!actor.retarget_onto(&mut solver, &target_avatar, &mut target_rig, target_root));
    Ok(())
}
