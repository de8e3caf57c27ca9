use std::path::PathBuf;

use crate::animation::{AnimationSampler, ClipSampler, PlaybackController};
use crate::errors::{Result, RetargetError};
use crate::humanoid::{
    BoneMapper, PoseSolver, RetargetPair, SkeletonCloner, TPoseNormalizer, build_human_avatar,
};
use crate::import::actor::RetargetedActor;
use crate::import::decoder::{AnimationDecoder, CancellationToken, DecodeStep, DecodeTask, DecodedScene, yield_now};
use crate::scene::{NodeKind, Transform};
use crate::settings::RetargetSettings;

/// Where the animation file comes from.
#[derive(Debug, Clone)]
pub enum ImportSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl From<Vec<u8>> for ImportSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for ImportSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Decodes animation files and turns them into [`RetargetedActor`]s.
pub struct AnimationImporter<D> {
    decoder: D,
    settings: RetargetSettings,
}

impl<D: AnimationDecoder> AnimationImporter<D> {
    #[must_use]
    pub fn new(decoder: D, settings: RetargetSettings) -> Self {
        Self { decoder, settings }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RetargetSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut RetargetSettings {
        &mut self.settings
    }

    /// Reads, decodes and retargets an animation file.
    ///
    /// The decoder is stepped cooperatively, yielding to the executor between
    /// steps. `cancel` is checked before every step; a cancelled import returns
    /// [`RetargetError::Cancelled`] and never runs retargeting.
    pub async fn load_async<S: PoseSolver>(
        &self,
        source: ImportSource,
        solver: &mut S,
        cancel: &CancellationToken,
        progress: Option<&dyn Fn(f32)>,
    ) -> Result<RetargetedActor<S::Avatar>> {
        let result = self.load_inner(source, solver, cancel, progress).await;

        match &result {
            Err(RetargetError::Cancelled) => log::info!("Loading task was canceled."),
            Err(e) => log::error!("Failed to load animation: {e}"),
            Ok(_) => {}
        }
        result
    }

    async fn load_inner<S: PoseSolver>(
        &self,
        source: ImportSource,
        solver: &mut S,
        cancel: &CancellationToken,
        progress: Option<&dyn Fn(f32)>,
    ) -> Result<RetargetedActor<S::Avatar>> {
        let bytes = read_source(source).await?;
        let scene = self.decode(bytes, cancel, progress).await?;
        self.import_decoded(scene, solver)
    }

    async fn decode(
        &self,
        bytes: Vec<u8>,
        cancel: &CancellationToken,
        progress: Option<&dyn Fn(f32)>,
    ) -> Result<DecodedScene> {
        let report = |value: f32| {
            if let Some(progress) = progress {
                progress(value);
            }
        };

        let mut task = self.decoder.begin(bytes);
        loop {
            if cancel.is_cancelled() {
                return Err(RetargetError::Cancelled);
            }

            match task.step() {
                DecodeStep::Pending => {
                    report(task.progress());
                    yield_now().await;
                }
                DecodeStep::Finished(scene) => {
                    report(1.0);
                    return Ok(scene);
                }
                DecodeStep::Canceled => return Err(RetargetError::Cancelled),
                DecodeStep::Failed(message) => return Err(RetargetError::DecodeError(message)),
            }
        }
    }

    /// Retargets an already decoded scene.
    ///
    /// Strips cameras and lights, resets the root transform, samples the first
    /// clip at t = 0, maps and clones the skeleton, normalizes it into the
    /// T-pose, builds the avatar and wires up synchronization and playback.
    pub fn import_decoded<S: PoseSolver>(
        &self,
        scene: DecodedScene,
        solver: &mut S,
    ) -> Result<RetargetedActor<S::Avatar>> {
        let DecodedScene { mut rig, root, clips } = scene;

        let root = root.filter(|&r| rig.contains(r)).ok_or_else(|| {
            RetargetError::DecodeError("The root object was not found in the decode result.".to_string())
        })?;

        // Cameras and lights are not part of the skeleton
        let strip: Vec<_> = rig
            .traverse(root)
            .into_iter()
            .filter(|&h| h != root)
            .filter(|&h| rig.get_node(h).is_some_and(|n| matches!(n.kind, NodeKind::Camera | NodeKind::Light)))
            .collect();
        for handle in strip {
            rig.remove_node(handle);
        }

        if let Some(transform) = rig.transform_mut(root) {
            *transform = Transform::IDENTITY;
        }

        let mut samplers: Vec<ClipSampler> = clips
            .into_iter()
            .filter(|clip| !clip.is_empty())
            .map(ClipSampler::from)
            .collect();
        let Some(first) = samplers.first_mut() else {
            return Err(RetargetError::NoAnimationError(
                "No animation clips found in the decode result.".to_string(),
            ));
        };

        // Rest offsets of animated bones come from the first frame
        first.sample(&mut rig, root, 0.0);

        let source_map = BoneMapper::new().map(&rig, root);
        for slot in source_map.missing_required() {
            log::debug!("Required bone {slot:?} not found");
        }

        let cloner = SkeletonCloner::new(self.settings.skeleton_root_name.as_str());
        let mut skeleton = cloner.clone_skeleton(&rig, &source_map)?;

        TPoseNormalizer::new(self.settings.adjust_height_to_ground).apply(&mut skeleton.rig, &skeleton.map);

        let avatar = build_human_avatar(solver, &skeleton.rig, skeleton.root, &skeleton.map)?;

        let pair = RetargetPair::new(source_map, skeleton.map);

        let mut controller = PlaybackController::new(&self.settings.playback);
        controller.setup(root, samplers);
        if self.settings.playback.auto_play {
            controller.play(&mut rig);
        }

        log::info!(
            "Imported animation: {} bones mapped, {} clip(s)",
            pair.source.len(),
            controller.clip_count()
        );

        Ok(RetargetedActor::new(rig, root, skeleton, pair, controller, avatar))
    }
}

async fn read_source(source: ImportSource) -> Result<Vec<u8>> {
    let bytes = match source {
        ImportSource::Bytes(bytes) => bytes,
        ImportSource::Path(path) => {
            if path.as_os_str().is_empty() {
                return Err(RetargetError::StreamError("File path is null or empty.".to_string()));
            }
            if !tokio::fs::try_exists(&path).await? {
                return Err(RetargetError::StreamError(format!(
                    "File not found at path: {}",
                    path.display()
                )));
            }
            tokio::fs::read(&path).await?
        }
    };

    if bytes.is_empty() {
        return Err(RetargetError::StreamError("Stream is null or empty.".to_string()));
    }
    Ok(bytes)
}
