use std::sync::Arc;

use crate::animation::binder::Binder;
use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::animation::tracks::KeyframeCursor;
use crate::scene::{BoneHandle, Rig};

/// Something that can pose a rig for a given time.
///
/// The playback controller only drives time; what "evaluating a frame" means is
/// up to the sampler.
pub trait AnimationSampler {
    fn name(&self) -> &str;

    /// Clip length in seconds.
    fn duration(&self) -> f32;

    /// Writes the pose at `time` into the subtree of `rig` rooted at `root`.
    fn sample(&mut self, rig: &mut Rig, root: BoneHandle, time: f32);
}

/// Keyframe-clip sampler.
///
/// Tracks are bound to rig nodes by name on the first sample, and again whenever
/// the rig or the root changes. One cursor per track keeps monotonic playback O(1).
#[derive(Debug, Clone)]
pub struct ClipSampler {
    clip: Arc<AnimationClip>,
    bound_to: Option<(u64, BoneHandle)>,
    bindings: Vec<PropertyBinding>,
    track_cursors: Vec<KeyframeCursor>,
}

impl ClipSampler {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            bound_to: None,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    /// Re-resolves bindings against `root` in `rig` and rewinds the cursors.
    pub fn bind(&mut self, rig: &Rig, root: BoneHandle) {
        self.bindings = Binder::bind(rig, root, &self.clip);
        self.bound_to = Some((rig.id(), root));
        self.track_cursors.iter_mut().for_each(KeyframeCursor::reset);
    }
}

impl From<AnimationClip> for ClipSampler {
    fn from(clip: AnimationClip) -> Self {
        Self::new(Arc::new(clip))
    }
}

impl AnimationSampler for ClipSampler {
    fn name(&self) -> &str {
        &self.clip.name
    }

    fn duration(&self) -> f32 {
        self.clip.duration
    }

    fn sample(&mut self, rig: &mut Rig, root: BoneHandle, time: f32) {
        if self.bound_to != Some((rig.id(), root)) {
            self.bind(rig, root);
        }

        for binding in &self.bindings {
            let Some(track) = self.clip.tracks.get(binding.track_index) else {
                continue;
            };
            let Some(cursor) = self.track_cursors.get_mut(binding.track_index) else {
                continue;
            };
            let Some(value) = track.data.sample_with_cursor(time, cursor) else {
                continue;
            };
            if let Some(transform) = rig.transform_mut(binding.node_handle) {
                value.apply(binding.target, transform);
            }
        }
    }
}
