use crate::animation::{ClipSampler, PlaybackController, PlaybackState};
use crate::humanoid::{Avatar, ClonedSkeleton, HumanPose, PoseSolver, PoseSynchronizer, RetargetPair};
use crate::scene::{BoneHandle, Rig};

/// An imported animation bound to its normalized humanoid skeleton.
///
/// Owns both rigs. The source rig is posed by the playback controller; the
/// cloned skeleton follows it through the synchronizer. Call [`tick`](Self::tick)
/// once per frame.
#[derive(Debug)]
pub struct RetargetedActor<A> {
    source: Rig,
    source_root: BoneHandle,
    skeleton: ClonedSkeleton,
    pair: RetargetPair,
    synchronizer: PoseSynchronizer,
    controller: PlaybackController<ClipSampler>,
    avatar: Option<A>,
}

impl<A: Avatar> RetargetedActor<A> {
    /// Assembles an actor and binds the synchronizer to `pair`.
    #[must_use]
    pub fn new(
        source: Rig,
        source_root: BoneHandle,
        skeleton: ClonedSkeleton,
        pair: RetargetPair,
        controller: PlaybackController<ClipSampler>,
        avatar: A,
    ) -> Self {
        let mut synchronizer = PoseSynchronizer::new();
        synchronizer.setup(&pair);

        Self {
            source,
            source_root,
            skeleton,
            pair,
            synchronizer,
            controller,
            avatar: Some(avatar),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn source_rig(&self) -> &Rig {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn source_root(&self) -> BoneHandle {
        self.source_root
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &ClonedSkeleton {
        &self.skeleton
    }

    #[inline]
    #[must_use]
    pub fn pair(&self) -> &RetargetPair {
        &self.pair
    }

    #[inline]
    #[must_use]
    pub fn synchronizer(&self) -> &PoseSynchronizer {
        &self.synchronizer
    }

    #[inline]
    pub fn synchronizer_mut(&mut self) -> &mut PoseSynchronizer {
        &mut self.synchronizer
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &PlaybackController<ClipSampler> {
        &self.controller
    }

    #[inline]
    pub fn controller_mut(&mut self) -> &mut PlaybackController<ClipSampler> {
        &mut self.controller
    }

    #[inline]
    #[must_use]
    pub fn avatar(&self) -> Option<&A> {
        self.avatar.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Advances playback, then copies the new source pose onto the skeleton.
    pub fn tick(&mut self, dt: f32) {
        self.controller.update(&mut self.source, dt);
        self.synchronizer.update(&self.source, &mut self.skeleton.rig);
    }

    pub fn play(&mut self) {
        self.controller.play(&mut self.source);
    }

    pub fn pause(&mut self) {
        self.controller.pause();
    }

    pub fn stop(&mut self) {
        self.controller.stop(&mut self.source);
    }

    pub fn seek(&mut self, time: f32) {
        self.controller.seek(&mut self.source, time);
    }

    pub fn seek_normalized(&mut self, fraction: f32) {
        self.controller.seek_normalized(&mut self.source, fraction);
    }

    pub fn select_clip(&mut self, index: usize) -> bool {
        self.controller.select_clip(&mut self.source, index)
    }

    // ========================================================================
    // Human pose
    // ========================================================================

    /// Reads the skeleton's current muscle-space pose.
    ///
    /// Returns `false` and resets `pose` when the actor is unbound.
    pub fn try_get_human_pose<S>(&self, solver: &mut S, pose: &mut HumanPose) -> bool
    where
        S: PoseSolver<Avatar = A>,
    {
        let Some(avatar) = self.avatar.as_ref() else {
            *pose = HumanPose::default();
            return false;
        };
        solver.get_human_pose(avatar, &self.skeleton.rig, self.skeleton.root, pose);
        true
    }

    /// Transfers the skeleton's current pose onto another avatar's rig.
    pub fn retarget_onto<S>(
        &self,
        solver: &mut S,
        target_avatar: &A,
        target_rig: &mut Rig,
        target_root: BoneHandle,
    ) -> bool
    where
        S: PoseSolver<Avatar = A>,
    {
        if !target_avatar.is_valid() || !target_avatar.is_human() {
            log::warn!("Retarget target avatar is not a valid humanoid");
            return false;
        }

        let mut pose = HumanPose::default();
        if !self.try_get_human_pose(solver, &mut pose) {
            return false;
        }
        solver.set_human_pose(target_avatar, target_rig, target_root, &pose);
        true
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Releases the retargeting binding.
    ///
    /// The synchronizer is reset and both bone maps are cleared before the
    /// avatar is dropped. Playback keeps working on the source rig.
    pub fn unbind(&mut self) {
        self.synchronizer.reset();
        self.pair.clear();
        self.avatar = None;
    }

    /// Replaces the binding with `pair` and `avatar`.
    pub fn rebind(&mut self, pair: RetargetPair, avatar: A) {
        self.unbind();
        self.pair = pair;
        self.synchronizer.setup(&self.pair);
        self.avatar = Some(avatar);
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.avatar.is_some()
    }
}
