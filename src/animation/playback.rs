//! Clip playback state machine.
//!
//! # Overview
//!
//! [`PlaybackController`] owns a list of samplers and a time cursor. Every
//! operation that moves the cursor evaluates the current sampler against the
//! source rig immediately, so the rig always reflects `time()`.
//!
//! # States
//!
//! ```text
//!            play                 pause
//!  Stopped ────────▶ Playing ◀──────────▶ Paused
//!     ▲                 │       play
//!     └──── stop / end ─┘
//! ```
//!
//! Seeking from `Stopped` moves to `Paused`. Reaching either end of a
//! non-looping clip stops playback and fires [`PlaybackEvent::ClipFinished`]
//! once.
//!
//! Listeners are called synchronously, in registration order, from inside the
//! operation that caused the event.

use slotmap::{SlotMap, new_key_type};

use crate::animation::sampler::{AnimationSampler, ClipSampler};
use crate::scene::{BoneHandle, Rig};
use crate::settings::PlaybackSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    StateChanged(PlaybackState),
    TimeUpdated(f32),
    ClipFinished,
}

new_key_type! {
    pub struct ListenerKey;
}

type Listener = Box<dyn FnMut(&PlaybackEvent)>;

pub struct PlaybackController<S: AnimationSampler = ClipSampler> {
    root: Option<BoneHandle>,
    clips: Vec<S>,
    current_clip: usize,

    state: PlaybackState,
    time: f32,

    pub looping: bool,
    /// Time scale. Negative values play in reverse.
    pub speed: f32,
    /// Advance from [`update`](Self::update). When `false` the host calls
    /// [`advance`](Self::advance) itself.
    pub auto_update: bool,

    listeners: SlotMap<ListenerKey, Listener>,
}

impl<S: AnimationSampler> std::fmt::Debug for PlaybackController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("root", &self.root)
            .field("clips", &self.clips.len())
            .field("current_clip", &self.current_clip)
            .field("state", &self.state)
            .field("time", &self.time)
            .field("looping", &self.looping)
            .field("speed", &self.speed)
            .field("auto_update", &self.auto_update)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: AnimationSampler> Default for PlaybackController<S> {
    fn default() -> Self {
        Self::new(&PlaybackSettings::default())
    }
}

impl<S: AnimationSampler> PlaybackController<S> {
    #[must_use]
    pub fn new(settings: &PlaybackSettings) -> Self {
        Self {
            root: None,
            clips: Vec::new(),
            current_clip: 0,
            state: PlaybackState::Stopped,
            time: 0.0,
            looping: settings.looping,
            speed: settings.speed,
            auto_update: settings.auto_update,
            listeners: SlotMap::with_key(),
        }
    }

    /// Binds the controller to the rig subtree at `root` and its clips.
    ///
    /// Resets to the first clip, `Stopped`, time 0. The rig is not evaluated
    /// until the first operation that moves the cursor.
    pub fn setup(&mut self, root: BoneHandle, clips: Vec<S>) {
        self.root = Some(root);
        self.clips = clips;
        self.current_clip = 0;
        self.time = 0.0;
        self.set_state(PlaybackState::Stopped);
    }

    /// `true` once set up with at least one clip.
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.root.is_some() && !self.clips.is_empty()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Length of the current clip, 0 when there is none.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.current().map_or(0.0, AnimationSampler::duration)
    }

    /// Time as a fraction of the clip length in `[0, 1]`.
    #[must_use]
    pub fn normalized_time(&self) -> f32 {
        let duration = self.duration();
        if duration > 0.0 { (self.time / duration).clamp(0.0, 1.0) } else { 0.0 }
    }

    #[inline]
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn current_clip_index(&self) -> usize {
        self.current_clip
    }

    #[must_use]
    pub fn current(&self) -> Option<&S> {
        self.clips.get(self.current_clip)
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<BoneHandle> {
        self.root
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn add_listener(&mut self, listener: impl FnMut(&PlaybackEvent) + 'static) -> ListenerKey {
        self.listeners.insert(Box::new(listener))
    }

    /// Returns `false` when the key was already removed.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Resumes from `Paused`, otherwise restarts from time 0.
    pub fn play(&mut self, rig: &mut Rig) {
        if !self.is_ready() {
            return;
        }

        if self.state == PlaybackState::Paused {
            self.set_state(PlaybackState::Playing);
            return;
        }

        let previous = self.time;
        self.time = 0.0;
        self.evaluate(rig);
        self.set_state(PlaybackState::Playing);
        if previous != 0.0 {
            self.emit(PlaybackEvent::TimeUpdated(self.time));
        }
    }

    /// Only valid while playing.
    pub fn pause(&mut self) {
        if !self.is_ready() || self.state != PlaybackState::Playing {
            return;
        }
        self.set_state(PlaybackState::Paused);
    }

    pub fn stop(&mut self, rig: &mut Rig) {
        if !self.is_ready() {
            return;
        }

        self.time = 0.0;
        self.evaluate(rig);
        self.set_state(PlaybackState::Stopped);
        self.emit(PlaybackEvent::TimeUpdated(self.time));
    }

    /// Play when stopped or paused, pause when playing.
    pub fn toggle(&mut self, rig: &mut Rig) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(rig);
        }
    }

    /// Moves the cursor to `time`, clamped to the clip.
    pub fn seek(&mut self, rig: &mut Rig, time: f32) {
        if !self.is_ready() {
            return;
        }

        let time = if time.is_nan() { 0.0 } else { time };
        self.time = time.clamp(0.0, self.duration().max(0.0));
        self.evaluate(rig);
        if self.state == PlaybackState::Stopped {
            self.set_state(PlaybackState::Paused);
        }
        self.emit(PlaybackEvent::TimeUpdated(self.time));
    }

    /// Seeks to a fraction of the clip length; `fraction` is clamped to `[0, 1]`.
    pub fn seek_normalized(&mut self, rig: &mut Rig, fraction: f32) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.seek(rig, fraction * self.duration());
    }

    /// Switches to clip `index` and stops. Returns `false` for an invalid index.
    pub fn select_clip(&mut self, rig: &mut Rig, index: usize) -> bool {
        if !self.is_ready() || index >= self.clips.len() {
            return false;
        }
        self.current_clip = index;
        self.stop(rig);
        true
    }

    /// Per-tick entry point for automatic playback.
    pub fn update(&mut self, rig: &mut Rig, dt: f32) {
        if self.auto_update && self.is_playing() {
            self.advance(rig, dt);
        }
    }

    /// Moves the cursor by `dt * speed` while playing.
    ///
    /// Crossing an end of the clip wraps when looping. Otherwise the cursor is
    /// clamped to that end, playback stops and `ClipFinished` fires.
    pub fn advance(&mut self, rig: &mut Rig, dt: f32) {
        if !self.is_ready() || !self.is_playing() {
            return;
        }

        let duration = self.duration();
        let delta = dt * self.speed;
        if delta == 0.0 || !delta.is_finite() {
            return;
        }

        let next = self.time + delta;
        let overshoot = if delta > 0.0 { next >= duration } else { next <= 0.0 };

        if !overshoot {
            self.time = next;
            self.evaluate(rig);
            self.emit(PlaybackEvent::TimeUpdated(self.time));
            return;
        }

        if self.looping {
            if duration <= 0.0 {
                self.time = 0.0;
                self.evaluate(rig);
                self.emit(PlaybackEvent::TimeUpdated(self.time));
                return;
            }
            let wrapped = next.rem_euclid(duration);
            // rem_euclid may round up to `duration` for tiny negative inputs
            self.time = if wrapped < duration { wrapped } else { 0.0 };
            self.evaluate(rig);
            self.emit(PlaybackEvent::TimeUpdated(self.time));
            return;
        }

        self.time = if delta > 0.0 { duration.max(0.0) } else { 0.0 };
        self.evaluate(rig);
        self.set_state(PlaybackState::Stopped);
        self.emit(PlaybackEvent::TimeUpdated(self.time));
        self.emit(PlaybackEvent::ClipFinished);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn evaluate(&mut self, rig: &mut Rig) {
        let (Some(root), Some(clip)) = (self.root, self.clips.get_mut(self.current_clip)) else {
            return;
        };
        clip.sample(rig, root, self.time);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.emit(PlaybackEvent::StateChanged(state));
    }

    fn emit(&mut self, event: PlaybackEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }
}
