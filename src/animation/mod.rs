//! Animation clips and playback.
//!
//! Keyframe tracks are bound to rig nodes by name and sampled through the
//! [`AnimationSampler`] trait. [`PlaybackController`] drives the time cursor.

mod values;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod playback;
pub mod sampler;
pub mod tracks;

pub use binder::Binder;
pub use binding::{PropertyBinding, SampledValue, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use playback::{ListenerKey, PlaybackController, PlaybackEvent, PlaybackState};
pub use sampler::{AnimationSampler, ClipSampler};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
