use glam::{Quat, Vec3};

use crate::animation::binding::{SampledValue, TargetPath};
use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            Self::Vector3(track) => track.end_time(),
            Self::Quaternion(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Vector3(track) => track.is_empty(),
            Self::Quaternion(track) => track.is_empty(),
        }
    }

    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<SampledValue> {
        match self {
            Self::Vector3(track) => track.sample_with_cursor(time, cursor).map(SampledValue::Vector3),
            Self::Quaternion(track) => track.sample_with_cursor(time, cursor).map(SampledValue::Quaternion),
        }
    }
}

/// Metadata plus keyframe data of one animated property.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

impl Track {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath, data: TrackData) -> Self {
        Self {
            meta: TrackMeta {
                node_name: node_name.into(),
                target,
            },
            data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the time of its latest keyframe.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(|t| t.data.end_time()).fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// `true` when no track carries a keyframe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(|t| t.data.is_empty())
    }
}
