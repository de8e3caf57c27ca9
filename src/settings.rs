//! Retargeting configuration.
//!
//! Settings are plain serde structs so they can be loaded from any format the
//! host application already uses. Missing fields fall back to [`Default`].

use serde::{Deserialize, Serialize};

/// Import-time configuration for [`AnimationImporter`](crate::import::AnimationImporter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetSettings {
    /// Name given to the container node of the cloned skeleton.
    pub skeleton_root_name: String,
    /// Ground the normalized rig so its lowest toe (or foot) sits at Y = 0.
    pub adjust_height_to_ground: bool,
    pub playback: PlaybackSettings,
}

impl Default for RetargetSettings {
    fn default() -> Self {
        Self {
            skeleton_root_name: "HumanAvatarSkeleton".to_string(),
            adjust_height_to_ground: true,
            playback: PlaybackSettings::default(),
        }
    }
}

/// Initial configuration of a [`PlaybackController`](crate::animation::PlaybackController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Advance automatically from `update`. When `false` the host drives
    /// `advance` itself.
    pub auto_update: bool,
    pub looping: bool,
    /// Time scale. Negative values play in reverse.
    pub speed: f32,
    /// Start playing as soon as the controller is set up.
    pub auto_play: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            auto_update: true,
            looping: false,
            speed: 1.0,
            auto_play: false,
        }
    }
}
