#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! # Myth Retarget
//!
//! Humanoid skeletal retargeting: identify the bones of an arbitrarily named
//! rig, clone and normalize it into a canonical T-pose, and copy the animated
//! pose onto it every frame.
//!
//! ```rust,ignore
//! use myth_retarget::{AnimationImporter, CancellationToken, ImportSource, RetargetSettings};
//!
//! let importer = AnimationImporter::new(decoder, RetargetSettings::default());
//! let mut actor = importer
//!     .load_async(ImportSource::Path("walk.fbx".into()), &mut solver, &CancellationToken::new(), None)
//!     .await?;
//! actor.play();
//! loop {
//!     actor.tick(dt);
//! }
//! ```

pub mod animation;
pub mod errors;
pub mod humanoid;
pub mod import;
pub mod scene;
pub mod settings;

pub use animation::{AnimationClip, AnimationSampler, ClipSampler, PlaybackController, PlaybackEvent, PlaybackState};
pub use errors::{Result, RetargetError};
pub use humanoid::{
    AvatarDescriptorBuilder, BoneMap, BoneMapper, BoneSlot, HumanPose, HumanoidDescriptor, PoseSolver,
    PoseSynchronizer, RetargetPair, SkeletonCloner, TPoseNormalizer,
};
pub use import::{AnimationImporter, CancellationToken, ImportSource, RetargetedActor};
pub use scene::{BoneHandle, BoneNode, Rig, Transform};
pub use settings::{PlaybackSettings, RetargetSettings};
