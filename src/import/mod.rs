//! Animation import.
//!
//! # Overview
//!
//! - [`AnimationDecoder`] / [`DecodeTask`]: boundary to the external file decoder
//! - [`AnimationImporter`]: async load pipeline from bytes or a path
//! - [`RetargetedActor`]: the imported result, ticked once per frame

pub mod actor;
pub mod decoder;
pub mod importer;

pub use actor::RetargetedActor;
pub use decoder::{AnimationDecoder, CancellationToken, DecodeStep, DecodeTask, DecodedScene};
pub use importer::{AnimationImporter, ImportSource};
