//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RetargetError`] covers every import-time failure:
//! - Empty or missing input streams
//! - Decoder failures and cancellation
//! - Rigs that cannot be mapped onto the humanoid layout
//! - Files without usable animation
//! - Avatars rejected by the pose solver
//!
//! Per-frame operations (playback advance, pose synchronization) never return
//! errors. They degrade to no-ops when a reference is missing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_retarget::errors::{RetargetError, Result};
//!
//! fn import() -> Result<()> {
//!     Err(RetargetError::StreamError("Stream is null or empty.".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for retargeting.
#[derive(Error, Debug)]
pub enum RetargetError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Input bytes or path were empty or missing.
    #[error("Stream error: {0}")]
    StreamError(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// The decoder rejected the file or produced no root object.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Decoding was cancelled cooperatively.
    ///
    /// Not a fault. Callers should treat it like "no result".
    #[error("Import was canceled")]
    Cancelled,

    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    /// A required bone (typically Hips) is absent from a rig.
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// The decoded file has no usable animation clip.
    #[error("No animation: {0}")]
    NoAnimationError(String),

    /// The descriptor produced an invalid or non-humanoid avatar.
    #[error("Avatar build error: {0}")]
    AvatarBuildError(String),
}

impl RetargetError {
    /// Returns `true` for the benign cancellation outcome.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Alias for `Result<T, RetargetError>`.
pub type Result<T> = std::result::Result<T, RetargetError>;
