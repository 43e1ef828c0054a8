//! Central error types for the timeline engine (thiserror-based).

use thiserror::Error;

use crate::types::{ClipId, SourceId};

/// Top-level editor error.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by clip store and playback operations.
///
/// All of these are recoverable: the session state is left exactly as it
/// was before the failed call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Clip not found: {clip_id}")]
    NotFound { clip_id: ClipId },

    #[error("Split point {at}s is not strictly inside clip {clip_id} [{start}s, {end}s)")]
    InvalidSplitPoint {
        clip_id: ClipId,
        at: f64,
        start: f64,
        end: f64,
    },

    #[error("Cannot start playback: the timeline has no clips")]
    EmptyProjectPlayback,

    /// A stored clip breaks a store invariant (rejected on load).
    #[error("Invalid clip {clip_id}: {reason}")]
    InvalidClip { clip_id: ClipId, reason: String },
}

/// Media asset probing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("Media source unavailable: {source_id}: {reason}")]
    Unavailable { source_id: SourceId, reason: String },

    #[error("Media source {source_id} reported an unusable duration: {duration}")]
    InvalidDuration { source_id: SourceId, duration: f64 },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Convenience Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Convenience Result type for editor operations spanning several domains.
pub type EditorResult<T> = Result<T, EditorError>;
