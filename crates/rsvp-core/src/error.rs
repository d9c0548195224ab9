//! Error types for the pacing engine.

use crate::playback::PlaybackStatus;
use thiserror::Error;
use tracing::error;

/// Failures reported by a [`crate::source::DocumentWordSource`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("not authorized to read this document")]
    Unauthorized,

    #[error("document is empty or could not be parsed")]
    EmptyContent,

    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("advance fired while playback is {0}")]
    AdvanceWhileNotPlaying(PlaybackStatus),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("advance timer already armed (generation {0})")]
    AlreadyArmed(u64),
}

/// Programming errors panic in debug builds and are logged and absorbed in
/// release builds.
pub(crate) fn invariant_violation(err: &dyn std::error::Error) {
    error!(%err, "Playback invariant violated");
    debug_assert!(false, "invariant violation: {err}");
}
