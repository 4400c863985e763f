//! Error type shared by every crate in the workspace.

use crate::source::SourceError;

/// Errors raised by state recovery, the collision survey and the
/// repetition finder.
#[derive(Debug, thiserror::Error)]
pub enum LcgError {
    #[error("at least two observed outputs are required, got {given}")]
    InsufficientInput { given: usize },

    #[error("found {matches} matching seeds; add one more observed output to the input")]
    AmbiguousSeed { matches: usize },

    #[error("found no matching seed; the observed outputs are not consecutive outputs of this generator")]
    NoMatchingSeed,

    #[error("window length {window_length} is not usable with an expected period of {period}")]
    InvalidWindowLength { window_length: usize, period: u64 },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LcgError>;
