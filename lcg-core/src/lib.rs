//! Shared model, errors, output sources and progress reporting for analysing
//! the truncated 48-bit LCG behind `java.util.Random`.
//!
//! The generator keeps a 48-bit state but only reveals its top 32 bits per
//! draw. The crates built on top of this one exploit that:
//!
//! - `seed-recovery`: recover the full state from a few outputs and predict
//!   the rest of the stream
//! - `collision-survey`: search every first output for two hidden states
//!   sharing a successor
//! - `repetition-finder`: confirm the cycle length by watching a stored
//!   window recur in the stream

pub mod error;
pub mod model;
pub mod progress;
pub mod source;

pub use error::{LcgError, Result};
pub use model::{LcgParams, JAVA_RANDOM, OUTPUT_BITS};
pub use progress::{
    CollectingReporter, LogReporter, ProgressEvent, ProgressReporter, SilentReporter,
};
pub use source::{JavaRandom, OutputSource, ReplaySource, SourceError};

/// Full period of the canonical generator: every 48-bit state is visited once.
pub const JAVA_RANDOM_PERIOD: u64 = 1 << 48;

/// Number of distinct 32-bit outputs.
pub const OUTPUT_SPACE: u64 = 1 << 32;
