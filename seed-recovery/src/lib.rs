//! # seed-recovery
//!
//! Recovers the hidden 48-bit state of the `java.util.Random` LCG from two or
//! more consecutive `nextInt()` outputs, then predicts the rest of the stream.
//!
//! Every output pins the top 32 bits of the state that produced it, leaving
//! only the 16 low "noise" bits unknown. The recoverer tries all 2^16 noise
//! values for the first observed output and keeps the candidates whose
//! successors reproduce every remaining observation. Exactly one candidate
//! must survive; zero or several is an error, never a guess.

use lcg_core::{LcgError, LcgParams, Result, JAVA_RANDOM};

/// A full state proven consistent with an observed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredState {
    /// The state right after the generator emitted the first observed output.
    pub state: u64,
    /// Low bits of `state`, the part the output did not reveal.
    pub noise: u64,
}

/// Recovers the state behind an observed run of consecutive outputs.
#[derive(Debug, Clone)]
pub struct StateRecoverer<'p> {
    params: &'p LcgParams,
    observed: Vec<i32>,
}

impl StateRecoverer<'static> {
    /// Recoverer for the `java.util.Random` constants.
    pub fn new(observed: impl Into<Vec<i32>>) -> Result<Self> {
        Self::with_params(&JAVA_RANDOM, observed)
    }
}

impl<'p> StateRecoverer<'p> {
    pub fn with_params(params: &'p LcgParams, observed: impl Into<Vec<i32>>) -> Result<Self> {
        let observed = observed.into();
        if observed.len() < 2 {
            return Err(LcgError::InsufficientInput {
                given: observed.len(),
            });
        }
        Ok(StateRecoverer { params, observed })
    }

    pub fn observed(&self) -> &[i32] {
        &self.observed
    }

    pub fn params(&self) -> &LcgParams {
        self.params
    }

    /// Whether `candidate` reproduces every observed output after the first.
    /// Stops at the first mismatch.
    pub fn matches(&self, candidate: u64) -> bool {
        let mut state = candidate;
        self.observed[1..].iter().all(|&expected| {
            state = self.params.advance(state);
            self.params.project(state) == expected
        })
    }

    /// Every candidate state consistent with the observations.
    ///
    /// Scans the whole noise space even after a hit; the caller decides what
    /// zero or several matches mean.
    pub fn matching_states(&self) -> Vec<u64> {
        let first = self.observed[0];
        log::debug!(
            "scanning {} candidates for first output {}",
            self.params.noise_count(),
            first
        );
        (0..self.params.noise_count())
            .map(|noise| self.params.candidate(first, noise))
            .filter(|&candidate| self.matches(candidate))
            .collect()
    }

    /// The unique state behind the observations.
    pub fn recover_state(&self) -> Result<RecoveredState> {
        let matches = self.matching_states();
        match matches.as_slice() {
            [] => Err(LcgError::NoMatchingSeed),
            [state] => {
                let noise = state & (self.params.noise_count() - 1);
                log::info!(
                    "recovered state {:#014x} (noise {:#06x}) from {} outputs",
                    state,
                    noise,
                    self.observed.len()
                );
                Ok(RecoveredState {
                    state: *state,
                    noise,
                })
            }
            many => Err(LcgError::AmbiguousSeed {
                matches: many.len(),
            }),
        }
    }

    /// The `count` outputs that follow the observed ones.
    pub fn predict(&self, count: usize) -> Result<Vec<i32>> {
        let recovered = self.recover_state()?;
        Ok(predict_from_state(
            self.params,
            recovered.state,
            self.observed.len(),
            count,
        ))
    }
}

/// Recover the state behind `observed` and predict the next `count` outputs
/// of the `java.util.Random` stream.
pub fn recover_and_predict(observed: &[i32], count: usize) -> Result<Vec<i32>> {
    StateRecoverer::new(observed)?.predict(count)
}

/// Outputs of the stream that starts at `state`.
///
/// `state` is the one that produced some known output; it is advanced `skip`
/// times to step over outputs the caller already has, then `count` outputs are
/// projected, advancing after each.
pub fn predict_from_state(params: &LcgParams, state: u64, skip: usize, count: usize) -> Vec<i32> {
    prediction_stream(params, state, skip).take(count).collect()
}

/// Lazy form of [`predict_from_state`] without an upper bound.
pub fn prediction_stream(
    params: &LcgParams,
    state: u64,
    skip: usize,
) -> impl Iterator<Item = i32> + '_ {
    let start = (0..skip).fold(state, |state, _| params.advance(state));
    std::iter::successors(Some(start), move |&state| Some(params.advance(state)))
        .map(move |state| params.project(state))
}

/// Shortcut recovery from exactly two outputs that returns the first
/// candidate whose successor matches, without checking for others.
///
/// Unsound for general use: for parameter sets where two noise values under
/// one first output share a successor, the answer is one of several equally
/// valid states and nothing signals the ambiguity. Prefer
/// [`StateRecoverer::recover_state`].
pub fn recover_first_match(params: &LcgParams, first: i32, second: i32) -> Result<u64> {
    (0..params.noise_count())
        .map(|noise| params.candidate(first, noise))
        .find(|&candidate| params.project(params.advance(candidate)) == second)
        .ok_or(LcgError::NoMatchingSeed)
}
