//! Output sources: anything that hands out one 32-bit output at a time.

use std::collections::VecDeque;

use crate::model::{LcgParams, JAVA_RANDOM};

/// Failure of an output source. Analyses treat it as fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("output source failed: {reason}")]
pub struct SourceError {
    reason: String,
}

impl SourceError {
    pub fn new(reason: impl Into<String>) -> Self {
        SourceError {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A stream of generator outputs.
pub trait OutputSource {
    fn next_output(&mut self) -> Result<i32, SourceError>;
}

impl<S: OutputSource + ?Sized> OutputSource for &mut S {
    fn next_output(&mut self) -> Result<i32, SourceError> {
        (**self).next_output()
    }
}

impl<S: OutputSource + ?Sized> OutputSource for Box<S> {
    fn next_output(&mut self) -> Result<i32, SourceError> {
        (**self).next_output()
    }
}

/// Port of `java.util.Random` restricted to `nextInt()`.
///
/// Produces the same sequence as `new java.util.Random(seed)`.
#[derive(Debug, Clone)]
pub struct JavaRandom {
    params: &'static LcgParams,
    state: u64,
}

impl JavaRandom {
    /// Matches `new java.util.Random(seed)`.
    pub fn new(seed: u64) -> Self {
        Self::with_params(&JAVA_RANDOM, seed)
    }

    pub fn with_params(params: &'static LcgParams, seed: u64) -> Self {
        JavaRandom {
            params,
            state: params.scramble(seed),
        }
    }

    /// Start from a raw internal state, skipping the seed scrambling.
    pub fn from_state(params: &'static LcgParams, state: u64) -> Self {
        JavaRandom {
            params,
            state: state & params.mask(),
        }
    }

    /// Seed from the thread RNG, for demos. The seed is logged at debug level.
    pub fn from_entropy() -> Self {
        let seed = rand::random::<u64>();
        log::debug!("java.util.Random seeded with {}", seed);
        Self::new(seed)
    }

    /// Matches `Random.setSeed(seed)`: the stream restarts as if freshly built.
    pub fn set_seed(&mut self, seed: u64) {
        self.state = self.params.scramble(seed);
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn params(&self) -> &'static LcgParams {
        self.params
    }

    /// Matches `Random.nextInt()`.
    pub fn next_int(&mut self) -> i32 {
        let (state, output) = self.params.next_output(self.state);
        self.state = state;
        output
    }

    /// Draw `count` outputs.
    pub fn take_outputs(&mut self, count: usize) -> Vec<i32> {
        (0..count).map(|_| self.next_int()).collect()
    }
}

impl OutputSource for JavaRandom {
    fn next_output(&mut self) -> Result<i32, SourceError> {
        Ok(self.next_int())
    }
}

/// Replays a fixed list of outputs and fails once it runs dry.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    pending: VecDeque<i32>,
    served: u64,
}

impl ReplaySource {
    pub fn new(outputs: impl IntoIterator<Item = i32>) -> Self {
        ReplaySource {
            pending: outputs.into_iter().collect(),
            served: 0,
        }
    }

    /// The same block of outputs repeated `times` times back to back.
    pub fn repeated(block: &[i32], times: usize) -> Self {
        Self::new(block.iter().copied().cycle().take(block.len() * times))
    }

    /// Number of outputs handed out so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl OutputSource for ReplaySource {
    fn next_output(&mut self) -> Result<i32, SourceError> {
        match self.pending.pop_front() {
            Some(output) => {
                self.served += 1;
                Ok(output)
            }
            None => Err(SourceError::new(format!(
                "stream exhausted after {} outputs",
                self.served
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_random_matches_reference_stream() {
        // new java.util.Random(42), six calls to nextInt()
        let mut random = JavaRandom::new(42);
        assert_eq!(
            random.take_outputs(6),
            vec![-1_170_105_035, 234_785_527, -1_360_544_799, 205_897_768, 1_325_939_940, -248_792_245]
        );
    }

    #[test]
    fn test_set_seed_restarts_stream() {
        let mut random = JavaRandom::new(42);
        let first = random.take_outputs(5);
        random.set_seed(42);
        assert_eq!(random.take_outputs(5), first);
    }

    #[test]
    fn test_from_entropy_continues_from_its_state() {
        let mut random = JavaRandom::from_entropy();
        assert!(random.state() <= JAVA_RANDOM.mask());
        let mut copy = JavaRandom::from_state(random.params(), random.state());
        assert_eq!(random.take_outputs(4), copy.take_outputs(4));
    }

    #[test]
    fn test_from_state_masks() {
        let random = JavaRandom::from_state(&JAVA_RANDOM, u64::MAX);
        assert_eq!(random.state(), JAVA_RANDOM.mask());
    }

    #[test]
    fn test_state_projects_onto_last_output() {
        let mut random = JavaRandom::new(7);
        let output = random.next_int();
        assert_eq!(JAVA_RANDOM.project(random.state()), output);
    }

    #[test]
    fn test_replay_source_fails_when_exhausted() {
        let mut source = ReplaySource::new([1, 2]);
        assert_eq!(source.next_output(), Ok(1));
        assert_eq!(source.next_output(), Ok(2));
        let err = source.next_output().unwrap_err();
        assert_eq!(err.reason(), "stream exhausted after 2 outputs");
        assert_eq!(source.served(), 2);
    }

    #[test]
    fn test_replay_repeated() {
        let mut source = ReplaySource::repeated(&[1, 2, 3], 2);
        assert_eq!(source.remaining(), 6);
        let drawn: Vec<i32> = (0..6).map(|_| source.next_output().unwrap()).collect();
        assert_eq!(drawn, vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_source_through_mut_reference() {
        fn draw(mut source: impl OutputSource) -> i32 {
            source.next_output().unwrap()
        }
        let mut random = JavaRandom::new(42);
        assert_eq!(draw(&mut random), -1_170_105_035);
        assert_eq!(random.next_int(), 234_785_527);
    }
}
