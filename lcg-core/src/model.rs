//! The truncated 48-bit recurrence and its 32-bit projection.
//!
//! A state is a `u64` that only ever carries `state_bits` significant bits.
//! Each step computes `state' = (state * M + A) mod 2^state_bits` and the
//! visible output is the top 32 bits of the new state, reinterpreted as a
//! two's-complement `i32`. The low `state_bits - 32` bits ("noise") never
//! leave the generator, which is what the recovery and survey crates work
//! around.

use serde::{Deserialize, Serialize};

/// Width of a projected output.
pub const OUTPUT_BITS: u32 = 32;

/// Constants of a truncated LCG: multiplier, addend and state width.
///
/// One value of this type is shared by reference between all components;
/// none of them re-derive the mask or shift per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcgParams {
    pub multiplier: u64,
    pub addend: u64,
    pub state_bits: u32,
}

/// The generator family behind `java.util.Random`.
pub const JAVA_RANDOM: LcgParams = LcgParams::new(0x5DEECE66D, 0xB, 48);

impl LcgParams {
    /// Build a parameter set. The state must be wider than one output and
    /// narrower than a `u64`.
    pub const fn new(multiplier: u64, addend: u64, state_bits: u32) -> Self {
        assert!(
            state_bits > OUTPUT_BITS && state_bits < 64,
            "state width must lie in (32, 64)"
        );
        LcgParams {
            multiplier,
            addend,
            state_bits,
        }
    }

    #[inline]
    pub const fn mask(&self) -> u64 {
        (1u64 << self.state_bits) - 1
    }

    /// Number of low state bits hidden by the projection.
    #[inline]
    pub const fn noise_bits(&self) -> u32 {
        self.state_bits - OUTPUT_BITS
    }

    /// Number of states that project onto any single output.
    #[inline]
    pub const fn noise_count(&self) -> u64 {
        1u64 << self.noise_bits()
    }

    /// One step of the recurrence, masked to the state width.
    #[inline]
    pub fn advance(&self, state: u64) -> u64 {
        state
            .wrapping_mul(self.multiplier)
            .wrapping_add(self.addend)
            & self.mask()
    }

    /// The visible output of a state: bits `state_bits-1 .. noise_bits`.
    #[inline]
    pub fn project(&self, state: u64) -> i32 {
        (state >> self.noise_bits()) as u32 as i32
    }

    /// Advance once and project the new state, i.e. one generator draw.
    #[inline]
    pub fn next_output(&self, state: u64) -> (u64, i32) {
        let next = self.advance(state);
        (next, self.project(next))
    }

    /// High bits shared by every state that projects onto `output`.
    #[inline]
    pub fn seed_base(&self, output: i32) -> u64 {
        u64::from(output as u32) << self.noise_bits()
    }

    /// The candidate state for `output` with the given low bits.
    #[inline]
    pub fn candidate(&self, output: i32, noise: u64) -> u64 {
        self.seed_base(output) | (noise & (self.noise_count() - 1))
    }

    /// Initial scrambling applied by `new java.util.Random(seed)`.
    pub fn scramble(&self, seed: u64) -> u64 {
        (seed ^ self.multiplier) & self.mask()
    }

    /// Smallest circular distance between `d * M` and zero modulo the state
    /// space, over all noise differences `d` in `[1, noise_count)`.
    ///
    /// Two candidates `base | n1` and `base | n2` advance to states that differ
    /// by `(n2 - n1) * M`. Their outputs can only coincide when that difference
    /// is smaller than `noise_count`, so a gap at or above `noise_count` means
    /// no first output has two noise values sharing a successor.
    pub fn min_noise_gap(&self) -> u64 {
        let modulus = self.mask() + 1;
        (1..self.noise_count())
            .map(|d| {
                let r = d.wrapping_mul(self.multiplier) & self.mask();
                r.min(modulus - r)
            })
            .min()
            .unwrap_or(modulus)
    }

    /// Whether successor collisions under a fixed first output are possible
    /// at all for these constants.
    pub fn successor_collisions_possible(&self) -> bool {
        self.min_noise_gap() < self.noise_count()
    }
}

impl Default for LcgParams {
    fn default() -> Self {
        JAVA_RANDOM
    }
}
