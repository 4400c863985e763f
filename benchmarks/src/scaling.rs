//! Throughput measurements for the three analyses.
//!
//! Times state recovery per observation length, the collision survey per
//! first output, and the repetition finder per drawn output, then
//! extrapolates each rate to the full `java.util.Random` domain.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use collision_survey::CollisionSurveyor;
use lcg_core::{
    JavaRandom, OutputSource, SilentReporter, SourceError, JAVA_RANDOM, JAVA_RANDOM_PERIOD,
    OUTPUT_SPACE,
};
use repetition_finder::{MatchOutcome, RepetitionDetector};
use seed_recovery::StateRecoverer;

/// Recoveries timed per observation length.
const RECOVERY_TRIALS: usize = 20;

/// Consecutive first outputs surveyed per sample.
const SURVEY_SPAN: i32 = 64;

/// Full-period LCG over `bits` bits, emitting the state without its low
/// nibble.
struct ToyStream {
    state: u64,
    mask: u64,
}

impl ToyStream {
    fn new(bits: u32, seed: u64) -> Self {
        let mask = (1u64 << bits) - 1;
        ToyStream {
            state: seed & mask,
            mask,
        }
    }
}

impl OutputSource for ToyStream {
    fn next_output(&mut self) -> Result<i32, SourceError> {
        self.state = (self.state * 0xE66D + 0xB) & self.mask;
        Ok((self.state >> 4) as i32)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1e-3 {
        format!("{:.1} us", secs * 1e6)
    } else if secs < 1.0 {
        format!("{:.1} ms", secs * 1e3)
    } else if secs < 3_600.0 {
        format!("{:.1} s", secs)
    } else if secs < 86_400.0 * 365.0 {
        format!("{:.1} h", secs / 3_600.0)
    } else {
        format!("{:.1} y", secs / (86_400.0 * 365.0))
    }
}

fn main() {
    print_banner();

    let mut rng = StdRng::seed_from_u64(12345);

    measure_recovery(&mut rng);
    measure_survey(&mut rng);
    measure_repetition(&mut rng);
}

fn print_banner() {
    println!("================================================================");
    println!("  SCALING: throughput of recovery, survey and repetition search");
    println!("================================================================\n");
}

fn measure_recovery(rng: &mut StdRng) {
    println!("State recovery ({} trials per length):", RECOVERY_TRIALS);
    println!("  {:>8} | {:>12} | {:>8}", "Observed", "Mean time", "Solved");
    println!("  {}", "-".repeat(34));

    for observed_len in 2..=5usize {
        let mut total = Duration::ZERO;
        let mut solved = 0;
        for _ in 0..RECOVERY_TRIALS {
            let mut random = JavaRandom::new(rng.gen());
            let observed = random.take_outputs(observed_len);
            let start = Instant::now();
            let result = StateRecoverer::new(observed).and_then(|r| r.recover_state());
            total += start.elapsed();
            if result.is_ok() {
                solved += 1;
            }
        }
        println!(
            "  {:>8} | {:>12} | {:>4}/{:<3}",
            observed_len,
            format_duration(total / RECOVERY_TRIALS as u32),
            solved,
            RECOVERY_TRIALS
        );
    }
    println!();
}

fn measure_survey(rng: &mut StdRng) {
    let mut surveyor = CollisionSurveyor::new(&JAVA_RANDOM);
    let mut collisions = Vec::new();
    let base: i32 = rng.gen_range(i32::MIN..i32::MAX - SURVEY_SPAN);

    let start = Instant::now();
    for first in base..base + SURVEY_SPAN {
        surveyor.collisions_for(first, &mut collisions);
    }
    let elapsed = start.elapsed();
    let per_first = elapsed / SURVEY_SPAN as u32;

    println!("Collision survey:");
    println!(
        "  first outputs {}..{}: {} collision(s)",
        base,
        base + SURVEY_SPAN,
        collisions.len()
    );
    println!("  per first output:     {}", format_duration(per_first));
    println!(
        "  full domain estimate: {}",
        format_duration(per_first.mul_f64(OUTPUT_SPACE as f64))
    );
    println!();
}

/// One timed detector run.
struct DetectorTiming {
    outcome: lcg_core::Result<MatchOutcome>,
    drawn: u64,
    elapsed: Duration,
}

impl DetectorTiming {
    fn measure(
        period: u64,
        window_length: usize,
        source: impl OutputSource,
    ) -> lcg_core::Result<Self> {
        let mut detector = RepetitionDetector::new(period, window_length)?;
        let start = Instant::now();
        let outcome = detector.run(source, &mut SilentReporter);
        Ok(DetectorTiming {
            outcome,
            drawn: detector.outputs_drawn(),
            elapsed: start.elapsed(),
        })
    }

    fn draws_per_sec(&self) -> f64 {
        self.drawn as f64 / self.elapsed.as_secs_f64().max(1e-9)
    }

    /// Throughput of a run that reached an outcome; failed runs give none.
    fn rate(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|_| self.draws_per_sec())
    }
}

fn measure_repetition(rng: &mut StdRng) {
    println!("Repetition finder (window 8):");
    println!(
        "  {:>4} | {:>14} | {:>14} | {:>12} | {:>14}",
        "Bits", "Outcome", "Drawn", "Time", "Draws/s"
    );
    println!("  {}", "-".repeat(70));

    let mut rate = None;
    for bits in [12u32, 14, 16, 18, 20] {
        let source = ToyStream::new(bits, rng.gen());
        let timing = match DetectorTiming::measure(1 << bits, 8, source) {
            Ok(timing) => timing,
            Err(e) => {
                eprintln!("  {:>4} | {}", bits, e);
                continue;
            }
        };
        if let Some(per_sec) = timing.rate() {
            rate = Some(per_sec);
        }

        let outcome = match &timing.outcome {
            Ok(outcome) => format!("{:?}", outcome),
            Err(e) => format!("error: {}", e),
        };
        println!(
            "  {:>4} | {:>14} | {:>14} | {:>12} | {:>14.0}",
            bits,
            outcome,
            timing.drawn,
            format_duration(timing.elapsed),
            timing.draws_per_sec()
        );
    }

    if let Some(per_sec) = rate {
        println!(
            "\n  one java.util.Random period at that rate: {}",
            format_duration(Duration::from_secs_f64(JAVA_RANDOM_PERIOD as f64 / per_sec))
        );
    }
}
