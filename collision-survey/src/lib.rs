//! # collision-survey
//!
//! Exhaustive search for first outputs under which two hidden states share a
//! successor output.
//!
//! State recovery from two outputs is only sound if, for a fixed first output
//! `f`, the 2^16 candidate states `f << 16 | noise` all project onto distinct
//! next outputs. The survey checks this directly: for every `f` in the
//! requested range it advances each candidate once and records every next
//! output that was already produced by a different noise value.
//!
//! The full domain is 2^32 first outputs times 2^16 candidates, so progress is
//! reported periodically with a linear estimate of the remaining time.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use lcg_core::{LcgParams, ProgressEvent, ProgressReporter, Result, SilentReporter, JAVA_RANDOM};

/// Two distinct noise values under `first` that advance to the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub first: i32,
    pub next: i32,
    /// Noise value that produced `next` first.
    pub earlier_noise: u32,
    /// Noise value that produced `next` again.
    pub noise: u32,
}

/// Range and reporting cadence of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyConfig {
    pub first: i32,
    /// Inclusive upper end of the range.
    pub last: i32,
    /// Report progress every this many first outputs; 0 disables periodic
    /// reports (the final one is always sent).
    pub progress_interval: u64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            first: i32::MIN,
            last: i32::MAX,
            progress_interval: 1024,
        }
    }
}

impl SurveyConfig {
    pub fn range(first: i32, last: i32) -> Self {
        SurveyConfig {
            first,
            last,
            ..Default::default()
        }
    }

    /// Number of first outputs in the range.
    pub fn len(&self) -> u64 {
        if self.last < self.first {
            0
        } else {
            (i64::from(self.last) - i64::from(self.first) + 1) as u64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a survey run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub params: LcgParams,
    pub first: i32,
    pub last: i32,
    pub elements_checked: u64,
    pub collisions: Vec<Collision>,
    pub elapsed_secs: f64,
}

/// Runs the per-first-output scan, owning the scratch set between calls.
#[derive(Debug)]
pub struct CollisionSurveyor<'p> {
    params: &'p LcgParams,
    /// next output -> noise value that first produced it. Cleared for every
    /// first output; entries never carry over.
    seen: HashMap<i32, u32>,
}

impl<'p> CollisionSurveyor<'p> {
    pub fn new(params: &'p LcgParams) -> Self {
        // Sized for the whole noise space up front, at a low load factor.
        let capacity = (params.noise_count() * 4) as usize;
        CollisionSurveyor {
            params,
            seen: HashMap::with_capacity(capacity),
        }
    }

    /// Append every collision under `first` to `out`; returns how many were
    /// found.
    pub fn collisions_for(&mut self, first: i32, out: &mut Vec<Collision>) -> usize {
        self.seen.clear();
        let before = out.len();

        for noise in 0..self.params.noise_count() {
            let candidate = self.params.candidate(first, noise);
            let next = self.params.project(self.params.advance(candidate));
            let noise = noise as u32;
            match self.seen.entry(next) {
                Entry::Occupied(e) => {
                    log::debug!("pair found twice: {} => {}", first, next);
                    out.push(Collision {
                        first,
                        next,
                        earlier_noise: *e.get(),
                        noise,
                    });
                }
                Entry::Vacant(e) => {
                    e.insert(noise);
                }
            }
        }

        out.len() - before
    }

    /// Scan every first output in `config`'s range.
    pub fn survey(
        &mut self,
        config: &SurveyConfig,
        reporter: &mut impl ProgressReporter,
    ) -> SurveyReport {
        let start = Instant::now();
        let total = config.len();
        let mut collisions = Vec::new();
        let mut checked = 0u64;

        log::info!(
            "surveying first outputs {}..={} ({} values, {} candidates each)",
            config.first,
            config.last,
            total,
            self.params.noise_count()
        );

        for first in config.first..=config.last {
            let found = self.collisions_for(first, &mut collisions);
            if found > 0 {
                log::info!("{} collision(s) under first output {}", found, first);
            }
            checked += 1;
            if config.progress_interval != 0 && checked % config.progress_interval == 0 {
                reporter.report(&ProgressEvent::measure(
                    checked,
                    total,
                    collisions.len(),
                    start,
                ));
            }
        }

        let elapsed = start.elapsed();
        reporter.report(&ProgressEvent::from_elapsed(
            checked,
            total,
            collisions.len(),
            elapsed,
        ));

        SurveyReport {
            params: *self.params,
            first: config.first,
            last: config.last,
            elements_checked: checked,
            collisions,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

/// Survey `first..=last` under the `java.util.Random` constants without
/// progress reporting.
pub fn survey(first: i32, last: i32) -> Vec<Collision> {
    CollisionSurveyor::new(&JAVA_RANDOM)
        .survey(&SurveyConfig::range(first, last), &mut SilentReporter)
        .collisions
}

/// Recheck a reported collision from scratch.
pub fn verify_collision(params: &LcgParams, collision: &Collision) -> bool {
    let next_of = |noise: u32| {
        let candidate = params.candidate(collision.first, u64::from(noise));
        params.project(params.advance(candidate))
    };
    let in_range = |noise: u32| u64::from(noise) < params.noise_count();

    collision.earlier_noise != collision.noise
        && in_range(collision.earlier_noise)
        && in_range(collision.noise)
        && next_of(collision.earlier_noise) == collision.next
        && next_of(collision.noise) == collision.next
}

/// Write a report as pretty JSON, creating parent directories as needed.
pub fn save_report(report: &SurveyReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
