//! Progress events for long-running scans.
//!
//! The survey and the repetition finder run for days over the full output
//! space. They hand periodic [`ProgressEvent`]s to a [`ProgressReporter`];
//! reporters only observe and never feed back into the search.

use std::fmt;
use std::time::{Duration, Instant};

/// Snapshot of a scan's progress with a naive linear time estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Elements processed so far (first outputs, stream positions, ...).
    pub processed: u64,
    /// Elements in the whole scan.
    pub total: u64,
    /// Hits so far (collisions, resolved candidates, ...).
    pub found: usize,
    /// `processed / total`, in `[0, 1]` for a well-formed scan.
    pub completion: f64,
    pub elapsed: Duration,
    /// `elapsed / completion`; `None` until some progress has been made.
    pub estimated_total: Option<Duration>,
    pub estimated_remaining: Option<Duration>,
    /// What triggered the event, printed ahead of the counters.
    pub note: Option<String>,
}

impl ProgressEvent {
    pub fn measure(processed: u64, total: u64, found: usize, start: Instant) -> Self {
        Self::from_elapsed(processed, total, found, start.elapsed())
    }

    pub fn from_elapsed(processed: u64, total: u64, found: usize, elapsed: Duration) -> Self {
        let completion = if total == 0 {
            1.0
        } else {
            processed as f64 / total as f64
        };
        let estimated_total = if completion > 0.0 {
            Duration::try_from_secs_f64(elapsed.as_secs_f64() / completion).ok()
        } else {
            None
        };
        let estimated_remaining = estimated_total.map(|t| t.saturating_sub(elapsed));

        ProgressEvent {
            processed,
            total,
            found,
            completion,
            elapsed,
            estimated_total,
            estimated_remaining,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(note) = &self.note {
            write!(f, "{} - ", note)?;
        }
        write!(
            f,
            "checked: {} of {}; found: {} - completion: {:.4} % - elapsed time: {:.1} s",
            self.processed,
            self.total,
            self.found,
            self.completion * 100.0,
            self.elapsed.as_secs_f64()
        )?;
        if let (Some(total), Some(remaining)) = (self.estimated_total, self.estimated_remaining) {
            write!(
                f,
                " - total time est.: {:.1} s - remaining time est.: {:.1} s (= {:.1} h)",
                total.as_secs_f64(),
                remaining.as_secs_f64(),
                remaining.as_secs_f64() / 3_600.0
            )?;
        }
        Ok(())
    }
}

/// Receiver of progress events.
pub trait ProgressReporter {
    fn report(&mut self, event: &ProgressEvent);
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &mut R {
    fn report(&mut self, event: &ProgressEvent) {
        (**self).report(event)
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Box<R> {
    fn report(&mut self, event: &ProgressEvent) {
        (**self).report(event)
    }
}

/// Writes each event through the `log` facade at info level.
#[derive(Debug, Clone, Copy)]
pub struct LogReporter {
    label: &'static str,
}

impl LogReporter {
    pub fn new(label: &'static str) -> Self {
        LogReporter { label }
    }

    /// The message logged for `event`.
    pub fn line(&self, event: &ProgressEvent) -> String {
        format!("{}: {}", self.label, event)
    }
}

impl ProgressReporter for LogReporter {
    fn report(&mut self, event: &ProgressEvent) {
        log::info!("{}", self.line(event));
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&mut self, _event: &ProgressEvent) {}
}

/// Keeps every event, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    pub events: Vec<ProgressEvent>,
}

impl ProgressReporter for CollectingReporter {
    fn report(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }
}
