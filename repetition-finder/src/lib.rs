//! # repetition-finder
//!
//! Empirical cycle-length check for an output stream.
//!
//! The finder stores the first `window_length` outputs of a source and then
//! watches the rest of the stream for that window to recur. Every output equal
//! to the window's first element opens a candidate; each candidate is compared
//! element by element against the window until it either mismatches (a partial
//! match, recorded in the histogram) or matches the whole window. A full match
//! whose start is a multiple of the expected period confirms the period; any
//! other full match means the window was too short to fingerprint the stream.
//!
//! Streams of length 2^48 make the per-output cost matter, so the scan runs in
//! two speeds: while no candidate is open only the first window element is
//! tested, and full comparison is switched on only while candidates are open.

pub mod histogram;

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use lcg_core::{
    LcgError, OutputSource, ProgressEvent, ProgressReporter, Result, SilentReporter,
};

pub use histogram::MatchLengthHistogram;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// The window recurred at a multiple of the expected period.
    FullPeriodMatch,
    /// The window recurred somewhere else; use a longer window.
    EarlyMatch,
}

/// A candidate that has been closed, successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMatch {
    /// Stream position of the candidate's first element.
    pub start: u64,
    /// Number of window elements matched.
    pub length: usize,
}

/// Summary of a run, suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionReport {
    pub period: u64,
    pub window_length: usize,
    pub window: Vec<i32>,
    /// `None` if the run stopped before the window recurred.
    pub outcome: Option<MatchOutcome>,
    pub full_match: Option<ResolvedMatch>,
    pub outputs_drawn: u64,
    pub histogram: MatchLengthHistogram,
    pub elapsed_secs: f64,
}

/// Streams outputs and detects recurrence of the stored window.
#[derive(Debug, Clone)]
pub struct RepetitionDetector {
    period: u64,
    window_length: usize,
    window: Vec<i32>,
    /// Start positions of the open candidates, oldest first.
    anchors: Vec<u64>,
    histogram: MatchLengthHistogram,
    full_match: Option<ResolvedMatch>,
    /// Outputs drawn so far; the next output has this stream position.
    drawn: u64,
    started: Option<Instant>,
}

impl RepetitionDetector {
    /// Fails with `InvalidWindowLength` for an empty window or one longer
    /// than the period. No output is consumed here.
    pub fn new(period: u64, window_length: usize) -> Result<Self> {
        if window_length == 0 || window_length as u64 > period {
            return Err(LcgError::InvalidWindowLength {
                window_length,
                period,
            });
        }
        Ok(RepetitionDetector {
            period,
            window_length,
            window: Vec::with_capacity(window_length),
            anchors: Vec::new(),
            histogram: MatchLengthHistogram::new(),
            full_match: None,
            drawn: 0,
            started: None,
        })
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// The stored window; empty until a run has started.
    pub fn window(&self) -> &[i32] {
        &self.window
    }

    pub fn histogram(&self) -> &MatchLengthHistogram {
        &self.histogram
    }

    pub fn full_match(&self) -> Option<ResolvedMatch> {
        self.full_match
    }

    pub fn outputs_drawn(&self) -> u64 {
        self.drawn
    }

    pub fn open_candidates(&self) -> usize {
        self.anchors.len()
    }

    /// Run until the stored window recurs.
    ///
    /// A failing source aborts the run immediately; the histogram gathered up
    /// to that point stays readable.
    pub fn run<S, R>(&mut self, mut source: S, reporter: &mut R) -> Result<MatchOutcome>
    where
        S: OutputSource,
        R: ProgressReporter + ?Sized,
    {
        let start = Instant::now();
        self.started = Some(start);
        self.window.clear();
        self.anchors.clear();
        self.full_match = None;
        self.drawn = 0;

        for _ in 0..self.window_length {
            let (_, output) = self.draw(&mut source)?;
            self.window.push(output);
        }
        let head = self.window[0];
        log::info!(
            "stored window of {} outputs, expected period {}",
            self.window_length,
            self.period
        );

        loop {
            // Fast path: nothing open, only look for the window's first element.
            let (position, output) = loop {
                let (position, output) = self.draw(&mut source)?;
                if output == head {
                    break (position, output);
                }
            };
            if let Some(outcome) = self.open(position, start, reporter) {
                return Ok(outcome);
            }
            if let Some(outcome) = self.compare(output, position, start, reporter) {
                return Ok(outcome);
            }

            // Slow path while candidates are open.
            while !self.anchors.is_empty() {
                let (position, output) = self.draw(&mut source)?;
                if output == head {
                    if let Some(outcome) = self.open(position, start, reporter) {
                        return Ok(outcome);
                    }
                }
                if let Some(outcome) = self.compare(output, position, start, reporter) {
                    return Ok(outcome);
                }
            }
        }
    }

    /// Summary of the current (possibly unfinished) run.
    pub fn report(&self, outcome: Option<MatchOutcome>) -> RepetitionReport {
        RepetitionReport {
            period: self.period,
            window_length: self.window_length,
            window: self.window.clone(),
            outcome,
            full_match: self.full_match,
            outputs_drawn: self.drawn,
            histogram: self.histogram.clone(),
            elapsed_secs: self
                .started
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or(0.0),
        }
    }

    fn draw<S: OutputSource>(&mut self, source: &mut S) -> Result<(u64, i32)> {
        let position = self.drawn;
        let output = source.next_output()?;
        self.drawn += 1;
        Ok((position, output))
    }

    /// Open a candidate at `position`. A one-element window is complete the
    /// moment it opens.
    fn open<R>(&mut self, position: u64, start: Instant, reporter: &mut R) -> Option<MatchOutcome>
    where
        R: ProgressReporter + ?Sized,
    {
        if self.window_length == 1 {
            return Some(self.finish(position, start, reporter));
        }
        self.anchors.push(position);
        None
    }

    /// Compare `output` against every open candidate, closing those that
    /// mismatch or complete. Survivors keep their relative order.
    fn compare<R>(
        &mut self,
        output: i32,
        position: u64,
        start: Instant,
        reporter: &mut R,
    ) -> Option<MatchOutcome>
    where
        R: ProgressReporter + ?Sized,
    {
        let last = self.window_length - 1;
        let mut kept = 0;

        for i in 0..self.anchors.len() {
            let anchor = self.anchors[i];
            let offset = (position - anchor) as usize;

            // Opened on this very output.
            if offset != 0 {
                let matched = output == self.window[offset];
                if matched && offset == last {
                    return Some(self.finish(anchor, start, reporter));
                }
                if !matched {
                    self.resolve(anchor, offset, start, reporter);
                    continue;
                }
            }

            self.anchors[kept] = anchor;
            kept += 1;
        }

        self.anchors.truncate(kept);
        None
    }

    fn resolve<R>(&mut self, anchor: u64, length: usize, start: Instant, reporter: &mut R)
    where
        R: ProgressReporter + ?Sized,
    {
        self.histogram.record(length);
        let note = format!(
            "found sequence of {} matching number(s) at position {}: {:?}",
            length,
            anchor,
            &self.window[..length]
        );
        log::debug!("{}", note);
        reporter.report(
            &ProgressEvent::measure(anchor, self.period, self.histogram.total() as usize, start)
                .with_note(note),
        );
    }

    /// Close the run with a full-window match starting at `anchor`.
    fn finish<R>(&mut self, anchor: u64, start: Instant, reporter: &mut R) -> MatchOutcome
    where
        R: ProgressReporter + ?Sized,
    {
        self.resolve(anchor, self.window_length, start, reporter);
        self.anchors.clear();
        self.full_match = Some(ResolvedMatch {
            start: anchor,
            length: self.window_length,
        });

        if anchor % self.period == 0 {
            log::info!(
                "found same sequence at position {} after iterating over the full period",
                anchor
            );
            MatchOutcome::FullPeriodMatch
        } else {
            log::warn!(
                "found same sequence at position {} before the full period of {}; \
                 increase the window length",
                anchor,
                self.period
            );
            MatchOutcome::EarlyMatch
        }
    }
}

/// Run a detector over `source` without progress reporting.
pub fn find_repetition<S: OutputSource>(
    source: S,
    period: u64,
    window_length: usize,
) -> Result<MatchOutcome> {
    RepetitionDetector::new(period, window_length)?.run(source, &mut SilentReporter)
}

/// Write a report as pretty JSON, creating parent directories as needed.
pub fn save_report(report: &RepetitionReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcg_core::{CollectingReporter, ReplaySource};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Compares every open candidate on every output, no fast path.
    fn always_compare(
        outputs: &[i32],
        period: u64,
        window_length: usize,
    ) -> (Option<MatchOutcome>, MatchLengthHistogram) {
        let window = &outputs[..window_length];
        let mut anchors: Vec<usize> = Vec::new();
        let mut histogram = MatchLengthHistogram::new();

        for (position, &output) in outputs.iter().enumerate().skip(window_length) {
            if output == window[0] {
                anchors.push(position);
            }
            let mut next = Vec::new();
            for &anchor in &anchors {
                let offset = position - anchor;
                let complete = offset == window_length - 1;
                if offset == 0 && !complete {
                    next.push(anchor);
                    continue;
                }
                if output != window[offset] {
                    histogram.record(offset);
                } else if complete {
                    histogram.record(window_length);
                    let outcome = if anchor as u64 % period == 0 {
                        MatchOutcome::FullPeriodMatch
                    } else {
                        MatchOutcome::EarlyMatch
                    };
                    return (Some(outcome), histogram);
                } else {
                    next.push(anchor);
                }
            }
            anchors = next;
        }
        (None, histogram)
    }

    fn run_replay(
        outputs: &[i32],
        period: u64,
        window_length: usize,
    ) -> (Result<MatchOutcome>, RepetitionDetector) {
        let mut detector = RepetitionDetector::new(period, window_length).unwrap();
        let result = detector.run(ReplaySource::new(outputs.to_vec()), &mut SilentReporter);
        (result, detector)
    }

    #[test]
    fn test_window_longer_than_period() {
        assert!(matches!(
            RepetitionDetector::new(10, 11),
            Err(LcgError::InvalidWindowLength {
                window_length: 11,
                period: 10
            })
        ));
    }

    #[test]
    fn test_invalid_window_consumes_nothing() {
        let mut source = ReplaySource::new(1..=20);
        assert!(find_repetition(&mut source, 10, 11).is_err());
        assert_eq!(source.served(), 0);
    }

    #[test]
    fn test_empty_window_is_invalid() {
        assert!(matches!(
            RepetitionDetector::new(10, 0),
            Err(LcgError::InvalidWindowLength { .. })
        ));
    }

    #[test]
    fn test_window_equal_to_period() {
        let block: Vec<i32> = (1..=10).collect();
        let (result, detector) = run_replay(&block.repeat(2), 10, 10);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(
            detector.full_match(),
            Some(ResolvedMatch {
                start: 10,
                length: 10
            })
        );
        assert_eq!(detector.outputs_drawn(), 20);
    }

    #[test]
    fn test_window_shorter_than_period() {
        let block: Vec<i32> = (1..=10).collect();
        let (result, detector) = run_replay(&block.repeat(2), 10, 5);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(detector.outputs_drawn(), 15);
    }

    #[test]
    fn test_partially_repeated_block() {
        let block = [1, 2, 3, 4, 5, 6, 1, 2, 3, 7, 8, 9];
        let (result, detector) = run_replay(&block.repeat(2), 12, 4);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(detector.histogram().count(3), 1);
        assert_eq!(detector.histogram().count(4), 1);
    }

    #[test]
    fn test_early_match() {
        let block = [1, 2, 3, 4, 5, 6, 1, 2, 3, 7, 8, 9];
        let (result, detector) = run_replay(&block.repeat(2), 12, 3);
        assert_eq!(result.unwrap(), MatchOutcome::EarlyMatch);
        assert_eq!(detector.full_match().map(|m| m.start), Some(6));
    }

    #[test]
    fn test_all_but_one_match() {
        // The candidate opened at 6 fails on its last element; the one opened
        // on that same failing output carries the full match.
        let block = [1, 2, 3, 4, 5, 6, 1, 2, 3];
        let (result, detector) = run_replay(&block.repeat(2), 9, 4);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(detector.histogram().count(3), 1);
        assert_eq!(detector.full_match().map(|m| m.start), Some(9));
    }

    #[test]
    fn test_overlapping_candidates() {
        let block = [1, 1, 2, 2, 5, 6, 7, 8, 1, 1];
        let (result, detector) = run_replay(&block.repeat(2), 10, 4);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        // Candidates at 8 and 9 matched two elements, the one at 11 only one.
        assert_eq!(detector.histogram().count(2), 2);
        assert_eq!(detector.histogram().count(1), 1);
        assert_eq!(detector.full_match().map(|m| m.start), Some(10));
    }

    #[test]
    fn test_final_element_mismatch_records_window_minus_one() {
        let outputs = [1, 2, 3, 9, 1, 2, 4, 1, 2, 3];
        let (result, detector) = run_replay(&outputs, 7, 3);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(detector.histogram().count(2), 1);
        assert_eq!(detector.histogram().count(3), 1);
    }

    #[test]
    fn test_single_element_window() {
        let (result, detector) = run_replay(&[4, 5, 6, 4, 5, 6], 3, 1);
        assert_eq!(result.unwrap(), MatchOutcome::FullPeriodMatch);
        assert_eq!(detector.outputs_drawn(), 4);

        let (result, _) = run_replay(&[4, 4, 5, 6], 3, 1);
        assert_eq!(result.unwrap(), MatchOutcome::EarlyMatch);
    }

    #[test]
    fn test_source_failure_is_fatal_and_keeps_histogram() {
        let (result, detector) = run_replay(&[1, 2, 3, 1, 2, 7, 1], 100, 3);
        assert!(matches!(result, Err(LcgError::Source(_))));
        assert_eq!(detector.histogram().count(2), 1);
        assert_eq!(detector.outputs_drawn(), 7);
        // The head at position 6 was still being compared.
        assert_eq!(detector.open_candidates(), 1);

        let report = detector.report(None);
        assert_eq!(report.outcome, None);
        assert_eq!(report.window, vec![1, 2, 3]);
    }

    #[test]
    fn test_source_failure_while_storing_window() {
        let (result, detector) = run_replay(&[1, 2], 10, 5);
        assert!(matches!(result, Err(LcgError::Source(_))));
        assert!(detector.histogram().is_empty());
    }

    #[test]
    fn test_reports_each_resolution() {
        let block = [1, 1, 2, 2, 5, 6, 7, 8, 1, 1];
        let mut detector = RepetitionDetector::new(10, 4).unwrap();
        let mut reporter = CollectingReporter::default();
        detector
            .run(ReplaySource::new(block.repeat(2)), &mut reporter)
            .unwrap();

        assert_eq!(reporter.events.len() as u64, detector.histogram().total());
        assert!(reporter.events.iter().all(|e| e.total == 10));
        assert_eq!(reporter.events.last().map(|e| e.processed), Some(10));
        assert_eq!(detector.open_candidates(), 0);
    }

    #[test]
    fn test_resolution_events_name_length_and_prefix() {
        let block = [1, 1, 2, 2, 5, 6, 7, 8, 1, 1];
        let mut detector = RepetitionDetector::new(10, 4).unwrap();
        let mut reporter = CollectingReporter::default();
        detector
            .run(ReplaySource::new(block.repeat(2)), &mut reporter)
            .unwrap();

        let notes: Vec<&str> = reporter
            .events
            .iter()
            .filter_map(|e| e.note.as_deref())
            .collect();
        assert_eq!(
            notes,
            vec![
                "found sequence of 2 matching number(s) at position 8: [1, 1]",
                "found sequence of 2 matching number(s) at position 9: [1, 1]",
                "found sequence of 1 matching number(s) at position 11: [1]",
                "found sequence of 4 matching number(s) at position 10: [1, 1, 2, 2]",
            ]
        );
        assert!(reporter.events[0].to_string().starts_with(notes[0]));
    }

    #[test]
    fn test_two_speed_loop_matches_always_compare() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..300 {
            let period = rng.gen_range(4..40);
            let window_length = rng.gen_range(1..=period);
            let alphabet = rng.gen_range(2..5);
            let block: Vec<i32> = (0..period).map(|_| rng.gen_range(0..alphabet)).collect();
            let outputs = block.repeat(3);

            let (expected, expected_histogram) =
                always_compare(&outputs, period as u64, window_length);
            let (result, detector) = run_replay(&outputs, period as u64, window_length);

            match expected {
                Some(outcome) => assert_eq!(result.unwrap(), outcome),
                None => assert!(result.is_err()),
            }
            assert_eq!(detector.histogram(), &expected_histogram);
        }
    }
}
