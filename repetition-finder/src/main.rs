//! repetition-finder CLI: confirm the period of java.util.Random empirically.
//!
//! Options:
//!   --period=<N>     Expected period (default: 2^48)
//!   --window=<N>     Stored window length (default: 8)
//!   --seed=<u64>     Generator seed (default: random)
//!   --json=<path>    Write the run report as JSON
//!
//! A full-period run draws 2^48 outputs and takes days.

use lcg_core::{JavaRandom, ProgressEvent, ProgressReporter, JAVA_RANDOM_PERIOD};
use repetition_finder::{save_report, MatchOutcome, RepetitionDetector};

struct CliConfig {
    period: u64,
    window_length: usize,
    seed: Option<u64>,
    json_path: Option<String>,
}

fn parse_args() -> Result<CliConfig, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = CliConfig {
        period: JAVA_RANDOM_PERIOD,
        window_length: 8,
        seed: None,
        json_path: None,
    };

    for arg in &args {
        if let Some(v) = arg.strip_prefix("--period=") {
            config.period = v.parse().map_err(|_| format!("invalid --period value '{}'", v))?;
        } else if let Some(v) = arg.strip_prefix("--window=") {
            config.window_length = v
                .parse()
                .map_err(|_| format!("invalid --window value '{}'", v))?;
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            config.seed = Some(v.parse().map_err(|_| format!("invalid --seed value '{}'", v))?);
        } else if let Some(v) = arg.strip_prefix("--json=") {
            config.json_path = Some(v.to_string());
        } else {
            return Err(format!("unknown argument '{}'", arg));
        }
    }

    Ok(config)
}

/// Prints one line per resolved candidate.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&mut self, event: &ProgressEvent) {
        println!("  {}", event);
    }
}

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: repetition-finder [--period=<N>] [--window=<N>] [--seed=<u64>] [--json=<path>]");
            std::process::exit(2);
        }
    };

    println!("=== repetition-finder: period check for java.util.Random ===");
    let random = match config.seed {
        Some(seed) => JavaRandom::new(seed),
        None => JavaRandom::from_entropy(),
    };
    let seed = config
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "random".to_string());
    println!(
        "Seed: {} (initial state {:#014x}), expected period: {}, window length: {}",
        seed,
        random.state(),
        config.period,
        config.window_length
    );
    println!();

    let mut detector = match RepetitionDetector::new(config.period, config.window_length) {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let result = detector.run(random, &mut ConsoleReporter);
    let outcome = result.as_ref().ok().copied();

    println!();
    println!("Match lengths:");
    print!("{}", detector.histogram());

    if let Some(path) = &config.json_path {
        match save_report(&detector.report(outcome), path) {
            Ok(()) => println!("\nResults written to {}", path),
            Err(e) => eprintln!("Warning: could not write {}: {}", path, e),
        }
    }

    match result {
        Ok(MatchOutcome::FullPeriodMatch) => {
            println!("\nFound same sequence after iterating over the full random number sequence.");
        }
        Ok(MatchOutcome::EarlyMatch) => {
            println!(
                "\nFound same sequence *before* iterating over the full random number sequence; \
                 please increase the window length."
            );
        }
        Err(e) => {
            eprintln!(
                "\nError: {} (run incomplete after {} outputs, {} candidate(s) still open)",
                e,
                detector.outputs_drawn(),
                detector.open_candidates()
            );
            std::process::exit(1);
        }
    }
}
