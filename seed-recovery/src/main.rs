//! seed-recovery CLI: predict `java.util.Random.nextInt()` outputs.
//!
//! Usage:
//!   seed-recovery <count> <first> <second> [more ...]   Predict `count` outputs
//!   seed-recovery --demo [--count=<N>]                  Self-check against a fresh generator
//!
//! Observed outputs are signed 32-bit integers, oldest first.

use lcg_core::{JavaRandom, JAVA_RANDOM};
use seed_recovery::{prediction_stream, StateRecoverer};

const HELP: &str =
    "Call with at least 3 parameters: <number of predictions> <first number> <second number> [...]\n\
     or with --demo [--count=<N>] to predict outputs of a freshly seeded generator.";

#[derive(Debug, Clone, PartialEq)]
enum CliConfig {
    Predict { count: usize, observed: Vec<i32> },
    Demo { count: usize },
}

fn parse_args(args: &[String]) -> Option<CliConfig> {
    if args.iter().any(|a| a == "--demo") {
        let count = args
            .iter()
            .find(|a| a.starts_with("--count="))
            .map(|a| a.strip_prefix("--count=")?.parse::<usize>().ok())
            .unwrap_or(Some(10))?;
        return Some(CliConfig::Demo { count });
    }

    if args.len() < 3 {
        return None;
    }
    let count = args[0].parse::<usize>().ok()?;
    let observed = args[1..]
        .iter()
        .map(|a| a.parse::<i32>().ok())
        .collect::<Option<Vec<i32>>>()?;
    Some(CliConfig::Predict { count, observed })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Some(config) => config,
        None => {
            eprintln!("{}", HELP);
            std::process::exit(2);
        }
    };

    match config {
        CliConfig::Predict { count, observed } => run_predict(count, observed),
        CliConfig::Demo { count } => run_demo(count),
    }
}

fn run_predict(count: usize, observed: Vec<i32>) {
    println!("Given numbers: {:?}", observed);
    println!("Predicting {} random numbers...", count);

    let skip = observed.len();
    let recovered = match StateRecoverer::new(observed).and_then(|r| r.recover_state()) {
        Ok(recovered) => recovered,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Streamed, so any count is accepted without preallocating.
    for p in prediction_stream(&JAVA_RANDOM, recovered.state, skip).take(count) {
        println!("{}", p);
    }
}

fn run_demo(count: usize) {
    let mut random = JavaRandom::from_entropy();

    let observed = random.take_outputs(2);
    println!("Two random numbers:");
    for o in &observed {
        println!("  {}", o);
    }
    println!();

    let predictions = match StateRecoverer::new(observed).and_then(|r| r.predict(count)) {
        Ok(predictions) => predictions,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let actual = random.take_outputs(count);

    println!("  {:>12} | {:>12}", "Predicted", "Actual");
    println!("  {}", "-".repeat(29));
    for (p, a) in predictions.iter().zip(&actual) {
        println!("  {:>12} | {:>12}{}", p, a, if p == a { "" } else { "  MISMATCH" });
    }
    println!();

    if predictions == actual {
        println!("All {} predictions matched.", count);
    } else {
        eprintln!("Predictions diverged from the generator.");
        std::process::exit(1);
    }
}
