//! collision-survey CLI: search first outputs for successor collisions.
//!
//! Options:
//!   --from=<i32>        First output to start at (default: i32::MIN)
//!   --to=<i32>          Last output, inclusive (default: i32::MAX)
//!   --interval=<N>      Progress line every N first outputs (default: 1024)
//!   --json=<path>       Write the report as JSON
//!   --log-progress      Send progress lines through the logger instead of stdout
//!
//! The default range covers all 2^32 first outputs and takes months on one
//! core; narrow it with --from/--to for spot checks.

use collision_survey::{save_report, CollisionSurveyor, SurveyConfig};
use lcg_core::{LogReporter, ProgressEvent, ProgressReporter, JAVA_RANDOM};

struct CliConfig {
    survey: SurveyConfig,
    json_path: Option<String>,
    log_progress: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut survey = SurveyConfig::default();
    let mut json_path = None;
    let mut log_progress = false;

    for arg in &args {
        if let Some(v) = arg.strip_prefix("--from=") {
            survey.first = v.parse().map_err(|_| format!("invalid --from value '{}'", v))?;
        } else if let Some(v) = arg.strip_prefix("--to=") {
            survey.last = v.parse().map_err(|_| format!("invalid --to value '{}'", v))?;
        } else if let Some(v) = arg.strip_prefix("--interval=") {
            survey.progress_interval = v
                .parse()
                .map_err(|_| format!("invalid --interval value '{}'", v))?;
        } else if let Some(v) = arg.strip_prefix("--json=") {
            json_path = Some(v.to_string());
        } else if arg == "--log-progress" {
            log_progress = true;
        } else {
            return Err(format!("unknown argument '{}'", arg));
        }
    }

    Ok(CliConfig {
        survey,
        json_path,
        log_progress,
    })
}

/// Prints each progress event as one console line.
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
            eprintln!("Usage: collision-survey [--from=<i32>] [--to=<i32>] [--interval=<N>] [--json=<path>] [--log-progress]");
            std::process::exit(2);
        }
    };

    println!("=== collision-survey: successor collisions of java.util.Random ===");
    println!(
        "Range: {}..={} ({} first outputs x {} candidates)",
        config.survey.first,
        config.survey.last,
        config.survey.len(),
        JAVA_RANDOM.noise_count()
    );
    if !JAVA_RANDOM.successor_collisions_possible() {
        println!(
            "Note: minimum noise gap is {} >= {}; no collisions are expected.",
            JAVA_RANDOM.min_noise_gap(),
            JAVA_RANDOM.noise_count()
        );
    }
    println!();

    let mut reporter: Box<dyn ProgressReporter> = if config.log_progress {
        Box::new(LogReporter::new("collision-survey"))
    } else {
        Box::new(ConsoleReporter)
    };
    let report = CollisionSurveyor::new(&JAVA_RANDOM).survey(&config.survey, &mut reporter);

    println!();
    println!("Integer pairs found twice: {}", report.collisions.len());
    for c in &report.collisions {
        println!(
            "  {} => {} (noise {:#06x} and {:#06x})",
            c.first, c.next, c.earlier_noise, c.noise
        );
    }

    if let Some(path) = &config.json_path {
        match save_report(&report, path) {
            Ok(()) => println!("\nResults written to {}", path),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("\nFINISHED.");
}
