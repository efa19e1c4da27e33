//! Command line interface
//!
//! Mines association rules from a CSV dataset, optionally exports them
//! as CSV and prints summary statistics. Algorithm parameters are edited
//! through an interactive editor round-trip before the run starts.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use evoarm::dataset::Dataset;
use evoarm::mine::mine;
use evoarm::optimize::{optimizer_by_name, Budget, Optimizer};
use evoarm::problem::MetricWeights;
use evoarm::rule::metrics::Metric;

const USAGE: &str = "evoarm - mine association rules from a csv dataset

  -i, --input-file <path>    Input file containing a csv dataset (required)
  -o, --output-file <path>   Output file for mined rules
  -a, --algorithm <name>     Algorithm to use, e.g. DifferentialEvolution (required)
  -s, --seed <n>             Seed for the algorithm's random number generator
      --max-evals <n>        Maximum number of fitness function evaluations
      --max-iters <n>        Maximum number of iterations
      --metrics <names...>   Metrics to use in the fitness function (required)
      --weights <floats...>  Weights corresponding to --metrics
      --log                  Enable logging of fitness improvements
      --stats                Display stats about mined rules
      --help                 Print this help";

struct Args {
    input_file: PathBuf,
    output_file: Option<PathBuf>,
    algorithm: String,
    seed: Option<u64>,
    max_evals: Option<usize>,
    max_iters: Option<usize>,
    metrics: Vec<String>,
    weights: Vec<f64>,
    log: bool,
    stats: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut input_file = None;
    let mut output_file = None;
    let mut algorithm = None;
    let mut seed = None;
    let mut max_evals = None;
    let mut max_iters = None;
    let mut metrics: Vec<String> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    let mut log = false;
    let mut stats = false;

    let mut it = env::args().skip(1).peekable();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-i" | "--input-file" => {
                input_file = Some(PathBuf::from(
                    it.next().ok_or("--input-file needs a value")?,
                ));
            }
            "-o" | "--output-file" => {
                output_file = Some(PathBuf::from(
                    it.next().ok_or("--output-file needs a value")?,
                ));
            }
            "-a" | "--algorithm" => {
                algorithm = Some(it.next().ok_or("--algorithm needs a value")?);
            }
            "-s" | "--seed" => {
                let value = it.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse().map_err(|_| format!("invalid seed: {value}"))?);
            }
            "--max-evals" => {
                let value = it.next().ok_or("--max-evals needs a value")?;
                max_evals = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --max-evals: {value}"))?,
                );
            }
            "--max-iters" => {
                let value = it.next().ok_or("--max-iters needs a value")?;
                max_iters = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --max-iters: {value}"))?,
                );
            }
            "--metrics" => {
                while let Some(next) = it.peek() {
                    if next.starts_with('-') {
                        break;
                    }
                    // first occurrence wins, duplicates are dropped
                    let name = it.next().unwrap_or_default();
                    if !metrics.contains(&name) {
                        metrics.push(name);
                    }
                }
                if metrics.is_empty() {
                    return Err("--metrics needs at least one value".to_string());
                }
            }
            "--weights" => {
                while let Some(next) = it.peek() {
                    if next.parse::<f64>().is_err() {
                        break;
                    }
                    let value = it.next().unwrap_or_default();
                    weights.push(
                        value
                            .parse()
                            .map_err(|_| format!("invalid weight: {value}"))?,
                    );
                }
            }
            "--log" => log = true,
            "--stats" => stats = true,
            "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        input_file: input_file.ok_or("--input-file is required")?,
        output_file,
        algorithm: algorithm.ok_or("--algorithm is required")?,
        seed,
        max_evals,
        max_iters,
        metrics,
        weights,
        log,
        stats,
    })
}

/// Round-trip the algorithm's parameters through the user's editor
fn edit_parameters(optimizer: &mut dyn Optimizer) -> Result<(), Box<dyn Error>> {
    let path = env::temp_dir().join(format!("{}_parameters.json", optimizer.name()));
    fs::write(&path, serde_json::to_string_pretty(&optimizer.parameters())?)?;

    let editor = env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string());
    let command_line = format!("{} {}", editor, path.display());
    let status = if cfg!(windows) {
        Command::new("cmd").args(["/C", &command_line]).status()?
    } else {
        Command::new("sh").args(["-c", &command_line]).status()?
    };
    if !status.success() {
        let _ = fs::remove_file(&path);
        return Err("editor exited with failure".into());
    }

    let edited = fs::read_to_string(&path)?;
    let _ = fs::remove_file(&path);
    let parameters: serde_json::Value =
        serde_json::from_str(&edited).map_err(|e| format!("invalid parameters: {e}"))?;
    optimizer.set_parameters(parameters)?;
    Ok(())
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn run() -> Result<bool, Box<dyn Error>> {
    let args = parse_args()?;

    // configuration errors abort before any budget is spent
    let budget = Budget::new(args.max_evals, args.max_iters)?;
    let metrics = args
        .metrics
        .iter()
        .map(|name| name.parse::<Metric>())
        .collect::<Result<Vec<_>, _>>()?;
    let weights = if args.weights.is_empty() {
        MetricWeights::uniform(&metrics)?
    } else {
        MetricWeights::zipped(metrics, args.weights)?
    };

    let dataset = Dataset::from_csv(&args.input_file)?;
    let mut optimizer = optimizer_by_name(&args.algorithm)?;
    edit_parameters(optimizer.as_mut())?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let result = mine(
        &dataset,
        optimizer.as_ref(),
        weights,
        &budget,
        &mut rng,
        args.log,
    );

    // export failures are reported without discarding mined rules
    let mut export_ok = true;
    if let Some(output_file) = &args.output_file {
        match result.rules.to_csv(output_file) {
            Ok(()) => {
                if !result.rules.is_empty() {
                    println!("Rules exported to {}", output_file.display());
                }
            }
            Err(e) => {
                warn!(error = %e, path = %output_file.display(), "export failed");
                export_ok = false;
            }
        }
    }
    if args.stats {
        print!("{}", result.rules);
    }
    println!("Run Time: {:.4}s", result.run_time.as_secs_f64());

    Ok(export_ok)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
