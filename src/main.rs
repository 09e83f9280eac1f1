use std::fmt::Display;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use general_scan::ops::{AvgLowestK, Histogram, LowestK, Max, Min, Sum, Survival};
use general_scan::{GeneralScan, Padding, ScanConfig, ScanOps, DEFAULT_THREAD_BUDGET};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How many values the `lowest` and `avg-lowest` operations keep.
const LOWEST_K: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "gscan", about = "Parallel reduce/scan over a list of numbers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Args, Debug)]
struct SharedArgs {
    /// File of whitespace-separated numbers (reads stdin when omitted).
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,
    /// Thread budget; nodes with id below budget-1 fork.
    #[arg(long, global = true, default_value_t = DEFAULT_THREAD_BUDGET)]
    threads: usize,
    /// Pad the input to the next power of two with identity leaves.
    #[arg(long, global = true)]
    pad: bool,
    /// Also print one inclusive prefix result per input value.
    #[arg(long, global = true)]
    scan: bool,
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sum of the values.
    Sum,
    /// Probability of no miss, values are per-step miss probabilities.
    Survival,
    /// Maximum value.
    Max,
    /// Minimum value.
    Min,
    /// The ten lowest values (integers).
    Lowest,
    /// Mean of the ten lowest values (integers).
    AvgLowest,
    /// Bucket counts over [lo, hi) plus underflow and overflow (integers).
    Histogram {
        /// Inclusive lower bound of the first bucket.
        #[arg(long, default_value_t = 0)]
        lo: i64,
        /// Exclusive upper bound of the last bucket.
        #[arg(long, default_value_t = 100)]
        hi: i64,
        /// Number of buckets between lo and hi.
        #[arg(long, default_value_t = 10)]
        buckets: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.shared.verbose);

    let text = read_input(&cli.shared)?;
    let stdout = io::stdout();
    execute(&cli, &text, &mut stdout.lock())
}

/// Parse `text` for the chosen operation set and write the results to `out`.
fn execute<W: Write>(cli: &Cli, text: &str, out: &mut W) -> Result<()> {
    let shared = &cli.shared;
    let config = ScanConfig::new()
        .with_thread_budget(shared.threads)
        .with_padding(if shared.pad {
            Padding::Identity
        } else {
            Padding::Strict
        });

    match &cli.command {
        Commands::Sum => run(&parse_values::<f64>(text)?, Sum::<f64>::new(), shared, config, out),
        Commands::Survival => run(&parse_values::<f64>(text)?, Survival, shared, config, out),
        Commands::Max => run(&parse_values::<f64>(text)?, Max::<f64>::new(), shared, config, out),
        Commands::Min => run(&parse_values::<f64>(text)?, Min::<f64>::new(), shared, config, out),
        Commands::Lowest => run(
            &parse_values::<i64>(text)?,
            LowestK::<LOWEST_K>,
            shared,
            config,
            out,
        ),
        Commands::AvgLowest => run(
            &parse_values::<i64>(text)?,
            AvgLowestK::<LOWEST_K>,
            shared,
            config,
            out,
        ),
        Commands::Histogram { lo, hi, buckets } => {
            let histogram =
                Histogram::new(*lo, *hi, *buckets).context("invalid histogram parameters")?;
            run(&parse_values::<i64>(text)?, histogram, shared, config, out)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(args: &SharedArgs) -> Result<String> {
    match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input from {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read input from stdin")?;
            Ok(text)
        }
    }
}

fn parse_values<T>(text: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            token
                .parse()
                .with_context(|| format!("invalid value '{}' at position {}", token, idx + 1))
        })
        .collect()
}

fn run<O, W>(
    data: &[O::Elem],
    ops: O,
    args: &SharedArgs,
    config: ScanConfig,
    out: &mut W,
) -> Result<()>
where
    O: ScanOps,
    O::Output: Display + Clone + Default,
    W: Write,
{
    let mut engine = GeneralScan::with_config(data, ops, config)
        .with_context(|| format!("cannot build scan over {} values", data.len()))?;

    let reduction = engine.reduction().context("reduction failed")?;
    writeln!(out, "{}", reduction).context("failed to write output")?;

    if args.scan {
        let prefix = engine.scan().context("scan failed")?;
        for result in prefix {
            writeln!(out, "{}", result).context("failed to write output")?;
        }
    }

    info!(
        len = engine.len(),
        threads = engine.thread_budget(),
        "finished"
    );
    Ok(())
}
