//! Interp CLI - batched periodic linear interpolation from the command line
//!
//! # Commands
//!
//! - `interp eval --input <file>` - Interpolate a JSON batch
//! - `interp check` - Report the resolved configuration
//! - `interp demo` - Interpolate a synthetic light curve batch and verify sharding

use clap::{Parser, Subcommand};
use interp_core::interp::Interpolator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{CliConfig, Overrides};

const DEFAULT_CONFIG: &str = "interp.toml";

/// Batched periodic linear interpolation
#[derive(Parser)]
#[command(name = "interp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path [default: interp.toml]
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Size of a dedicated worker pool (defaults to the global pool)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Sharding strategy (sequential, fixed, cost-model)
    #[arg(long, global = true)]
    strategy: Option<String>,

    /// Queries per shard for the fixed strategy
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Reject unsorted or duplicate knots
    #[arg(long, global = true)]
    strict_knots: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate a batch read from a JSON file
    Eval {
        /// Path to the input JSON file with `t`, `p`, `x` and `y` arrays
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Element type (f64, f32)
        #[arg(short, long, default_value = "f64")]
        dtype: String,
    },

    /// Check system configuration
    Check,

    /// Interpolate a synthetic light curve batch and verify the sharded result
    Demo {
        /// Number of batch rows
        #[arg(short, long, default_value = "64")]
        rows: usize,

        /// Queries per row
        #[arg(short, long, default_value = "100000")]
        queries: usize,

        /// Knots per row
        #[arg(short, long, default_value = "256")]
        knots: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(
        cli.config.as_deref().unwrap_or(DEFAULT_CONFIG),
        cli.config.is_some(),
    )?;
    config.merge(&Overrides {
        threads: cli.threads,
        strategy: cli.strategy.clone(),
        chunk_size: cli.chunk_size,
        strict_knots: cli.strict_knots,
    })?;

    // Logs go to stderr so stdout stays clean for eval output
    let default_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let interpolator = Interpolator::new(config.interp.clone())?;

    match cli.command {
        Commands::Eval {
            input,
            output,
            format,
            dtype,
        } => commands::eval::run(&interpolator, &input, output.as_deref(), &format, &dtype),
        Commands::Check => commands::check::run(&config, &interpolator),
        Commands::Demo {
            rows,
            queries,
            knots,
        } => commands::demo::run(&interpolator, rows, queries, knots),
    }
}
