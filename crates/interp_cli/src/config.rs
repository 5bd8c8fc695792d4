//! CLI configuration management
//!
//! Resolves the interpolator configuration from a TOML file, environment
//! variables and command-line overrides.
//!
//! Priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`INTERP_THREADS`, `INTERP_LOG_LEVEL`)
//! 3. Config file
//! 4. Default values

use std::path::Path;
use std::str::FromStr;

use interp_core::interp::{
    InterpConfig, InterpConfigBuilder, KnotCheck, ShardStrategy, DEFAULT_CHUNK_SIZE,
};
use serde::Deserialize;

use crate::{CliError, Result};

/// Log levels accepted in the config file and environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::Config(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Resolved CLI configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LogLevel,
    /// Interpolator settings
    pub interp: InterpConfig,
}

/// Command-line overrides applied on top of file and environment settings
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Dedicated worker pool size
    pub threads: Option<usize>,
    /// Sharding strategy name
    pub strategy: Option<String>,
    /// Chunk size for the fixed strategy
    pub chunk_size: Option<usize>,
    /// Reject unsorted or duplicate knots
    pub strict_knots: bool,
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content)?;
        config.interp.validate().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load the config file if present, then apply environment variables
    ///
    /// A missing file at the default location is not an error; a missing file
    /// that was asked for explicitly is.
    pub fn load(path: &str, explicit: bool) -> Result<Self> {
        let path = Path::new(path);
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else if explicit {
            return Err(CliError::FileNotFound(path.display().to_string()));
        } else {
            Self::default()
        };

        if let Ok(level) = std::env::var("INTERP_LOG_LEVEL") {
            config.log_level = LogLevel::from_str(&level)?;
        }
        if let Ok(threads) = std::env::var("INTERP_THREADS") {
            let threads = threads
                .parse()
                .map_err(|_| CliError::Config(format!("Invalid INTERP_THREADS: {}", threads)))?;
            config.interp = rebuild(InterpConfigBuilder::from_config(config.interp).threads(threads))?;
        }

        Ok(config)
    }

    /// Merge with command-line arguments (command line takes precedence)
    pub fn merge(&mut self, overrides: &Overrides) -> Result<()> {
        let mut builder = InterpConfigBuilder::from_config(self.interp.clone());
        if let Some(threads) = overrides.threads {
            builder = builder.threads(threads);
        }
        if let Some(name) = &overrides.strategy {
            builder = builder.strategy(parse_strategy(name, overrides.chunk_size)?);
        } else if overrides.chunk_size.is_some() {
            return Err(CliError::InvalidArgument(
                "--chunk-size requires --strategy fixed".to_string(),
            ));
        }
        if overrides.strict_knots {
            builder = builder.knot_check(KnotCheck::Strict);
        }
        self.interp = rebuild(builder)?;
        Ok(())
    }
}

fn rebuild(builder: InterpConfigBuilder) -> Result<InterpConfig> {
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Parse a strategy name from the command line
pub fn parse_strategy(name: &str, chunk_size: Option<usize>) -> Result<ShardStrategy> {
    match name {
        "sequential" => Ok(ShardStrategy::Sequential),
        "fixed" => Ok(ShardStrategy::FixedChunks {
            chunk_size: chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        }),
        "cost-model" => Ok(ShardStrategy::CostModel),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown strategy: {}. Supported: sequential, fixed, cost-model",
            other
        ))),
    }
}
