use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use tables_client::ReadPolicy;

use crate::error::TablecheckError;

pub const DEFAULT_HOST: &str = "http://localhost:3737";

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Parser)]
#[command(name = "tablecheck", about = "Write/verify checks against an HTTP table store")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a batch of JSON records concurrently and verify the count
    Verify(VerifyArgs),
    /// Write CSV frames to many fresh tables concurrently
    Load(LoadArgs),
    /// Write a fixed list of JSON records to one table, in order
    Seed(SeedArgs),
    /// Upload one CSV frame to /frame
    Frame(FrameArgs),
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "tablecheck.toml", env = "TABLECHECK_CONFIG")]
    pub config: String,

    /// Store base URL
    #[arg(long, global = true, env = "DB_HOST")]
    pub host: Option<String>,

    /// Per-request timeout in ms (0 = none)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct VerifyArgs {
    /// Number of records to write
    #[arg(long)]
    pub writes: Option<usize>,

    /// Table to write to (default: fresh name)
    #[arg(long)]
    pub table: Option<String>,

    /// Pause after the writes, before the first read
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Extra reads while the table looks short
    #[arg(long)]
    pub read_retries: Option<u32>,

    #[arg(long)]
    pub read_retry_interval_ms: Option<u64>,

    /// Log a count mismatch but exit 0
    #[arg(long)]
    pub allow_mismatch: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct LoadArgs {
    /// Number of fresh tables
    #[arg(long)]
    pub tables: Option<usize>,

    /// Rows per frame
    #[arg(long)]
    pub rows: Option<usize>,

    /// Read random already-written tables while writing
    #[arg(long)]
    pub interleave_reads: bool,

    /// PRNG seed for values (0 = current time)
    #[arg(long)]
    pub seed: Option<i64>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct SeedArgs {
    #[arg(long)]
    pub table: Option<String>,

    /// JSON array of records, each with a string "id"
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(Args, Clone, Debug, Default)]
pub struct FrameArgs {
    #[arg(long)]
    pub rows: Option<usize>,

    #[arg(long)]
    pub seed: Option<i64>,
}

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub host: Option<String>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub verify: VerifyConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub frame: FrameConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyConfig {
    pub writes: Option<usize>,
    pub settle_ms: Option<u64>,
    pub read_retries: Option<u32>,
    pub read_retry_interval_ms: Option<u64>,
    pub allow_mismatch: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadConfig {
    pub tables: Option<usize>,
    pub rows: Option<usize>,
    pub interleave_reads: Option<bool>,
    pub seed: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    pub table: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FrameConfig {
    pub rows: Option<usize>,
    pub seed: Option<i64>,
}

pub fn load_config(path: &str) -> Result<Config, TablecheckError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TablecheckError::Config(format!("cannot read config {path}: {e}")))?;
    toml::from_str(&content).map_err(|e| TablecheckError::Config(format!("bad config {path}: {e}")))
}

/// A missing file is an empty config; an existing but broken one is an error.
pub fn load_config_or_default(path: &str) -> Result<Config, TablecheckError> {
    match load_config(path) {
        Ok(c) => Ok(c),
        Err(e) => {
            if std::path::Path::new(path).exists() {
                return Err(e);
            }
            Ok(Config::default())
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Settings shared by all subcommands, after merging: config.toml < env/CLI.
#[derive(Debug, Clone)]
pub struct Common {
    pub host: String,
    pub timeout: Option<Duration>,
}

impl Common {
    pub fn new(args: &GlobalArgs, cfg: &Config) -> Self {
        let host = args
            .host
            .clone()
            .or_else(|| cfg.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let timeout_ms = args.timeout_ms.or(cfg.timeout_ms).unwrap_or(30_000);
        Self {
            host: host.trim_end_matches('/').to_string(),
            timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        }
    }
}

#[derive(Debug)]
pub struct VerifyEffective {
    pub writes: usize,
    pub table: Option<String>,
    pub policy: ReadPolicy,
    pub allow_mismatch: bool,
}

impl VerifyEffective {
    pub fn new(args: &VerifyArgs, cfg: &VerifyConfig) -> Self {
        Self {
            writes: args.writes.or(cfg.writes).unwrap_or(10),
            table: args.table.clone(),
            policy: ReadPolicy {
                settle: Duration::from_millis(args.settle_ms.or(cfg.settle_ms).unwrap_or(0)),
                retries: args.read_retries.or(cfg.read_retries).unwrap_or(0),
                retry_interval: Duration::from_millis(
                    args.read_retry_interval_ms.or(cfg.read_retry_interval_ms).unwrap_or(500),
                ),
            },
            allow_mismatch: args.allow_mismatch || cfg.allow_mismatch.unwrap_or(false),
        }
    }
}

#[derive(Debug)]
pub struct LoadEffective {
    pub tables: usize,
    pub rows: usize,
    pub interleave_reads: bool,
    pub seed: i64,
}

impl LoadEffective {
    pub fn new(args: &LoadArgs, cfg: &LoadConfig) -> Self {
        Self {
            tables: args.tables.or(cfg.tables).unwrap_or(10),
            rows: args.rows.or(cfg.rows).unwrap_or(10),
            interleave_reads: args.interleave_reads || cfg.interleave_reads.unwrap_or(false),
            seed: args.seed.or(cfg.seed).unwrap_or(0),
        }
    }
}

#[derive(Debug)]
pub struct SeedEffective {
    pub table: String,
    pub file: Option<String>,
}

impl SeedEffective {
    pub fn new(args: &SeedArgs, cfg: &SeedConfig) -> Self {
        Self {
            table: args
                .table
                .clone()
                .or_else(|| cfg.table.clone())
                .unwrap_or_else(|| "querytest".to_string()),
            file: args.file.clone().or_else(|| cfg.file.clone()),
        }
    }
}

#[derive(Debug)]
pub struct FrameEffective {
    pub rows: usize,
    pub seed: i64,
}

impl FrameEffective {
    pub fn new(args: &FrameArgs, cfg: &FrameConfig) -> Self {
        Self {
            rows: args.rows.or(cfg.rows).unwrap_or(100),
            seed: args.seed.or(cfg.seed).unwrap_or(0),
        }
    }
}
