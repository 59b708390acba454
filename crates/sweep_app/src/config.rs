//! Run configuration loading for the `cafe-sweep` binary.
//!
//! Values come from an optional RON file, then command-line or environment overrides,
//! then validation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use sweep_engine::SweepConfig;
use sweep_logging::{parse_level, sweep_info};

/// Environment variable naming the RON configuration file.
pub const CONFIG_ENV: &str = "SWEEP_CONFIG";
/// Environment variable holding the log level name.
pub const LOG_LEVEL_ENV: &str = "SWEEP_LOG_LEVEL";

pub const START_ID_ENV: &str = "SCRAPING_START_ID";
pub const END_ID_ENV: &str = "SCRAPING_END_ID";
pub const BATCH_SIZE_ENV: &str = "SCRAPING_BATCH_SIZE";
pub const WORKERS_ENV: &str = "SCRAPING_WORKERS";
pub const CAFE_ID_ENV: &str = "SCRAPING_CAFE_ID";
pub const MENU_ID_ENV: &str = "SCRAPING_MENU_ID";
pub const SINK_ENDPOINT_ENV: &str = "VERCEL_API_ENDPOINT";
pub const SESSION_COOKIE_ENV: &str = "SWEEP_SESSION_COOKIE";

/// Sweep a cafe article id range and forward every extracted record to the ingest API.
#[derive(Parser, Debug, Clone)]
#[command(name = "cafe-sweep", version)]
pub struct Cli {
    /// RON configuration file; missing fields take their defaults
    #[arg(env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// First article id to visit
    #[arg(long, env = START_ID_ENV)]
    pub start_id: Option<u64>,

    /// Last article id to visit (inclusive)
    #[arg(long, env = END_ID_ENV)]
    pub end_id: Option<u64>,

    /// Records per dispatch batch
    #[arg(long, env = BATCH_SIZE_ENV)]
    pub batch_size: Option<usize>,

    /// Number of concurrent workers, one session each
    #[arg(long, env = WORKERS_ENV)]
    pub workers: Option<usize>,

    #[arg(long, env = CAFE_ID_ENV)]
    pub cafe_id: Option<String>,

    #[arg(long, env = MENU_ID_ENV)]
    pub menu_id: Option<String>,

    /// Ingest API endpoint receiving one JSON record per POST
    #[arg(long, env = SINK_ENDPOINT_ENV)]
    pub sink_endpoint: Option<String>,

    /// Cookie header of an already logged-in session
    #[arg(long, env = SESSION_COOKIE_ENV, hide_env_values = true)]
    pub session_cookie: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = LOG_LEVEL_ENV, default_value = "info", value_parser = level_arg)]
    pub log_level: LevelFilter,
}

fn level_arg(name: &str) -> Result<LevelFilter, String> {
    parse_level(name).ok_or_else(|| format!("unknown log level {name:?}"))
}

/// Read a RON configuration file. Missing fields take their defaults.
pub fn load_config_file(path: &Path) -> anyhow::Result<SweepConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: SweepConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    sweep_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

/// Lay the command-line and environment overrides over `config`.
pub fn apply_overrides(mut config: SweepConfig, cli: &Cli) -> SweepConfig {
    if let Some(start_id) = cli.start_id {
        config.start_id = start_id;
    }
    if let Some(end_id) = cli.end_id {
        config.end_id = end_id;
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(cafe_id) = &cli.cafe_id {
        config.cafe_id = cafe_id.clone();
    }
    if let Some(menu_id) = &cli.menu_id {
        config.menu_id = menu_id.clone();
    }
    if let Some(endpoint) = &cli.sink_endpoint {
        config.sink_endpoint = endpoint.clone();
    }
    if let Some(cookie) = cli.session_cookie.as_ref().filter(|c| !c.trim().is_empty()) {
        config.session_cookie = Some(cookie.clone());
    }
    config
}

/// File (if any), then overrides, then validation.
pub fn load(cli: &Cli) -> anyhow::Result<SweepConfig> {
    let base = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => SweepConfig::default(),
    };
    let config = apply_overrides(base, cli);
    config.validate()?;
    Ok(config)
}
