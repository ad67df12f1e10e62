use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rejected pool parameters. Values are never clamped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("workers must be greater than 0")]
    ZeroWorkers,
    #[error("retries must be greater than 0")]
    ZeroRetries,
    #[error("per-attempt timeout must be greater than 0")]
    ZeroTimeout,
    #[error("backoff base delay must be greater than 0")]
    ZeroBackoffBase,
}

/// Parameters of one worker pool, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of jobs executing at once.
    pub workers: usize,
    /// Maximum attempts per job (including the first).
    pub retries: u32,
    /// Job starts per second; 0 disables throttling.
    pub rate_limit: u32,
    /// Budget for a single attempt.
    pub attempt_timeout: Duration,
    /// Drives the fixed backoff jitter (`seed % 100` jitter units).
    pub seed: u64,
    /// Unit of the exponential backoff term (`2^attempt` of these).
    pub backoff_base: Duration,
    /// Unit of the jitter term.
    pub jitter_unit: Duration,
}

impl PoolConfig {
    pub fn new(
        workers: usize,
        retries: u32,
        rate_limit: u32,
        attempt_timeout: Duration,
        seed: u64,
    ) -> Self {
        Self {
            workers,
            retries,
            rate_limit,
            attempt_timeout,
            seed,
            backoff_base: Duration::from_secs(1),
            jitter_unit: Duration::from_millis(1),
        }
    }

    /// Override the backoff units (seconds/milliseconds by default).
    pub fn with_backoff_units(mut self, base: Duration, jitter_unit: Duration) -> Self {
        self.backoff_base = base;
        self.jitter_unit = jitter_unit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.retries == 0 {
            return Err(ConfigError::ZeroRetries);
        }
        if self.attempt_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.backoff_base.is_zero() {
            return Err(ConfigError::ZeroBackoffBase);
        }
        Ok(())
    }
}

/// Defaults loaded from `~/.config/fetchpool/config.toml`; CLI flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Job starts per second (0 = unthrottled).
    pub rps: u32,
    /// Maximum attempts per URL.
    pub retries: u32,
    /// Backoff base unit in milliseconds.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Jitter unit in milliseconds.
    #[serde(default = "default_jitter_unit_ms")]
    pub jitter_unit_ms: u64,
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_jitter_unit_ms() -> u64 {
    1
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            timeout_secs: 30,
            rps: 5,
            retries: 3,
            backoff_base_ms: default_backoff_base_ms(),
            jitter_unit_ms: default_jitter_unit_ms(),
        }
    }
}

impl FetchConfig {
    /// Pool configuration from these values and the given jitter seed.
    pub fn pool_config(&self, seed: u64) -> PoolConfig {
        PoolConfig::new(
            self.workers,
            self.retries,
            self.rps,
            Duration::from_secs(self.timeout_secs),
            seed,
        )
        .with_backoff_units(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.jitter_unit_ms),
        )
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchpool")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FetchConfig> {
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: FetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
