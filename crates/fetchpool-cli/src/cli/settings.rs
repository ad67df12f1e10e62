//! Merges flags over the config file and validates the result.

use anyhow::{Context, Result};
use fetchpool_core::config::{FetchConfig, PoolConfig};
use fetchpool_core::url_model::parse_url_list;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use super::Cli;

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub urls: Vec<String>,
    pub pool: PoolConfig,
    /// Seed given on the command line (or the clock); the pool's seed is drawn from `[0, seed)`.
    pub base_seed: u64,
}

impl Settings {
    pub fn resolve(cli: &Cli, cfg: &FetchConfig) -> Result<Self> {
        let merged = FetchConfig {
            workers: cli.workers.unwrap_or(cfg.workers),
            timeout_secs: cli.timeout.unwrap_or(cfg.timeout_secs),
            rps: cli.rps.unwrap_or(cfg.rps),
            retries: cli.retries.unwrap_or(cfg.retries),
            ..cfg.clone()
        };
        let base_seed = cli.seed.unwrap_or_else(unix_now);
        if base_seed == 0 {
            anyhow::bail!("seed must be greater than 0");
        }

        let pool = merged.pool_config(rand::thread_rng().gen_range(0..base_seed));
        pool.validate().context("invalid flags")?;

        let urls = parse_url_list(&cli.urls)?;
        tracing::debug!(?urls, "URLs to process");

        Ok(Self {
            urls,
            pool,
            base_seed,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn config_values_used_when_flags_absent() {
        let s = Settings::resolve(&cli(&["fetchpool", "--urls", "a.com"]), &FetchConfig::default())
            .unwrap();
        assert_eq!(s.urls, vec!["https://a.com"]);
        assert_eq!(s.pool.workers, 3);
        assert_eq!(s.pool.retries, 3);
        assert_eq!(s.pool.rate_limit, 5);
        assert_eq!(s.pool.attempt_timeout, Duration::from_secs(30));
    }

    #[test]
    fn flags_override_config_and_seed_bounds_pool_seed() {
        let c = cli(&[
            "fetchpool", "--urls", "a.com,b.com", "--workers", "7", "--retries", "2", "--rps",
            "0", "--timeout", "4", "--seed", "10",
        ]);
        let s = Settings::resolve(&c, &FetchConfig::default()).unwrap();
        assert_eq!(s.urls.len(), 2);
        assert_eq!(s.pool.workers, 7);
        assert_eq!(s.pool.retries, 2);
        assert_eq!(s.pool.rate_limit, 0);
        assert_eq!(s.pool.attempt_timeout, Duration::from_secs(4));
        assert_eq!(s.base_seed, 10);
        assert!(s.pool.seed < 10);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cfg = FetchConfig::default();
        assert!(Settings::resolve(&cli(&["fetchpool", "--urls", "a", "--retries", "0"]), &cfg).is_err());
        assert!(Settings::resolve(&cli(&["fetchpool", "--urls", "a", "--workers", "0"]), &cfg).is_err());
        assert!(Settings::resolve(&cli(&["fetchpool", "--urls", "a", "--timeout", "0"]), &cfg).is_err());
        assert!(Settings::resolve(&cli(&["fetchpool", "--urls", "a", "--seed", "0"]), &cfg).is_err());
        assert!(Settings::resolve(&cli(&["fetchpool", "--urls", " , "]), &cfg).is_err());
    }
}
