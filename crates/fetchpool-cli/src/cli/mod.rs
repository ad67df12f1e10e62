//! CLI for fetchpool.

mod run;
mod settings;
mod shutdown;

use anyhow::Result;
use clap::{ArgAction, Parser};
use fetchpool_core::config;

pub use run::run_fetch;
pub use settings::Settings;

/// Fetch URLs concurrently with a bounded worker pool, rate limiting and retries.
#[derive(Debug, Parser)]
#[command(name = "fetchpool")]
#[command(about = "Fetch URLs with a bounded, rate-limited, retrying worker pool", long_about = None)]
pub struct Cli {
    /// Comma-separated URLs; entries without a scheme get https://.
    #[arg(long)]
    pub urls: String,

    /// Number of concurrent workers [config default: 3].
    #[arg(long)]
    pub workers: Option<usize>,

    /// Per-attempt timeout in seconds [config default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Job starts per second, 0 for unthrottled [config default: 5].
    #[arg(long)]
    pub rps: Option<u32>,

    /// Maximum attempts per URL [config default: 3].
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seed for the backoff jitter (default: current Unix time).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Turn off debug-level logging.
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub disable_debug: bool,
}

impl Cli {
    pub fn debug_logging(&self) -> bool {
        !self.disable_debug
    }

    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let settings = Settings::resolve(&self, &cfg)?;
        run_fetch(&settings).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
