//! HTTP fetch job.
//!
//! Uses the curl crate (libcurl) to GET a URL, drain the body and fail unless
//! the final status is 200. The transfer runs on the blocking pool; the curl
//! progress callback aborts it as soon as the job's token is cancelled.

mod status;

use async_trait::async_trait;
use std::str;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::job::{JobError, JobExecutor, JobId};

pub use status::reason_phrase;

/// Fetches a URL per job. Timeouts come from the pool's per-attempt budget.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    connect_timeout: Duration,
    max_redirections: u32,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            max_redirections: 10,
        }
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[async_trait]
impl JobExecutor for HttpFetcher {
    async fn execute(&self, ctx: CancellationToken, url: JobId) -> Result<(), JobError> {
        if ctx.is_cancelled() {
            return Err(JobError::Cancelled);
        }
        let opts = self.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&url, &opts, &ctx))
            .await
            .map_err(|e| JobError::Failed(format!("fetch task: {}", e)))?
    }
}

fn transport(e: curl::Error) -> JobError {
    JobError::Transport(e.to_string())
}

/// Performs the GET in the current thread.
fn fetch_blocking(url: &str, opts: &HttpFetcher, ctx: &CancellationToken) -> Result<(), JobError> {
    let mut status_line: Option<String> = None;
    let mut body_bytes = 0u64;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(transport)?;
    easy.follow_location(true).map_err(transport)?;
    easy.max_redirections(opts.max_redirections).map_err(transport)?;
    easy.connect_timeout(opts.connect_timeout).map_err(transport)?;
    easy.progress(true).map_err(transport)?;

    let performed = {
        let mut transfer = easy.transfer();
        // Keep the last status line; redirects produce one per hop.
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    if s.starts_with("HTTP/") {
                        status_line = Some(s.trim_end().to_string());
                    }
                }
                true
            })
            .map_err(transport)?;
        transfer
            .write_function(|data| {
                body_bytes += data.len() as u64;
                Ok(data.len())
            })
            .map_err(transport)?;
        transfer
            .progress_function(|_, _, _, _| !ctx.is_cancelled())
            .map_err(transport)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if ctx.is_cancelled() || e.is_aborted_by_callback() {
            return Err(JobError::Cancelled);
        }
        // Headers arrived, so the failure happened while reading the body.
        if status_line.is_some() && (e.is_recv_error() || e.is_partial_file()) {
            return Err(JobError::Body(e.to_string()));
        }
        return Err(transport(e));
    }

    let code = easy.response_code().map_err(transport)?;
    if code != 200 {
        return Err(JobError::Http {
            status: code,
            reason: reason_phrase(status_line.as_deref(), code),
        });
    }
    tracing::trace!(url, bytes = body_bytes, "fetched");
    Ok(())
}
