use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for `delay` unless `ctx` is cancelled first.
/// Returns false when the sleep was cut short by cancellation.
pub async fn sleep_or_cancel(ctx: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
