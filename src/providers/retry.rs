use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a reference download is retried and how long to wait in
/// between. `retries` counts the extra attempts after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(retries: usize, delay: Duration) -> Self {
        RetryPolicy { retries, delay }
    }

    /// Runs `request` until it succeeds or the retries are used up. The
    /// error of the last attempt is returned.
    pub async fn run<F, Fut, T>(&self, mut request: F) -> reqwest::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = reqwest::Result<T>>,
    {
        for attempt in 1..=self.retries {
            match request().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(attempt, retries = self.retries, %err, "Request failed, retrying");
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
        request().await
    }
}
