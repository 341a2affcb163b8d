//! Retry decorator for providers.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;

use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::{Error, Result};

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(500);

/// Retries transient provider failures with exponential backoff.
///
/// Only errors reporting [`Error::is_retryable`] are retried; a 404 for an
/// unloaded model fails immediately.
#[derive(Clone)]
pub struct RetryWrapper {
    inner: Arc<dyn LlmProvider>,
    max_retries: usize,
    min_delay: Duration,
}

impl RetryWrapper {
    /// Wraps `inner` with the default policy (3 retries from 500ms).
    pub fn new(inner: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner,
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay: DEFAULT_MIN_DELAY,
        }
    }

    /// Overrides the retry count and the first backoff delay.
    pub fn with_policy(mut self, max_retries: usize, min_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.min_delay = min_delay;
        self
    }
}

#[async_trait]
impl LlmProvider for RetryWrapper {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_times(self.max_retries);

        (|| async { self.inner.complete(request.clone()).await })
            .retry(backoff)
            .when(Error::is_retryable)
            .notify(|err: &Error, delay: Duration| {
                tracing::warn!(
                    provider = self.inner.name(),
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying completion"
                );
            })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
