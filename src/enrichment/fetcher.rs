//! Throttled, retrying access to external metadata sources.
//!
//! Items are split into batches. The calls of one batch run concurrently,
//! batches run one after another with a fixed pause in between. Every item
//! is retried on rate-limit signals according to a [`RetryPolicy`]; an item
//! that still fails degrades to `V::default()` so one bad artist never
//! blocks the rest of a playlist.

use std::{fmt::Debug, future::Future, time::Duration};

use futures::future::join_all;
use tokio::time::sleep;

use crate::{error::SourceError, warning};

/// Declarative retry behaviour for rate-limited calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of calls per item, including the first one.
    pub max_attempts: u32,
    /// Pause before a retry when the server sends no usable hint.
    pub base_delay: Duration,
    /// Use the server's `Retry-After` value instead of `base_delay`.
    pub respect_server_hint: bool,
    /// Hints above this are not waited for; the item gives up instead.
    pub max_server_hint: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            respect_server_hint: true,
            max_server_hint: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after `err`, or `None` if the error must not be
    /// retried.
    pub fn delay_for(&self, err: &SourceError) -> Option<Duration> {
        match err {
            SourceError::RateLimited {
                retry_after: Some(hint),
            } if self.respect_server_hint => {
                if *hint > self.max_server_hint {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds, giving up on this item.",
                        hint.as_secs()
                    );
                    None
                } else {
                    Some(*hint)
                }
            }
            SourceError::RateLimited { .. } => Some(self.base_delay),
            _ => None,
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are used up. The last error is returned in the latter
/// two cases.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            return Err(err);
        }

        match policy.delay_for(&err) {
            Some(delay) => {
                sleep(delay).await;
                attempt += 1;
            }
            None => return Err(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchFetcher {
    label: String,
    batch_size: usize,
    inter_batch_delay: Duration,
    retry: RetryPolicy,
}

impl BatchFetcher {
    pub fn new(
        label: impl Into<String>,
        batch_size: usize,
        inter_batch_delay: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            label: label.into(),
            batch_size: batch_size.max(1),
            inter_batch_delay,
            retry,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Calls `per_item` for every key and pairs each key with its result.
    ///
    /// Output order follows input order. Failed items carry `V::default()`.
    pub async fn fetch<K, V, F, Fut>(&self, items: Vec<K>, per_item: F) -> Vec<(K, V)>
    where
        K: Clone + Debug,
        V: Default,
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<V, SourceError>>,
    {
        let mut results = Vec::with_capacity(items.len());
        let mut batches = items.chunks(self.batch_size).peekable();

        while let Some(batch) = batches.next() {
            let per_item = &per_item;
            let outcomes = join_all(batch.iter().map(|key| async move {
                let outcome = call_with_retry(&self.retry, || per_item(key.clone())).await;
                (key.clone(), outcome)
            }))
            .await;

            for (key, outcome) in outcomes {
                match outcome {
                    Ok(value) => results.push((key, value)),
                    Err(SourceError::NotFound(_)) => results.push((key, V::default())),
                    Err(e) => {
                        warning!("{} lookup for {:?} failed: {}", self.label, key, e);
                        results.push((key, V::default()));
                    }
                }
            }

            if batches.peek().is_some() && !self.inter_batch_delay.is_zero() {
                sleep(self.inter_batch_delay).await;
            }
        }

        results
    }
}

/// One-shot form of [`BatchFetcher::fetch`].
pub async fn fetch_batched<K, V, F, Fut>(
    items: Vec<K>,
    batch_size: usize,
    inter_batch_delay: Duration,
    policy: &RetryPolicy,
    per_item: F,
) -> Vec<(K, V)>
where
    K: Clone + Debug,
    V: Default,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<V, SourceError>>,
{
    BatchFetcher::new("source", batch_size, inter_batch_delay, policy.clone())
        .fetch(items, per_item)
        .await
}
