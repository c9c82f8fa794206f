//! Fixed-delay retry executor for storage operations.
//!
//! # Responsibility
//! - Re-run a fallible storage call while the policy classifies its error as
//!   retryable, up to a fixed attempt budget.
//! - Report exhaustion as an explicit "no result" outcome instead of an error.
//!
//! # Invariants
//! - At most `max_attempts` calls are made; a success stops immediately.
//! - The same `delay` is waited between consecutive attempts. No growth, no
//!   jitter, no wait after the final attempt.
//! - Non-retryable errors (including `RepoError::NotFound`) are returned on
//!   the attempt that produced them.

use crate::repo::car_repo::{RepoError, RepoResult};
use log::{error, warn};
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Retry budget and error classification.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Wait between consecutive attempts.
    pub delay: Duration,
    /// Decides whether a failed attempt may be repeated.
    pub should_retry: fn(&RepoError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, should_retry: fn(&RepoError) -> bool) -> Self {
        self.should_retry = should_retry;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_DELAY,
            should_retry: retry_storage_errors,
        }
    }
}

/// Retries every storage-layer failure, whatever its cause.
pub fn retry_storage_errors(err: &RepoError) -> bool {
    matches!(err, RepoError::Db(_))
}

/// Retries only lock contention (`SQLITE_BUSY` / `SQLITE_LOCKED`).
pub fn retry_transient_only(err: &RepoError) -> bool {
    err.is_transient()
}

/// Blocking wait used between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Result of running an operation under a retry policy.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation succeeded on some attempt.
    Completed(T),
    /// The operation failed with an error the policy does not retry.
    Failed(RepoError),
    /// Every attempt failed with a retryable error; there is no result.
    Exhausted { attempts: u32, last_error: RepoError },
}

/// Runs storage operations under a `RetryPolicy`.
#[derive(Debug, Clone)]
pub struct RetryExecutor<S = ThreadSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl RetryExecutor<ThreadSleeper> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, ThreadSleeper)
    }
}

impl<S: Sleeper> RetryExecutor<S> {
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    /// Calls `op` until it succeeds, fails permanently, or the budget runs out.
    ///
    /// `operation` names the call in log events only.
    pub fn run<T>(
        &self,
        operation: &str,
        mut op: impl FnMut() -> RepoResult<T>,
    ) -> RetryOutcome<T> {
        let budget = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match op() {
                Ok(value) => return RetryOutcome::Completed(value),
                Err(err) => err,
            };

            if !(self.policy.should_retry)(&err) {
                return RetryOutcome::Failed(err);
            }

            if attempt >= budget {
                error!(
                    "event=store_retry module=service status=error operation={} attempt={}/{} exhausted=true error={}",
                    operation, attempt, budget, err
                );
                return RetryOutcome::Exhausted {
                    attempts: attempt,
                    last_error: err,
                };
            }

            warn!(
                "event=store_retry module=service status=error operation={} attempt={}/{} delay_ms={} error={}",
                operation,
                attempt,
                budget,
                self.policy.delay.as_millis(),
                err
            );
            self.sleeper.sleep(self.policy.delay);
        }
    }
}
