use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::PlanRegistry;
use crate::error::RegistryError;
use crate::models::{DestinationArea, GeoPoint, Plan};

/// How often and how patiently to retry a failed registry call.
///
/// The default makes a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    /// Factor applied to the backoff after each failed attempt
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_secs(2),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self::default()
    }

    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = secs.min(self.max_backoff.as_secs_f64());
        Duration::from_secs_f64(capped.max(0.0))
    }

    /// Run `op` until it succeeds, fails with a non-retryable error or runs
    /// out of attempts.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, RegistryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RegistryError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    let delay = self.backoff_for(attempt);
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        what, attempt, max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Wraps a registry so every call goes through a [`RetryPolicy`].
pub struct RetryingRegistry<R> {
    inner: R,
    policy: RetryPolicy,
}

impl<R: PlanRegistry> RetryingRegistry<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<R: PlanRegistry> PlanRegistry for RetryingRegistry<R> {
    async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError> {
        let what = format!("plan search at ({}, {})", point.lon, point.lat);
        self.policy
            .run(&what, || self.inner.search_plans(point))
            .await
    }

    async fn fetch_areas(&self, plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError> {
        let what = format!("area fetch for {}", plan_id);
        self.policy
            .run(&what, || self.inner.fetch_areas(plan_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            multiplier: 2.0,
            max_backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_backoff_curve() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(250),
            multiplier: 2.0,
            max_backoff: Duration::from_millis(1500),
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(250));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_default_makes_one_attempt() {
        let calls = Cell::new(0);
        let result: Result<(), _> = RetryPolicy::no_retry()
            .run("op", || {
                calls.set(calls.get() + 1);
                async { Err(RegistryError::Unavailable("down".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Cell::new(0);
        let result = quick(3)
            .run("op", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(RegistryError::Unavailable("flaky".into()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), _> = quick(4)
            .run("op", || {
                calls.set(calls.get() + 1);
                async { Err(RegistryError::Unavailable("down".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = quick(5)
            .run("op", || {
                calls.set(calls.get() + 1);
                async {
                    Err(RegistryError::Status {
                        status: 401,
                        body: "missing api key".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(RegistryError::Status { status: 401, .. })));
        assert_eq!(calls.get(), 1);
    }
}
