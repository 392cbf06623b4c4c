//! Training poller with bounded exponential backoff
//!
//! Training is asynchronous on the service side: `train_version` only queues
//! the work. [`TrainingPoller`] checks `training_status` until every model
//! reports done, any model reports failure, or the timeout elapses.
//!
//! # Example
//!
//! ```rust
//! use nluforge_nlu_client::{LocalNluService, NluService, TrainingPoller};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let service = LocalNluService::new();
//! # let app_id = uuid::Uuid::new_v4();
//! // Check after 50ms, 100ms, 200ms, ... up to 1s between checks, 30s in total
//! let poller = TrainingPoller::new(
//!     Duration::from_secs(30),
//!     Duration::from_millis(50),
//!     Duration::from_secs(1),
//! );
//! let statuses = poller.wait_until_trained(&service, app_id, "0.1").await?;
//! # Ok(())
//! # }
//! ```

use crate::config::AuthoringConfig;
use crate::error::{NluServiceError, Result};
use crate::service::NluService;
use crate::types::{AppId, ModelTrainingStatus, TrainingStatus};
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingPoller {
    timeout: Duration,
    initial_interval: Duration,
    max_interval: Duration,
}

impl TrainingPoller {
    pub fn new(timeout: Duration, initial_interval: Duration, max_interval: Duration) -> Self {
        Self {
            timeout,
            initial_interval,
            max_interval: max_interval.max(initial_interval),
        }
    }

    pub fn from_config(config: &AuthoringConfig) -> Self {
        Self::new(
            config.training_timeout(),
            Duration::from_millis(config.poll_initial_interval_ms),
            Duration::from_millis(config.poll_max_interval_ms),
        )
    }

    /// Double `interval`, capped at the configured ceiling
    fn next_interval(&self, interval: Duration) -> Duration {
        interval.saturating_mul(2).min(self.max_interval)
    }

    /// Poll until training of `version_id` completes
    ///
    /// # Returns
    ///
    /// - `Ok(statuses)` - Every model reported `Success` or `UpToDate`
    /// - `Err(NluServiceError::TrainingFailed)` - A model reported `Fail`
    /// - `Err(NluServiceError::TrainingTimeout)` - Still running after the timeout
    /// - `Err(NluServiceError::*)` - The status call itself failed
    pub async fn wait_until_trained<S>(
        &self,
        service: &S,
        app_id: AppId,
        version_id: &str,
    ) -> Result<Vec<ModelTrainingStatus>>
    where
        S: NluService + ?Sized,
    {
        let started = Instant::now();
        let mut interval = self.initial_interval;
        let mut attempts: u32 = 0;

        loop {
            let statuses = service.training_status(app_id, version_id).await?;
            attempts += 1;

            if let Some(failed) = statuses.iter().find(|s| s.status == TrainingStatus::Fail) {
                let reason = failed
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| "no reason given".to_string());
                tracing::warn!(
                    "Training of '{}' failed after {} check(s): {}",
                    failed.model_name,
                    attempts,
                    reason
                );
                return Err(NluServiceError::training_failed(
                    failed.model_name.clone(),
                    reason,
                ));
            }

            if statuses.iter().all(|s| s.status.is_done()) {
                tracing::debug!(
                    "Training of v{} finished after {} check(s) in {:?}",
                    version_id,
                    attempts,
                    started.elapsed()
                );
                return Ok(statuses);
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                tracing::warn!(
                    "Training of v{} still running after {:?}; giving up",
                    version_id,
                    elapsed
                );
                return Err(NluServiceError::TrainingTimeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                    attempts,
                });
            }

            let pending = statuses.iter().filter(|s| !s.status.is_done()).count();
            tracing::debug!(
                "Training check {}: {}/{} model(s) pending, next check in {:?}",
                attempts,
                pending,
                statuses.len(),
                interval
            );

            // Never sleep past the deadline
            let remaining = self.timeout.saturating_sub(elapsed);
            tokio::time::sleep(interval.min(remaining)).await;
            interval = self.next_interval(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalNluService;
    use crate::types::AppInfoRequest;

    async fn trained_app(service: &LocalNluService) -> AppId {
        let app_id = service
            .create_app(&AppInfoRequest {
                name: "Poll".to_string(),
                culture: "en-us".to_string(),
                initial_version_id: "0.1".to_string(),
                description: None,
            })
            .await
            .unwrap();
        service.add_intent(app_id, "0.1", "Greet").await.unwrap();
        service.train_version(app_id, "0.1").await.unwrap();
        app_id
    }

    fn quick_poller(timeout_ms: u64) -> TrainingPoller {
        TrainingPoller::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(1),
            Duration::from_millis(4),
        )
    }

    #[test]
    fn test_max_interval_never_below_initial() {
        let poller = TrainingPoller::new(
            Duration::from_secs(1),
            Duration::from_millis(100),
            Duration::from_millis(10),
        );
        assert_eq!(poller.max_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_interval_doubles_up_to_ceiling() {
        let poller = TrainingPoller::new(
            Duration::from_secs(1),
            Duration::from_millis(300),
            Duration::from_millis(1000),
        );
        assert_eq!(poller.next_interval(Duration::from_millis(300)), Duration::from_millis(600));
        assert_eq!(poller.next_interval(Duration::from_millis(600)), Duration::from_millis(1000));

        // Huge ceilings saturate instead of overflowing
        let unbounded = TrainingPoller::new(Duration::MAX, Duration::from_secs(1), Duration::MAX);
        assert_eq!(unbounded.next_interval(Duration::MAX), Duration::MAX);
    }

    #[tokio::test]
    async fn test_waits_through_queued_and_in_progress() {
        let service = LocalNluService::new().with_in_progress_polls(3);
        let app_id = trained_app(&service).await;

        let statuses = quick_poller(5_000)
            .wait_until_trained(&service, app_id, "0.1")
            .await
            .unwrap();
        assert!(statuses.iter().all(|s| s.status == TrainingStatus::Success));
    }

    #[tokio::test]
    async fn test_failure_is_reported_with_model_name() {
        let service = LocalNluService::new().with_failing_model("Greet");
        let app_id = trained_app(&service).await;

        let err = quick_poller(5_000)
            .wait_until_trained(&service, app_id, "0.1")
            .await
            .unwrap_err();
        match err {
            NluServiceError::TrainingFailed { model, .. } => assert_eq!(model, "Greet"),
            other => panic!("expected TrainingFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_times_out_when_training_never_finishes() {
        let service = LocalNluService::new().with_in_progress_polls(u32::MAX);
        let app_id = trained_app(&service).await;

        let err = quick_poller(20)
            .wait_until_trained(&service, app_id, "0.1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NluServiceError::TrainingTimeout { attempts, .. } if attempts >= 2
        ));
    }
}
