//! Compute Dispatcher
//!
//! Runs the blocking model call on tokio's blocking pool.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::compute::ComputePermit;
use crate::error::ComputeError;
use crate::models::FeatureVector;
use crate::predictor::Predictor;

// == Compute Dispatcher ==
/// Hands predictions to the blocking worker pool.
#[derive(Clone)]
pub struct ComputeDispatcher {
    model: Arc<dyn Predictor>,
}

impl ComputeDispatcher {
    pub fn new(model: Arc<dyn Predictor>) -> Self {
        Self { model }
    }

    /// Runs the model on `features` and rounds the output.
    ///
    /// The permit moves into the worker and is released when the model call
    /// returns, even if the awaiting request has been dropped by then. A late
    /// result from a cancelled request is discarded.
    pub async fn run(
        &self,
        features: FeatureVector,
        permit: ComputePermit,
    ) -> Result<i64, ComputeError> {
        let model = Arc::clone(&self.model);
        let started = Instant::now();

        let raw = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            model.predict(&features)
        })
        .await
        .map_err(|e| ComputeError::Worker(e.to_string()))??;

        debug!(
            raw,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model prediction finished"
        );

        round_prediction(raw)
    }
}

// == Rounding ==
/// Rounds a raw model output to the nearest integer, ties to even.
pub fn round_prediction(raw: f64) -> Result<i64, ComputeError> {
    if !raw.is_finite() {
        return Err(ComputeError::NonFinite(raw));
    }

    let rounded = raw.round_ties_even();
    // i64::MAX as f64 is 2^63, which itself does not fit.
    if rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
        return Err(ComputeError::OutOfRange(raw));
    }

    Ok(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ConcurrencyLimiter;
    use crate::error::ModelError;
    use crate::models::FEATURE_COUNT;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn features() -> FeatureVector {
        FeatureVector::from([1i64; FEATURE_COUNT])
    }

    fn dispatcher_for<F>(model: F) -> ComputeDispatcher
    where
        F: Fn(&FeatureVector) -> Result<f64, ModelError> + Send + Sync + 'static,
    {
        ComputeDispatcher::new(Arc::new(model))
    }

    #[test]
    fn test_round_to_nearest() {
        assert_eq!(round_prediction(7.4).unwrap(), 7);
        assert_eq!(round_prediction(7.6).unwrap(), 8);
        assert_eq!(round_prediction(-1.7).unwrap(), -2);
    }

    #[test]
    fn test_round_ties_to_even() {
        assert_eq!(round_prediction(0.5).unwrap(), 0);
        assert_eq!(round_prediction(2.5).unwrap(), 2);
        assert_eq!(round_prediction(3.5).unwrap(), 4);
        assert_eq!(round_prediction(-2.5).unwrap(), -2);
    }

    #[test]
    fn test_round_rejects_unrepresentable() {
        assert!(matches!(
            round_prediction(f64::NAN),
            Err(ComputeError::NonFinite(_))
        ));
        assert!(matches!(
            round_prediction(f64::INFINITY),
            Err(ComputeError::NonFinite(_))
        ));
        assert!(matches!(
            round_prediction(1e30),
            Err(ComputeError::OutOfRange(_))
        ));
    }

    #[tokio::test]
    async fn test_run_returns_rounded_value() {
        let dispatcher = dispatcher_for(|_| Ok(7.4));
        let limiter = ConcurrencyLimiter::new(1);

        let permit = limiter.acquire().await.unwrap();
        let value = dispatcher.run(features(), permit).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn test_run_propagates_model_error_and_releases_permit() {
        let dispatcher = dispatcher_for(|_| Err(ModelError::Inference("bad input".to_string())));
        let limiter = ConcurrencyLimiter::new(1);

        let permit = limiter.acquire().await.unwrap();
        let result = dispatcher.run(features(), permit).await;

        assert!(matches!(result, Err(ComputeError::Model(_))));
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn test_run_converts_worker_panic() {
        let dispatcher = dispatcher_for(|_| panic!("model exploded"));
        let limiter = ConcurrencyLimiter::new(1);

        let permit = limiter.acquire().await.unwrap();
        let result = dispatcher.run(features(), permit).await;

        assert!(matches!(result, Err(ComputeError::Worker(_))));
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cancelled_request_keeps_permit_until_worker_finishes() {
        let dispatcher = dispatcher_for(|_| {
            std::thread::sleep(Duration::from_millis(150));
            Ok(1.0)
        });
        let limiter = ConcurrencyLimiter::new(1);

        let permit = limiter.acquire().await.unwrap();
        let run = dispatcher.run(features(), permit);
        let cancelled = tokio::time::timeout(Duration::from_millis(20), run).await;
        assert!(cancelled.is_err());

        // The worker is still running the model, so the permit is still out.
        assert_eq!(limiter.available(), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_runs_never_exceed_permits() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let model = {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            move |_: &FeatureVector| -> Result<f64, ModelError> {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(1.0)
            }
        };

        let dispatcher = dispatcher_for(model);
        let limiter = ConcurrencyLimiter::new(5);

        let mut handles = Vec::new();
        for _ in 0..40 {
            let dispatcher = dispatcher.clone();
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                let permit = limiter.acquire().await.unwrap();
                dispatcher.run(features(), permit).await.unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }

        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }
}
