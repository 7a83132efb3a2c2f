//! Prediction Service
//!
//! Validates input, answers from the cache when it can, and otherwise
//! computes under the concurrency limit, caches, and records the result.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::SharedCache;
use crate::compute::{ComputeDispatcher, ConcurrencyLimiter};
use crate::config::Config;
use crate::error::Result;
use crate::models::{FeatureVector, PredictResponse};
use crate::persistence::{PersistStatus, PredictionSink};
use crate::predictor::Predictor;

/// Cache of rounded predictions keyed by the exact feature vector.
pub type PredictionCache = SharedCache<FeatureVector, i64>;

// == Prediction ==
/// Result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub value: i64,
    pub cached: bool,
    pub status: PersistStatus,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        PredictResponse::new(
            prediction.value,
            prediction.cached,
            prediction.status.to_string(),
        )
    }
}

// == Prediction Service ==
/// Owns the cache, limiter, dispatcher and sink for one server.
///
/// Concurrent misses on the same key are not coalesced: each computes on
/// its own and the last cache write wins.
#[derive(Clone)]
pub struct PredictionService {
    cache: PredictionCache,
    limiter: ConcurrencyLimiter,
    dispatcher: ComputeDispatcher,
    sink: PredictionSink,
}

impl PredictionService {
    pub fn new(
        cache: PredictionCache,
        limiter: ConcurrencyLimiter,
        dispatcher: ComputeDispatcher,
        sink: PredictionSink,
    ) -> Self {
        Self {
            cache,
            limiter,
            dispatcher,
            sink,
        }
    }

    /// Builds a service with cache and limiter sized from configuration.
    pub fn from_config(config: &Config, model: Arc<dyn Predictor>, sink: PredictionSink) -> Self {
        Self::new(
            SharedCache::new(config.max_entries, config.ttl()),
            ConcurrencyLimiter::new(config.max_concurrent),
            ComputeDispatcher::new(model),
            sink,
        )
    }

    /// Handles one prediction request.
    ///
    /// A wrong feature count fails before the cache, model or sink is
    /// touched. A cache hit skips persistence.
    pub async fn predict(&self, features: Vec<i64>) -> Result<Prediction> {
        let features = FeatureVector::try_from(features)?;

        if let Some(value) = self.cache.get(&features).await {
            debug!(value, "Cache hit");
            return Ok(Prediction {
                value,
                cached: true,
                status: PersistStatus::Cached,
            });
        }

        let permit = self.limiter.acquire().await?;
        let value = self.dispatcher.run(features, permit).await?;

        self.cache.put(features, value).await;
        let status = self.sink.record(features, value).await;
        info!(value, status = %status, "Prediction computed");

        Ok(Prediction {
            value,
            cached: false,
            status,
        })
    }

    pub fn cache(&self) -> &PredictionCache {
        &self.cache
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ComputeError, ModelError, PersistError, ServiceError, ValidationError};
    use crate::models::FEATURE_COUNT;
    use crate::persistence::{PredictionRecord, RecordStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Stub model returning a fixed value and counting invocations.
    struct StubModel {
        value: f64,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn new(value: f64) -> Arc<Self> {
            Arc::new(Self {
                value,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Predictor for StubModel {
        fn predict(&self, _features: &FeatureVector) -> std::result::Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.value)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<PredictionRecord>>,
    }

    impl RecordStore for MemoryStore {
        fn record(&self, record: &PredictionRecord) -> std::result::Result<(), PersistError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn service_with(
        model: Arc<dyn Predictor>,
        sink: PredictionSink,
        max_entries: usize,
        ttl: Duration,
    ) -> PredictionService {
        PredictionService::new(
            SharedCache::new(max_entries, ttl),
            ConcurrencyLimiter::new(5),
            ComputeDispatcher::new(model),
            sink,
        )
    }

    fn sequence() -> Vec<i64> {
        (1..=FEATURE_COUNT as i64).collect()
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let model = StubModel::new(7.4);
        let service = service_with(
            model.clone(),
            PredictionSink::Disabled,
            100,
            Duration::from_secs(60),
        );

        let first = service.predict(sequence()).await.unwrap();
        assert_eq!(first.value, 7);
        assert!(!first.cached);
        assert_eq!(first.status, PersistStatus::Skipped);

        let second = service.predict(sequence()).await.unwrap();
        assert_eq!(second.value, 7);
        assert!(second.cached);
        assert_eq!(second.status, PersistStatus::Cached);

        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_wrong_length_touches_nothing() {
        let model = StubModel::new(1.0);
        let store = Arc::new(MemoryStore::default());
        let service = service_with(
            model.clone(),
            PredictionSink::Active(store.clone()),
            100,
            Duration::from_secs(60),
        );

        for len in [13usize, 15, 0] {
            let result = service.predict(vec![1; len]).await;
            assert!(matches!(
                result,
                Err(ServiceError::Validation(ValidationError::FeatureCount { actual })) if actual == len
            ));
        }

        assert_eq!(model.calls(), 0);
        assert!(store.records.lock().unwrap().is_empty());
        assert!(service.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entry_is_recomputed() {
        let model = StubModel::new(3.0);
        let service = service_with(
            model.clone(),
            PredictionSink::Disabled,
            100,
            Duration::from_millis(50),
        );

        assert!(!service.predict(sequence()).await.unwrap().cached);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!service.predict(sequence()).await.unwrap().cached);

        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_oldest_key_is_evicted() {
        let model = StubModel::new(1.0);
        let service = service_with(
            model.clone(),
            PredictionSink::Disabled,
            2,
            Duration::from_secs(60),
        );

        let key = |n: i64| vec![n; FEATURE_COUNT];

        service.predict(key(1)).await.unwrap();
        service.predict(key(2)).await.unwrap();
        service.predict(key(3)).await.unwrap();

        assert!(service.predict(key(3)).await.unwrap().cached);
        assert!(service.predict(key(2)).await.unwrap().cached);
        assert!(!service.predict(key(1)).await.unwrap().cached);
        assert_eq!(model.calls(), 4);
    }

    #[tokio::test]
    async fn test_active_sink_records_misses_only() {
        let store = Arc::new(MemoryStore::default());
        let service = service_with(
            StubModel::new(7.4),
            PredictionSink::Active(store.clone()),
            100,
            Duration::from_secs(60),
        );

        let first = service.predict(sequence()).await.unwrap();
        assert_eq!(first.status, PersistStatus::Recorded);
        service.predict(sequence()).await.unwrap();

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prediction, 7);
    }

    #[tokio::test]
    async fn test_compute_failure_is_not_cached() {
        let model = |_: &FeatureVector| -> std::result::Result<f64, ModelError> {
            Err(ModelError::Inference("unsupported input".to_string()))
        };
        let service = service_with(
            Arc::new(model),
            PredictionSink::Disabled,
            100,
            Duration::from_secs(60),
        );

        let result = service.predict(sequence()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Compute(ComputeError::Model(_)))
        ));
        assert!(service.cache().is_empty().await);
        assert_eq!(service.limiter().available(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_key_misses_each_compute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = {
            let calls = Arc::clone(&calls);
            move |_: &FeatureVector| -> std::result::Result<f64, ModelError> {
                calls.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(50));
                Ok(2.0)
            }
        };
        let service = service_with(
            Arc::new(model),
            PredictionSink::Disabled,
            100,
            Duration::from_secs(60),
        );

        let (a, b) = tokio::join!(service.predict(sequence()), service.predict(sequence()));
        assert!(!a.unwrap().cached);
        assert!(!b.unwrap().cached);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.cache().len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_compute_concurrency_is_bounded() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let model = {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            move |_: &FeatureVector| -> std::result::Result<f64, ModelError> {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(15));
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(0.0)
            }
        };
        let service = service_with(
            Arc::new(model),
            PredictionSink::Disabled,
            100,
            Duration::from_secs(60),
        );

        let mut handles = Vec::new();
        for n in 0..30i64 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.predict(vec![n; FEATURE_COUNT]).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert_eq!(service.limiter().available(), 5);
    }

    #[test]
    fn test_prediction_into_response() {
        let response = PredictResponse::from(Prediction {
            value: 7,
            cached: false,
            status: PersistStatus::Skipped,
        });
        assert_eq!(response, PredictResponse::new(7, false, "DB skip"));
    }
}
