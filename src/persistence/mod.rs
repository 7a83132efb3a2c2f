//! Persistence Module
//!
//! Best-effort recording of fresh predictions to an external datastore.
//! A failed or disabled store never affects the prediction returned.

mod jsonl;

pub use jsonl::{Credentials, JsonlStore, COLLECTION};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::PersistError;
use crate::models::FeatureVector;

// == Prediction Record ==
/// One prediction as handed to a store.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub features: FeatureVector,
    pub prediction: i64,
}

// == Record Store ==
/// A datastore that accepts prediction records.
///
/// Calls may block; the sink runs them on the blocking pool.
pub trait RecordStore: Send + Sync + 'static {
    fn record(&self, record: &PredictionRecord) -> Result<(), PersistError>;
}

// == Persist Status ==
/// Outcome reported to the client as `db_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Record written
    Recorded,
    /// Store rejected the record
    Failed(String),
    /// Persistence is disabled
    Skipped,
    /// Served from cache, nothing to record
    Cached,
}

impl fmt::Display for PersistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistStatus::Recorded => write!(f, "DB OK"),
            PersistStatus::Failed(reason) => write!(f, "DB Error: {}", reason),
            PersistStatus::Skipped => write!(f, "DB skip"),
            PersistStatus::Cached => write!(f, "DB skip (cached)"),
        }
    }
}

// == Prediction Sink ==
/// Persistence capability, chosen once at startup.
#[derive(Clone)]
pub enum PredictionSink {
    Active(Arc<dyn RecordStore>),
    Disabled,
}

impl PredictionSink {
    /// Selects the sink from configuration.
    ///
    /// When enabled but the store cannot be opened, logs a warning and
    /// falls back to `Disabled` so the server keeps serving predictions.
    pub fn from_config(enabled: bool, credentials_path: &Path) -> Self {
        if !enabled {
            info!("Persistence disabled");
            return Self::Disabled;
        }

        match JsonlStore::open(credentials_path) {
            Ok(store) => {
                info!(
                    project_id = %store.project_id(),
                    path = %store.path().display(),
                    "Persistence enabled"
                );
                Self::Active(Arc::new(store))
            }
            Err(e) => {
                warn!("Could not initialize persistence, continuing without it: {}", e);
                Self::Disabled
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Records a prediction, turning every outcome into a status.
    pub async fn record(&self, features: FeatureVector, prediction: i64) -> PersistStatus {
        let store = match self {
            Self::Active(store) => Arc::clone(store),
            Self::Disabled => return PersistStatus::Skipped,
        };

        match Self::write(store, PredictionRecord { features, prediction }).await {
            Ok(()) => PersistStatus::Recorded,
            Err(e) => {
                warn!("Failed to record prediction: {}", e);
                PersistStatus::Failed(e.to_string())
            }
        }
    }

    async fn write(
        store: Arc<dyn RecordStore>,
        record: PredictionRecord,
    ) -> Result<(), PersistError> {
        tokio::task::spawn_blocking(move || store.record(&record))
            .await
            .map_err(|e| PersistError::Worker(e.to_string()))?
    }
}
