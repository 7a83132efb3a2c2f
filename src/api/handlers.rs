//! API Handlers
//!
//! HTTP request handlers for the prediction endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::config::Config;
use crate::error::Result;
use crate::models::{PredictRequest, PredictResponse};
use crate::persistence::PredictionSink;
use crate::predictor::Predictor;
use crate::service::PredictionService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline: cache, limiter, dispatcher and sink
    pub service: PredictionService,
}

impl AppState {
    /// Creates a new AppState around an already built service.
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, model: Arc<dyn Predictor>, sink: PredictionSink) -> Self {
        Self::new(PredictionService::from_config(config, model, sink))
    }
}

/// Handler for POST /predict
///
/// Returns the prediction, whether it came from the cache, and the
/// persistence outcome. A wrong feature count yields a 200 response with an
/// `error` body; a model failure yields a 500.
pub async fn predict_handler(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>> {
    let prediction = state.service.predict(req.features).await?;
    Ok(Json(prediction.into()))
}
