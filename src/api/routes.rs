//! API Routes
//!
//! Configures the Axum router for the prediction server.

use axum::{routing::post, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{predict_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `POST /predict` - Predict from a feature vector
///
/// # Middleware
/// - CORS: any origin, method and header
/// - Tracing: logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
