//! Error types for the prediction server
//!
//! Provides the error taxonomy using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Validation Error ==
/// The request did not carry a usable feature vector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Wrong number of features
    #[error("Se requieren exactamente 14 características")]
    FeatureCount { actual: usize },
}

// == Model Error ==
/// Failures loading or evaluating the trained model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Model artifact could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model artifact is not a valid model document
    #[error("Failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Model has the wrong number of weights
    #[error("Model expects {expected} weights, artifact has {actual}")]
    Shape { expected: usize, actual: usize },

    /// Prediction itself failed
    #[error("Inference failed: {0}")]
    Inference(String),
}

// == Compute Error ==
/// Failures running a prediction on the blocking worker pool.
#[derive(Error, Debug)]
pub enum ComputeError {
    /// The model returned an error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model returned NaN or infinity
    #[error("Model returned a non-finite value: {0}")]
    NonFinite(f64),

    /// The rounded value does not fit an i64
    #[error("Model output {0} is out of range")]
    OutOfRange(f64),

    /// The worker panicked or was cancelled, or admission failed
    #[error("Prediction worker failed: {0}")]
    Worker(String),
}

// == Persist Error ==
/// Failures recording a prediction to the datastore.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Credentials file missing or malformed
    #[error("Invalid credentials {path}: {reason}")]
    Credentials { path: PathBuf, reason: String },

    /// I/O failure writing the record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store task panicked or was cancelled
    #[error("Store worker failed: {0}")]
    Worker(String),
}

// == Service Error ==
/// Errors a prediction request can end with.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Invalid input, reported as an application-level error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Prediction could not be computed
    #[error(transparent)]
    Compute(#[from] ComputeError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Validation failures are part of the endpoint's normal contract and
        // keep a 200 status; compute failures are server errors.
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::OK,
            ServiceError::Compute(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handling.
pub type Result<T> = std::result::Result<T, ServiceError>;
