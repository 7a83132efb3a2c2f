//! Response DTOs for the prediction API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for a successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictResponse {
    /// Rounded model output
    pub prediction: i64,
    /// Whether the value came from the cache
    pub cache: bool,
    /// Outcome of the persistence attempt
    pub db_status: String,
}

impl PredictResponse {
    pub fn new(prediction: i64, cache: bool, db_status: impl Into<String>) -> Self {
        Self {
            prediction,
            cache,
            db_status: db_status.into(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
