//! Request DTOs for the prediction API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for `POST /predict`
///
/// The length of `features` is checked by the service, not by
/// deserialization, so a wrong count gets the application-level error
/// payload instead of a rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    /// Raw feature values
    pub features: Vec<i64>,
}
