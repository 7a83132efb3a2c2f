//! Request and Response models for the prediction API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! validated feature vector they carry.

pub mod features;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use features::{FeatureVector, FEATURE_COUNT};
pub use requests::PredictRequest;
pub use responses::{ErrorResponse, PredictResponse};
