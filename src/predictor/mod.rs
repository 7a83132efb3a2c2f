//! Predictor Module
//!
//! The trained model, seen by the rest of the server as an opaque,
//! synchronous `predict` call.

mod linear;

pub use linear::LinearModel;

use crate::error::ModelError;
use crate::models::FeatureVector;

// == Predictor ==
/// A trained model that maps one feature vector to one numeric output.
///
/// Implementations may block or burn CPU; callers are expected to run them
/// off the async scheduler.
pub trait Predictor: Send + Sync + 'static {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

impl<F> Predictor for F
where
    F: Fn(&FeatureVector) -> Result<f64, ModelError> + Send + Sync + 'static,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        self(features)
    }
}
