//! Linear Model
//!
//! Model artifact format: a JSON document with one weight per feature and an
//! intercept.
//!
//! ```json
//! { "weights": [0.1, 0.2, ...], "intercept": 1.5 }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;
use crate::models::{FeatureVector, FEATURE_COUNT};
use crate::predictor::Predictor;

// == Linear Model ==
/// Linear regression model loaded from a JSON artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    /// One coefficient per feature, in feature order
    weights: Vec<f64>,
    /// Constant term
    #[serde(default)]
    intercept: f64,
}

impl LinearModel {
    /// Builds a model from its coefficients.
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        let model = Self { weights, intercept };
        model.check_shape()?;
        Ok(model)
    }

    /// Loads and validates the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.check_shape()?;
        Ok(model)
    }

    fn check_shape(&self) -> Result<(), ModelError> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(ModelError::Shape {
                expected: FEATURE_COUNT,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let dot: f64 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(weight, feature)| weight * *feature as f64)
            .sum();
        Ok(dot + self.intercept)
    }
}
