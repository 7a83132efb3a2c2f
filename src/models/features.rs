//! Feature Vector
//!
//! The validated model input, also used as the cache key.

use serde::Serialize;

use crate::error::ValidationError;

/// Number of features the model takes.
pub const FEATURE_COUNT: usize = 14;

// == Feature Vector ==
/// Exactly [`FEATURE_COUNT`] integer features, in request order.
///
/// Equality and hashing are order-sensitive and exact, so the vector itself
/// is the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([i64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl TryFrom<Vec<i64>> for FeatureVector {
    type Error = ValidationError;

    fn try_from(features: Vec<i64>) -> Result<Self, Self::Error> {
        let actual = features.len();
        features
            .try_into()
            .map(Self)
            .map_err(|_| ValidationError::FeatureCount { actual })
    }
}

impl From<[i64; FEATURE_COUNT]> for FeatureVector {
    fn from(features: [i64; FEATURE_COUNT]) -> Self {
        Self(features)
    }
}
