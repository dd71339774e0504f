//! Prediction models
//!
//! - [`Predictor`]: the capability every model artifact provides
//! - [`TreeEnsemble`]: random-forest and gradient-boosted tree exports
//! - [`ModelRegistry`]: the three models the service queries per request

pub mod artifact;
pub mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use artifact::TreeEnsemble;
pub use registry::{load_models, ModelPaths, ModelRegistry};

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; 3] = ["ratings", "no_of_ratings", "actual_price"];

/// The three numeric inputs every model consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ratings: f64,
    pub no_of_ratings: f64,
    pub actual_price: f64,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order
    pub fn as_array(&self) -> [f64; 3] {
        [self.ratings, self.no_of_ratings, self.actual_price]
    }
}

/// A pre-trained model: one feature vector in, one estimate out
pub trait Predictor: Send + Sync {
    /// Model family, checked against the role it is registered under
    fn kind(&self) -> ModelKind;

    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Model family of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    GradientBoosting,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boosting",
        })
    }
}

/// Slot a model occupies in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// Random forest pipeline
    Primary,
    /// XGBoost pipeline
    Secondary,
    /// scikit-learn gradient boosting
    Tertiary,
}

impl ModelRole {
    pub const ALL: [ModelRole; 3] = [ModelRole::Primary, ModelRole::Secondary, ModelRole::Tertiary];

    /// Model family an artifact must have to fill this role
    pub fn expected_kind(self) -> ModelKind {
        match self {
            ModelRole::Primary => ModelKind::RandomForest,
            ModelRole::Secondary | ModelRole::Tertiary => ModelKind::GradientBoosting,
        }
    }

    /// Human-readable name shown next to the estimate
    pub fn label(self) -> &'static str {
        match self {
            ModelRole::Primary => "Random Forest",
            ModelRole::Secondary => "XGBoost",
            ModelRole::Tertiary => "Gradient Boosting",
        }
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelRole::Primary => "primary",
            ModelRole::Secondary => "secondary",
            ModelRole::Tertiary => "tertiary",
        })
    }
}
