//! # pricecast Common Library
//!
//! Everything the prediction service needs apart from HTTP:
//! - Price and rating normalization
//! - Catalog (product dataset) loading and lookup
//! - Model artifacts and the three-role model registry
//! - The lookup-and-predict pipeline
//! - Configuration loading
//! - Error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;

pub use catalog::{Catalog, Lookup, ProductRecord};
pub use error::{
    ArtifactError, ConfigError, DatasetLoadError, Error, ModelLoadError, ParseError, PredictError,
    Result,
};
pub use model::{FeatureVector, ModelKind, ModelRegistry, ModelRole, Predictor};
pub use normalize::{normalize_price, normalize_rating, RawValue};
pub use pipeline::{Pipeline, PredictionOutcome};
