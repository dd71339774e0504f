//! Common error types for pricecast

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{ModelKind, ModelRole};

/// Common result type for pricecast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for callers that do not care which stage failed
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Product dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetLoadError),

    /// A model artifact could not be loaded
    #[error("Model error: {0}")]
    Model(#[from] ModelLoadError),

    /// Request-scoped prediction failure
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// A price value that cannot be turned into a finite number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("price {raw:?} is not a number")]
    NotANumber { raw: String },

    #[error("price {raw:?} is not finite")]
    NotFinite { raw: String },

    #[error("price is missing")]
    Missing,
}

/// Startup failure while reading the product dataset
#[derive(Error, Debug)]
pub enum DatasetLoadError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Raised only when the malformed-price policy is `reject`
    #[error("line {line}: {source}")]
    MalformedPrice { line: u64, source: ParseError },

    #[error("dataset contains no usable rows")]
    Empty,
}

/// Structural problem inside an otherwise readable model artifact
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtifactError {
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),

    #[error("feature schema {found:?} does not match expected {expected:?}")]
    FeatureSchema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("expected a {expected} model, found {found}")]
    WrongKind { expected: ModelKind, found: ModelKind },

    #[error("artifact contains no trees")]
    NoTrees,

    #[error("tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("scaler: {0}")]
    Scaler(String),

    #[error("{0} is not finite")]
    NonFinite(&'static str),
}

/// Startup failure while loading one of the three model artifacts
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("failed to read {role} model artifact {path}: {source}")]
    Read {
        role: ModelRole,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{role} model artifact {path} is not valid JSON: {source}")]
    Decode {
        role: ModelRole,
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{role} model artifact {path} is invalid: {source}")]
    Invalid {
        role: ModelRole,
        path: PathBuf,
        source: ArtifactError,
    },
}

/// Request-scoped failure of the lookup-and-predict pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("no product matches {query:?}")]
    ProductNotFound { query: String },
}

/// Configuration file could not be used
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
