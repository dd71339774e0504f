//! Lookup-and-predict pipeline
//!
//! Finds the first catalog entry whose name contains the query and runs its
//! features through all three registered models. Holds only immutable state,
//! so one instance serves every request concurrently.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Lookup, ProductRecord};
use crate::config::TomlConfig;
use crate::error::{PredictError, Result};
use crate::model::{load_models, ModelRegistry, ModelRole};

/// A matched product and the three model estimates for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub product: ProductRecord,
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

impl PredictionOutcome {
    pub fn estimate(&self, role: ModelRole) -> f64 {
        match role {
            ModelRole::Primary => self.primary,
            ModelRole::Secondary => self.secondary,
            ModelRole::Tertiary => self.tertiary,
        }
    }

    /// Estimates paired with their roles, in role order
    pub fn estimates(&self) -> [(ModelRole, f64); 3] {
        ModelRole::ALL.map(|role| (role, self.estimate(role)))
    }
}

/// Catalog plus models, built once at startup
#[derive(Debug)]
pub struct Pipeline {
    catalog: Catalog,
    models: ModelRegistry,
}

impl Pipeline {
    pub fn new(catalog: Catalog, models: ModelRegistry) -> Self {
        Self { catalog, models }
    }

    /// Load the dataset and the three models named by `config`.
    ///
    /// The dataset is read first; a failure reports which stage broke.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let catalog = Catalog::from_path(&config.dataset.path, config.dataset.on_malformed_price)?;
        let models = load_models(&config.models)?;
        Ok(Self::new(catalog, models))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    /// Look up `query` and predict for the first matching product.
    ///
    /// A query with no visible characters is treated as not found rather
    /// than matching the first product in the catalog.
    pub fn predict_for(&self, query: &str) -> std::result::Result<PredictionOutcome, PredictError> {
        let lookup = if query.trim().is_empty() {
            Lookup::NotFound
        } else {
            self.catalog.find_first(query)
        };

        let product = match lookup {
            Lookup::Found(product) => product,
            Lookup::NotFound => {
                debug!(query, "No product matches query");
                return Err(PredictError::ProductNotFound {
                    query: query.to_string(),
                });
            }
        };

        let features = product.features();
        let estimate = |role| self.models.get(role).predict(&features);

        let outcome = PredictionOutcome {
            product: product.clone(),
            primary: estimate(ModelRole::Primary),
            secondary: estimate(ModelRole::Secondary),
            tertiary: estimate(ModelRole::Tertiary),
        };

        debug!(
            product = %outcome.product.name,
            primary = outcome.primary,
            secondary = outcome.secondary,
            tertiary = outcome.tertiary,
            "Prediction complete"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureVector, ModelKind, Predictor};

    struct ConstantModel(f64);

    impl Predictor for ConstantModel {
        fn kind(&self) -> ModelKind {
            ModelKind::GradientBoosting
        }

        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }
    }

    /// Echoes the price so tests can see which record was used
    struct PriceEcho;

    impl Predictor for PriceEcho {
        fn kind(&self) -> ModelKind {
            ModelKind::RandomForest
        }

        fn predict(&self, features: &FeatureVector) -> f64 {
            features.actual_price
        }
    }

    fn record(name: &str, price: f64) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            image: format!("{}.jpg", name.to_lowercase().replace(' ', "-")),
            ratings: 4.0,
            no_of_ratings: 100.0,
            actual_price: price,
        }
    }

    fn pipeline() -> Pipeline {
        let catalog = Catalog::from_records(vec![
            record("Red Shoe", 1299.0),
            record("Blue Shoe", 899.0),
            record("Red Hat", 349.0),
        ]);
        let models = ModelRegistry::new(
            Box::new(ConstantModel(10.0)),
            Box::new(ConstantModel(12.0)),
            Box::new(ConstantModel(11.0)),
        );
        Pipeline::new(catalog, models)
    }

    #[test]
    fn test_first_match_in_dataset_order() {
        let outcome = pipeline().predict_for("red").unwrap();
        assert_eq!(outcome.product.name, "Red Shoe");
    }

    #[test]
    fn test_estimates_come_from_each_model() {
        let outcome = pipeline().predict_for("blue shoe").unwrap();
        assert_eq!(outcome.primary, 10.0);
        assert_eq!(outcome.secondary, 12.0);
        assert_eq!(outcome.tertiary, 11.0);
        assert_eq!(
            outcome.estimates(),
            [
                (ModelRole::Primary, 10.0),
                (ModelRole::Secondary, 12.0),
                (ModelRole::Tertiary, 11.0)
            ]
        );
    }

    #[test]
    fn test_not_found_is_an_error_value() {
        let err = pipeline().predict_for("nonexistent-item-xyz").unwrap_err();
        assert_eq!(
            err,
            PredictError::ProductNotFound {
                query: "nonexistent-item-xyz".into()
            }
        );
    }

    #[test]
    fn test_case_insensitive_queries_agree() {
        let pipeline = pipeline();
        let upper = pipeline.predict_for("RED SHOE").unwrap();
        let lower = pipeline.predict_for("red shoe").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_query_matched_with_its_whitespace() {
        let catalog = Catalog::from_records(vec![
            record("Redhat Linux", 5000.0),
            record("Red Hat", 349.0),
        ]);
        let models = ModelRegistry::new(
            Box::new(PriceEcho),
            Box::new(ConstantModel(12.0)),
            Box::new(ConstantModel(11.0)),
        );
        let outcome = Pipeline::new(catalog, models).predict_for("red ").unwrap();
        assert_eq!(outcome.product.name, "Red Hat");
        assert_eq!(outcome.primary, 349.0);
    }

    #[test]
    fn test_blank_query_not_found() {
        let pipeline = pipeline();
        for query in ["", "   ", "\t"] {
            assert_eq!(
                pipeline.predict_for(query),
                Err(PredictError::ProductNotFound {
                    query: query.to_string()
                })
            );
        }
    }

    #[test]
    fn test_models_receive_matched_features() {
        let catalog = Catalog::from_records(vec![record("Red Shoe", 1299.0), record("Red Hat", 349.0)]);
        let models = ModelRegistry::new(
            Box::new(PriceEcho),
            Box::new(PriceEcho),
            Box::new(PriceEcho),
        );
        let outcome = Pipeline::new(catalog, models).predict_for("hat").unwrap();
        assert_eq!(outcome.primary, 349.0);
        assert_eq!(outcome.tertiary, 349.0);
    }
}
