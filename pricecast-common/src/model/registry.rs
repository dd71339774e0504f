//! Three-role model registry
//!
//! Loaded once at startup. Every artifact must parse, validate, and have the
//! model family its role expects, or startup fails.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::artifact::{ArtifactFile, TreeEnsemble};
use super::{ModelRole, Predictor};
use crate::error::{ArtifactError, ModelLoadError};

/// Storage locations of the three model artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelPaths {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub tertiary: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("models/random_forest.json"),
            secondary: PathBuf::from("models/xgboost.json"),
            tertiary: PathBuf::from("models/gradient_boosting.json"),
        }
    }
}

impl ModelPaths {
    pub fn get(&self, role: ModelRole) -> &Path {
        match role {
            ModelRole::Primary => &self.primary,
            ModelRole::Secondary => &self.secondary,
            ModelRole::Tertiary => &self.tertiary,
        }
    }

    /// Resolve relative paths against `base`
    pub fn resolve_against(&mut self, base: &Path) {
        for path in [&mut self.primary, &mut self.secondary, &mut self.tertiary] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// The three models queried for every prediction
pub struct ModelRegistry {
    primary: Box<dyn Predictor>,
    secondary: Box<dyn Predictor>,
    tertiary: Box<dyn Predictor>,
}

impl ModelRegistry {
    /// Assemble a registry from already-loaded predictors
    pub fn new(
        primary: Box<dyn Predictor>,
        secondary: Box<dyn Predictor>,
        tertiary: Box<dyn Predictor>,
    ) -> Self {
        Self {
            primary,
            secondary,
            tertiary,
        }
    }

    pub fn get(&self, role: ModelRole) -> &dyn Predictor {
        match role {
            ModelRole::Primary => self.primary.as_ref(),
            ModelRole::Secondary => self.secondary.as_ref(),
            ModelRole::Tertiary => self.tertiary.as_ref(),
        }
    }

    /// Models in role order
    pub fn iter(&self) -> impl Iterator<Item = (ModelRole, &dyn Predictor)> + '_ {
        ModelRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("primary", &self.primary.kind())
            .field("secondary", &self.secondary.kind())
            .field("tertiary", &self.tertiary.kind())
            .finish()
    }
}

/// Read and validate the artifact for one role
pub fn load_artifact(role: ModelRole, path: &Path) -> Result<TreeEnsemble, ModelLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ModelLoadError::Read {
        role,
        path: path.to_path_buf(),
        source,
    })?;

    let file: ArtifactFile = serde_json::from_str(&text).map_err(|source| ModelLoadError::Decode {
        role,
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |source: ArtifactError| ModelLoadError::Invalid {
        role,
        path: path.to_path_buf(),
        source,
    };

    let expected = role.expected_kind();
    if file.kind != expected {
        return Err(invalid(ArtifactError::WrongKind {
            expected,
            found: file.kind,
        }));
    }

    let model = TreeEnsemble::try_from(file).map_err(invalid)?;

    info!(
        "Loaded {} model ({}, {} trees{}) from {}",
        role,
        model.kind(),
        model.tree_count(),
        if model.has_scaler() { ", scaled inputs" } else { "" },
        path.display()
    );

    Ok(model)
}

/// Load all three artifacts; the first failure aborts
pub fn load_models(paths: &ModelPaths) -> Result<ModelRegistry, ModelLoadError> {
    let primary = load_artifact(ModelRole::Primary, paths.get(ModelRole::Primary))?;
    let secondary = load_artifact(ModelRole::Secondary, paths.get(ModelRole::Secondary))?;
    let tertiary = load_artifact(ModelRole::Tertiary, paths.get(ModelRole::Tertiary))?;

    Ok(ModelRegistry::new(
        Box::new(primary),
        Box::new(secondary),
        Box::new(tertiary),
    ))
}
