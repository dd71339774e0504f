//! Tree-ensemble model artifacts
//!
//! Artifacts are JSON exports of fitted random-forest and gradient-boosted
//! regressors. Each tree is a flat node array with node 0 as the root. A
//! split sends the sample left when `x[feature] <= threshold` (scikit-learn),
//! or when `x[feature] < threshold` for artifacts marked `"split_rule": "lt"`
//! (XGBoost).
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "kind": "gradient_boosting",
//!   "split_rule": "lt",
//!   "feature_names": ["ratings", "no_of_ratings", "actual_price"],
//!   "base_score": 2.5,
//!   "learning_rate": 0.1,
//!   "trees": [{"nodes": [{"feature": 2, "threshold": 500.0, "left": 1, "right": 2},
//!                        {"value": -0.4}, {"value": 0.7}]}]
//! }
//! ```
//!
//! Parsing happens in two steps: serde reads the raw [`ArtifactFile`], then
//! [`TreeEnsemble::try_from`] checks the structure so prediction can index
//! nodes without further checks.

use serde::{Deserialize, Serialize};

use super::{FeatureVector, ModelKind, Predictor, FEATURE_NAMES};
use crate::error::ArtifactError;

/// Only artifact layout this build understands
pub const FORMAT_VERSION: u32 = 1;

fn default_learning_rate() -> f64 {
    1.0
}

/// Comparison a split node applies to send a sample to its left child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitRule {
    /// `x <= threshold`
    #[default]
    #[serde(rename = "le")]
    LessOrEqual,
    /// `x < threshold`
    #[serde(rename = "lt")]
    Less,
}

impl SplitRule {
    fn goes_left(self, value: f64, threshold: f64) -> bool {
        match self {
            SplitRule::LessOrEqual => value <= threshold,
            SplitRule::Less => value < threshold,
        }
    }
}

/// Artifact document exactly as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format_version: u32,
    pub kind: ModelKind,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub split_rule: SplitRule,
    /// Fitted standardization step from the training pipeline, if any
    #[serde(default)]
    pub scaler: Option<Scaler>,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

/// Per-feature standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_NAMES.len() {
                        return Err(format!("node {index} splits on unknown feature {feature}"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {index} has a non-finite threshold"));
                    }
                    // Children after their parent keeps every walk finite
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {index} has invalid child {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {index} has a non-finite value"));
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf. Requires a validated tree.
    fn evaluate(&self, x: &[f64; 3], rule: SplitRule) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if rule.goes_left(x[feature], threshold) { left } else { right };
                }
            }
        }
    }
}

impl Scaler {
    fn validate(&self) -> Result<(), ArtifactError> {
        let width = FEATURE_NAMES.len();
        if self.mean.len() != width || self.scale.len() != width {
            return Err(ArtifactError::Scaler(format!(
                "expected {width} means and scales, found {} and {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ArtifactError::Scaler("mean is not finite".to_string()));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ArtifactError::Scaler(
                "scale must be finite and non-zero".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(&self, x: [f64; 3]) -> [f64; 3] {
        let mut scaled = x;
        for (i, value) in scaled.iter_mut().enumerate() {
            *value = (*value - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// Validated tree ensemble, ready for prediction
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    kind: ModelKind,
    split_rule: SplitRule,
    scaler: Option<Scaler>,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }
}

impl TryFrom<ArtifactFile> for TreeEnsemble {
    type Error = ArtifactError;

    fn try_from(file: ArtifactFile) -> Result<Self, Self::Error> {
        if file.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(file.format_version));
        }

        if file.feature_names != FEATURE_NAMES {
            return Err(ArtifactError::FeatureSchema {
                expected: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
                found: file.feature_names,
            });
        }

        if file.trees.is_empty() {
            return Err(ArtifactError::NoTrees);
        }
        for (tree, t) in file.trees.iter().enumerate() {
            t.validate()
                .map_err(|reason| ArtifactError::MalformedTree { tree, reason })?;
        }

        if let Some(scaler) = &file.scaler {
            scaler.validate()?;
        }
        if !file.base_score.is_finite() {
            return Err(ArtifactError::NonFinite("base_score"));
        }
        if !file.learning_rate.is_finite() {
            return Err(ArtifactError::NonFinite("learning_rate"));
        }

        Ok(Self {
            kind: file.kind,
            split_rule: file.split_rule,
            scaler: file.scaler,
            base_score: file.base_score,
            learning_rate: file.learning_rate,
            trees: file.trees,
        })
    }
}

impl Predictor for TreeEnsemble {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, features: &FeatureVector) -> f64 {
        let mut x = features.as_array();
        if let Some(scaler) = &self.scaler {
            x = scaler.apply(x);
        }

        let total: f64 = self
            .trees
            .iter()
            .map(|tree| tree.evaluate(&x, self.split_rule))
            .sum();

        match self.kind {
            ModelKind::RandomForest => total / self.trees.len() as f64,
            ModelKind::GradientBoosting => self.base_score + self.learning_rate * total,
        }
    }
}
