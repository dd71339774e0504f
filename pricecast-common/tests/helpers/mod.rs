//! Fixture builders shared by the pricecast-common integration tests
//!
//! Writes small CSV datasets and model artifacts into a temp directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use pricecast_common::model::ModelPaths;
use serde_json::{json, Value};

pub const HEADER: &str = "name,main_category,image,link,ratings,no_of_ratings,discount_price,actual_price";

/// Dataset used across tests: two "Red" products, red shoe first
pub const SHOES_CSV: &str = "\
name,main_category,image,link,ratings,no_of_ratings,discount_price,actual_price
Red Shoe,fashion,https://img.example/red-shoe.jpg,https://shop.example/1,4.2,1200,\"₹999\",\"₹1,299\"
Blue Shoe,fashion,https://img.example/blue-shoe.jpg,https://shop.example/2,Get,\"2,255\",\"₹649\",₹899
Red Hat,accessories,https://img.example/red-hat.jpg,https://shop.example/3,3.9,87,\"₹299\",₹349.50
";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Artifact whose every tree returns `value`, whatever the input
pub fn constant_artifact(kind: &str, value: f64) -> Value {
    json!({
        "format_version": 1,
        "kind": kind,
        "feature_names": ["ratings", "no_of_ratings", "actual_price"],
        "trees": [{"nodes": [{"value": value}]}]
    })
}

/// Two-leaf artifact splitting on price at `threshold`
pub fn price_split_artifact(kind: &str, threshold: f64, low: f64, high: f64) -> Value {
    json!({
        "format_version": 1,
        "kind": kind,
        "feature_names": ["ratings", "no_of_ratings", "actual_price"],
        "trees": [{"nodes": [
            {"feature": 2, "threshold": threshold, "left": 1, "right": 2},
            {"value": low},
            {"value": high}
        ]}]
    })
}

/// Write the three role artifacts and return their paths
pub fn write_models(dir: &Path, primary: &Value, secondary: &Value, tertiary: &Value) -> ModelPaths {
    ModelPaths {
        primary: write_file(dir, "models/random_forest.json", &primary.to_string()),
        secondary: write_file(dir, "models/xgboost.json", &secondary.to_string()),
        tertiary: write_file(dir, "models/gradient_boosting.json", &tertiary.to_string()),
    }
}

/// Constant models returning 10, 12 and 11
pub fn write_constant_models(dir: &Path) -> ModelPaths {
    write_models(
        dir,
        &constant_artifact("random_forest", 10.0),
        &constant_artifact("gradient_boosting", 12.0),
        &constant_artifact("gradient_boosting", 11.0),
    )
}
