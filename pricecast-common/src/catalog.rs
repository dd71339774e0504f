//! Product catalog: dataset loading and name lookup
//!
//! The catalog is read once at startup from a CSV export and never changes
//! afterwards. Lookups are case-insensitive substring matches over product
//! names, first match in file order wins.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DatasetLoadError;
use crate::model::FeatureVector;
use crate::normalize::{normalize_price, normalize_rating, RawValue};

/// Columns every dataset must provide (any order, extra columns ignored)
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "image", "ratings", "no_of_ratings", "actual_price"];

/// One normalized catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Image URL or path, passed through untouched
    pub image: String,
    pub ratings: f64,
    pub no_of_ratings: f64,
    pub actual_price: f64,
}

impl ProductRecord {
    /// Model input for this product
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            ratings: self.ratings,
            no_of_ratings: self.no_of_ratings,
            actual_price: self.actual_price,
        }
    }
}

/// What to do with a row whose price cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPricePolicy {
    /// Drop the row and log it
    #[default]
    Skip,
    /// Fail the whole load
    Reject,
}

/// Result of a name lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a ProductRecord),
    NotFound,
}

/// Column positions resolved from the header row
struct ColumnIndex {
    name: usize,
    image: usize,
    ratings: usize,
    no_of_ratings: usize,
    actual_price: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetLoadError> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
        };

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| position(*column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DatasetLoadError::MissingColumns(missing));
        }

        // All present, checked above
        let index = |column: &str| position(column).unwrap_or_default();
        Ok(Self {
            name: index("name"),
            image: index("image"),
            ratings: index("ratings"),
            no_of_ratings: index("no_of_ratings"),
            actual_price: index("actual_price"),
        })
    }
}

/// Read every row of a CSV dataset and normalize its numeric columns.
///
/// Rows whose price cannot be parsed are handled per `policy`. Rating
/// columns never fail; unreadable ratings become `0.0`. Short rows are
/// tolerated and their missing cells treated as empty.
pub fn load_dataset<R: Read>(
    source: R,
    policy: MalformedPricePolicy,
) -> Result<LoadedDataset, DatasetLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let cell = |index: usize| RawValue::from(row.get(index));

        let actual_price = match normalize_price(cell(columns.actual_price)) {
            Ok(price) => price,
            Err(source) => match policy {
                MalformedPricePolicy::Skip => {
                    warn!(line, error = %source, "Skipping dataset row with malformed price");
                    skipped_rows += 1;
                    continue;
                }
                MalformedPricePolicy::Reject => {
                    return Err(DatasetLoadError::MalformedPrice { line, source });
                }
            },
        };

        records.push(ProductRecord {
            name: row.get(columns.name).unwrap_or_default().to_string(),
            image: row.get(columns.image).unwrap_or_default().to_string(),
            ratings: normalize_rating(cell(columns.ratings)),
            no_of_ratings: normalize_rating(cell(columns.no_of_ratings)),
            actual_price,
        });
    }

    debug!(rows = records.len(), skipped_rows, "Dataset parsed");

    if records.is_empty() {
        return Err(DatasetLoadError::Empty);
    }

    Ok(LoadedDataset {
        records,
        skipped_rows,
    })
}

/// Output of [`load_dataset`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub records: Vec<ProductRecord>,
    /// Rows dropped under [`MalformedPricePolicy::Skip`]
    pub skipped_rows: usize,
}

/// Immutable, searchable product dataset
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ProductRecord>,
    /// Lowercased names, parallel to `records`
    search_keys: Vec<String>,
    skipped_rows: usize,
}

impl Catalog {
    /// Load the catalog from a CSV file
    pub fn from_path(path: &Path, policy: MalformedPricePolicy) -> Result<Self, DatasetLoadError> {
        let file = File::open(path).map_err(|source| DatasetLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, policy)
    }

    /// Load the catalog from any CSV reader
    pub fn from_reader<R: Read>(
        source: R,
        policy: MalformedPricePolicy,
    ) -> Result<Self, DatasetLoadError> {
        let loaded = load_dataset(source, policy)?;
        let mut catalog = Self::from_records(loaded.records);
        catalog.skipped_rows = loaded.skipped_rows;
        Ok(catalog)
    }

    /// Build a catalog from records that are already normalized
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        let search_keys = records.iter().map(|r| r.name.to_lowercase()).collect();
        Self {
            records,
            search_keys,
            skipped_rows: 0,
        }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped during loading because of malformed prices
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// All products whose name contains `query`, ignoring case, in file order.
    ///
    /// The query is matched literally, whitespace included, so an empty
    /// query matches every product.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a ProductRecord> + 'a {
        let needle = query.to_lowercase();
        self.search_keys
            .iter()
            .zip(&self.records)
            .filter(move |(key, _)| key.contains(needle.as_str()))
            .map(|(_, record)| record)
    }

    /// First product whose name contains `query`, ignoring case
    pub fn find_first(&self, query: &str) -> Lookup<'_> {
        match self.search(query).next() {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotFound,
        }
    }
}
