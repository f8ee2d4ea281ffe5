//! Manufacturer → vehicle-category lookup.
//!
//! The built-in table lives in `data/categories.csv` and is embedded at
//! compile time. A replacement table with the same `Maker,Category` header
//! can be loaded from disk.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RegtrendError, Result};
use crate::models::Category;

const BUILTIN_TABLE: &str = include_str!("../data/categories.csv");

#[derive(Debug, Deserialize)]
struct LookupRow {
    #[serde(rename = "Maker")]
    maker: String,
    #[serde(rename = "Category")]
    category: String,
}

/// Canonical join key for a maker name: trimmed, inner whitespace runs
/// (including non-breaking spaces) collapsed to one space, upper-cased.
pub fn normalize_maker_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Immutable maker-name → [`Category`] map.
#[derive(Debug, Clone, Default)]
pub struct CategoryLookup {
    map: HashMap<String, Category>,
}

impl CategoryLookup {
    /// The table shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_reader(BUILTIN_TABLE.as_bytes())
    }

    /// Load a `Maker,Category` CSV from disk.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| RegtrendError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let lookup = Self::from_reader(file)?;
        tracing::info!(
            entries = lookup.len(),
            "loaded category table from {}",
            path.display()
        );
        Ok(lookup)
    }

    /// Parse a `Maker,Category` CSV. Later rows win on duplicate keys; a table
    /// without rows is rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut map = HashMap::new();
        for row in rdr.deserialize::<LookupRow>() {
            let row = row?;
            let category: Category = row.category.parse()?;
            map.insert(normalize_maker_name(&row.maker), category);
        }
        if map.is_empty() {
            return Err(RegtrendError::Config("category table has no rows".to_string()));
        }
        Ok(Self { map })
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Category)>) -> Self {
        Self {
            map: pairs
                .into_iter()
                .map(|(maker, cat)| (normalize_maker_name(maker), cat))
                .collect(),
        }
    }

    /// Exact match on the normalized name. No fuzzy matching: different
    /// punctuation is a miss.
    pub fn category_of(&self, maker: &str) -> Option<Category> {
        self.map.get(&normalize_maker_name(maker)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
