//! Characterisation factors per biosphere flow and boundary category.
//!
//! The table is JSON keyed by flow code, each entry mapping category labels
//! to factors:
//!
//! ```json
//! {
//!   "349b29d1-3e58-4c66-98b9-9d1a076efd2e": {
//!     "Climate Change": 1.2e-15,
//!     "Ocean Acidification": 3.4e-17
//!   },
//!   "N_supply": { "Nitrogen Cycle": 0.0 }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LcaError;

/// Flow code -> category label -> characterisation factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterizationTable {
    factors: BTreeMap<String, BTreeMap<String, f64>>,
}

impl CharacterizationTable {
    /// Parse a table from JSON text.
    ///
    /// # Errors
    ///
    /// [`LcaError::Table`] if `text` is not a flow -> category -> factor map.
    pub fn from_json(text: &str) -> Result<Self, LcaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a table from a JSON file.
    ///
    /// # Errors
    ///
    /// - [`LcaError::Io`] if the file cannot be opened or read.
    /// - [`LcaError::Table`] if its contents are not a valid table.
    pub fn from_file(path: &Path) -> Result<Self, LcaError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Set one factor.
    #[must_use]
    pub fn with_factor(mut self, code: &str, category: &str, factor: f64) -> Self {
        self.factors
            .entry(code.to_owned())
            .or_default()
            .insert(category.to_owned(), factor);
        self
    }

    /// `(code, factor)` for every flow that has a factor in `category`.
    pub fn factors_for<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.factors
            .iter()
            .filter_map(move |(code, row)| row.get(category).map(|f| (code.as_str(), *f)))
    }

    /// Number of flows in the table.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
