//! The safe-operating-space threshold table.
//!
//! Maps a category label to its budget and control-variable unit. The table
//! is an immutable value: it is built once (from defaults or configuration)
//! and passed by reference to whatever needs it, so tests can substitute an
//! alternate threshold set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pbaesa_types::PlanetaryBoundary;

/// Budget of a single planetary-boundary category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryThreshold {
    /// Safe-operating-space budget in the category's control unit.
    pub value: f64,

    /// Descriptive unit of `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Category label -> safe-operating-space budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeOperatingSpace {
    thresholds: BTreeMap<String, BoundaryThreshold>,
}

impl SafeOperatingSpace {
    /// An empty table. Every category is undefined.
    pub const fn empty() -> Self {
        Self {
            thresholds: BTreeMap::new(),
        }
    }

    /// The published budgets for all nine quantified boundaries.
    pub fn planetary_defaults() -> Self {
        let thresholds = PlanetaryBoundary::ALL
            .into_iter()
            .map(|b| {
                (
                    b.label().to_owned(),
                    BoundaryThreshold {
                        value: b.default_threshold(),
                        unit: Some(b.unit().to_owned()),
                    },
                )
            })
            .collect();
        Self { thresholds }
    }

    /// Return a copy of the table with `category` set to `value`.
    #[must_use]
    pub fn with_threshold(mut self, category: &str, value: f64, unit: Option<&str>) -> Self {
        self.thresholds.insert(
            category.to_owned(),
            BoundaryThreshold {
                value,
                unit: unit.map(str::to_owned),
            },
        );
        self
    }

    /// The budget of `category`, if it is defined and strictly positive.
    ///
    /// Zero, negative and non-finite budgets are reported as undefined; a
    /// ratio against them has no meaning.
    pub fn threshold(&self, category: &str) -> Option<f64> {
        self.thresholds
            .get(category)
            .map(|t| t.value)
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    /// The unit of `category`, if known.
    pub fn unit(&self, category: &str) -> Option<&str> {
        self.thresholds.get(category).and_then(|t| t.unit.as_deref())
    }

    /// Iterate `(category, threshold)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundaryThreshold)> {
        self.thresholds.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of categories in the table.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

impl Default for SafeOperatingSpace {
    fn default() -> Self {
        Self::planetary_defaults()
    }
}
