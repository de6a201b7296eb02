//! The long-form allocation-factor table.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use pbaesa_types::Year;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use crate::fr_matrix::FrMatrix;

/// Basis on which an allocation factor apportions a global burden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationVariant {
    /// Share of the geography's final consumption bought directly from the
    /// sector.
    DirectFce,
    /// FCE share including upstream supply chains.
    TotalFce,
    /// Direct gross-value-added share.
    DirectGva,
    /// Gross-value-added share including upstream supply chains.
    TotalGva,
}

impl AllocationVariant {
    /// All variants in column order.
    pub const ALL: [Self; 4] = [Self::DirectFce, Self::TotalFce, Self::DirectGva, Self::TotalGva];

    /// Column name in the persisted table.
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::DirectFce => "direct_fce",
            Self::TotalFce => "total_fce",
            Self::DirectGva => "direct_gva",
            Self::TotalGva => "total_gva",
        }
    }
}

impl core::fmt::Display for AllocationVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::DirectFce => "direct FCE",
            Self::TotalFce => "total FCE",
            Self::DirectGva => "direct GVA",
            Self::TotalGva => "total GVA",
        };
        f.write_str(label)
    }
}

/// Allocation factors of one (geography, sector) pair.
///
/// Absent variants are not computed; they are never filled with another
/// variant's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Counterpart geography of the FR column.
    pub geography: String,
    /// Region of the sector row. Equal to `geography` in persisted tables.
    pub region: String,
    /// Sector name.
    pub sector: String,
    /// Direct final-consumption share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_fce: Option<f64>,
    /// Total final-consumption share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fce: Option<f64>,
    /// Direct gross-value-added share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_gva: Option<f64>,
    /// Total gross-value-added share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_gva: Option<f64>,
}

impl AllocationRow {
    /// The value of `variant`, if computed.
    pub const fn value(&self, variant: AllocationVariant) -> Option<f64> {
        match variant {
            AllocationVariant::DirectFce => self.direct_fce,
            AllocationVariant::TotalFce => self.total_fce,
            AllocationVariant::DirectGva => self.direct_gva,
            AllocationVariant::TotalGva => self.total_gva,
        }
    }
}

/// A year's allocation factors, one row per (region, sector) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    /// Dataset year.
    pub year: Year,
    /// When the table was built.
    pub generated_at: DateTime<Utc>,
    /// Rows in FR row order.
    pub rows: Vec<AllocationRow>,
}

impl AllocationTable {
    /// Keep the diagonal of `fr`: each sector row paired with the column of
    /// its own region.
    ///
    /// # Errors
    ///
    /// [`BuildError::RegionOutOfScope`] if a sector's region is not a column
    /// of `fr`.
    pub fn from_fr_matrix(
        fr: &FrMatrix,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, BuildError> {
        let rows = fr
            .sectors
            .labels()
            .iter()
            .enumerate()
            .map(|(s, label)| {
                let g = fr.geographies.position(&label.region).ok_or_else(|| {
                    BuildError::RegionOutOfScope {
                        region: label.region.clone(),
                    }
                })?;
                Ok(AllocationRow {
                    geography: label.region.clone(),
                    region: label.region.clone(),
                    sector: label.name.clone(),
                    direct_fce: fr.share(s, g),
                    total_fce: None,
                    direct_gva: None,
                    total_gva: None,
                })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(Self {
            year: fr.year,
            generated_at,
            rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct sector names, sorted.
    pub fn sectors(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.sector.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Whether any row names `sector`.
    pub fn has_sector(&self, sector: &str) -> bool {
        self.rows.iter().any(|row| row.sector == sector)
    }

    /// The row for `(geography, sector)`.
    pub fn find(&self, geography: &str, sector: &str) -> Option<&AllocationRow> {
        self.rows
            .iter()
            .find(|row| row.geography == geography && row.sector == sector)
    }
}
