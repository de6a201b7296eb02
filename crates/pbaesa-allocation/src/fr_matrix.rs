//! The FR matrix: each sector's share of a geography's final consumption.
//!
//! For geography `g`, the final-consumption expenditure attributable to row
//! `s` of the final-demand matrix is the sum of the household, NPISH and
//! government columns of `g`. Stacking those contributions for every
//! geography is one product with a 0/1 selector:
//!
//! ```text
//! FCE = Y · S          S[c, g] = 1 if column c is an FCE column of g
//! FR[:, g] = FCE[:, g] / sum(FCE[:, g])
//! ```
//!
//! Every column with a nonzero total therefore sums to one. A geography with
//! no final consumption at all stays an all-zero column.

use nalgebra::DMatrix;
use pbaesa_mrio::{Axis, MrioTables};
use pbaesa_types::{FINAL_CONSUMPTION_CATEGORIES, GeoScopes, Year};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BuildError;

/// Default tolerance for the column-sum check.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// The final-demand category labels summed into a geography's FCE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FceCategories(Vec<String>);

impl FceCategories {
    /// Use `labels` as the FCE sub-categories.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Iterate the labels.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for FceCategories {
    fn default() -> Self {
        Self::new(FINAL_CONSUMPTION_CATEGORIES)
    }
}

/// Outcome of [`FrMatrix::column_balance`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnBalance {
    /// Every non-empty column sums to one within tolerance.
    Balanced,
    /// `(geography, sum)` for each column outside tolerance.
    Drift(Vec<(String, f64)>),
}

/// Sector-by-geography FCE shares for one year.
#[derive(Debug, Clone)]
pub struct FrMatrix {
    /// Dataset year.
    pub year: Year,
    /// Row axis, shared with `L`.
    pub sectors: Axis,
    /// Column order.
    pub geographies: GeoScopes,
    /// `sectors.len() x geographies.len()` shares.
    pub values: DMatrix<f64>,
    /// Geographies whose column is all zero.
    pub empty: Vec<String>,
}

impl FrMatrix {
    /// Share of sector row `sector` in geography column `geography`.
    pub fn share(&self, sector: usize, geography: usize) -> Option<f64> {
        self.values.get((sector, geography)).copied()
    }

    /// Check that every non-empty column sums to one within `tolerance`.
    ///
    /// A NaN or infinite column sum always counts as drift.
    pub fn column_balance(&self, tolerance: f64) -> ColumnBalance {
        let drift: Vec<(String, f64)> = self
            .geographies
            .iter()
            .zip(self.values.column_iter())
            .filter(|(code, _)| !self.empty.iter().any(|e| e == code))
            .map(|(code, column)| (code.to_owned(), column.sum()))
            .filter(|(_, sum)| !sum.is_finite() || (sum - 1.0).abs() > tolerance)
            .collect();

        if drift.is_empty() {
            ColumnBalance::Balanced
        } else {
            ColumnBalance::Drift(drift)
        }
    }
}

/// Build the `(Y columns x geographies)` selector of FCE columns.
///
/// Every `(geography, category)` pair must exist in `columns`.
///
/// # Errors
///
/// [`BuildError::MissingDemandColumn`] for the first absent pair.
pub fn fce_selector(
    columns: &Axis,
    geographies: &GeoScopes,
    categories: &FceCategories,
) -> Result<DMatrix<f64>, BuildError> {
    let mut selector = DMatrix::<f64>::zeros(columns.len(), geographies.len());
    for (g, geography) in geographies.iter().enumerate() {
        for category in categories.iter() {
            let column = columns.position(geography, category).ok_or_else(|| {
                BuildError::MissingDemandColumn {
                    geography: geography.to_owned(),
                    category: category.to_owned(),
                }
            })?;
            if let Some(entry) = selector.get_mut((column, g)) {
                *entry = 1.0;
            }
        }
    }
    Ok(selector)
}

/// Compute the FR matrix of `tables` over `geographies`.
///
/// # Errors
///
/// - [`BuildError::MissingDemandColumn`] if a `(geography, category)` column
///   is absent from the final-demand matrix.
/// - [`BuildError::NonFiniteShare`] if a geography's total or a share is NaN
///   or infinite.
/// - [`BuildError::DegenerateGeography`] if a total is zero although some
///   contributions are not.
/// - [`BuildError::ShapeMismatch`] if the result does not have one row per
///   row of `L`.
#[allow(clippy::float_cmp)]
pub fn compute_fr_matrix(
    tables: &MrioTables,
    geographies: &GeoScopes,
    categories: &FceCategories,
) -> Result<FrMatrix, BuildError> {
    let selector = fce_selector(tables.final_demand.columns(), geographies, categories)?;
    let mut values = tables.final_demand.values() * selector;

    let mut empty = Vec::new();
    for (code, mut column) in geographies.iter().zip(values.column_iter_mut()) {
        let total = column.sum();
        let non_finite = || BuildError::NonFiniteShare {
            geography: code.to_owned(),
            total,
        };
        if !total.is_finite() {
            return Err(non_finite());
        }
        if total == 0.0 {
            let contributors = column.iter().filter(|v| **v != 0.0).count();
            if contributors > 0 {
                return Err(BuildError::DegenerateGeography {
                    geography: code.to_owned(),
                    contributors,
                });
            }
            warn!(
                year = tables.year.get(),
                geography = code,
                "Geography has no final consumption, column left empty"
            );
            empty.push(code.to_owned());
            continue;
        }
        for value in column.iter_mut() {
            *value /= total;
        }
        if column.iter().any(|v| !v.is_finite()) {
            return Err(non_finite());
        }
    }

    let expected = (tables.leontief.nrows(), geographies.len());
    if values.shape() != expected {
        return Err(BuildError::ShapeMismatch {
            expected,
            actual: values.shape(),
        });
    }

    debug!(
        year = tables.year.get(),
        rows = expected.0,
        geographies = expected.1,
        empty = empty.len(),
        "FR matrix computed"
    );

    Ok(FrMatrix {
        year: tables.year,
        sectors: tables.sectors.clone(),
        geographies: geographies.clone(),
        values,
        empty,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use pbaesa_mrio::{Label, LabeledMatrix};
    use pbaesa_types::{FCE_GOVERNMENT, FCE_HOUSEHOLDS, FCE_NPISH};
    use proptest::prelude::*;

    use super::*;

    const GFCF: &str = "Gross fixed capital formation";

    fn sectors(regions: &[&str], names: &[&str]) -> Axis {
        let labels = regions
            .iter()
            .flat_map(|r| names.iter().map(move |n| Label::new(*r, *n)))
            .collect();
        Axis::new(["region".to_owned(), "sector".to_owned()], labels, "rows").unwrap()
    }

    fn demand_columns(regions: &[&str]) -> Axis {
        let labels = regions
            .iter()
            .flat_map(|r| {
                [FCE_HOUSEHOLDS, FCE_NPISH, FCE_GOVERNMENT, GFCF]
                    .into_iter()
                    .map(move |c| Label::new(*r, c))
            })
            .collect();
        Axis::new(["region".to_owned(), "category".to_owned()], labels, "columns").unwrap()
    }

    /// Two regions, two sectors; `y` is row-major over 4 rows x 8 columns.
    fn tables(y: &[f64]) -> MrioTables {
        let rows = sectors(&["AA", "BB"], &["Farm", "Mill"]);
        let values = DMatrix::from_row_slice(4, 8, y);
        let final_demand =
            LabeledMatrix::new(rows.clone(), demand_columns(&["AA", "BB"]), values).unwrap();
        MrioTables {
            year: Year::new(2020),
            sectors: rows,
            leontief: DMatrix::identity(4, 4),
            final_demand,
        }
    }

    fn geos() -> GeoScopes {
        GeoScopes::new(["AA", "BB"])
    }

    #[rustfmt::skip]
    const Y: [f64; 32] = [
        // AA: hh npish gov gfcf | BB: hh npish gov gfcf
        10.0, 0.0, 0.0, 99.0,     5.0, 0.0, 0.0, 0.0,
        20.0, 5.0, 5.0, 99.0,     0.0, 0.0, 5.0, 0.0,
         5.0, 0.0, 0.0, 99.0,     0.0, 0.0, 0.0, 0.0,
        15.0, 0.0, 0.0,  0.0,    10.0, 0.0, 0.0, 0.0,
    ];

    #[test]
    fn shares_exclude_non_fce_columns() {
        let fr = compute_fr_matrix(&tables(&Y), &geos(), &FceCategories::default()).unwrap();

        // AA total: 10 + 30 + 5 + 15 = 60.
        assert!((fr.share(1, 0).unwrap() - 0.5).abs() < 1e-12);
        // BB total: 5 + 5 + 0 + 10 = 20.
        assert!((fr.share(3, 1).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(fr.column_balance(DEFAULT_TOLERANCE), ColumnBalance::Balanced);
        assert_eq!(fr.values.shape(), (4, 2));
    }

    #[test]
    fn empty_geography_stays_zero() {
        let mut y = Y;
        for row in 0..4 {
            for col in 4..8 {
                y[row * 8 + col] = 0.0;
            }
        }
        let fr = compute_fr_matrix(&tables(&y), &geos(), &FceCategories::default()).unwrap();
        assert_eq!(fr.empty, vec!["BB".to_owned()]);
        assert!(fr.values.column(1).iter().all(|v| *v == 0.0));
        assert_eq!(fr.column_balance(DEFAULT_TOLERANCE), ColumnBalance::Balanced);
    }

    #[test]
    fn cancelling_contributions_are_degenerate() {
        let mut y = [0.0; 32];
        y[0] = 4.0;
        y[8] = -4.0;
        // BB needs some consumption to stay out of the way.
        y[4] = 1.0;
        let err = compute_fr_matrix(&tables(&y), &geos(), &FceCategories::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DegenerateGeography { ref geography, contributors: 2 } if geography == "AA"
        ));
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let mut y = Y;
        y[0] = f64::MAX;
        y[8] = f64::MAX;
        let err = compute_fr_matrix(&tables(&y), &geos(), &FceCategories::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::NonFiniteShare { ref geography, total }
                if geography == "AA" && total.is_infinite()
        ));
    }

    #[test]
    fn infinite_or_nan_demand_is_rejected() {
        for bad in [f64::INFINITY, f64::NAN] {
            let mut y = Y;
            y[12] = bad;
            let err =
                compute_fr_matrix(&tables(&y), &geos(), &FceCategories::default()).unwrap_err();
            assert!(
                matches!(
                    err,
                    BuildError::NonFiniteShare { ref geography, .. } if geography == "BB"
                ),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn nan_column_counts_as_drift() {
        let mut fr = compute_fr_matrix(&tables(&Y), &geos(), &FceCategories::default()).unwrap();
        fr.values[(0, 1)] = f64::NAN;

        let ColumnBalance::Drift(drift) = fr.column_balance(DEFAULT_TOLERANCE) else {
            panic!("NaN column reported as balanced");
        };
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].0, "BB");
        assert!(drift[0].1.is_nan());
    }

    #[test]
    fn unknown_category_label_is_a_schema_error() {
        let categories = FceCategories::new(["Final consumption expenditure by aliens"]);
        let err = compute_fr_matrix(&tables(&Y), &geos(), &categories).unwrap_err();
        assert!(matches!(err, BuildError::MissingDemandColumn { .. }));
    }

    #[test]
    fn geography_without_columns_is_a_schema_error() {
        let geographies = GeoScopes::new(["AA", "CC"]);
        let err = compute_fr_matrix(&tables(&Y), &geographies, &FceCategories::default())
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingDemandColumn { ref geography, .. } if geography == "CC"
        ));
    }

    #[test]
    fn row_count_must_match_leontief() {
        let mut t = tables(&Y);
        t.leontief = DMatrix::identity(3, 3);
        let err = compute_fr_matrix(&t, &geos(), &FceCategories::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ShapeMismatch { expected: (3, 2), actual: (4, 2) }
        ));
    }

    proptest! {
        #[test]
        fn nonempty_columns_sum_to_one(y in proptest::collection::vec(0.0f64..1e6, 32)) {
            let fr = compute_fr_matrix(&tables(&y), &geos(), &FceCategories::default()).unwrap();
            for (code, column) in fr.geographies.iter().zip(fr.values.column_iter()) {
                if !fr.empty.iter().any(|e| e == code) {
                    prop_assert!((column.sum() - 1.0).abs() < 1e-9);
                }
            }
        }
    }
}
