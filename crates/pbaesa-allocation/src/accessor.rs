//! Allocation-factor lookups by (geography, sector, year).
//!
//! The accessor reads the persisted table for a year. When none exists and
//! a [`TableSource`] is configured, it builds and persists the table first.
//! A table is loaded at most once per accessor and kept for later lookups.
//! Every failure is returned as a [`LookupError`] and logged; callers that
//! only want "value or N/A" can use `.ok()`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use pbaesa_types::{GeoScopes, Year};
use tracing::{debug, warn};

use crate::builder::TableSource;
use crate::error::LookupError;
use crate::store::AllocationStore;
use crate::table::{AllocationRow, AllocationTable, AllocationVariant};

/// Answers allocation-factor queries from a store, building missing years on
/// demand.
pub struct AllocationFactorAccessor<'a> {
    store: AllocationStore,
    geographies: GeoScopes,
    source: Option<&'a dyn TableSource>,
    loaded: RefCell<BTreeMap<Year, Rc<AllocationTable>>>,
}

impl<'a> AllocationFactorAccessor<'a> {
    /// Look up tables in `store`, validating geographies against
    /// `geographies`.
    pub const fn new(store: AllocationStore, geographies: GeoScopes) -> Self {
        Self {
            store,
            geographies,
            source: None,
            loaded: RefCell::new(BTreeMap::new()),
        }
    }

    /// Build missing tables with `source`.
    #[must_use]
    pub fn with_source(mut self, source: &'a dyn TableSource) -> Self {
        self.source = Some(source);
        self
    }

    /// The table for `year`, building and persisting it if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::TableUnavailable`] if the stored table cannot
    /// be read, or if it is absent and no source is configured or the
    /// source fails to build it. Failures are not cached.
    pub fn table(&self, year: Year) -> Result<Rc<AllocationTable>, LookupError> {
        let cached = self.loaded.borrow().get(&year).cloned();
        if let Some(table) = cached {
            return Ok(table);
        }

        let table = Rc::new(self.load_or_build(year)?);
        self.loaded.borrow_mut().insert(year, Rc::clone(&table));
        debug!(year = year.get(), rows = table.len(), "Allocation table cached");
        Ok(table)
    }

    /// Every allocation factor of `(geography, sector)` in `year`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::UnknownGeography`] if `geography` is not a
    ///   recognised scope.
    /// - [`LookupError::TableUnavailable`] if no table exists for `year` and
    ///   none could be built.
    /// - [`LookupError::UnknownSector`] if `sector` is not in the table.
    /// - [`LookupError::RowMissing`] if both are known but the pair has no
    ///   row.
    pub fn get_all_allocation_factor(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<AllocationRow, LookupError> {
        self.lookup(geography, sector, year).inspect_err(|e| {
            warn!(
                geography,
                sector,
                year = year.get(),
                error = %e,
                "Allocation factor lookup failed"
            );
        })
    }

    /// One variant of the allocation factor of `(geography, sector)`.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::get_all_allocation_factor`], or
    /// [`LookupError::ColumnUnavailable`] if `variant` is not computed.
    pub fn allocation_factor(
        &self,
        variant: AllocationVariant,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<f64, LookupError> {
        let row = self.get_all_allocation_factor(geography, sector, year)?;
        row.value(variant)
            .ok_or(LookupError::ColumnUnavailable { variant, year })
            .inspect_err(|e| {
                warn!(
                    geography,
                    sector,
                    year = year.get(),
                    error = %e,
                    "Allocation variant not computed"
                );
            })
    }

    /// Direct final-consumption share.
    ///
    /// # Errors
    ///
    /// See [`Self::allocation_factor`].
    pub fn get_direct_fce_allocation_factor(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<f64, LookupError> {
        self.allocation_factor(AllocationVariant::DirectFce, geography, sector, year)
    }

    /// Total final-consumption share. Not computed in this version.
    ///
    /// # Errors
    ///
    /// [`LookupError::ColumnUnavailable`] for every known pair.
    pub fn get_total_fce_allocation_factor(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<f64, LookupError> {
        self.allocation_factor(AllocationVariant::TotalFce, geography, sector, year)
    }

    /// Direct gross-value-added share. Not computed in this version.
    ///
    /// # Errors
    ///
    /// [`LookupError::ColumnUnavailable`] for every known pair.
    pub fn get_direct_gva_allocation_factor(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<f64, LookupError> {
        self.allocation_factor(AllocationVariant::DirectGva, geography, sector, year)
    }

    /// Total gross-value-added share. Not computed in this version.
    ///
    /// # Errors
    ///
    /// [`LookupError::ColumnUnavailable`] for every known pair.
    pub fn get_total_gva_allocation_factor(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<f64, LookupError> {
        self.allocation_factor(AllocationVariant::TotalGva, geography, sector, year)
    }

    fn load_or_build(&self, year: Year) -> Result<AllocationTable, LookupError> {
        let unavailable = |reason: String| LookupError::TableUnavailable { year, reason };

        match self.store.load(year) {
            Ok(Some(table)) => return Ok(table),
            Ok(None) => {}
            Err(e) => return Err(unavailable(e.to_string())),
        }

        let Some(source) = self.source else {
            return Err(unavailable(format!(
                "no table at {} and no builder configured",
                self.store.path(year).display()
            )));
        };

        let table = source.build_table(year).map_err(|e| unavailable(e.to_string()))?;
        if let Err(e) = self.store.save(&table) {
            warn!(year = year.get(), error = %e, "Built allocation table could not be persisted");
        }
        Ok(table)
    }

    fn lookup(
        &self,
        geography: &str,
        sector: &str,
        year: Year,
    ) -> Result<AllocationRow, LookupError> {
        if !self.geographies.contains(geography) {
            return Err(LookupError::UnknownGeography {
                requested: geography.to_owned(),
                valid: self.geographies.as_slice().to_vec(),
            });
        }

        let table = self.table(year)?;
        if !table.has_sector(sector) {
            return Err(LookupError::UnknownSector {
                requested: sector.to_owned(),
                valid: table.sectors(),
            });
        }

        table
            .find(geography, sector)
            .cloned()
            .ok_or_else(|| LookupError::RowMissing {
                geography: geography.to_owned(),
                sector: sector.to_owned(),
            })
    }
}

impl core::fmt::Debug for AllocationFactorAccessor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AllocationFactorAccessor")
            .field("store", &self.store)
            .field("geographies", &self.geographies.len())
            .field("has_source", &self.source.is_some())
            .field("loaded_years", &self.loaded.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use std::cell::Cell;

    use chrono::Utc;

    use super::*;
    use crate::error::BuildError;

    fn row(geography: &str, sector: &str, share: f64) -> AllocationRow {
        AllocationRow {
            geography: geography.to_owned(),
            region: geography.to_owned(),
            sector: sector.to_owned(),
            direct_fce: Some(share),
            total_fce: None,
            direct_gva: None,
            total_gva: None,
        }
    }

    fn table(year: Year) -> AllocationTable {
        AllocationTable {
            year,
            generated_at: Utc::now(),
            rows: vec![
                row("DE", "Cultivation of wheat", 0.25),
                row("DE", "Manufacture of basic iron and steel", 0.75),
                row("FR", "Cultivation of wheat", 1.0),
            ],
        }
    }

    struct CountingSource {
        calls: Cell<u32>,
        fail: bool,
    }

    impl TableSource for CountingSource {
        fn build_table(&self, year: Year) -> Result<AllocationTable, BuildError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(BuildError::RegionOutOfScope {
                    region: "XX".to_owned(),
                });
            }
            Ok(table(year))
        }
    }

    fn stored() -> (tempfile::TempDir, AllocationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path());
        store.save(&table(Year::new(2020))).unwrap();
        (dir, store)
    }

    #[test]
    fn returns_the_stored_row() {
        let (_dir, store) = stored();
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());

        let factor = accessor
            .get_direct_fce_allocation_factor("DE", "Cultivation of wheat", Year::new(2020))
            .unwrap();
        assert!((factor - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unknown_geography_lists_all_codes() {
        let (_dir, store) = stored();
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());

        let err = accessor
            .get_all_allocation_factor("XX", "Cultivation of wheat", Year::new(2020))
            .unwrap_err();
        match err {
            LookupError::UnknownGeography { requested, valid } => {
                assert_eq!(requested, "XX");
                assert_eq!(valid.len(), 49);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_sector_lists_table_sectors() {
        let (_dir, store) = stored();
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());

        let err = accessor
            .get_all_allocation_factor("DE", "Mining of unobtainium", Year::new(2020))
            .unwrap_err();
        assert!(matches!(err, LookupError::UnknownSector { ref valid, .. } if valid.len() == 2));
    }

    #[test]
    fn known_pair_without_row_is_row_missing() {
        let (_dir, store) = stored();
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());

        let err = accessor
            .get_all_allocation_factor("FR", "Manufacture of basic iron and steel", Year::new(2020))
            .unwrap_err();
        assert!(matches!(err, LookupError::RowMissing { .. }));
    }

    #[test]
    fn uncomputed_variants_are_column_unavailable() {
        let (_dir, store) = stored();
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());
        let year = Year::new(2020);

        for result in [
            accessor.get_total_fce_allocation_factor("DE", "Cultivation of wheat", year),
            accessor.get_direct_gva_allocation_factor("DE", "Cultivation of wheat", year),
            accessor.get_total_gva_allocation_factor("DE", "Cultivation of wheat", year),
        ] {
            assert!(matches!(result, Err(LookupError::ColumnUnavailable { .. })));
        }
    }

    #[test]
    fn loaded_table_is_reused_across_lookups() {
        let (_dir, store) = stored();
        let year = Year::new(2020);
        let accessor = AllocationFactorAccessor::new(store.clone(), GeoScopes::exiobase());

        accessor.get_direct_fce_allocation_factor("DE", "Cultivation of wheat", year).unwrap();
        std::fs::remove_file(store.path(year)).unwrap();

        let factor = accessor
            .get_direct_fce_allocation_factor("DE", "Manufacture of basic iron and steel", year)
            .unwrap();
        assert!((factor - 0.75).abs() < 1e-12);
        let gva = accessor.get_direct_gva_allocation_factor("DE", "Cultivation of wheat", year);
        assert!(matches!(gva, Err(LookupError::ColumnUnavailable { .. })));
        assert!(Rc::ptr_eq(&accessor.table(year).unwrap(), &accessor.table(year).unwrap()));
    }

    #[test]
    fn missing_table_without_source_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path());
        let accessor = AllocationFactorAccessor::new(store, GeoScopes::exiobase());

        let year = Year::new(2021);
        let result = accessor.get_direct_fce_allocation_factor("DE", "Cultivation of wheat", year);
        assert!(matches!(result, Err(LookupError::TableUnavailable { .. })));
        assert_eq!(result.ok(), None);
    }

    #[test]
    fn missing_table_is_built_once_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = AllocationStore::new(dir.path());
        let source = CountingSource {
            calls: Cell::new(0),
            fail: false,
        };
        let accessor = AllocationFactorAccessor::new(store.clone(), GeoScopes::exiobase())
            .with_source(&source);

        let year = Year::new(2018);
        accessor.get_direct_fce_allocation_factor("FR", "Cultivation of wheat", year).unwrap();
        accessor.get_direct_fce_allocation_factor("DE", "Cultivation of wheat", year).unwrap();

        assert_eq!(source.calls.get(), 1);
        assert!(store.load(year).unwrap().is_some());

        // A fresh accessor finds the persisted table instead of building.
        let fresh =
            AllocationFactorAccessor::new(store, GeoScopes::exiobase()).with_source(&source);
        fresh.get_direct_fce_allocation_factor("DE", "Cultivation of wheat", year).unwrap();
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn build_failure_is_unavailable_and_retried() {
        let dir = tempfile::tempdir().unwrap();
        let source = CountingSource {
            calls: Cell::new(0),
            fail: true,
        };
        let store = AllocationStore::new(dir.path());
        let accessor =
            AllocationFactorAccessor::new(store, GeoScopes::exiobase()).with_source(&source);

        for _ in 0..2 {
            let result =
                accessor.get_all_allocation_factor("DE", "Cultivation of wheat", Year::new(2018));
            assert!(matches!(result, Err(LookupError::TableUnavailable { .. })));
        }
        assert_eq!(source.calls.get(), 2);
    }
}
