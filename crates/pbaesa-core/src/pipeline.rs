//! Wiring of loader, builder, store and accessor from configuration.

use std::path::PathBuf;

use pbaesa_allocation::{
    AllocationFactorAccessor, AllocationMatrixBuilder, AllocationStore, BuildError,
    export_all_allocation_factors,
};
use pbaesa_mrio::{
    DatasetCache, DatasetProvider, MrioLoader, MrioSource, OfflineProvider, ZenodoProvider,
};
use pbaesa_types::{GeoScopes, Year};
use tracing::info;

use crate::config::AssessmentConfig;

/// Build the dataset loader described by `config`.
pub fn mrio_loader(config: &AssessmentConfig) -> MrioLoader {
    let exiobase = &config.exiobase;
    let provider: Box<dyn DatasetProvider> = if exiobase.download_enabled {
        Box::new(ZenodoProvider::new(
            exiobase.download_url.clone(),
            exiobase.system.clone(),
            exiobase.download_timeout(),
        ))
    } else {
        Box::new(OfflineProvider)
    };
    MrioLoader::new(
        DatasetCache::new(exiobase.storage_dir.clone()),
        provider,
        exiobase.year_range(),
    )
}

/// The allocation-factor pipeline for one configuration.
#[derive(Debug)]
pub struct AllocationPipeline<S = MrioLoader> {
    builder: AllocationMatrixBuilder<S>,
    store: AllocationStore,
    geographies: GeoScopes,
}

impl AllocationPipeline<MrioLoader> {
    /// Assemble the pipeline from configuration.
    pub fn from_config(config: &AssessmentConfig) -> Self {
        Self::with_source(mrio_loader(config), config)
    }
}

impl<S: MrioSource> AllocationPipeline<S> {
    /// Assemble the pipeline around an arbitrary input-output source.
    pub fn with_source(source: S, config: &AssessmentConfig) -> Self {
        let geographies = config.geography.geo_scopes();
        let builder = AllocationMatrixBuilder::new(source, geographies.clone())
            .with_categories(config.exiobase.fce_categories())
            .with_tolerance(config.allocation.tolerance);
        Self {
            builder,
            store: AllocationStore::new(config.allocation.output_dir.clone()),
            geographies,
        }
    }

    /// The table store.
    pub const fn store(&self) -> &AllocationStore {
        &self.store
    }

    /// Build and persist the table for `year`.
    ///
    /// # Errors
    ///
    /// Any [`BuildError`] of loading, computing or saving the table. Nothing
    /// is written on failure.
    pub fn export(&self, year: Year) -> Result<PathBuf, BuildError> {
        info!(year = year.get(), "Exporting allocation factors");
        export_all_allocation_factors(&self.builder, &self.store, year)
    }

    /// A lookup handle that builds missing years through this pipeline.
    pub fn accessor(&self) -> AllocationFactorAccessor<'_> {
        AllocationFactorAccessor::new(self.store.clone(), self.geographies.clone())
            .with_source(&self.builder)
    }

    /// A lookup handle that only reads stored tables.
    pub fn read_only_accessor(&self) -> AllocationFactorAccessor<'static> {
        AllocationFactorAccessor::new(self.store.clone(), self.geographies.clone())
    }
}
