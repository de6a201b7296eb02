//! Registration of planetary-boundary impact-assessment methods.
//!
//! Every method is keyed `("Planetary Boundaries", <category>)`. Registration
//! is idempotent: methods that already exist are left untouched.

use std::collections::BTreeMap;

use pbaesa_types::{MethodKey, PlanetaryBoundary, STANDARD_CATEGORIES};
use tracing::{debug, info};

use crate::backend::{ActivityKey, LcaBackend, MethodDefinition};
use crate::characterization::CharacterizationTable;
use crate::error::LcaError;
use crate::nitrogen::N_SUPPLY_CODE;

/// Characterisation factor of the `N_supply` flow, `(1 - 0.68)² / 62 · 10⁶`.
pub const N_SUPPLY_FACTOR: f64 = (1.0 - 0.68) * (1.0 - 0.68) * 1.0 / 62.0 * 1_000_000.0;

fn definition(
    boundary: PlanetaryBoundary,
    biosphere: &str,
    factors: impl Iterator<Item = (String, f64)>,
) -> MethodDefinition {
    MethodDefinition {
        key: MethodKey::planetary_boundary(boundary),
        unit: boundary.unit().to_owned(),
        factors: factors
            .map(|(code, factor)| (ActivityKey::new(biosphere, code), factor))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// Register one method per standard category (all but nitrogen) from
/// `table`. Returns the keys of newly registered methods.
///
/// # Errors
///
/// Any error of [`LcaBackend::register_method`].
pub fn create_normal_methods<B: LcaBackend + ?Sized>(
    backend: &mut B,
    biosphere: &str,
    table: &CharacterizationTable,
) -> Result<Vec<MethodKey>, LcaError> {
    let mut created = Vec::new();
    for boundary in STANDARD_CATEGORIES {
        let key = MethodKey::planetary_boundary(boundary);
        if backend.method_exists(&key) {
            debug!(method = %key, "Method already registered");
            continue;
        }

        let factors = table
            .factors_for(boundary.label())
            .map(|(code, factor)| (code.to_owned(), factor));
        backend.register_method(definition(boundary, biosphere, factors))?;
        created.push(key);
    }

    let available: Vec<String> = backend
        .methods()
        .into_iter()
        .filter(MethodKey::is_planetary_boundary)
        .map(|key| key.to_string())
        .collect();
    info!(
        created = created.len(),
        available = ?available,
        "Planetary boundary methods available"
    );
    Ok(created)
}

/// Register the nitrogen-cycle method. `N_supply` gets [`N_SUPPLY_FACTOR`],
/// other flows their table value. Returns whether the method was created.
///
/// # Errors
///
/// Any error of [`LcaBackend::register_method`].
pub fn create_n_cycle_method<B: LcaBackend + ?Sized>(
    backend: &mut B,
    biosphere: &str,
    table: &CharacterizationTable,
) -> Result<bool, LcaError> {
    let boundary = PlanetaryBoundary::NitrogenCycle;
    let key = MethodKey::planetary_boundary(boundary);
    if backend.method_exists(&key) {
        info!(method = %key, "Nitrogen cycle method already exists");
        return Ok(false);
    }

    let factors = table
        .factors_for(boundary.label())
        .filter(|(code, _)| *code != N_SUPPLY_CODE)
        .map(|(code, factor)| (code.to_owned(), factor))
        .chain(core::iter::once((N_SUPPLY_CODE.to_owned(), N_SUPPLY_FACTOR)));
    backend.register_method(definition(boundary, biosphere, factors))?;

    info!(method = %key, "Nitrogen cycle method created");
    Ok(true)
}

/// Register every planetary-boundary method: nitrogen first, then the
/// standard categories. Returns the keys of newly registered methods.
///
/// # Errors
///
/// Any error of [`create_n_cycle_method`] or [`create_normal_methods`].
pub fn implement_lcia_methods<B: LcaBackend + ?Sized>(
    backend: &mut B,
    biosphere: &str,
    table: &CharacterizationTable,
) -> Result<Vec<MethodKey>, LcaError> {
    let mut created = Vec::new();
    if create_n_cycle_method(backend, biosphere, table)? {
        created.push(MethodKey::planetary_boundary(PlanetaryBoundary::NitrogenCycle));
    }
    created.extend(create_normal_methods(backend, biosphere, table)?);
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn table() -> CharacterizationTable {
        CharacterizationTable::default()
            .with_factor("co2", "Climate Change", 1.0)
            .with_factor("nox", "Nitrogen Cycle", 0.3)
            .with_factor(N_SUPPLY_CODE, "Nitrogen Cycle", 0.0)
    }

    #[test]
    fn n_supply_factor_matches_derivation() {
        assert!((N_SUPPLY_FACTOR - 1651.612_903_225_806).abs() < 1e-6);
    }

    #[test]
    fn registers_all_nine_categories_once() {
        let mut backend = InMemoryBackend::new();

        let created = implement_lcia_methods(&mut backend, "biosphere", &table()).unwrap();
        assert_eq!(created.len(), 9);
        assert_eq!(
            created.first(),
            Some(&MethodKey::planetary_boundary(PlanetaryBoundary::NitrogenCycle))
        );

        let again = implement_lcia_methods(&mut backend, "biosphere", &table()).unwrap();
        assert!(again.is_empty());
        assert_eq!(backend.methods().len(), 9);
    }

    #[test]
    fn nitrogen_method_overrides_supply_factor() {
        let mut backend = InMemoryBackend::new();
        create_n_cycle_method(&mut backend, "biosphere", &table()).unwrap();

        let key = MethodKey::planetary_boundary(PlanetaryBoundary::NitrogenCycle);
        let method = backend.method(&key).unwrap();
        let supply = method.factors[&ActivityKey::new("biosphere", N_SUPPLY_CODE)];
        assert!((supply - N_SUPPLY_FACTOR).abs() < 1e-9);
        assert_eq!(method.factors.len(), 2);
        assert_eq!(
            method.unit,
            "N-flow from Anthroposphere to Atmosphere and Hydrosphere [Tg N/year]"
        );
    }

    #[test]
    fn standard_methods_carry_units() {
        let mut backend = InMemoryBackend::new();
        create_normal_methods(&mut backend, "biosphere", &table()).unwrap();

        let key = MethodKey::planetary_boundary(PlanetaryBoundary::ClimateChange);
        let method = backend.method(&key).unwrap();
        assert_eq!(method.unit, PlanetaryBoundary::ClimateChange.unit());
        assert_eq!(method.factors.len(), 1);
        let nitrogen = MethodKey::planetary_boundary(PlanetaryBoundary::NitrogenCycle);
        assert!(!backend.method_exists(&nitrogen));
    }
}
