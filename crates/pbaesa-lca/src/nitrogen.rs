//! Nitrogen supplied to agricultural soils.
//!
//! The nitrogen-cycle boundary is characterised on the nitrogen a system
//! supplies, not on individual emissions. Foreground processes get an
//! `N_supply` biosphere exchange equal to their nitrogen emissions to air
//! and water.

use tracing::{debug, info};

use crate::backend::{ActivityKey, Exchange, ExchangeKind, Flow, LcaBackend};
use crate::error::LcaError;

/// Code of the nitrogen-supply flow.
pub const N_SUPPLY_CODE: &str = "N_supply";

/// The nitrogen-supply flow as stored in `biosphere`.
pub fn n_supply_flow(biosphere: &str) -> Flow {
    Flow {
        key: ActivityKey::new(biosphere, N_SUPPLY_CODE),
        name: "N".to_owned(),
        flow_type: "emission".to_owned(),
        categories: vec!["soil".to_owned()],
        unit: "kilogram".to_owned(),
    }
}

/// Ensure the nitrogen-supply flow exists in `biosphere` and return it.
///
/// # Errors
///
/// Any error of [`LcaBackend::create_flow`].
pub fn create_n_supply_flow<B: LcaBackend + ?Sized>(
    backend: &mut B,
    biosphere: &str,
) -> Result<Flow, LcaError> {
    let flow = n_supply_flow(biosphere);
    if let Some(existing) = backend.flow(&flow.key) {
        debug!(flow = %existing.key, "N-supply flow already exists");
        return Ok(existing);
    }
    backend.create_flow(flow.clone())?;
    info!(flow = %flow.key, "N-supply flow created");
    Ok(flow)
}

fn is_nitrogen(exchange: &Exchange) -> bool {
    exchange.name.contains("Nitrogen") || exchange.name.contains("nitrogen")
}

/// Nitrogen emitted to air or water by `exchanges`.
pub fn nitrogen_emissions(exchanges: &[Exchange]) -> f64 {
    exchanges
        .iter()
        .filter(|e| e.kind == ExchangeKind::Biosphere && is_nitrogen(e))
        .filter(|e| e.categories.iter().any(|c| c == "air" || c == "water"))
        .map(|e| e.amount)
        .sum()
}

/// Add an `N_supply` exchange to each process with positive nitrogen
/// emissions. Returns the amounts added.
///
/// # Errors
///
/// - Any error of [`create_n_supply_flow`].
/// - [`LcaError::UnknownProcess`] if a listed process is not in `backend`.
pub fn add_n_supply_flow_to_foreground_system<B: LcaBackend + ?Sized>(
    backend: &mut B,
    biosphere: &str,
    process_ids: &[ActivityKey],
) -> Result<Vec<(ActivityKey, f64)>, LcaError> {
    let flow = create_n_supply_flow(backend, biosphere)?;

    let mut added = Vec::new();
    for process in process_ids {
        let supply = nitrogen_emissions(&backend.exchanges(process)?);
        if supply > 0.0 {
            backend.add_exchange(process, Exchange::biosphere(&flow, supply))?;
            info!(
                process = %backend.process_name(process)?,
                amount = supply,
                "N-supply flow added"
            );
            added.push((process.clone(), supply));
        }
    }
    Ok(added)
}
