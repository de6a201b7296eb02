//! Impact scores for the exploitation calculation.
//!
//! Scores come either from a score file produced by an external LCA run or
//! from a small inventory scored with the in-memory backend.
//!
//! Score file:
//!
//! ```json
//! [ { "method": ["Planetary Boundaries", "Climate Change"], "score": 0.3 } ]
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pbaesa_lca::{
    ActivityKey, CharacterizationTable, Exchange, Flow, InMemoryBackend, LcaBackend, LcaError,
    add_n_supply_flow_to_foreground_system, implement_lcia_methods,
};
use pbaesa_types::MethodKey;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

/// Errors from reading score or inventory files.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    /// A file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file is not valid JSON for its format.
    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),

    /// The LCA backend rejected an operation.
    #[error(transparent)]
    Lca(#[from] LcaError),
}

/// One scored method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreEntry {
    /// Method key components.
    pub method: MethodKey,
    /// Impact score.
    pub score: f64,
}

/// Impact scores keyed by method.
pub type Scores = BTreeMap<MethodKey, f64>;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AssessmentError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Read a score file.
///
/// # Errors
///
/// - [`AssessmentError::Io`] if the file cannot be opened or read.
/// - [`AssessmentError::Json`] if it is not a list of method/score entries.
pub fn load_scores(path: &Path) -> Result<Scores, AssessmentError> {
    let entries: Vec<ScoreEntry> = read_json(path)?;
    Ok(entries.into_iter().map(|e| (e.method, e.score)).collect())
}

/// A process of an [`Inventory`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryProcess {
    /// Process identifier.
    pub key: ActivityKey,
    /// Display name.
    pub name: String,
    /// Exchanges per unit of output.
    #[serde(default)]
    pub exchanges: Vec<Exchange>,
}

/// A self-contained foreground system to score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inventory {
    /// Name of the biosphere database the flows belong to.
    pub biosphere: String,
    /// Biosphere flows.
    #[serde(default)]
    pub flows: Vec<Flow>,
    /// Foreground processes.
    #[serde(default)]
    pub processes: Vec<InventoryProcess>,
    /// Functional unit: process -> amount.
    #[serde(default)]
    pub demand: Vec<(ActivityKey, f64)>,
    /// Agricultural processes that receive an `N_supply` exchange.
    #[serde(default)]
    pub agricultural_processes: Vec<ActivityKey>,
}

impl Inventory {
    /// Read an inventory file.
    ///
    /// # Errors
    ///
    /// - [`AssessmentError::Io`] if the file cannot be opened or read.
    /// - [`AssessmentError::Json`] if it is not a valid inventory.
    pub fn from_file(path: &Path) -> Result<Self, AssessmentError> {
        read_json(path)
    }

    /// Score the inventory against every planetary-boundary method.
    ///
    /// # Errors
    ///
    /// [`AssessmentError::Lca`] if a flow or method cannot be registered, or
    /// if a demanded process or exchange does not exist.
    pub fn score(&self, table: &CharacterizationTable) -> Result<Scores, AssessmentError> {
        let mut backend = InMemoryBackend::new();
        for flow in &self.flows {
            backend.create_flow(flow.clone())?;
        }
        for process in &self.processes {
            backend.insert_process(
                process.key.clone(),
                process.name.clone(),
                process.exchanges.clone(),
            );
        }

        implement_lcia_methods(&mut backend, &self.biosphere, table)?;
        add_n_supply_flow_to_foreground_system(
            &mut backend,
            &self.biosphere,
            &self.agricultural_processes,
        )?;

        let methods: Vec<MethodKey> = backend
            .methods()
            .into_iter()
            .filter(MethodKey::is_planetary_boundary)
            .collect();
        let demand: BTreeMap<ActivityKey, f64> = self.demand.iter().cloned().collect();
        let scores = backend.calculate(&demand, &methods)?;

        info!(processes = self.processes.len(), methods = scores.len(), "Inventory scored");
        Ok(scores)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use pbaesa_lca::{N_SUPPLY_FACTOR, nitrogen_emissions};
    use pbaesa_types::PlanetaryBoundary;

    use super::*;

    const INVENTORY: &str = r#"{
        "biosphere": "biosphere3",
        "flows": [
            {"key": {"database": "biosphere3", "code": "co2"}, "name": "Carbon dioxide, fossil",
             "flow_type": "emission", "categories": ["air"], "unit": "kilogram"},
            {"key": {"database": "biosphere3", "code": "no3"}, "name": "Nitrate, as nitrogen",
             "flow_type": "emission", "categories": ["water"], "unit": "kilogram"}
        ],
        "processes": [
            {"key": {"database": "fg", "code": "wheat"}, "name": "wheat grain production",
             "exchanges": [
                {"input": {"database": "biosphere3", "code": "co2"},
                 "name": "Carbon dioxide, fossil", "amount": 2.0,
                 "kind": "biosphere", "categories": ["air"]},
                {"input": {"database": "biosphere3", "code": "no3"},
                 "name": "Nitrate, as nitrogen", "amount": 0.001,
                 "kind": "biosphere", "categories": ["water"]}
             ]}
        ],
        "demand": [[{"database": "fg", "code": "wheat"}, 10.0]],
        "agricultural_processes": [{"database": "fg", "code": "wheat"}]
    }"#;

    #[test]
    fn scores_inventory_with_nitrogen_supply() {
        let inventory: Inventory = serde_json::from_str(INVENTORY).unwrap();
        let table = CharacterizationTable::default().with_factor("co2", "Climate Change", 0.5);

        let scores = inventory.score(&table).unwrap();
        assert_eq!(scores.len(), 9);

        let climate = scores[&MethodKey::planetary_boundary(PlanetaryBoundary::ClimateChange)];
        assert!((climate - 10.0).abs() < 1e-12);

        let exchanges = &inventory.processes[0].exchanges;
        let expected = 10.0 * nitrogen_emissions(exchanges) * N_SUPPLY_FACTOR;
        let nitrogen = scores[&MethodKey::planetary_boundary(PlanetaryBoundary::NitrogenCycle)];
        assert!((nitrogen - expected).abs() < 1e-9);
    }

    #[test]
    fn reads_score_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(
            &path,
            r#"[{"method": ["Planetary Boundaries", "Climate Change"], "score": 0.3}]"#,
        )
        .unwrap();

        let scores = load_scores(&path).unwrap();
        let key = MethodKey::planetary_boundary(PlanetaryBoundary::ClimateChange);
        assert_eq!(scores.get(&key).copied(), Some(0.3));
    }
}
