//! The LCA backend seam and an in-memory implementation.
//!
//! Method registration and nitrogen augmentation only need a handful of
//! operations from a life-cycle inventory database: look up and create
//! biosphere flows, list and append process exchanges, register
//! characterisation methods, and score a demand. [`LcaBackend`] names exactly
//! those, so a real inventory database can sit behind it.

use std::collections::BTreeMap;

use pbaesa_types::MethodKey;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LcaError;

/// `(database, code)` identifier of a flow or process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityKey {
    /// Database name.
    pub database: String,
    /// Code within the database.
    pub code: String,
}

impl ActivityKey {
    /// Create a key.
    pub fn new(database: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            code: code.into(),
        }
    }
}

impl core::fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.database, self.code)
    }
}

/// An elementary (biosphere) flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Flow identifier.
    pub key: ActivityKey,
    /// Display name.
    pub name: String,
    /// Flow type, e.g. `emission`.
    pub flow_type: String,
    /// Compartment path, e.g. `["air", "urban air close to ground"]`.
    pub categories: Vec<String>,
    /// Reference unit.
    pub unit: String,
}

/// Direction of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    /// Exchange with the environment.
    Biosphere,
    /// Input from another process.
    Technosphere,
    /// The process's reference product.
    Production,
}

/// One input or output of a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// The flow or process exchanged.
    pub input: ActivityKey,
    /// Display name of the input.
    pub name: String,
    /// Amount per unit of the process's reference product.
    pub amount: f64,
    /// Exchange direction.
    pub kind: ExchangeKind,
    /// Compartment path of a biosphere input.
    pub categories: Vec<String>,
}

impl Exchange {
    /// A biosphere exchange of `amount` with `flow`.
    pub fn biosphere(flow: &Flow, amount: f64) -> Self {
        Self {
            input: flow.key.clone(),
            name: flow.name.clone(),
            amount,
            kind: ExchangeKind::Biosphere,
            categories: flow.categories.clone(),
        }
    }
}

/// A characterisation method ready to register.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// Method identifier.
    pub key: MethodKey,
    /// Unit of the resulting score.
    pub unit: String,
    /// Characterisation factor per flow.
    pub factors: BTreeMap<ActivityKey, f64>,
}

/// Operations the method and nitrogen helpers need from an LCA database.
pub trait LcaBackend {
    /// The flow with `key`, if it exists.
    fn flow(&self, key: &ActivityKey) -> Option<Flow>;

    /// Add a new flow.
    ///
    /// # Errors
    ///
    /// [`LcaError::DuplicateFlow`] if a flow with the same key exists.
    fn create_flow(&mut self, flow: Flow) -> Result<(), LcaError>;

    /// Display name of a process.
    ///
    /// # Errors
    ///
    /// [`LcaError::UnknownProcess`] if the process does not exist.
    fn process_name(&self, process: &ActivityKey) -> Result<String, LcaError>;

    /// Current exchanges of a process.
    ///
    /// # Errors
    ///
    /// [`LcaError::UnknownProcess`] if the process does not exist.
    fn exchanges(&self, process: &ActivityKey) -> Result<Vec<Exchange>, LcaError>;

    /// Append an exchange to a process.
    ///
    /// # Errors
    ///
    /// - [`LcaError::UnknownFlow`] if the exchange's input is not a flow.
    /// - [`LcaError::UnknownProcess`] if the process does not exist.
    fn add_exchange(&mut self, process: &ActivityKey, exchange: Exchange) -> Result<(), LcaError>;

    /// Whether a method with `key` is registered.
    fn method_exists(&self, key: &MethodKey) -> bool;

    /// Keys of all registered methods.
    fn methods(&self) -> Vec<MethodKey>;

    /// Register a method.
    ///
    /// # Errors
    ///
    /// [`LcaError::DuplicateMethod`] if a method with the same key exists.
    fn register_method(&mut self, method: MethodDefinition) -> Result<(), LcaError>;

    /// Score `demand` (process -> amount) against each of `methods`.
    ///
    /// # Errors
    ///
    /// - [`LcaError::UnknownMethod`] if a method is not registered.
    /// - [`LcaError::UnknownProcess`] if a demanded process does not exist.
    fn calculate(
        &self,
        demand: &BTreeMap<ActivityKey, f64>,
        methods: &[MethodKey],
    ) -> Result<BTreeMap<MethodKey, f64>, LcaError>;
}

#[derive(Debug, Clone, Default)]
struct Process {
    name: String,
    exchanges: Vec<Exchange>,
}

/// In-memory backend scoring direct biosphere exchanges only.
///
/// A process's score is the sum over its biosphere exchanges of amount times
/// characterisation factor; technosphere inputs are not expanded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    flows: BTreeMap<ActivityKey, Flow>,
    processes: BTreeMap<ActivityKey, Process>,
    methods: BTreeMap<MethodKey, MethodDefinition>,
}

impl InMemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a process.
    pub fn insert_process(
        &mut self,
        key: ActivityKey,
        name: impl Into<String>,
        exchanges: Vec<Exchange>,
    ) {
        self.processes.insert(
            key,
            Process {
                name: name.into(),
                exchanges,
            },
        );
    }

    /// The registered method with `key`.
    pub fn method(&self, key: &MethodKey) -> Option<&MethodDefinition> {
        self.methods.get(key)
    }

    fn process(&self, key: &ActivityKey) -> Result<&Process, LcaError> {
        self.processes
            .get(key)
            .ok_or_else(|| LcaError::UnknownProcess(key.clone()))
    }
}

impl LcaBackend for InMemoryBackend {
    fn flow(&self, key: &ActivityKey) -> Option<Flow> {
        self.flows.get(key).cloned()
    }

    fn create_flow(&mut self, flow: Flow) -> Result<(), LcaError> {
        if self.flows.contains_key(&flow.key) {
            return Err(LcaError::DuplicateFlow(flow.key));
        }
        self.flows.insert(flow.key.clone(), flow);
        Ok(())
    }

    fn process_name(&self, process: &ActivityKey) -> Result<String, LcaError> {
        Ok(self.process(process)?.name.clone())
    }

    fn exchanges(&self, process: &ActivityKey) -> Result<Vec<Exchange>, LcaError> {
        Ok(self.process(process)?.exchanges.clone())
    }

    fn add_exchange(&mut self, process: &ActivityKey, exchange: Exchange) -> Result<(), LcaError> {
        if exchange.kind == ExchangeKind::Biosphere && !self.flows.contains_key(&exchange.input) {
            return Err(LcaError::UnknownFlow(exchange.input));
        }
        let entry = self
            .processes
            .get_mut(process)
            .ok_or_else(|| LcaError::UnknownProcess(process.clone()))?;
        entry.exchanges.push(exchange);
        Ok(())
    }

    fn method_exists(&self, key: &MethodKey) -> bool {
        self.methods.contains_key(key)
    }

    fn methods(&self) -> Vec<MethodKey> {
        self.methods.keys().cloned().collect()
    }

    fn register_method(&mut self, method: MethodDefinition) -> Result<(), LcaError> {
        if self.methods.contains_key(&method.key) {
            return Err(LcaError::DuplicateMethod(method.key));
        }
        debug!(method = %method.key, factors = method.factors.len(), "Method registered");
        self.methods.insert(method.key.clone(), method);
        Ok(())
    }

    fn calculate(
        &self,
        demand: &BTreeMap<ActivityKey, f64>,
        methods: &[MethodKey],
    ) -> Result<BTreeMap<MethodKey, f64>, LcaError> {
        let mut scores = BTreeMap::new();
        for key in methods {
            let method = self
                .methods
                .get(key)
                .ok_or_else(|| LcaError::UnknownMethod(key.clone()))?;

            let mut score = 0.0;
            for (process, amount) in demand {
                let direct: f64 = self
                    .process(process)?
                    .exchanges
                    .iter()
                    .filter(|e| e.kind == ExchangeKind::Biosphere)
                    .map(|e| e.amount * method.factors.get(&e.input).copied().unwrap_or(0.0))
                    .sum();
                score += amount * direct;
            }
            scores.insert(key.clone(), score);
        }
        Ok(scores)
    }
}
