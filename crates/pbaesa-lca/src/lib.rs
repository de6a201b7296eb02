//! Planetary-boundary methods on top of an LCA database.
//!
//! Impact scores for the exploitation calculation come from an LCA
//! database. This crate defines the narrow [`LcaBackend`] interface it needs
//! from one, registers the nine planetary-boundary characterisation methods,
//! and adds the nitrogen-supply flow the nitrogen-cycle method scores.
//!
//! # Modules
//!
//! - [`backend`] -- [`LcaBackend`], its data types, and [`InMemoryBackend`]
//! - [`characterization`] -- [`CharacterizationTable`] loaded from JSON
//! - [`methods`] -- Method registration
//! - [`nitrogen`] -- The `N_supply` flow and foreground augmentation
//! - [`error`] -- [`LcaError`]

pub mod backend;
pub mod characterization;
pub mod error;
pub mod methods;
pub mod nitrogen;

pub use backend::{
    ActivityKey, Exchange, ExchangeKind, Flow, InMemoryBackend, LcaBackend, MethodDefinition,
};
pub use characterization::CharacterizationTable;
pub use error::LcaError;
pub use methods::{
    N_SUPPLY_FACTOR, create_n_cycle_method, create_normal_methods, implement_lcia_methods,
};
pub use nitrogen::{
    N_SUPPLY_CODE, add_n_supply_flow_to_foreground_system, create_n_supply_flow, n_supply_flow,
    nitrogen_emissions,
};
