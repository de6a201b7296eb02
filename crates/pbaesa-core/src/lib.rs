//! Configuration and pipeline wiring for planetary-boundary assessments.
//!
//! This crate turns `pbaesa-config.yaml` into the concrete components of the
//! allocation-factor pipeline and the exploitation calculation.
//!
//! # Modules
//!
//! - [`config`] -- [`AssessmentConfig`] loaded from YAML with env overrides
//! - [`pipeline`] -- [`AllocationPipeline`], loader to accessor
//! - [`assessment`] -- Impact scores from score files or inventories

pub mod assessment;
pub mod config;
pub mod pipeline;

pub use assessment::{
    AssessmentError, Inventory, InventoryProcess, ScoreEntry, Scores, load_scores,
};
pub use config::{
    AllocationConfig, AssessmentConfig, BoundariesConfig, ConfigError, ExiobaseConfig,
    GeographyConfig, LogFormat, LoggingConfig, ThresholdEntry,
};
pub use pipeline::{AllocationPipeline, mrio_loader};
