//! Shared type definitions for planetary-boundary assessments.
//!
//! This crate is the single source of truth for the vocabulary shared across
//! the workspace: which geographies the EXIOBASE model recognises, which
//! planetary boundaries exist, how impact-assessment methods are keyed, and
//! which dataset years are valid.
//!
//! # Modules
//!
//! - [`boundary`] -- [`PlanetaryBoundary`] categories with labels and units
//! - [`demand`] -- EXIOBASE final-demand category labels
//! - [`geo`] -- The 49 EXIOBASE geographical scopes and the [`GeoScopes`] set
//! - [`method`] -- [`MethodKey`] identifying an impact-assessment method
//! - [`year`] -- [`Year`] and the supported [`YearRange`]

pub mod boundary;
pub mod demand;
pub mod geo;
pub mod method;
pub mod year;

// Re-export all public types at crate root for convenience.
pub use boundary::{PlanetaryBoundary, STANDARD_CATEGORIES, UnknownBoundary};
pub use demand::{
    DEMAND_CATEGORIES, FCE_GOVERNMENT, FCE_HOUSEHOLDS, FCE_NPISH, FINAL_CONSUMPTION_CATEGORIES,
};
pub use geo::{EXIOBASE_GEO_SCOPES, GeoScopes};
pub use method::{METHOD_FAMILY, MethodKey};
pub use year::{Year, YearRange};
