//! Safe-operating-space thresholds and exploitation of planetary boundaries.
//!
//! An activity's impact score in a planetary-boundary category is only
//! meaningful relative to the category's global budget. This crate holds the
//! budget table and turns impact scores into unitless exploitation ratios:
//!
//! ```text
//! exploitation = impact / safe_operating_space(category)
//! ```
//!
//! A ratio above `1.0` means the activity alone consumes more than the whole
//! safe operating space of that category.
//!
//! # Modules
//!
//! - [`thresholds`] -- [`SafeOperatingSpace`], the category -> budget table.
//! - [`exploitation`] -- [`calculate_exploitation`], the pure scoring step.
//! - [`report`] -- Fixed-width text rendering of an exploitation result.
//!
//! # Usage
//!
//! ```
//! use std::collections::BTreeMap;
//! use pbaesa_sos::{SafeOperatingSpace, calculate_exploitation};
//! use pbaesa_types::{MethodKey, PlanetaryBoundary};
//!
//! let sos = SafeOperatingSpace::default();
//! let key = MethodKey::planetary_boundary(PlanetaryBoundary::ClimateChange);
//! let scores = BTreeMap::from([(key.clone(), 0.3)]);
//!
//! let exploitation = calculate_exploitation(&scores, &sos);
//! assert_eq!(exploitation.get(&key).copied().flatten(), Some(0.5));
//! ```

pub mod exploitation;
pub mod report;
pub mod thresholds;

// Re-export primary types at crate root.
pub use exploitation::{Exploitation, calculate_exploitation, exceeded_boundaries};
pub use report::render_report;
pub use thresholds::{BoundaryThreshold, SafeOperatingSpace};
