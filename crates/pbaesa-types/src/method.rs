//! Impact-assessment method keys.
//!
//! An LCA backend identifies methods by a path of names. Planetary-boundary
//! methods use the two-component path `("Planetary Boundaries", category)`,
//! so the boundary category is always the second component.

use serde::{Deserialize, Serialize};

use crate::PlanetaryBoundary;

/// Family name shared by every planetary-boundary method.
pub const METHOD_FAMILY: &str = "Planetary Boundaries";

/// Identifier of an impact-assessment method, e.g.
/// `("Planetary Boundaries", "Climate Change")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodKey(Vec<String>);

impl MethodKey {
    /// Create a key from its path components.
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    /// The planetary-boundary method key for `boundary`.
    pub fn planetary_boundary(boundary: PlanetaryBoundary) -> Self {
        Self::new([METHOD_FAMILY, boundary.label()])
    }

    /// The category label embedded in the key (its second component).
    pub fn category(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Whether the key belongs to the planetary-boundary family.
    pub fn is_planetary_boundary(&self) -> bool {
        self.0.first().is_some_and(|f| f == METHOD_FAMILY)
    }
}

impl core::fmt::Display for MethodKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
