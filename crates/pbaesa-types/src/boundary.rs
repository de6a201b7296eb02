//! Planetary-boundary categories.
//!
//! Each category has a stable human-readable label (used as the second
//! component of a [`MethodKey`](crate::MethodKey) and as the key of the
//! threshold table) and a control-variable unit.

use serde::{Deserialize, Serialize};

/// A global planetary boundary assessed by the framework.
///
/// Novel entities have no quantified global boundary and are therefore not
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlanetaryBoundary {
    /// Energy imbalance at the top of the atmosphere.
    ClimateChange,
    /// Aragonite saturation state of surface ocean water.
    OceanAcidification,
    /// Functional integrity of the biosphere.
    BiosphereIntegrity,
    /// Phosphorus flow from freshwater systems into the ocean.
    PhosphorusCycle,
    /// Reactive nitrogen released to atmosphere and hydrosphere.
    NitrogenCycle,
    /// Aerosol optical depth.
    AtmosphericAerosolLoading,
    /// Consumptive blue-water use.
    FreshwaterUse,
    /// Stratospheric ozone concentration.
    StratosphericOzoneDepletion,
    /// Land available for anthropogenic occupation.
    LandSystemChange,
}

/// The eight categories registered directly from the characterisation table.
///
/// Nitrogen is handled separately because its method needs the synthetic
/// `N_supply` flow.
pub const STANDARD_CATEGORIES: [PlanetaryBoundary; 8] = [
    PlanetaryBoundary::ClimateChange,
    PlanetaryBoundary::OceanAcidification,
    PlanetaryBoundary::BiosphereIntegrity,
    PlanetaryBoundary::PhosphorusCycle,
    PlanetaryBoundary::AtmosphericAerosolLoading,
    PlanetaryBoundary::FreshwaterUse,
    PlanetaryBoundary::StratosphericOzoneDepletion,
    PlanetaryBoundary::LandSystemChange,
];

/// Returned when a label does not name a known planetary boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown planetary boundary category: {0}")]
pub struct UnknownBoundary(pub String);

impl PlanetaryBoundary {
    /// Every category, in reporting order.
    pub const ALL: [Self; 9] = [
        Self::ClimateChange,
        Self::OceanAcidification,
        Self::BiosphereIntegrity,
        Self::PhosphorusCycle,
        Self::NitrogenCycle,
        Self::AtmosphericAerosolLoading,
        Self::FreshwaterUse,
        Self::StratosphericOzoneDepletion,
        Self::LandSystemChange,
    ];

    /// The label used in method keys and threshold tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ClimateChange => "Climate Change",
            Self::OceanAcidification => "Ocean Acidification",
            Self::BiosphereIntegrity => "Change in Biosphere Integrity",
            Self::PhosphorusCycle => "Phosphorus Cycle",
            Self::NitrogenCycle => "Nitrogen Cycle",
            Self::AtmosphericAerosolLoading => "Atmospheric Aerosol Loading",
            Self::FreshwaterUse => "Freshwater Use",
            Self::StratosphericOzoneDepletion => "Stratospheric Ozone Depletion",
            Self::LandSystemChange => "Land-system Change",
        }
    }

    /// The control-variable unit of the boundary.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::ClimateChange => "Energy imbalance at top-of-atmosphere [W/m²]",
            Self::OceanAcidification => "Aragonite saturation state [Ωₐᵣₐ]",
            Self::BiosphereIntegrity => "Biodiversity Intactness Index [%]",
            Self::PhosphorusCycle => "P-flow from freshwater systems into the ocean [Tg P/year]",
            Self::NitrogenCycle => {
                "N-flow from Anthroposphere to Atmosphere and Hydrosphere [Tg N/year]"
            }
            Self::AtmosphericAerosolLoading => "Aerosol optical depth (AOD) [-]",
            Self::FreshwaterUse => "Consumptive bluewater use [km³/year]",
            Self::StratosphericOzoneDepletion => "Stratospheric ozone concentration [DU]",
            Self::LandSystemChange => "Land available for anthropogenic occupation [millon km²]",
        }
    }

    /// The safe-operating-space budget of the boundary in its control unit.
    pub const fn default_threshold(self) -> f64 {
        match self {
            Self::ClimateChange => 0.6,
            Self::OceanAcidification => 0.2,
            Self::BiosphereIntegrity | Self::PhosphorusCycle => 10.0,
            Self::NitrogenCycle => 62.0,
            Self::AtmosphericAerosolLoading => 0.11,
            Self::FreshwaterUse => 4000.0,
            Self::StratosphericOzoneDepletion => 14.5,
            Self::LandSystemChange => 85.1,
        }
    }

    /// Parse a category from its label.
    ///
    /// # Errors
    ///
    /// [`UnknownBoundary`] if `label` names no category.
    pub fn from_label(label: &str) -> Result<Self, UnknownBoundary> {
        Self::ALL
            .into_iter()
            .find(|b| b.label() == label)
            .ok_or_else(|| UnknownBoundary(label.to_owned()))
    }
}

impl core::fmt::Display for PlanetaryBoundary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for PlanetaryBoundary {
    type Err = UnknownBoundary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}
