//! Dataset years.

use serde::{Deserialize, Serialize};

/// A calendar year of EXIOBASE data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(u16);

impl Year {
    /// Wrap a calendar year.
    pub const fn new(year: u16) -> Self {
        Self(year)
    }

    /// The calendar year as an integer.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for Year {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for Year {
    fn from(year: u16) -> Self {
        Self(year)
    }
}

/// Inclusive range of years the dataset provider publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First published year.
    pub first: Year,
    /// Last published year.
    pub last: Year,
}

impl YearRange {
    /// EXIOBASE 3 monetary tables: 1995 through 2022.
    pub const EXIOBASE3: Self = Self {
        first: Year::new(1995),
        last: Year::new(2022),
    };

    /// Whether `year` lies inside the range.
    pub fn contains(self, year: Year) -> bool {
        self.first <= year && year <= self.last
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::EXIOBASE3
    }
}

impl core::fmt::Display for YearRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}
