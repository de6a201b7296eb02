//! EXIOBASE geographical scopes.
//!
//! EXIOBASE 3 resolves 44 countries (ISO 3166-1 alpha-2) and five
//! Rest-of-World aggregates (`WA` Asia-Pacific, `WL` America, `WE` Europe,
//! `WF` Africa, `WM` Middle East). The same codes label the region level of
//! both matrix axes, so the set is the validation vocabulary for every
//! geography a caller may ask about.

use serde::{Deserialize, Serialize};

/// The 49 geographical scopes in EXIOBASE 3 order.
pub const EXIOBASE_GEO_SCOPES: [&str; 49] = [
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK", "GB", "US", "JP", "CN", "CA",
    "KR", "BR", "IN", "MX", "RU", "AU", "CH", "TR", "TW", "NO", "ID", "ZA", "WA", "WL", "WE", "WF",
    "WM",
];

/// An ordered, immutable set of recognised geography codes.
///
/// The order defines the column order of the FR matrix. Built once from
/// configuration and passed to the components that need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoScopes {
    codes: Vec<String>,
}

impl GeoScopes {
    /// Create a set from codes, keeping the first occurrence of duplicates.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into();
            if !unique.contains(&code) {
                unique.push(code);
            }
        }
        Self { codes: unique }
    }

    /// The 49 EXIOBASE 3 scopes.
    pub fn exiobase() -> Self {
        Self::new(EXIOBASE_GEO_SCOPES)
    }

    /// Number of scopes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether `code` is a recognised scope.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Column position of `code`, if recognised.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }

    /// Iterate codes in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// The codes as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.codes
    }
}

impl Default for GeoScopes {
    fn default() -> Self {
        Self::exiobase()
    }
}
