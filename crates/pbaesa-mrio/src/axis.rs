//! Named, two-level matrix axes.
//!
//! EXIOBASE labels every row and column with a `(region, name)` pair, where
//! `name` is a sector on the industry axes and a demand category on the
//! final-demand column axis. An [`Axis`] keeps the labels in file order and a
//! lookup index built once at load time, so downstream code works with
//! integer positions instead of repeated string matching.

use std::collections::HashMap;

use crate::error::MrioError;

/// A `(region, name)` axis label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    /// Region level (an EXIOBASE geography code).
    pub region: String,
    /// Second level: sector or demand category.
    pub name: String,
}

impl Label {
    /// Create a label.
    pub fn new(region: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
        }
    }
}

impl core::fmt::Display for Label {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.region, self.name)
    }
}

/// An ordered axis of unique labels with an O(1) position index.
#[derive(Debug, Clone)]
pub struct Axis {
    levels: [String; 2],
    labels: Vec<Label>,
    index: HashMap<String, HashMap<String, usize>>,
}

impl Axis {
    /// Build an axis, rejecting duplicate labels.
    ///
    /// `levels` names the two label levels (e.g. `["region", "sector"]`);
    /// `kind` describes the axis in error messages.
    ///
    /// # Errors
    ///
    /// [`MrioError::DuplicateLabel`] if a (region, name) pair repeats.
    pub fn new(
        levels: [String; 2],
        labels: Vec<Label>,
        kind: &'static str,
    ) -> Result<Self, MrioError> {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (position, label) in labels.iter().enumerate() {
            let names = index.entry(label.region.clone()).or_default();
            if names.insert(label.name.clone(), position).is_some() {
                return Err(MrioError::DuplicateLabel {
                    axis: kind,
                    region: label.region.clone(),
                    name: label.name.clone(),
                });
            }
        }
        Ok(Self {
            levels,
            labels,
            index,
        })
    }

    /// Names of the two label levels.
    pub const fn levels(&self) -> &[String; 2] {
        &self.levels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the axis has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The label at `position`.
    pub fn get(&self, position: usize) -> Option<&Label> {
        self.labels.get(position)
    }

    /// Position of `(region, name)`, if present.
    pub fn position(&self, region: &str, name: &str) -> Option<usize> {
        self.index.get(region).and_then(|names| names.get(name)).copied()
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl Eq for Axis {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn levels() -> [String; 2] {
        ["region".to_owned(), "sector".to_owned()]
    }

    #[test]
    fn positions_resolve_in_order() {
        let axis = Axis::new(
            levels(),
            vec![Label::new("AT", "Wheat"), Label::new("AT", "Steel"), Label::new("BE", "Wheat")],
            "rows",
        )
        .unwrap();

        assert_eq!(axis.len(), 3);
        assert_eq!(axis.position("AT", "Steel"), Some(1));
        assert_eq!(axis.position("BE", "Wheat"), Some(2));
        assert_eq!(axis.position("BE", "Steel"), None);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let result = Axis::new(
            levels(),
            vec![Label::new("AT", "Wheat"), Label::new("AT", "Wheat")],
            "rows",
        );
        assert!(matches!(result, Err(MrioError::DuplicateLabel { axis: "rows", .. })));
    }
}
