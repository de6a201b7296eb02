//! Exploitation of the safe operating space.
//!
//! Each impact score is divided by the budget of the category embedded in its
//! method key. A category without a positive budget yields `None`: the absent
//! value is the answer, not an error, because some categories (novel
//! entities, for example) have no rigorously defined global boundary.

use std::collections::BTreeMap;

use pbaesa_types::MethodKey;

use crate::SafeOperatingSpace;

/// Method key -> exploitation ratio, `None` where no budget is defined.
pub type Exploitation = BTreeMap<MethodKey, Option<f64>>;

/// Normalise impact scores by their category budgets.
///
/// For every entry, `impact / threshold(category(key))` when the category
/// has a positive budget; `None` otherwise (including keys without a
/// category component). The empty mapping yields the empty mapping.
pub fn calculate_exploitation(
    scores: &BTreeMap<MethodKey, f64>,
    sos: &SafeOperatingSpace,
) -> Exploitation {
    scores
        .iter()
        .map(|(key, &impact)| {
            let ratio = key
                .category()
                .and_then(|category| sos.threshold(category))
                .map(|threshold| impact / threshold);
            if ratio.is_none() {
                tracing::debug!(method = %key, "no safe-operating-space threshold defined");
            }
            (key.clone(), ratio)
        })
        .collect()
}

/// Method keys whose exploitation exceeds the whole budget (ratio > 1).
pub fn exceeded_boundaries(exploitation: &Exploitation) -> Vec<&MethodKey> {
    exploitation
        .iter()
        .filter(|(_, ratio)| ratio.is_some_and(|r| r > 1.0))
        .map(|(key, _)| key)
        .collect()
}
