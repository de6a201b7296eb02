//! Final-demand category labels of the EXIOBASE 3 monetary tables.
//!
//! The labels are matched verbatim against the second column-header level of
//! `Y.txt`. The three final-consumption-expenditure (FCE) labels drive the
//! allocation-factor calculation; if EXIOBASE renames them, the build fails
//! with a missing-column error instead of silently summing the wrong columns.

/// Final consumption expenditure by households.
pub const FCE_HOUSEHOLDS: &str = "Final consumption expenditure by households";

/// Final consumption expenditure by non-profit organisations serving households.
pub const FCE_NPISH: &str =
    "Final consumption expenditure by non-profit organisations serving households (NPISH)";

/// Final consumption expenditure by government.
pub const FCE_GOVERNMENT: &str = "Final consumption expenditure by government";

/// The three sub-categories summed into a geography's FCE.
pub const FINAL_CONSUMPTION_CATEGORIES: [&str; 3] = [FCE_HOUSEHOLDS, FCE_NPISH, FCE_GOVERNMENT];

/// Every final-demand category of an EXIOBASE 3 region, in file order.
pub const DEMAND_CATEGORIES: [&str; 7] = [
    FCE_HOUSEHOLDS,
    FCE_NPISH,
    FCE_GOVERNMENT,
    "Gross fixed capital formation",
    "Changes in inventories",
    "Changes in valuables",
    "Exports: Total (fob)",
];
