//! Text rendering of exploitation results.
//!
//! One dotted line per method, the category label on the left and the ratio
//! on the right. Categories without a budget print `N/A`.
//!
//! ```text
//! ======================================================================
//! Exploitation of Safe Operating Space
//! ======================================================================
//! Climate Change.................................... 0.5000
//! Unknown Category.................................. N/A
//! ======================================================================
//! ```

use core::fmt::Write as _;

use crate::Exploitation;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 50;

/// Render `exploitation` as a fixed-width report.
pub fn render_report(exploitation: &Exploitation) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Exploitation of Safe Operating Space");
    let _ = writeln!(out, "{rule}");

    for (key, ratio) in exploitation {
        let label = key.category().map_or_else(|| key.to_string(), str::to_owned);
        let _ = match ratio {
            Some(value) => writeln!(out, "{label:.<w$} {value:.4}", w = LABEL_WIDTH),
            None => writeln!(out, "{label:.<w$} N/A", w = LABEL_WIDTH),
        };
    }

    let _ = writeln!(out, "{rule}");
    out
}
