//! Cell support classification.

use crate::dom::table::CellView;
use serde::{Deserialize, Serialize};

const CHECKMARKS: [&str; 3] = ["✓", "✔", "✔️"];
const NEGATIVE_TEXTS: [&str; 4] = ["×", "✗", "-", "No"];
const CROSS_TEXTS: [&str; 3] = ["×", "✗", "X"];

/// Which fallback applies when no explicit support marker is found.
///
/// The transposed and agent-in-rows extractions read cells with `Permissive`.
/// `Strict` is for callers that must not read notes or "N/A" as support, such
/// as a view that lists only explicitly ticked cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportRule {
    /// Only explicit markers count
    Strict,
    /// Any non-empty text other than ×, ✗, - or "No" also counts.
    ///
    /// Unrecognized content such as "N/A" or prose notes is read as support.
    Permissive,
}

/// Outcome of classifying one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellVerdict {
    Supported,
    Unsupported,
    Unknown,
}

/// Whether the cell indicates "supported" under `rule`
pub fn is_supported<C: CellView + ?Sized>(cell: &C, rule: SupportRule) -> bool {
    let text = cell.text();
    let markup = cell.markup();

    let explicit = CHECKMARKS.contains(&text.as_str())
        || text.contains('✓')
        || text.contains('✔')
        || markup.contains('✓')
        || markup.contains('✔')
        || markup.contains("check")
        || markup.contains("tick")
        || cell.has_icon()
        || cell.has_class("supported")
        || cell.has_class("yes")
        || cell.style_value("color").is_some_and(|c| c == "green")
        || cell.style_value("background-color").is_some_and(|c| c == "green");

    if explicit {
        return true;
    }

    match rule {
        SupportRule::Strict => false,
        SupportRule::Permissive => !text.is_empty() && !NEGATIVE_TEXTS.contains(&text.as_str()),
    }
}

/// Whether the cell explicitly indicates "not supported"
pub fn is_unsupported<C: CellView + ?Sized>(cell: &C) -> bool {
    let text = cell.text();
    let markup = cell.markup();

    CROSS_TEXTS.contains(&text.as_str())
        || markup.contains('×')
        || markup.contains("cross")
        || cell.has_icon_with("data-test-subj", "cross")
}

/// Classify a cell; support is checked first
pub fn classify<C: CellView + ?Sized>(cell: &C, rule: SupportRule) -> CellVerdict {
    if is_supported(cell, rule) {
        CellVerdict::Supported
    } else if is_unsupported(cell) {
        CellVerdict::Unsupported
    } else {
        CellVerdict::Unknown
    }
}
