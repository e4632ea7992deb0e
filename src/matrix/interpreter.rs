//! Table orientation classification and per-OS record extraction.
//!
//! Every table goes through the same steps:
//!
//! ```text
//! determine orientation ─┬─ OS keyword in header ─────────▶ transposed
//!                        ├─ first data cell is a version ─▶ agent-in-rows
//!                        └─ otherwise ────────────────────▶ os-in-rows ──(no records)──▶ traditional
//! ```
//!
//! The header keyword check always runs first. The only transition between
//! extraction paths is os-in-rows falling through to the free-text
//! (traditional) extraction.

use crate::dom::DomTree;
use crate::dom::table::{CellView, TableView};
use crate::error::{MatrixError, Result};
use crate::matrix::cell::{CellVerdict, SupportRule, classify};
use crate::matrix::extract::{
    architectures, derive_status, dotted_versions, first_dotted_version, free_text_versions,
    notes_from_cells, os_architecture_hint, MAX_FREE_TEXT_VERSIONS,
};
use crate::matrix::locator::ProductTable;
use crate::matrix::record::SupportRecord;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Substrings that mark a header cell as an operating system
pub const OS_KEYWORDS: [&str; 13] = [
    "linux", "windows", "macos", "ubuntu", "debian", "centos", "rhel", "amazon", "suse", "oracle",
    "rocky", "almalinux", "sles",
];

static VERSION_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Elastic Agent|^\d+\.\d+").expect("valid regex"));

/// Which table axis holds the operating systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// OS names are column headers
    Transposed,
    /// Product versions label the rows, OS names head the columns
    AgentInRows,
    /// OS names label the rows
    OsInRows,
}

/// Extraction path that produced the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    Transposed,
    AgentInRows,
    OsInRows,
    /// Free-text extraction over whole rows
    Traditional,
}

/// Cell and row counters collected while interpreting a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub supported_cells: usize,
    pub unsupported_cells: usize,
    pub unknown_cells: usize,
    pub skipped_rows: usize,
}

impl Diagnostics {
    fn count(&mut self, verdict: CellVerdict) {
        match verdict {
            CellVerdict::Supported => self.supported_cells += 1,
            CellVerdict::Unsupported => self.unsupported_cells += 1,
            CellVerdict::Unknown => self.unknown_cells += 1,
        }
    }
}

/// Result of interpreting one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub orientation: Orientation,
    pub path: ExtractionPath,
    pub records: Vec<SupportRecord>,
    pub diagnostics: Diagnostics,
}

impl Interpretation {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Whether a header text names an operating system
pub fn is_os_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    OS_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Decide which axis holds the operating systems
pub fn classify_orientation<C: CellView>(rows: &[Vec<&C>]) -> Orientation {
    let header: Vec<String> = rows
        .first()
        .map(|row| row.iter().map(|c| c.text()).collect())
        .unwrap_or_default();
    log::debug!("Header cells: {:?}", header);

    let os_headers: Vec<&String> = header.iter().skip(1).filter(|t| is_os_label(t)).collect();
    log::debug!("OS names found in headers: {:?}", os_headers);

    if !os_headers.is_empty() {
        return Orientation::Transposed;
    }

    let first_data_cell = rows
        .get(1)
        .and_then(|row| row.first())
        .map(|c| c.text())
        .unwrap_or_default();
    log::debug!("First data cell: {:?}", first_data_cell);

    if VERSION_ROW.is_match(&first_data_cell) {
        Orientation::AgentInRows
    } else {
        Orientation::OsInRows
    }
}

/// Interpret a table into per-OS support records
pub fn interpret<'a, T: TableView<'a>>(table: &T) -> Interpretation {
    let rows = table.rows();
    log::debug!("Parsing table with {} rows", rows.len());

    let mut diagnostics = Diagnostics::default();
    let orientation = classify_orientation(&rows);

    let (path, records) = match orientation {
        Orientation::Transposed => (
            ExtractionPath::Transposed,
            extract_transposed(&rows, &mut diagnostics),
        ),
        Orientation::AgentInRows => (
            ExtractionPath::AgentInRows,
            extract_agent_in_rows(&rows, &mut diagnostics),
        ),
        Orientation::OsInRows => {
            let records = extract_os_in_rows(&rows, &mut diagnostics);
            if records.is_empty() {
                log::debug!("No dotted versions next to OS labels, falling back to free text");
                (
                    ExtractionPath::Traditional,
                    extract_traditional(&rows, &mut diagnostics),
                )
            } else {
                (ExtractionPath::OsInRows, records)
            }
        }
    };

    log::debug!("{:?} path produced {} records", path, records.len());

    Interpretation {
        orientation,
        path,
        records,
        diagnostics,
    }
}

/// Interpret a located product table, failing when it yields no records
pub fn interpret_product(tree: &DomTree, product: &ProductTable) -> Result<Interpretation> {
    log::info!("Parsing table for {}...", product.name);
    let table = tree.table(product.table_index)?;
    let interpretation = interpret(&table);

    if interpretation.is_empty() {
        return Err(MatrixError::NoSupportData {
            product: product.name.clone(),
        });
    }
    Ok(interpretation)
}

/// OS per column: every OS-named header column collects the versions of
/// the rows whose cell in that column indicates support.
pub fn extract_transposed<C: CellView>(rows: &[Vec<&C>], diagnostics: &mut Diagnostics) -> Vec<SupportRecord> {
    let Some(header) = rows.first() else {
        return Vec::new();
    };

    let mut records = Vec::new();

    for (column, header_cell) in header.iter().enumerate().skip(1) {
        let os = header_cell.text();
        if !is_os_label(&os) {
            log::debug!("Skipping non-OS header: {}", os);
            continue;
        }

        let mut versions = IndexSet::new();
        let mut archs = IndexSet::new();
        let mut status_text = os.clone();

        for (row_index, row) in rows.iter().enumerate().skip(1) {
            let Some(cell) = row.get(column) else {
                continue;
            };
            let version_label = row.first().map(|c| c.text()).unwrap_or_default();
            let verdict = classify(*cell, SupportRule::Permissive);
            diagnostics.count(verdict);
            log::trace!(
                "Row {}, Cell {} ({}): {:?} - {:?}",
                row_index,
                column,
                os,
                cell.text(),
                verdict
            );

            if verdict != CellVerdict::Supported || version_label.is_empty() {
                continue;
            }

            if let Some(version) = first_dotted_version(&version_label) {
                log::trace!("Added version {} for {}", version, os);
                versions.insert(version);
            }
            archs.extend(architectures(&format!("{} {}", cell.text(), cell.markup())));
            status_text.push(' ');
            status_text.push_str(&cell.text());
        }

        let status = derive_status(&status_text, &versions);
        let notes = format!("Supported product versions: {}", join(&versions));
        match SupportRecord::new(os.clone(), versions, archs, status, notes) {
            Some(record) => records.push(record),
            None => log::debug!("No supported versions for {}", os),
        }
    }

    records
}

#[derive(Default)]
struct OsColumn {
    versions: IndexSet<String>,
    archs: IndexSet<String>,
    status_text: String,
}

/// Version per row, OS per column: each row's leading version is credited to
/// every OS column whose cell indicates support.
pub fn extract_agent_in_rows<C: CellView>(rows: &[Vec<&C>], diagnostics: &mut Diagnostics) -> Vec<SupportRecord> {
    let Some(header) = rows.first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(|c| c.text()).collect();
    let mut columns: IndexMap<String, OsColumn> = IndexMap::new();

    for row in rows.iter().skip(1) {
        let label = row.first().map(|c| c.text()).unwrap_or_default();
        let Some(version) = first_dotted_version(&label) else {
            log::debug!("No product version found in: {:?}", label);
            diagnostics.skipped_rows += 1;
            continue;
        };
        log::trace!("Processing version {}", version);

        for (column, cell) in row.iter().enumerate().take(headers.len()).skip(1) {
            let os = &headers[column];
            if os.chars().count() < 2 {
                continue;
            }

            let verdict = classify(*cell, SupportRule::Permissive);
            diagnostics.count(verdict);
            log::trace!("  {}: {:?} -> {:?}", os, cell.text(), verdict);

            if verdict == CellVerdict::Supported {
                let entry = columns.entry(os.clone()).or_default();
                entry.versions.insert(version.clone());
                entry
                    .archs
                    .extend(architectures(&format!("{} {}", cell.text(), cell.markup())));
                entry.status_text.push(' ');
                entry.status_text.push_str(&cell.text());
            }
        }
    }

    columns
        .into_iter()
        .filter_map(|(os, column)| {
            let mut archs = column.archs;
            archs.extend(os_architecture_hint(&os));
            let status = derive_status(&format!("{}{}", os, column.status_text), &column.versions);
            let notes = format!("Supports product versions: {}", join(&column.versions));
            SupportRecord::new(os, column.versions, archs, status, notes)
        })
        .collect()
}

/// OS per row: dotted versions anywhere after the OS label.
pub fn extract_os_in_rows<C: CellView>(rows: &[Vec<&C>], diagnostics: &mut Diagnostics) -> Vec<SupportRecord> {
    let mut records = Vec::new();

    for row in rows.iter().skip(1) {
        let texts: Vec<String> = row.iter().map(|c| c.text()).collect();
        let Some(os) = texts.first().filter(|os| os.chars().count() >= 2) else {
            diagnostics.skipped_rows += 1;
            continue;
        };

        let mut versions = IndexSet::new();
        let mut archs = IndexSet::new();
        for text in texts.iter().skip(1) {
            versions.extend(dotted_versions(text));
            archs.extend(architectures(text));
        }

        let status = derive_status(&texts.join(" "), &versions);
        let notes = row_notes(&texts, "Found versions", &versions);
        match SupportRecord::new(os.clone(), versions, archs, status, notes) {
            Some(record) => records.push(record),
            None => diagnostics.skipped_rows += 1,
        }
    }

    records
}

/// OS per row, versions from any version-like token of the row.
pub fn extract_traditional<C: CellView>(rows: &[Vec<&C>], diagnostics: &mut Diagnostics) -> Vec<SupportRecord> {
    let mut records = Vec::new();

    for row in rows.iter().skip(1) {
        let texts: Vec<String> = row.iter().map(|c| c.text()).collect();
        let Some(os) = texts.first().filter(|os| os.chars().count() > 2) else {
            diagnostics.skipped_rows += 1;
            continue;
        };

        let mut versions = IndexSet::new();
        for text in &texts {
            versions.extend(free_text_versions(text));
        }
        versions.truncate(MAX_FREE_TEXT_VERSIONS);

        let row_text = texts.join(" ");
        let archs = architectures(&row_text);
        let status = derive_status(&row_text, &versions);
        let notes = row_notes(&texts, "Found versions", &versions);
        match SupportRecord::new(os.clone(), versions, archs, status, notes) {
            Some(record) => records.push(record),
            None => diagnostics.skipped_rows += 1,
        }
    }

    records
}

fn row_notes(texts: &[String], summary: &str, versions: &IndexSet<String>) -> String {
    let notes = notes_from_cells(texts);
    if notes.is_empty() {
        format!("{}: {}", summary, join(versions))
    } else {
        notes
    }
}

fn join(versions: &IndexSet<String>) -> String {
    versions.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementNode, HtmlTable, table_from_texts};
    use crate::matrix::record::{ARCH_AARCH64, ARCH_APPLE_SILICON, ARCH_X86_64, Status};

    fn set(items: &[&str]) -> IndexSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scenario_table() -> ElementNode {
        table_from_texts([
            ["", "Ubuntu", "Windows"],
            ["Agent 8.1", "✓", ""],
            ["Agent 7.16", "✓", "✓"],
        ])
    }

    fn record<'a>(interpretation: &'a Interpretation, os: &str) -> &'a SupportRecord {
        interpretation
            .records
            .iter()
            .find(|r| r.os == os)
            .unwrap_or_else(|| panic!("no record for {os}"))
    }

    #[test]
    fn test_agent_in_rows_scenario() {
        let table = scenario_table();
        let rows = HtmlTable::new(&table).rows();
        let mut diagnostics = Diagnostics::default();
        let records = extract_agent_in_rows(&rows, &mut diagnostics);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].os, "Ubuntu");
        assert_eq!(records[0].versions, set(&["8.1", "7.16"]));
        assert_eq!(records[0].status, Status::Supported);
        assert_eq!(records[1].os, "Windows");
        assert_eq!(records[1].versions, set(&["7.16"]));
        assert_eq!(records[1].status, Status::Limited);
        assert_eq!(diagnostics.supported_cells, 3);
        assert_eq!(diagnostics.unknown_cells, 1);
    }

    #[test]
    fn test_scenario_through_interpreter() {
        let table = scenario_table();
        let interpretation = interpret(&HtmlTable::new(&table));

        // "Ubuntu" in the header takes precedence
        assert_eq!(interpretation.orientation, Orientation::Transposed);
        assert_eq!(interpretation.records.len(), 2);

        let ubuntu = record(&interpretation, "Ubuntu");
        assert_eq!(ubuntu.versions, set(&["8.1", "7.16"]));
        assert_eq!(ubuntu.status, Status::Supported);
        assert_eq!(ubuntu.architecture, set(&[ARCH_X86_64]));

        let windows = record(&interpretation, "Windows");
        assert_eq!(windows.versions, set(&["7.16"]));
        assert_eq!(windows.status, Status::Limited);
    }

    #[test]
    fn test_header_keyword_beats_version_row() {
        let table = table_from_texts([["Version", "RHEL 8"], ["8.12", "✓"]]);
        let rows = HtmlTable::new(&table).rows();
        assert_eq!(classify_orientation(&rows), Orientation::Transposed);

        let plain = table_from_texts([["Version", "Platform A"], ["8.12", "✓"]]);
        let rows = HtmlTable::new(&plain).rows();
        assert_eq!(classify_orientation(&rows), Orientation::AgentInRows);

        let agent = table_from_texts([["", "Platform A"], ["elastic agent 8.12", "✓"]]);
        let rows = HtmlTable::new(&agent).rows();
        assert_eq!(classify_orientation(&rows), Orientation::AgentInRows);
    }

    #[test]
    fn test_column_zero_keyword_ignored() {
        let table = table_from_texts([["Linux distribution", "Version"], ["Debian", "8.1"]]);
        let rows = HtmlTable::new(&table).rows();
        assert_eq!(classify_orientation(&rows), Orientation::OsInRows);
    }

    #[test]
    fn test_transposed_skips_non_os_columns_and_reads_arch() {
        let arm_cell = ElementNode::new("td")
            .with_text("✓")
            .with_inner_html("<span title=\"arm64\">✓</span>");
        let mut table = table_from_texts([
            vec!["Version", "Notes", "Ubuntu", "macOS"],
            vec!["Elastic Agent 8.2", "x86_64 only", "✓", "-"],
        ]);
        table.children[0].children[1].children[2] = arm_cell;

        let interpretation = interpret(&HtmlTable::new(&table));
        assert_eq!(interpretation.path, ExtractionPath::Transposed);
        assert_eq!(interpretation.records.len(), 1);

        let ubuntu = &interpretation.records[0];
        assert_eq!(ubuntu.os, "Ubuntu");
        assert_eq!(ubuntu.architecture, set(&[ARCH_AARCH64]));
        assert_eq!(ubuntu.notes, "Supported product versions: 8.2");
    }

    #[test]
    fn test_transposed_permissive_fallback() {
        let table = table_from_texts([["Version", "Windows"], ["7.17", "N/A"], ["7.10", "No"]]);
        let interpretation = interpret(&HtmlTable::new(&table));

        let windows = record(&interpretation, "Windows");
        assert_eq!(windows.versions, set(&["7.17"]));
        assert_eq!(windows.status, Status::Supported);
    }

    #[test]
    fn test_transposed_deprecated_keyword() {
        let table = table_from_texts([["Version", "CentOS 7"], ["8.1", "Deprecated"]]);
        let interpretation = interpret(&HtmlTable::new(&table));
        assert_eq!(record(&interpretation, "CentOS 7").status, Status::Deprecated);
    }

    #[test]
    fn test_agent_in_rows_hints_and_skips() {
        let table = table_from_texts([
            ["Elastic Agent", "macOS", "Amazon Linux", "W"],
            ["Elastic Agent 8.3", "✓", "✓", "✓"],
            ["Elastic Agent next", "✓", "✓", "✓"],
            ["Elastic Agent 7.10", "×", "✓", "✓"],
        ]);
        let rows = HtmlTable::new(&table).rows();
        let mut diagnostics = Diagnostics::default();
        let records = extract_agent_in_rows(&rows, &mut diagnostics);

        assert_eq!(diagnostics.skipped_rows, 1);
        assert_eq!(diagnostics.unsupported_cells, 1);
        assert_eq!(records.len(), 2);

        let mac = &records[0];
        assert_eq!(mac.versions, set(&["8.3"]));
        assert_eq!(mac.architecture, set(&[ARCH_X86_64, ARCH_APPLE_SILICON]));

        let linux = &records[1];
        assert_eq!(linux.versions, set(&["8.3", "7.10"]));
        assert_eq!(linux.architecture, set(&[ARCH_X86_64, ARCH_AARCH64]));
        assert_eq!(linux.notes, "Supports product versions: 8.3, 7.10");
    }

    #[test]
    fn test_os_in_rows() {
        let table = table_from_texts([
            ["Operating system", "Supported versions", "Notes"],
            ["Ubuntu 22.04", "8.1, 8.2, 8.1", "amd64 and arm64 packages"],
            ["Debian 10", "7.16", "End of life in 2024"],
            ["X", "8.0", ""],
            ["Windows Server", "", ""],
        ]);
        let interpretation = interpret(&HtmlTable::new(&table));

        assert_eq!(interpretation.orientation, Orientation::OsInRows);
        assert_eq!(interpretation.path, ExtractionPath::OsInRows);
        assert_eq!(interpretation.records.len(), 2);
        assert_eq!(interpretation.diagnostics.skipped_rows, 2);

        let ubuntu = record(&interpretation, "Ubuntu 22.04");
        assert_eq!(ubuntu.versions, set(&["8.1", "8.2"]));
        assert_eq!(ubuntu.architecture, set(&[ARCH_X86_64, ARCH_AARCH64]));
        assert_eq!(ubuntu.status, Status::Supported);
        assert_eq!(ubuntu.notes, "8.1, 8.2, 8.1. amd64 and arm64 packages");

        let debian = record(&interpretation, "Debian 10");
        assert_eq!(debian.status, Status::Deprecated);
    }

    #[test]
    fn test_falls_back_to_traditional() {
        let table = table_from_texts([
            ["Platform", "Support"],
            ["Ubuntu 22", "Kernel 5 and later"],
            ["SLES 15 SP4", "beta"],
            ["Os", "9"],
        ]);
        let interpretation = interpret(&HtmlTable::new(&table));

        assert_eq!(interpretation.orientation, Orientation::OsInRows);
        assert_eq!(interpretation.path, ExtractionPath::Traditional);
        assert_eq!(interpretation.records.len(), 2);

        let ubuntu = record(&interpretation, "Ubuntu 22");
        assert_eq!(ubuntu.versions, set(&["22", "5"]));
        assert_eq!(ubuntu.status, Status::Limited);
        assert_eq!(ubuntu.notes, "Kernel 5 and later");

        let os_only = table_from_texts([["Platform", "Support"], ["Windows 11", "x"]]);
        let fallback = interpret(&HtmlTable::new(&os_only));
        assert_eq!(fallback.records[0].notes, "Found versions: 11");

        let sles = record(&interpretation, "SLES 15 SP4");
        assert_eq!(sles.versions, set(&["15", "SP4"]));
        assert_eq!(sles.status, Status::Limited);
    }

    #[test]
    fn test_empty_table() {
        let table = ElementNode::new("table");
        let interpretation = interpret(&HtmlTable::new(&table));
        assert!(interpretation.is_empty());
        assert_eq!(interpretation.path, ExtractionPath::Traditional);
    }

    #[test]
    fn test_interpretation_is_idempotent() {
        let table = scenario_table();
        let view = HtmlTable::new(&table);
        assert_eq!(interpret(&view), interpret(&view));
    }

    #[test]
    fn test_interpret_product_errors() {
        let tree = DomTree::new(
            ElementNode::new("body").with_children(vec![table_from_texts([
                ["Product", "Notes"],
                ["Beats 8.1", ""],
            ])]),
        );
        let product = ProductTable {
            name: "Beats".to_string(),
            table_index: 0,
        };

        // the free-text fallback reads the label's own version
        let result = interpret_product(&tree, &product);
        assert!(result.is_ok());

        let missing = ProductTable {
            name: "Beats".to_string(),
            table_index: 4,
        };
        assert!(matches!(
            interpret_product(&tree, &missing),
            Err(MatrixError::TableNotFound(4))
        ));

        let empty_tree = DomTree::new(
            ElementNode::new("body").with_children(vec![table_from_texts([["Product"], ["Beats"]])]),
        );
        assert!(matches!(
            interpret_product(&empty_tree, &product),
            Err(MatrixError::NoSupportData { product }) if product == "Beats"
        ));
    }
}
