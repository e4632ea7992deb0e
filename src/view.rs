//! Searchable, filterable presentation of a product's support records.

use crate::matrix::record::{Status, SupportRecord};
use indexmap::IndexSet;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::sync::LazyLock;

static VERSION_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("valid regex"));

/// Active filters; `None` and empty strings match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Filters {
    /// Case-insensitive substring of the OS name or of any architecture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Case-insensitive substring of any supported version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Exact OS name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Exact architecture, e.g. "aarch64"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn os(mut self, os: impl Into<String>) -> Self {
        self.os = Some(os.into());
        self
    }

    pub fn arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether no filter is active
    pub fn is_empty(&self) -> bool {
        active(&self.search).is_none()
            && active(&self.version).is_none()
            && active(&self.os).is_none()
            && active(&self.arch).is_none()
            && self.status.is_none()
    }

    /// Whether `record` passes every active filter
    pub fn matches(&self, record: &SupportRecord) -> bool {
        let search = active(&self.search).is_none_or(|search| {
            let search = search.to_lowercase();
            record.os.to_lowercase().contains(&search)
                || record.architecture.iter().any(|a| a.to_lowercase().contains(&search))
        });

        let version = active(&self.version).is_none_or(|wanted| {
            let wanted = wanted.to_lowercase();
            record.versions.iter().any(|v| v.to_lowercase().contains(&wanted))
        });

        let os = active(&self.os).is_none_or(|os| record.os == os);
        let arch = active(&self.arch).is_none_or(|arch| record.architecture.contains(arch));
        let status = self.status.is_none_or(|status| record.status == status);

        search && version && os && arch && status
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Summary counters of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// All records of the product
    pub total: usize,
    /// Records passing the filters
    pub showing: usize,
    /// Shown records with status supported
    pub supported: usize,
    /// Distinct versions across shown records
    pub versions: usize,
}

/// One display row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRow {
    pub os: String,
    pub version_range: String,
    pub architecture: Vec<String>,
    pub status: String,
    /// Every version, newest first
    pub versions: Vec<String>,
}

/// View-model over the records of one product
#[derive(Debug, Clone)]
pub struct MatrixView {
    product: String,
    records: Vec<SupportRecord>,
    filters: Filters,
}

impl MatrixView {
    pub fn new(product: impl Into<String>, records: Vec<SupportRecord>) -> Self {
        Self {
            product: product.into(),
            records,
            filters: Filters::default(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn records(&self) -> &[SupportRecord] {
        &self.records
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Replace the active filters
    pub fn apply(&mut self, filters: Filters) {
        log::debug!("Applying filters: {:?}", filters);
        self.filters = filters;
    }

    /// Reset every filter
    pub fn clear(&mut self) {
        self.filters = Filters::default();
    }

    /// Records passing the active filters, in record order
    pub fn filtered(&self) -> Vec<&SupportRecord> {
        self.records.iter().filter(|r| self.filters.matches(r)).collect()
    }

    pub fn stats(&self) -> Stats {
        let shown = self.filtered();
        let versions: IndexSet<&String> = shown.iter().flat_map(|r| r.versions.iter()).collect();

        Stats {
            total: self.records.len(),
            showing: shown.len(),
            supported: shown.iter().filter(|r| r.status == Status::Supported).count(),
            versions: versions.len(),
        }
    }

    /// Distinct versions of all records, newest first
    pub fn version_options(&self) -> Vec<String> {
        let all: IndexSet<&String> = self.records.iter().flat_map(|r| r.versions.iter()).collect();
        sort_versions_desc(all)
    }

    /// Distinct OS names, sorted
    pub fn os_options(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .map(|r| r.os.clone())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        names.sort();
        names
    }

    /// Distinct architectures, sorted
    pub fn arch_options(&self) -> Vec<String> {
        let mut archs: Vec<String> = self
            .records
            .iter()
            .flat_map(|r| r.architecture.iter().cloned())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        archs.sort();
        archs
    }

    /// Display rows of the filtered records
    pub fn rows(&self) -> Vec<ViewRow> {
        self.filtered().into_iter().map(view_row).collect()
    }

    /// Plain-text table; `details` adds the full version list under each row
    pub fn render_text(&self, details: bool) -> String {
        let stats = self.stats();
        let rows = self.rows();
        let mut out = String::new();

        let _ = writeln!(out, "{} support matrix", self.product);
        let _ = writeln!(
            out,
            "Total: {}  Showing: {}  Supported: {}  Versions: {}",
            stats.total, stats.showing, stats.supported, stats.versions
        );
        let _ = writeln!(out);

        if rows.is_empty() {
            let _ = writeln!(out, "No matching records.");
            return out;
        }

        let headers = ["OS", "Version Range", "Architecture", "Status", "Details"];
        let cells: Vec<[String; 5]> = rows
            .iter()
            .map(|row| {
                [
                    row.os.clone(),
                    row.version_range.clone(),
                    row.architecture.join(", "),
                    row.status.clone(),
                    version_count(row.versions.len()),
                ]
            })
            .collect();

        let mut widths = headers.map(|h| h.chars().count());
        for line in &cells {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let _ = writeln!(out, "{}", format_line(&headers.map(String::from), &widths));
        let _ = writeln!(
            out,
            "{}",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
        );

        for (line, row) in cells.iter().zip(&rows) {
            let _ = writeln!(out, "{}", format_line(line, &widths));
            if details {
                let _ = writeln!(out, "    All supported product versions: {}", row.versions.join(", "));
            }
        }

        out
    }

    /// JSON document with the product, stats, active filters and rows
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "product": self.product,
            "stats": self.stats(),
            "filters": self.filters,
            "options": {
                "versions": self.version_options(),
                "os": self.os_options(),
                "architecture": self.arch_options(),
            },
            "records": self.rows(),
        })
    }
}

fn format_line(cells: &[String; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn view_row(record: &SupportRecord) -> ViewRow {
    let versions = sort_versions_desc(&record.versions);
    ViewRow {
        os: record.os.clone(),
        version_range: version_range(&versions),
        architecture: record.architecture.iter().cloned().collect(),
        status: record.status.label().to_string(),
        versions,
    }
}

fn version_key(version: &str) -> Option<(u64, u64, u64)> {
    let caps = VERSION_PARTS.captures(version)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some((part(1), part(2), part(3)))
}

/// Newest-first ordering.
///
/// Dotted versions compare by (major, minor, patch); anything else sorts
/// after them in reverse string order.
pub fn compare_versions_desc(a: &str, b: &str) -> Ordering {
    match (version_key(a), version_key(b)) {
        (Some(ka), Some(kb)) => kb.cmp(&ka).then_with(|| b.cmp(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Versions sorted newest first
pub fn sort_versions_desc<I, S>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = versions.into_iter().map(|v| v.as_ref().to_string()).collect();
    sorted.sort_by(|a, b| compare_versions_desc(a, b));
    sorted
}

fn version_count(count: usize) -> String {
    match count {
        1 => "1 version".to_string(),
        n => format!("{} versions", n),
    }
}

/// Range label of versions already sorted newest first
pub fn version_range(sorted: &[String]) -> String {
    match sorted {
        [] => "No versions found".to_string(),
        [only] => format!("{} only", only),
        [newest, .., oldest] if newest == oldest => newest.clone(),
        [newest, .., oldest] => format!("{} ← {}", newest, oldest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::record::{ARCH_AARCH64, ARCH_APPLE_SILICON, ARCH_X86_64};

    fn record(os: &str, versions: &[&str], archs: &[&str], status: Status) -> SupportRecord {
        SupportRecord::new(
            os,
            versions.iter().map(|v| v.to_string()).collect(),
            archs.iter().map(|a| a.to_string()).collect(),
            status,
            "",
        )
        .unwrap()
    }

    fn view() -> MatrixView {
        MatrixView::new(
            "Elastic Agent",
            vec![
                record("Ubuntu", &["8.1", "7.16"], &[ARCH_X86_64, ARCH_AARCH64], Status::Supported),
                record("Windows", &["7.16"], &[ARCH_X86_64], Status::Limited),
                record("macOS", &["8.10", "8.2"], &[ARCH_X86_64, ARCH_APPLE_SILICON], Status::Supported),
                record("CentOS 7", &["7.10"], &[ARCH_X86_64], Status::Deprecated),
            ],
        )
    }

    fn names(view: &MatrixView) -> Vec<&str> {
        view.filtered().iter().map(|r| r.os.as_str()).collect()
    }

    #[test]
    fn test_sort_versions_desc() {
        assert_eq!(
            sort_versions_desc(["7.16", "8.10", "8.2", "8.2.1"]),
            vec!["8.10", "8.2.1", "8.2", "7.16"]
        );
        assert_eq!(sort_versions_desc(["SP4", "8.0", "15"]), vec!["8.0", "SP4", "15"]);
    }

    #[test]
    fn test_version_range() {
        assert_eq!(version_range(&[]), "No versions found");
        assert_eq!(version_range(&["8.1".to_string()]), "8.1 only");
        assert_eq!(
            version_range(&sort_versions_desc(["7.16", "8.1", "7.17"])),
            "8.1 ← 7.16"
        );
    }

    #[test]
    fn test_search_covers_os_and_architecture() {
        let mut view = view();
        view.apply(Filters::new().search("UBU"));
        assert_eq!(names(&view), vec!["Ubuntu"]);

        view.apply(Filters::new().search("apple"));
        assert_eq!(names(&view), vec!["macOS"]);
    }

    #[test]
    fn test_filters_compose() {
        let mut view = view();
        view.apply(Filters::new().version("7.1"));
        assert_eq!(names(&view), vec!["Ubuntu", "Windows", "CentOS 7"]);

        view.apply(Filters::new().version("7.1").arch(ARCH_AARCH64));
        assert_eq!(names(&view), vec!["Ubuntu"]);

        view.apply(Filters::new().version("7.1").status(Status::Deprecated));
        assert_eq!(names(&view), vec!["CentOS 7"]);

        view.apply(Filters::new().os("ubuntu"));
        assert!(view.filtered().is_empty());

        view.apply(Filters::new().arch("aarch"));
        assert!(view.filtered().is_empty());
    }

    #[test]
    fn test_empty_strings_match_all() {
        let mut view = view();
        let filters = Filters::new().search("").version("").os("");
        assert!(filters.is_empty());
        view.apply(filters);
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_clear_restores_all() {
        let mut view = view();
        view.apply(Filters::new().status(Status::Limited));
        assert_eq!(view.filtered().len(), 1);

        view.clear();
        assert!(view.filters().is_empty());
        assert_eq!(view.filtered().len(), 4);
    }

    #[test]
    fn test_stats_follow_filters() {
        let mut view = view();
        assert_eq!(
            view.stats(),
            Stats { total: 4, showing: 4, supported: 2, versions: 5 }
        );

        view.apply(Filters::new().version("7.16"));
        assert_eq!(
            view.stats(),
            Stats { total: 4, showing: 2, supported: 1, versions: 2 }
        );
    }

    #[test]
    fn test_options() {
        let view = view();
        assert_eq!(view.version_options(), vec!["8.10", "8.2", "8.1", "7.16", "7.10"]);
        assert_eq!(view.os_options(), vec!["CentOS 7", "Ubuntu", "Windows", "macOS"]);
        assert_eq!(
            view.arch_options(),
            vec![ARCH_AARCH64, ARCH_APPLE_SILICON, ARCH_X86_64]
        );
    }

    #[test]
    fn test_rows() {
        let view = view();
        let rows = view.rows();
        assert_eq!(rows[0].version_range, "8.1 ← 7.16");
        assert_eq!(rows[0].status, "Supported");
        assert_eq!(rows[1].version_range, "7.16 only");
        assert_eq!(rows[2].versions, vec!["8.10", "8.2"]);
    }

    #[test]
    fn test_render_text() {
        let mut view = view();
        view.apply(Filters::new().os("Windows"));
        let text = view.render_text(true);

        assert!(text.starts_with("Elastic Agent support matrix\n"));
        assert!(text.contains("Total: 4  Showing: 1  Supported: 0  Versions: 1"));
        assert!(text.contains("Windows"));
        assert!(text.contains("7.16 only"));
        assert!(text.contains("1 version"));
        assert!(!text.contains("1 versions"));
        assert!(text.contains("Limited"));
        assert!(text.contains("All supported product versions: 7.16"));
        assert!(!text.contains("Ubuntu"));

        view.apply(Filters::new().os("Solaris"));
        assert!(view.render_text(false).contains("No matching records."));
    }

    #[test]
    fn test_json_output() {
        let view = view();
        let json = view.to_json();
        assert_eq!(json["product"], "Elastic Agent");
        assert_eq!(json["stats"]["total"], 4);
        assert_eq!(json["records"][3]["status"], "Deprecated");
        assert_eq!(json["filters"], serde_json::json!({}));
    }

    #[test]
    fn test_filters_deserialize() {
        let filters: Filters =
            serde_json::from_value(serde_json::json!({ "os": "Ubuntu", "status": "limited" })).unwrap();
        assert_eq!(filters, Filters::new().os("Ubuntu").status(Status::Limited));
    }
}
