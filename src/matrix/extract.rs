//! Version, architecture, status and notes extraction from cell text.

use crate::matrix::record::{ARCH_AARCH64, ARCH_APPLE_SILICON, ARCH_X86_64, Status};
use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

/// Cap on versions taken from free text
pub const MAX_FREE_TEXT_VERSIONS: usize = 8;

static DOTTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+(?:\.\d+)?").expect("valid regex"));

static FREE_TEXT_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // 1.2.3, 10.04
        Regex::new(r"\b\d+\.\d+(?:\.\d+)?\b").expect("valid regex"),
        // 7, 8, 9
        Regex::new(r"\b\d+\b").expect("valid regex"),
        // cos97, SP4
        Regex::new(r"\b[a-zA-Z]+\d+[a-zA-Z]*\b").expect("valid regex"),
    ]
});

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid regex"));

static MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)").expect("valid regex"));

static PURE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid regex"));

static NAME_WITH_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+\d*$").expect("valid regex"));

const DEPRECATED_KEYWORDS: [&str; 3] = ["deprecated", "end of life", "eol"];
const LIMITED_KEYWORDS: [&str; 3] = ["limited", "partial", "beta"];

/// First dotted version (`8.1`, `7.17.3`) in `text`
pub fn first_dotted_version(text: &str) -> Option<String> {
    DOTTED_VERSION.find(text).map(|m| m.as_str().to_string())
}

/// Every dotted version in `text`, duplicates kept
pub fn dotted_versions(text: &str) -> Vec<String> {
    DOTTED_VERSION
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Version-like tokens from free text.
///
/// Dotted versions first, then bare numbers, then alphanumeric tokens.
/// Four-digit tokens (years) and tokens of 10+ characters are dropped;
/// at most [`MAX_FREE_TEXT_VERSIONS`] distinct tokens are kept.
pub fn free_text_versions(text: &str) -> IndexSet<String> {
    let mut versions = IndexSet::new();
    for pattern in FREE_TEXT_PATTERNS.iter() {
        for found in pattern.find_iter(text) {
            let token = found.as_str().trim();
            if token.len() < 10 && !YEAR.is_match(token) {
                versions.insert(token.to_string());
            }
        }
    }
    versions.into_iter().take(MAX_FREE_TEXT_VERSIONS).collect()
}

/// Architectures mentioned in `text`, case-insensitive
pub fn architectures(text: &str) -> IndexSet<String> {
    let lower = text.to_lowercase();
    let mut archs = IndexSet::new();

    if ["x86_64", "x64", "amd64"].iter().any(|k| lower.contains(k)) {
        archs.insert(ARCH_X86_64.to_string());
    }
    if ["aarch64", "arm64"].iter().any(|k| lower.contains(k)) {
        archs.insert(ARCH_AARCH64.to_string());
    }
    if ["apple silicon", "m1", "m2"].iter().any(|k| lower.contains(k)) {
        archs.insert(ARCH_APPLE_SILICON.to_string());
    }

    archs
}

/// Architectures implied by an OS label: macOS ships Apple Silicon builds,
/// Linux ships aarch64 builds, both next to x86_64.
pub fn os_architecture_hint(os: &str) -> IndexSet<String> {
    let lower = os.to_lowercase();
    let mut archs = IndexSet::new();

    if lower.contains("mac") {
        archs.insert(ARCH_X86_64.to_string());
        archs.insert(ARCH_APPLE_SILICON.to_string());
    } else if lower.contains("linux") {
        archs.insert(ARCH_X86_64.to_string());
        archs.insert(ARCH_AARCH64.to_string());
    }

    archs
}

/// Whether `version` is 8.x+ or 7.17+
pub fn is_modern_version(version: &str) -> bool {
    let Some(caps) = MAJOR_MINOR.captures(version) else {
        return false;
    };
    let major: u64 = caps[1].parse().unwrap_or(0);
    let minor: u64 = caps[2].parse().unwrap_or(0);
    major >= 8 || (major == 7 && minor >= 17)
}

/// Status of a record from the text it was scraped from and its versions.
///
/// Deprecation keywords win; then limitation keywords or the absence of any
/// modern version make it limited.
pub fn derive_status<'a>(text: &str, versions: impl IntoIterator<Item = &'a String>) -> Status {
    let lower = text.to_lowercase();

    if DEPRECATED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Status::Deprecated;
    }
    if LIMITED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Status::Limited;
    }
    if versions.into_iter().any(|v| is_modern_version(v)) {
        Status::Supported
    } else {
        Status::Limited
    }
}

/// Note-like cell texts of a row joined with ". ".
///
/// Column 0 is skipped, as are texts of 10 characters or fewer, pure numbers
/// and "Name 12"-style labels.
pub fn notes_from_cells(texts: &[String]) -> String {
    texts
        .iter()
        .skip(1)
        .map(|text| text.trim())
        .filter(|text| text.chars().count() > 10)
        .filter(|text| !PURE_NUMBER.is_match(text) && !NAME_WITH_NUMBER.is_match(text))
        .collect::<Vec<_>>()
        .join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_dotted_version() {
        assert_eq!(first_dotted_version("Elastic Agent 8.12.1"), Some("8.12.1".to_string()));
        assert_eq!(first_dotted_version("Agent 7.16"), Some("7.16".to_string()));
        assert_eq!(first_dotted_version("Agent 8"), None);
    }

    #[test]
    fn test_dotted_versions_keep_duplicates() {
        assert_eq!(dotted_versions("8.1, 8.2 and 8.1"), vec!["8.1", "8.2", "8.1"]);
    }

    #[test]
    fn test_free_text_dedup() {
        let versions = free_text_versions("7.17 7.17");
        assert_eq!(versions.iter().filter(|v| *v == "7.17").count(), 1);
        assert_eq!(versions.first().map(String::as_str), Some("7.17"));
    }

    #[test]
    fn test_free_text_order_and_filters() {
        let versions = free_text_versions("Ubuntu 22.04 since 2021, SLES 15 SP4, cos97 1234567890.1");
        let collected: Vec<_> = versions.iter().map(String::as_str).collect();

        assert_eq!(collected[0], "22.04");
        assert!(collected.contains(&"15"));
        assert!(collected.contains(&"SP4"));
        assert!(collected.contains(&"cos97"));
        assert!(!collected.contains(&"2021"));
        assert!(!collected.iter().any(|v| v.len() >= 10));
    }

    #[test]
    fn test_free_text_cap() {
        let versions = free_text_versions("1 2 3 4 5 6 7 8 9 10 11");
        assert_eq!(versions.len(), MAX_FREE_TEXT_VERSIONS);
    }

    #[test]
    fn test_architectures() {
        let archs = architectures("Supported on AMD64 and ARM64");
        assert!(archs.contains(ARCH_X86_64));
        assert!(archs.contains(ARCH_AARCH64));
        assert!(!archs.contains(ARCH_APPLE_SILICON));

        let apple = architectures("Apple Silicon (M1)");
        assert!(apple.contains(ARCH_APPLE_SILICON));

        assert!(architectures("✓").is_empty());
    }

    #[test]
    fn test_os_architecture_hint() {
        let mac = os_architecture_hint("macOS");
        assert!(mac.contains(ARCH_APPLE_SILICON) && mac.contains(ARCH_X86_64));

        let linux = os_architecture_hint("Amazon Linux 2");
        assert!(linux.contains(ARCH_AARCH64) && linux.contains(ARCH_X86_64));

        assert!(os_architecture_hint("Windows").is_empty());
    }

    #[test]
    fn test_modern_version_rule() {
        assert!(is_modern_version("8.0"));
        assert!(!is_modern_version("7.16"));
        assert!(is_modern_version("7.17"));
        assert!(!is_modern_version("6.9"));
        assert!(is_modern_version("9.0.1"));
        assert!(!is_modern_version("8"));
    }

    #[test]
    fn test_derive_status() {
        let modern = vec!["8.1".to_string()];
        let old = vec!["7.16".to_string()];

        assert_eq!(derive_status("Ubuntu", &modern), Status::Supported);
        assert_eq!(derive_status("Ubuntu", &old), Status::Limited);
        assert_eq!(derive_status("CentOS 7 (End of Life)", &modern), Status::Deprecated);
        assert_eq!(derive_status("Debian EOL", &old), Status::Deprecated);
        assert_eq!(derive_status("Windows (beta)", &modern), Status::Limited);
    }

    #[test]
    fn test_notes_from_cells() {
        let texts = vec![
            "Ubuntu with a long label".to_string(),
            "22.04.1".to_string(),
            "Ubuntu Server 22".to_string(),
            "Requires kernel 5.x or later".to_string(),
            "short".to_string(),
            "Docker images available".to_string(),
            "Packages: deb, rpm".to_string(),
        ];
        assert_eq!(
            notes_from_cells(&texts),
            "Requires kernel 5.x or later. Packages: deb, rpm"
        );
    }
}
