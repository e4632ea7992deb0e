use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ARCH_X86_64: &str = "x86_64";
pub const ARCH_AARCH64: &str = "aarch64";
pub const ARCH_APPLE_SILICON: &str = "aarch64 (Apple Silicon)";

/// Maximum length of [`SupportRecord::notes`], in characters
pub const NOTES_MAX_CHARS: usize = 400;

/// Support status of an OS
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Supported,
    Limited,
    Deprecated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Supported => "supported",
            Status::Limited => "limited",
            Status::Deprecated => "deprecated",
        }
    }

    /// Display label, e.g. "Supported"
    pub fn label(&self) -> &'static str {
        match self {
            Status::Supported => "Supported",
            Status::Limited => "Limited",
            Status::Deprecated => "Deprecated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supported" => Ok(Status::Supported),
            "limited" => Ok(Status::Limited),
            "deprecated" => Ok(Status::Deprecated),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// Support information for one operating system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportRecord {
    /// Operating system label as scraped
    pub os: String,

    /// Product versions supported on this OS. Equality ignores order.
    pub versions: IndexSet<String>,

    /// Architectures; never empty
    pub architecture: IndexSet<String>,

    pub status: Status,

    /// Free-text summary, at most [`NOTES_MAX_CHARS`] characters
    pub notes: String,
}

impl SupportRecord {
    /// Build a record, or `None` when there are no versions.
    ///
    /// An empty architecture set becomes `{x86_64}` and notes are truncated.
    pub fn new(
        os: impl Into<String>,
        versions: IndexSet<String>,
        architecture: IndexSet<String>,
        status: Status,
        notes: impl Into<String>,
    ) -> Option<Self> {
        if versions.is_empty() {
            return None;
        }

        let mut architecture = architecture;
        if architecture.is_empty() {
            architecture.insert(ARCH_X86_64.to_string());
        }

        Some(Self {
            os: os.into(),
            versions,
            architecture,
            status,
            notes: truncate_chars(&notes.into(), NOTES_MAX_CHARS),
        })
    }
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
