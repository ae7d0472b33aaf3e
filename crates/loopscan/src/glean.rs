//! Metadata gleaning: mapping a target identifier to named fields.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::Result;

/// A source of per-target metadata. The pipeline consults a gleaner when a
/// transform entry carries a metadata-predicate filter.
pub trait Gleaner: Send + Sync {
    /// Extract named fields for a target identifier.
    fn glean(&self, target: &str) -> IndexMap<String, String>;
}

/// Gleans metadata fields from a file name with per-field regular
/// expressions. Each field yields the pattern's first capture group (or the
/// whole match when there is no group), or an empty string when the pattern
/// does not match.
#[derive(Debug, Clone, Default)]
pub struct NameGleaner {
    patterns: IndexMap<String, Regex>,
}

impl NameGleaner {
    /// Create a gleaner with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field extracted by `pattern`.
    pub fn with_pattern(mut self, field: &str, pattern: &str) -> Result<Self> {
        self.patterns.insert(field.to_string(), Regex::new(pattern)?);
        Ok(self)
    }

    /// The field map used for scanning-measurement file names:
    /// `scan=<n>`, `x=<n>`, `y=<n>`, and an `averaged` marker.
    pub fn scan_files() -> Result<Self> {
        Self::new()
            .with_pattern("scan", r"scan=(\d+)")?
            .with_pattern("x", r"x=(\d+)")?
            .with_pattern("y", r"y=(\d+)")?
            .with_pattern("averaged", r"(averaged)")
    }
}

impl Gleaner for NameGleaner {
    fn glean(&self, target: &str) -> IndexMap<String, String> {
        let name = Path::new(target)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string());

        let mut fields = IndexMap::with_capacity(self.patterns.len());
        for (field, pattern) in &self.patterns {
            let value = pattern
                .captures(&name)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            fields.insert(field.clone(), value);
        }
        fields
    }
}
