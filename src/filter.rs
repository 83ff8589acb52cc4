//! Path classification used to explain why a file has no coverage.
//!
//! None of this changes what gets processed; it only decides how loudly a
//! miss is reported.
use std::path::Path;

use log::warn;

use crate::error::Result;

/// Extensions the coverage tooling instruments.
pub const COVERAGE_EXTENSIONS: &[&str] = &[
    // C
    "c", "h", //
    // C++
    "cpp", "cc", "cxx", "hh", "hpp", "hxx", //
    // Objective-C
    "m", "mm", //
    // JavaScript and friends
    "js", "jsm", "xul", "xml", "html", "xhtml", //
    // Rust
    "rs",
];

/// Why a path was missing from the coverage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    ThirdParty,
    UnsupportedExtension,
    Unexpected,
}

/// Third-party prefixes and supported extensions.
#[derive(Debug, Clone)]
pub struct PathFilter {
    third_parties: Vec<String>,
    extensions: Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PathFilter {
    pub fn new(third_parties: Vec<String>) -> Self {
        Self {
            third_parties,
            extensions: COVERAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Parse a third-party list: one path prefix per line, blank lines ignored.
    pub fn parse_third_parties(content: &str) -> Vec<String> {
        content
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Load the third-party list from `path`. A missing list is not fatal:
    /// every path is then considered first-party.
    pub fn from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::new(Self::parse_third_parties(&content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Missing third party exclusion list: {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_third_party(&self, path: &str) -> bool {
        self.third_parties.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn is_supported_extension(&self, path: &str) -> bool {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    pub fn classify_miss(&self, path: &str) -> MissReason {
        if self.is_third_party(path) {
            MissReason::ThirdParty
        } else if !self.is_supported_extension(path) {
            MissReason::UnsupportedExtension
        } else {
            MissReason::Unexpected
        }
    }
}
