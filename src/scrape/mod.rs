// Missing-dependency scraper
//
// `cmt show uses` reports packages it cannot locate on stderr, one per line:
// ```
// #CMT---> Warning: package Elements v2r1 Utilities not found: Elements v2r1 Utilities (requested by Foo)
// ```
// The marker and the `Warning:` / `found:` wording are CMT's, not ours, and
// are matched literally.

use crate::model::Package;
use tracing::debug;

/// Default marker CMT prefixes its diagnostics with
pub const DEFAULT_MARKER: &str = "#CMT";

const WARNING: &str = "Warning:";
const FOUND: &str = "found:";

/// Extracts missing packages from CMT diagnostic output
#[derive(Debug, Clone)]
pub struct MissingScraper {
    marker: String,
}

impl MissingScraper {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Scan diagnostic text, returning one package per warning line in input order
    pub fn scrape(&self, diagnostics: &str) -> Vec<Package> {
        let mut missing = Vec::new();

        for line in diagnostics.lines() {
            if !line.contains(self.marker.as_str()) || !line.contains(WARNING) {
                continue;
            }

            match Self::parse_warning(line) {
                Some(package) => missing.push(package),
                None => debug!("Skipping unrecognised CMT warning: {}", line),
            }
        }

        missing
    }

    /// Parse the `found: <name> [<version> [<offset>]] (...)` tail of a warning
    fn parse_warning(line: &str) -> Option<Package> {
        let start = line.rfind(FOUND)? + FOUND.len();
        let tail = &line[start..];
        let tail = match tail.find('(') {
            Some(end) => &tail[..end],
            None => tail,
        };

        let mut tokens = tail.split_whitespace();
        let mut package = Package::new(tokens.next()?);
        if let Some(version) = tokens.next() {
            package.version = version.to_string();
        }
        if let Some(offset) = tokens.next() {
            package.offset = offset.to_string();
        }

        Some(package)
    }
}

impl Default for MissingScraper {
    fn default() -> Self {
        Self::new()
    }
}
