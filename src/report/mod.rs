mod terminal;
mod json;

pub use terminal::TerminalReporter;
pub use json::JsonReporter;

use crate::cmt::{Query, QueryOutput};
use crate::model::Entry;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl ReportFormat {
    /// Parse a format name from configuration, falling back to terminal
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Terminal,
        }
    }
}

/// Reporter for query results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_paths: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_paths: true,
        }
    }

    pub fn with_paths(mut self, show: bool) -> Self {
        self.show_paths = show;
        self
    }

    /// Report the records returned by a query
    pub fn report(&self, query: Query, output: &QueryOutput<Vec<Entry>>) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => {
                let reporter = TerminalReporter::new().with_paths(self.show_paths);
                reporter.report(query, output)
            }
            ReportFormat::Json => {
                let reporter = JsonReporter::new(self.output_path.clone());
                reporter.report(query, output)
            }
        }
    }
}
