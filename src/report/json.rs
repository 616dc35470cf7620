use crate::cmt::{Query, QueryOutput};
use crate::model::Entry;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, query: Query, output: &QueryOutput<Vec<Entry>>) -> Result<()> {
        let json = Self::render(query, output)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(query: Query, output: &QueryOutput<Vec<Entry>>) -> Result<String> {
        let report = JsonReport {
            version: "1.0",
            query: query.as_str(),
            total: output.value.len(),
            exit_status: output.status,
            records: &output.value,
        };
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    query: &'static str,
    total: usize,
    exit_status: Option<i32>,
    records: &'a [Entry],
}
