//! Queries against the CMT configuration management tool
//!
//! Each query runs one CMT command in the requested directory and turns its
//! output into records:
//!
//! - [`Cmt::projects`] runs `cmt show projects -xml`
//! - [`Cmt::uses`] runs `cmt show uses -xml`
//! - [`Cmt::missing`] runs `cmt show uses` and scrapes its warnings
//!
//! A non-zero exit status is not an error: it is returned alongside the
//! records in [`QueryOutput`] so callers can decide what it means. Output
//! that cannot be parsed is an error.

use crate::config::Config;
use crate::model::{Entry, Package, Project};
use crate::parser::{Document, ParseError, XmlTreeParser};
use crate::scrape::MissingScraper;
use crate::shell::{quote_arg, CapturedOutput, ShellError, ShellRunner, SystemShell};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Query errors
#[derive(Error, Debug)]
pub enum CmtError {
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error("Could not understand output of `{command}`")]
    Parse {
        command: String,
        #[source]
        source: ParseError,
    },
}

/// Records from one query, with the exit status and diagnostics of the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput<T> {
    pub value: T,
    pub status: Option<i32>,
    pub stderr: String,
}

impl<T> QueryOutput<T> {
    fn new(value: T, captured: CapturedOutput) -> Self {
        Self {
            value,
            status: captured.status,
            stderr: captured.stderr,
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutput<U> {
        QueryOutput {
            value: f(self.value),
            status: self.status,
            stderr: self.stderr,
        }
    }
}

/// Which `cmt show` command to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Projects,
    Uses,
    Missing,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::Projects => "projects",
            Query::Uses => "uses",
            Query::Missing => "missing",
        }
    }

    fn arguments(&self) -> &'static str {
        match self {
            Query::Projects => "show projects -xml",
            Query::Uses => "show uses -xml",
            Query::Missing => "show uses",
        }
    }
}

/// Client for one CMT installation
#[derive(Debug, Clone)]
pub struct Cmt<R = SystemShell> {
    tool: String,
    runner: R,
    scraper: MissingScraper,
    parser: XmlTreeParser,
}

impl Cmt<SystemShell> {
    /// `cmt` from PATH, run with `sh`
    pub fn new() -> Self {
        Self::with_runner("cmt", SystemShell::new())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_runner(
            config.tool.clone(),
            SystemShell::new().with_shell(config.shell.clone()),
        )
        .with_warning_marker(config.warning_marker.clone())
    }
}

impl Default for Cmt<SystemShell> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ShellRunner> Cmt<R> {
    pub fn with_runner(tool: impl Into<String>, runner: R) -> Self {
        Self {
            tool: tool.into(),
            runner,
            scraper: MissingScraper::new(),
            parser: XmlTreeParser::new(),
        }
    }

    pub fn with_warning_marker(mut self, marker: impl Into<String>) -> Self {
        self.scraper = self.scraper.with_marker(marker);
        self
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The exact command line a query issues for `dir`
    pub fn command(&self, query: Query, dir: &Path) -> String {
        format!(
            "(cd {}; {} {})",
            quote_arg(&dir.to_string_lossy()),
            quote_arg(&self.tool),
            query.arguments()
        )
    }

    /// Projects visible from `dir`
    pub fn projects(&self, dir: &Path) -> Result<QueryOutput<Vec<Project>>, CmtError> {
        let command = self.command(Query::Projects, dir);
        let output = self.run_xml(&command)?;
        let QueryOutput {
            value,
            status,
            stderr,
        } = output;

        let projects = value
            .into_projects()
            .map_err(|source| CmtError::Parse { command, source })?;

        Ok(QueryOutput {
            value: projects,
            status,
            stderr,
        })
    }

    /// Projects and packages used by the package in `dir`
    pub fn uses(&self, dir: &Path) -> Result<QueryOutput<Vec<Entry>>, CmtError> {
        let command = self.command(Query::Uses, dir);
        Ok(self.run_xml(&command)?.map(Document::into_entries))
    }

    /// Packages `cmt show uses` could not find from `dir`
    pub fn missing(&self, dir: &Path) -> Result<QueryOutput<Vec<Package>>, CmtError> {
        let command = self.command(Query::Missing, dir);
        let captured = self.capture(&command)?;
        let missing = self.scraper.scrape(&captured.stderr);
        debug!("{} missing packages reported", missing.len());

        Ok(QueryOutput::new(missing, captured))
    }

    fn run_xml(&self, command: &str) -> Result<QueryOutput<Document>, CmtError> {
        let captured = self.capture(command)?;

        // No output means CMT had nothing to report (or could not run)
        let document = if captured.stdout.trim().is_empty() {
            Document::Empty
        } else {
            self.parser
                .parse(&captured.stdout)
                .map_err(|source| CmtError::Parse {
                    command: command.to_string(),
                    source,
                })?
        };

        Ok(QueryOutput::new(document, captured))
    }

    fn capture(&self, command: &str) -> Result<CapturedOutput, CmtError> {
        let captured = self.runner.capture(command)?;
        if !captured.success() {
            warn!(
                "`{}` exited with status {}",
                command,
                captured
                    .status
                    .map_or_else(|| "signal".to_string(), |code| code.to_string())
            );
        }
        Ok(captured)
    }
}
