//! cmtquery - Query CMT projects and package dependencies
//!
//! This library runs the CMT configuration management tool and turns its
//! output into typed records.
//!
//! # Architecture
//!
//! A query goes through:
//! 1. **Shell** - Run `(cd <dir>; cmt show ...)` and capture its output
//! 2. **Parsing** - Build projects/packages from the `-xml` output with a
//!    stack-based tree builder
//! 3. **Scraping** - Pick missing packages out of CMT's warnings
//! 4. **Reporting** - Output results as a terminal tree or JSON

pub mod cmt;
pub mod config;
pub mod model;
pub mod parser;
pub mod report;
pub mod scrape;
pub mod shell;

pub use cmt::{Cmt, CmtError, Query, QueryOutput};
pub use config::Config;
pub use model::{Entry, Package, Project, RecordKind};
pub use parser::{parse_document, Document, ParseError, TreeBuilder, XmlTreeParser};
pub use report::{ReportFormat, Reporter};
pub use scrape::MissingScraper;
pub use shell::{CapturedOutput, ShellError, ShellRunner, SystemShell};
