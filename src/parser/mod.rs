// Parsing of CMT's -xml output into record graphs

mod grammar;
mod tree;
mod xml;

pub use grammar::{ContainerKind, Field, Tag, GRAMMAR};
pub use tree::TreeBuilder;
pub use xml::XmlTreeParser;

use crate::model::{Entry, Project};
use thiserror::Error;

/// Errors raised when CMT output cannot be understood
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("</{tag}> closes nothing: no container is open")]
    Underflow { tag: &'static str },
    #[error("</{found}> found while <{expected}> is still open")]
    Mismatched {
        expected: &'static str,
        found: &'static str,
    },
    #[error("A {child} cannot be nested directly inside a {parent}")]
    NotAList {
        parent: &'static str,
        child: &'static str,
    },
    #[error("A {record} has no <{list}> list")]
    NoSuchList {
        record: &'static str,
        list: &'static str,
    },
    #[error("<{list}> cannot be nested directly inside <{parent}>")]
    ListInList {
        parent: &'static str,
        list: &'static str,
    },
    #[error("<projects> is only allowed as the document root")]
    NestedProjects,
    #[error("<{field}> is outside any project or package{}", inside(.container))]
    StrayField {
        field: &'static str,
        container: Option<&'static str>,
    },
    #[error("Document ended with {depth} open container(s), innermost <{tag}>")]
    Unclosed { depth: usize, tag: &'static str },
    #[error("Expected a {expected} but found a {found}")]
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },
}

fn inside(container: &Option<&'static str>) -> String {
    container
        .map(|c| format!(" (inside <{}>)", c))
        .unwrap_or_default()
}

/// Result of parsing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// No container was ever completed (e.g. the tool printed nothing)
    Empty,

    /// The root was a `projects`, `uses` or `clients` list
    Records(Vec<Entry>),

    /// The root was a single `project` or `package`
    Record(Entry),
}

impl Document {
    /// Number of top-level records
    pub fn len(&self) -> usize {
        match self {
            Document::Empty => 0,
            Document::Records(entries) => entries.len(),
            Document::Record(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Document::Empty => Vec::new(),
            Document::Records(entries) => entries,
            Document::Record(entry) => vec![entry],
        }
    }

    /// Top-level records as projects; any package at the top level is an error
    pub fn into_projects(self) -> Result<Vec<Project>, ParseError> {
        self.into_entries()
            .into_iter()
            .map(|entry| match entry {
                Entry::Project(project) => Ok(project),
                Entry::Package(package) => Err(ParseError::UnexpectedKind {
                    expected: "project",
                    found: package.kind().as_str(),
                }),
            })
            .collect()
    }
}

/// Parse a document with a fresh parser
pub fn parse_document(contents: &str) -> Result<Document, ParseError> {
    XmlTreeParser::new().parse(contents)
}
