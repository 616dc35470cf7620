//! Records produced by CMT queries
//!
//! CMT describes two kinds of things: projects (which use and are used by
//! other projects) and packages (which live at an offset inside a project).
//! Both are plain data; they are built by the parser and never mutated after
//! a query returns them.

use serde::Serialize;
use std::fmt;

/// Discriminant shared by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Project,
    Package,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Project => "project",
            RecordKind::Package => "package",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CMT project description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Project {
    /// The name of the project
    pub name: String,

    /// Version string, derived by CMT from the directory holding the project
    pub version: String,

    /// Root of the path that would be set inside the project
    pub cmtpath: String,

    /// Ordering hint reported by CMT (not interpreted)
    pub order: String,

    /// Projects (or packages) used by this project
    pub uses: Vec<Entry>,

    /// Projects that use this project
    pub clients: Vec<Entry>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::Project
    }
}

/// A CMT package description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    /// The name of the package
    pub name: String,

    /// Version string, derived by CMT from the directory holding the package
    pub version: String,

    /// Root of the path that would be set inside the project
    pub cmtpath: String,

    /// Ordering hint reported by CMT (not interpreted)
    pub order: String,

    /// Subdirectory of the project that contains the package
    pub offset: String,

    /// The package root
    pub root: String,

    /// Clients of the package. CMT does not currently report these, so
    /// this is normally empty.
    pub clients: Vec<Entry>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> RecordKind {
        RecordKind::Package
    }

    /// Package name qualified by its offset, e.g. `Utilities/Tools`
    pub fn path(&self) -> String {
        if self.offset.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.offset.trim_end_matches('/'), self.name)
        }
    }
}

/// Either kind of record, as found in a `uses` or `clients` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Project(Project),
    Package(Package),
}

impl Entry {
    pub fn kind(&self) -> RecordKind {
        match self {
            Entry::Project(p) => p.kind(),
            Entry::Package(p) => p.kind(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Project(p) => &p.name,
            Entry::Package(p) => &p.name,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Entry::Project(p) => &p.version,
            Entry::Package(p) => &p.version,
        }
    }

    pub fn as_project(&self) -> Option<&Project> {
        match self {
            Entry::Project(p) => Some(p),
            Entry::Package(_) => None,
        }
    }

    pub fn as_package(&self) -> Option<&Package> {
        match self {
            Entry::Package(p) => Some(p),
            Entry::Project(_) => None,
        }
    }

    /// Nested lists of this record as `(label, entries)` pairs, skipping empty ones
    pub fn children(&self) -> Vec<(&'static str, &[Entry])> {
        let lists: Vec<(&'static str, &[Entry])> = match self {
            Entry::Project(p) => vec![("uses", p.uses.as_slice()), ("clients", p.clients.as_slice())],
            Entry::Package(p) => vec![("clients", p.clients.as_slice())],
        };
        lists.into_iter().filter(|(_, l)| !l.is_empty()).collect()
    }
}

impl From<Project> for Entry {
    fn from(project: Project) -> Self {
        Entry::Project(project)
    }
}

impl From<Package> for Entry {
    fn from(package: Package) -> Self {
        Entry::Package(package)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<project n: {} v: {}", self.name, self.version)?;
        if !self.cmtpath.is_empty() {
            write!(f, " p: {}", self.cmtpath)?;
        }
        write!(f, " u: {} c: {}", self.uses.len(), self.clients.len())?;
        if !self.order.is_empty() {
            write!(f, " O: {}", self.order)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<package n: {} v: {}", self.path(), self.version)?;
        if !self.root.is_empty() {
            write!(f, " r: {}", self.root)?;
        }
        if !self.cmtpath.is_empty() {
            write!(f, " p: {}", self.cmtpath)?;
        }
        if !self.order.is_empty() {
            write!(f, " O: {}", self.order)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Project(p) => p.fmt(f),
            Entry::Package(p) => p.fmt(f),
        }
    }
}
