// Tag grammar for CMT's -xml output
//
// Every tag CMT emits is either a container (opens something that later
// receives children) or a leaf (its text lands in a scalar field of the
// innermost open record). Tags missing from the table are ignored.

use std::fmt;

/// Kinds of container that can be open on the parse stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Project,
    Package,
    Projects,
    Uses,
    Clients,
}

impl ContainerKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ContainerKind::Project => "project",
            ContainerKind::Package => "package",
            ContainerKind::Projects => "projects",
            ContainerKind::Uses => "uses",
            ContainerKind::Clients => "clients",
        }
    }

    /// True for the wrapper tags that collect a sequence of records
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ContainerKind::Projects | ContainerKind::Uses | ContainerKind::Clients
        )
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Scalar fields a leaf tag writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Version,
    Root,
    Cmtpath,
    Order,
    Offset,
}

impl Field {
    pub fn tag(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Version => "version",
            Field::Root => "root",
            Field::Cmtpath => "cmtpath",
            Field::Order => "order",
            Field::Offset => "offset",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a tag means to the tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Container(ContainerKind),
    Leaf(Field),
}

/// The complete grammar. Tag names are case-sensitive.
pub const GRAMMAR: &[(&str, Tag)] = &[
    ("project", Tag::Container(ContainerKind::Project)),
    ("package", Tag::Container(ContainerKind::Package)),
    ("projects", Tag::Container(ContainerKind::Projects)),
    ("uses", Tag::Container(ContainerKind::Uses)),
    ("clients", Tag::Container(ContainerKind::Clients)),
    ("name", Tag::Leaf(Field::Name)),
    ("version", Tag::Leaf(Field::Version)),
    ("root", Tag::Leaf(Field::Root)),
    ("cmtpath", Tag::Leaf(Field::Cmtpath)),
    ("order", Tag::Leaf(Field::Order)),
    ("offset", Tag::Leaf(Field::Offset)),
];

impl Tag {
    /// Look up a raw tag name, returning `None` for tags outside the grammar
    pub fn lookup(name: &[u8]) -> Option<Tag> {
        GRAMMAR
            .iter()
            .find(|(tag, _)| tag.as_bytes() == name)
            .map(|(_, tag)| *tag)
    }
}
