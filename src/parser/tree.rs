use super::grammar::{ContainerKind, Field, Tag};
use super::{Document, ParseError};
use crate::model::{Entry, Package, Project};
use tracing::{debug, trace};

/// A container that has been opened but not yet closed
#[derive(Debug)]
enum Open {
    Record(Entry),
    List(ContainerKind, Vec<Entry>),
}

impl Open {
    fn new(kind: ContainerKind) -> Self {
        match kind {
            list if list.is_list() => Open::List(list, Vec::new()),
            ContainerKind::Project => Open::Record(Entry::Project(Project::default())),
            _ => Open::Record(Entry::Package(Package::default())),
        }
    }

    fn kind(&self) -> ContainerKind {
        match self {
            Open::Record(Entry::Project(_)) => ContainerKind::Project,
            Open::Record(Entry::Package(_)) => ContainerKind::Package,
            Open::List(kind, _) => *kind,
        }
    }
}

/// Builds the record graph from start/text/end events.
///
/// All state belongs to the builder, so independent parses never share
/// anything. A record is attached to its parent only once its own end tag
/// has been seen, which means every record reachable from the result is
/// complete.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    stack: Vec<Open>,
    /// Leaf currently collecting text, with the fragments seen so far
    field: Option<(Field, String)>,
    /// Unknown tags open inside the active leaf
    skipped: usize,
    result: Option<Document>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently open
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn start(&mut self, name: &[u8]) -> Result<(), ParseError> {
        let tag = match Tag::lookup(name) {
            Some(tag) => tag,
            None => {
                trace!("Ignoring tag <{}>", String::from_utf8_lossy(name));
                if self.field.is_some() {
                    self.skipped += 1;
                }
                return Ok(());
            }
        };

        // A grammar tag ends whatever leaf is still collecting
        if let Some((field, value)) = self.take_field() {
            self.assign(field, value)?;
        }

        match tag {
            Tag::Container(kind) => self.stack.push(Open::new(kind)),
            Tag::Leaf(field) => self.field = Some((field, String::new())),
        }
        Ok(())
    }

    /// Character data may arrive in several fragments; they are joined
    /// until the leaf closes. Text inside unknown child tags is skipped.
    pub fn text(&mut self, fragment: &str) {
        if self.skipped > 0 {
            return;
        }
        if let Some((_, value)) = &mut self.field {
            value.push_str(fragment);
        }
    }

    pub fn end(&mut self, name: &[u8]) -> Result<(), ParseError> {
        match Tag::lookup(name) {
            None => {
                self.skipped = self.skipped.saturating_sub(1);
                Ok(())
            }
            Some(Tag::Leaf(field)) => match self.take_field() {
                Some((active, value)) if active == field => self.assign(field, value),
                _ => Ok(()),
            },
            Some(Tag::Container(kind)) => {
                self.take_field();
                self.close(kind)
            }
        }
    }

    /// Consume the builder and return whatever the outermost container produced
    pub fn finish(self) -> Result<Document, ParseError> {
        if let Some(open) = self.stack.last() {
            return Err(ParseError::Unclosed {
                depth: self.stack.len(),
                tag: open.kind().tag(),
            });
        }

        Ok(self.result.unwrap_or(Document::Empty))
    }

    fn take_field(&mut self) -> Option<(Field, String)> {
        self.skipped = 0;
        self.field.take()
    }

    /// Store a finished leaf value, trimmed once, on the open record
    fn assign(&mut self, field: Field, value: String) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            Some(Open::Record(entry)) => {
                match field_mut(entry, field) {
                    Some(slot) => *slot = value.trim().to_string(),
                    None => debug!("Ignoring <{}> on a {}", field, entry.kind()),
                }
                Ok(())
            }
            Some(Open::List(kind, _)) => Err(ParseError::StrayField {
                field: field.tag(),
                container: Some(kind.tag()),
            }),
            None => Err(ParseError::StrayField {
                field: field.tag(),
                container: None,
            }),
        }
    }

    fn close(&mut self, kind: ContainerKind) -> Result<(), ParseError> {
        let open = self
            .stack
            .pop()
            .ok_or(ParseError::Underflow { tag: kind.tag() })?;

        if open.kind() != kind {
            return Err(ParseError::Mismatched {
                expected: open.kind().tag(),
                found: kind.tag(),
            });
        }

        match open {
            Open::Record(entry) => self.attach_record(entry),
            Open::List(kind, entries) => self.attach_list(kind, entries),
        }
    }

    fn attach_record(&mut self, entry: Entry) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            None => {
                self.result = Some(Document::Record(entry));
                Ok(())
            }
            Some(Open::List(_, entries)) => {
                entries.push(entry);
                Ok(())
            }
            Some(Open::Record(parent)) => Err(ParseError::NotAList {
                parent: parent.kind().as_str(),
                child: entry.kind().as_str(),
            }),
        }
    }

    fn attach_list(&mut self, kind: ContainerKind, entries: Vec<Entry>) -> Result<(), ParseError> {
        match self.stack.last_mut() {
            None => {
                self.result = Some(Document::Records(entries));
                Ok(())
            }
            Some(_) if kind == ContainerKind::Projects => Err(ParseError::NestedProjects),
            Some(Open::List(parent, _)) => Err(ParseError::ListInList {
                parent: parent.tag(),
                list: kind.tag(),
            }),
            Some(Open::Record(record)) => {
                let slot = match (record, kind) {
                    (Entry::Project(p), ContainerKind::Uses) => &mut p.uses,
                    (Entry::Project(p), ContainerKind::Clients) => &mut p.clients,
                    (Entry::Package(p), ContainerKind::Clients) => &mut p.clients,
                    (record, _) => {
                        return Err(ParseError::NoSuchList {
                            record: record.kind().as_str(),
                            list: kind.tag(),
                        })
                    }
                };
                *slot = entries;
                Ok(())
            }
        }
    }
}

/// The scalar slot a leaf writes to, if this kind of record has one
fn field_mut(entry: &mut Entry, field: Field) -> Option<&mut String> {
    match entry {
        Entry::Project(p) => match field {
            Field::Name => Some(&mut p.name),
            Field::Version => Some(&mut p.version),
            Field::Cmtpath => Some(&mut p.cmtpath),
            Field::Order => Some(&mut p.order),
            Field::Root | Field::Offset => None,
        },
        Entry::Package(p) => Some(match field {
            Field::Name => &mut p.name,
            Field::Version => &mut p.version,
            Field::Cmtpath => &mut p.cmtpath,
            Field::Order => &mut p.order,
            Field::Root => &mut p.root,
            Field::Offset => &mut p.offset,
        }),
    }
}
