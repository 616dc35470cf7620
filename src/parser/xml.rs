use super::tree::TreeBuilder;
use super::{Document, ParseError};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

/// Parser for the XML printed by `cmt show ... -xml`
///
/// Each call builds a fresh [`TreeBuilder`], so one parser can be shared
/// freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlTreeParser;

impl XmlTreeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete document
    pub fn parse(&self, contents: &str) -> Result<Document, ParseError> {
        // No per-event trimming: the builder trims each joined leaf value
        let mut reader = Reader::from_str(contents);

        let mut builder = TreeBuilder::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => builder.start(e.name().as_ref())?,
                Ok(Event::Empty(ref e)) => {
                    builder.start(e.name().as_ref())?;
                    builder.end(e.name().as_ref())?;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|source| ParseError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    builder.text(&text);
                }
                Ok(Event::CData(e)) => {
                    builder.text(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(Event::End(ref e)) => builder.end(e.name().as_ref())?,
                Ok(Event::Eof) => break,
                Err(source) => {
                    return Err(ParseError::Xml {
                        position: reader.buffer_position(),
                        source,
                    });
                }
                _ => {}
            }
            buf.clear();
        }

        let document = builder.finish()?;
        debug!("Parsed CMT document: {} top-level records", document.len());

        Ok(document)
    }
}
