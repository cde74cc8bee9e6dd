//! Schema document trees
//!
//! quick-xml event parsing into the element tree the XSD reader walks.
//! Elements keep their attributes in document order and carry the prefix
//! scope in effect where they were declared, so prefixed attribute values
//! (`type="tns:Author"`) can be expanded at any depth.

use crate::error::{Error, Result};
use crate::namespaces::{PrefixScope, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One attribute as written in the document
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Attribute name with any prefix removed
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// An element of a parsed schema document
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    /// Attributes in document order, `xmlns` declarations excluded
    pub attributes: Vec<Attribute>,
    /// Trimmed text content, if any
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Prefix bindings in effect at this element
    pub scope: PrefixScope,
}

impl Element {
    /// The element's local (prefix-less) tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Expand a possibly-prefixed attribute value into a QName
    pub fn qname_attr(&self, name: &str) -> Result<Option<QName>> {
        match self.attr(name) {
            Some(value) => Ok(Some(self.scope.expand(value.trim())?)),
            None => Ok(None),
        }
    }

    /// First child with the given tag
    pub fn find_child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.tag == tag)
    }

    /// All children with the given tag, in document order
    pub fn find_children(&self, tag: &str) -> Vec<&Element> {
        self.children.iter().filter(|e| e.tag == tag).collect()
    }
}

/// Parse a schema document, returning its root element
///
/// Comments and processing instructions are skipped; anything after the
/// root element closes is not read.
pub fn parse(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element = open_element(&start, stack.last())?;
                stack.push(element);
            }
            Ok(Event::Empty(start)) => {
                let element = open_element(&start, stack.last())?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Ok(Event::End(_)) => {
                // quick-xml rejects mismatched end tags itself
                let closed = stack
                    .pop()
                    .ok_or_else(|| Error::Xml("Unbalanced end tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(closed),
                    None => return Ok(closed),
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(current) = stack.last_mut() {
                    let content = text
                        .unescape()
                        .map_err(|e| Error::Xml(format!("Bad character data: {}", e)))?;
                    if !content.trim().is_empty() {
                        current.text = Some(content.into_owned());
                    }
                }
            }
            Ok(Event::Eof) => {
                return Err(Error::Xml("Document has no root element".to_string()));
            }
            Err(e) => {
                return Err(Error::Xml(format!(
                    "Malformed XML near byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(_) => {}
        }
    }
}

/// Build an element from a start tag, overlaying its xmlns declarations
/// on the enclosing scope
fn open_element(start: &BytesStart, parent: Option<&Element>) -> Result<Element> {
    let raw = start.name();
    let raw = std::str::from_utf8(raw.as_ref())
        .map_err(|e| Error::Xml(format!("Tag name is not UTF-8: {}", e)))?;
    let tag = strip_prefix(raw).to_string();

    let mut scope = match parent {
        Some(parent) => parent.scope.clone(),
        None => PrefixScope::new(),
    };
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Xml(format!("Bad attribute on <{}>: {}", tag, e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::Xml(format!("Attribute name is not UTF-8: {}", e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(format!("Bad value for '{}' on <{}>: {}", key, tag, e)))?
            .into_owned();

        if key == "xmlns" {
            scope.bind_default(value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.bind(prefix, value);
        } else {
            attributes.push(Attribute {
                name: strip_prefix(key).to_string(),
                value,
            });
        }
    }

    Ok(Element {
        tag,
        attributes,
        text: None,
        children: Vec::new(),
        scope,
    })
}

fn strip_prefix(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}
