//! Generic element tree built from the backup XML.
//!
//! The backup format is a plain element hierarchy with scalar leaves, so the
//! reader keeps every element (name, attributes, text, children) and leaves
//! the typed mapping to [`super::model`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Error raised while tokenizing the backup document.
#[derive(Debug, Error)]
#[error("{message} (at byte {position})")]
pub struct XmlParseError {
    /// Human readable description of the failure.
    pub message: String,
    /// Byte offset reported by the reader.
    pub position: u64,
}

/// A single element of the backup document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Element name (e.g. `ticket`).
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|node| node.name == name)
    }

    /// Returns every child element with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |node| node.name == name)
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Unfuddle marks absent scalars with `nil="true"`.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.attribute("nil") == Some("true")
    }

    /// Returns the raw text of this element, or `None` when it is nil or
    /// holds only whitespace.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        if self.is_nil() || self.text.trim().is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// Returns the trimmed text of the named child, if present and non-empty.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlNode::value).map(str::trim)
    }

    /// Returns the untrimmed text of the named child, for free-form bodies.
    #[must_use]
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlNode::value)
    }
}

/// Parses an XML document into its root element.
///
/// # Errors
///
/// Returns [`XmlParseError`] if the document is malformed, has unbalanced
/// tags, or contains no root element.
pub fn parse_document(input: &str) -> Result<XmlNode, XmlParseError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| XmlParseError {
            message: e.to_string(),
            position,
        })?;

        match event {
            Event::Start(start) => {
                stack.push(open_node(&start, position)?);
            }
            Event::Empty(start) => {
                let node = open_node(&start, position)?;
                attach(&mut stack, &mut root, node, position)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| XmlParseError {
                    message: "closing tag without matching opening tag".to_string(),
                    position,
                })?;
                attach(&mut stack, &mut root, node, position)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&text));
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(current) = stack.last_mut() {
                    let resolved = match reference.resolve_char_ref() {
                        Ok(Some(ch)) => ch.to_string(),
                        Ok(None) => {
                            let name = String::from_utf8_lossy(&reference).into_owned();
                            quick_xml::escape::resolve_predefined_entity(&name)
                                .map(str::to_string)
                                .unwrap_or_else(|| format!("&{name};"))
                        }
                        Err(e) => {
                            return Err(XmlParseError {
                                message: e.to_string(),
                                position,
                            })
                        }
                    };
                    current.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlParseError {
            message: format!("unclosed element <{}>", open.name),
            position: reader.buffer_position() as u64,
        });
    }

    root.ok_or_else(|| XmlParseError {
        message: "document has no root element".to_string(),
        position: reader.buffer_position() as u64,
    })
}

fn open_node(start: &BytesStart<'_>, position: u64) -> Result<XmlNode, XmlParseError> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlParseError {
            message: e.to_string(),
            position,
        })?;
        attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attribute.value).into_owned(),
        ));
    }

    Ok(XmlNode {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
    position: u64,
) -> Result<(), XmlParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(XmlParseError {
            message: format!("second root element <{}>", node.name),
            position,
        }),
    }
}
