//! XML -> DataObject normalization
//!
//! The document becomes a mapping holding the root element under its
//! qualified name. An element with neither attributes nor child elements is
//! its text. Any other element is a mapping of `@attribute` entries, child
//! elements in document order (repeated names repeat the key) and, when
//! present, its text under `#text`.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::DataObject;

/// Key holding an element's text when it also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Deepest element nesting accepted.
pub const MAX_DEPTH: usize = 256;

/// Errors turning XML text into a [`DataObject`].
#[derive(Debug, Error)]
pub enum XmlError {
    #[error(transparent)]
    Parse(#[from] quick_xml::Error),

    #[error(transparent)]
    Attribute(#[from] AttrError),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element (found <{0}>)")]
    MultipleRoots(String),

    #[error("text outside the root element: {0:?}")]
    TextOutsideRoot(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

struct ElementBuilder {
    name: String,
    attributes: Vec<(String, DataObject)>,
    children: Vec<(String, DataObject)>,
    text: String,
}

impl ElementBuilder {
    fn start(element: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in element.attributes() {
            let attribute = attribute?;
            let key = format!("@{}", String::from_utf8_lossy(attribute.key.as_ref()));
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, DataObject::String(value)));
        }
        Ok(ElementBuilder {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    fn finish(self) -> (String, DataObject) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, DataObject::String(self.text));
        }
        let mut entries = self.attributes;
        entries.extend(self.children);
        if !self.text.is_empty() {
            entries.push((TEXT_KEY.to_string(), DataObject::String(self.text)));
        }
        (self.name, DataObject::Mapping(entries))
    }
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<ElementBuilder>,
    root: Option<(String, DataObject)>,
}

impl TreeBuilder {
    fn attach(&mut self, (name, node): (String, DataObject)) -> Result<(), XmlError> {
        match self.open.last_mut() {
            Some(parent) => parent.children.push((name, node)),
            None if self.root.is_some() => return Err(XmlError::MultipleRoots(name)),
            None => self.root = Some((name, node)),
        }
        Ok(())
    }

    fn text(&mut self, text: Cow<'_, str>) -> Result<(), XmlError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        match self.open.last_mut() {
            Some(element) => {
                element.push_text(text);
                Ok(())
            }
            None => Err(XmlError::TextOutsideRoot(text.to_string())),
        }
    }
}

impl DataObject {
    /// Parses an XML document.
    pub fn from_xml_str(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut tree = TreeBuilder::default();
        loop {
            match reader.read_event()? {
                Event::Start(element) => {
                    if tree.open.is_empty() && tree.root.is_some() {
                        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                        return Err(XmlError::MultipleRoots(name));
                    }
                    if tree.open.len() >= MAX_DEPTH {
                        return Err(XmlError::TooDeep(MAX_DEPTH));
                    }
                    tree.open.push(ElementBuilder::start(&element)?);
                }
                Event::Empty(element) => {
                    let finished = ElementBuilder::start(&element)?.finish();
                    tree.attach(finished)?;
                }
                Event::End(_) => {
                    if let Some(element) = tree.open.pop() {
                        tree.attach(element.finish())?;
                    }
                }
                Event::Text(text) => tree.text(text.unescape()?)?,
                Event::CData(data) => tree.text(String::from_utf8_lossy(&data))?,
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctypes
                _ => {}
            }
        }

        if let Some(element) = tree.open.pop() {
            return Err(XmlError::Unclosed(element.name));
        }
        let (name, root) = tree.root.ok_or(XmlError::NoRoot)?;
        Ok(DataObject::Mapping(vec![(name, root)]))
    }
}
