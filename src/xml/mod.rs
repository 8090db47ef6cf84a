//! XML tree adapter backed by quick-xml.
//!
//! Builds a small owned DOM from an event stream, then hands out borrowed
//! `&Element` handles that implement [`TreeNode`]. Parsing happens once per
//! document; the flattener only navigates.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::EspalierError;
use crate::tree::TreeNode;

/// A parsed XML document. Owns the element tree for its lifetime; the
/// flattener borrows nodes from it.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

/// One element of a parsed document: tag, attributes, direct text, children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Document {
    /// Parse an XML string into an owned element tree.
    ///
    /// Whitespace-only text is dropped; entity references in text and
    /// attribute values are unescaped. If the input has more than one
    /// top-level element only the first is kept.
    pub fn parse(xml: &str) -> Result<Document, EspalierError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut roots: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| EspalierError::Xml(e.to_string()))?;
            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let elem = element_from_start(&start)?;
                    attach(&mut stack, &mut roots, elem);
                }
                Event::Text(text) => {
                    if let Some(open) = stack.last_mut() {
                        let value = text
                            .unescape()
                            .map_err(|e| EspalierError::Xml(e.to_string()))?;
                        open.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(open) = stack.last_mut() {
                        open.text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    if let Some(done) = stack.pop() {
                        attach(&mut stack, &mut roots, done);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let mut roots = roots.into_iter();
        let root = roots.next().ok_or(EspalierError::EmptyDocument)?;
        if roots.next().is_some() {
            log::warn!("document has multiple top-level elements, using the first");
        }
        Ok(Document { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The repeated "item" elements a batch run iterates over. If the root
    /// itself carries the item tag the document is a single item.
    pub fn items(&self, tag: &str) -> Vec<&Element> {
        if self.root.tag == tag {
            vec![&self.root]
        } else {
            self.root.find_descendants(tag)
        }
    }
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn find_first(&self, tag: &str) -> Option<&Element> {
        for child in &self.children {
            if child.tag == tag {
                return Some(child);
            }
            if let Some(found) = child.find_first(tag) {
                return Some(found);
            }
        }
        None
    }

    fn find_descendants(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.tag == tag {
                out.push(child);
            }
            child.collect_descendants(tag, out);
        }
    }
}

impl<'a> TreeNode for &'a Element {
    fn find_one(&self, tag: &str) -> Option<Self> {
        Element::find_first(*self, tag)
    }

    fn find_all(&self, tag: &str) -> Vec<Self> {
        Element::find_descendants(*self, tag)
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn text(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }
}

fn attach(stack: &mut [Element], roots: &mut Vec<Element>, elem: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => roots.push(elem),
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element, EspalierError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| EspalierError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| EspalierError::Xml(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        tag,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}
