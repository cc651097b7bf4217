//! A small namespace-resolved element tree.
//!
//! Feed documents are read once into an [`Element`] tree where every name is
//! resolved to its `(namespace, local-name)` pair, so callers can look up
//! extension elements like `dc:creator` without caring which prefix the
//! document happened to bind.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{LocalName, ResolveResult};
use quick_xml::NsReader;

use crate::{Error, Result};

pub const ATOM: &str = "http://www.w3.org/2005/Atom";
pub const CONTENT: &str = "http://purl.org/rss/1.0/modules/content/";
pub const DUBLIN_CORE: &str = "http://purl.org/dc/elements/1.1/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RSS_1: &str = "http://purl.org/rss/1.0/";

/// An element name with its prefix resolved to a namespace URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    fn resolved(ns: ResolveResult<'_>, local: LocalName<'_>) -> Self {
        let namespace = match ns {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                log::debug!(
                    "unknown namespace prefix `{}`",
                    String::from_utf8_lossy(&prefix)
                );
                None
            }
        };
        Self {
            namespace,
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        }
    }

    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local == local
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    /// Unprefixed attributes by local name, namespace declarations excluded
    attributes: Vec<(String, String)>,
    text: String,
    /// Text of this element and all of its descendants, in document order
    inner_text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Self {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(e) => {
                    log::warn!("Skipping malformed attribute: {e}");
                    continue;
                }
            };
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            match attr.unescape_value() {
                Ok(value) => attributes.push((
                    String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                    value.into_owned(),
                )),
                Err(e) => log::warn!("Skipping attribute with bad value: {e}"),
            }
        }
        Self {
            name: QName::resolved(ns, start.local_name()),
            attributes,
            text: String::new(),
            inner_text: String::new(),
            children: Vec::new(),
        }
    }

    /// Read a whole document and return its root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = NsReader::from_reader(bytes);
        let mut stack: Vec<Element> = Vec::new();
        loop {
            match reader.read_resolved_event()? {
                (ns, Event::Start(start)) => {
                    stack.push(Element::open(ns, &start));
                }
                (ns, Event::Empty(start)) => {
                    let element = Element::open(ns, &start);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                (_, Event::End(_)) => {
                    let Some(element) = stack.pop() else {
                        continue;
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                (_, Event::Text(text)) => {
                    let text = text.unescape().unwrap_or_else(|e| {
                        log::debug!("keeping raw text after unescape failure: {e}");
                        Cow::Owned(String::from_utf8_lossy(&text).into_owned())
                    });
                    push_text(&mut stack, &text);
                }
                (_, Event::CData(data)) => {
                    push_text(&mut stack, &String::from_utf8_lossy(&data));
                }
                (_, Event::Eof) => {
                    let open = stack
                        .last()
                        .map(|e| e.name.to_string())
                        .unwrap_or_else(|| "document root".to_string());
                    log::warn!("xml document ended early, `{open}` still open");
                    return Err(Error::UnexpectedEof(open));
                }
                _ => {}
            }
        }
    }

    /// Direct text and CDATA of this element, as written
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of this element and every descendant, markup dropped
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }

    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == local)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.name.matches(namespace, local)
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, local))
    }

    /// The first child with the given name
    pub fn child(&self, namespace: Option<&str>, local: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(namespace, local))
    }

    /// Text of the first child with the given name
    pub fn text_of(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.child(namespace, local).map(Element::text)
    }
}

fn push_text(stack: &mut [Element], text: &str) {
    for open in stack.iter_mut() {
        open.inner_text.push_str(text);
    }
    if let Some(current) = stack.last_mut() {
        current.text.push_str(text);
    }
}
