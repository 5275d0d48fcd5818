//! Event-driven tree construction.
//!
//! `TreeBuilder` consumes one [`XmlEvent`] at a time and grows a
//! [`Document`], checking everything that spans more than one event: tag
//! balance, the single root element, text placement, prefix resolution and
//! attribute uniqueness. The first violation ends the build.

use log::{debug, trace};

use crate::error::DomError;
use crate::event::{RawAttribute, XmlEvent};
use crate::tree::{Document, Name, NodeId, NodeKind};
use crate::util::qname::QName;

use super::BuildOptions;

/// Incremental document builder.
pub(crate) struct TreeBuilder<'o> {
    doc: Document,
    /// The innermost open element; `None` while at document level.
    open: Option<NodeId>,
    depth: u32,
    options: &'o BuildOptions,
}

impl<'o> TreeBuilder<'o> {
    pub(crate) fn new(options: &'o BuildOptions) -> Self {
        Self {
            doc: Document::new(),
            open: None,
            depth: 0,
            options,
        }
    }

    /// The node new children are appended to.
    fn current(&self) -> NodeId {
        self.open.unwrap_or_else(|| self.doc.root())
    }

    pub(crate) fn feed(&mut self, event: XmlEvent) -> Result<(), DomError> {
        trace!("event: {event:?}");
        match event {
            XmlEvent::StartElement { name, attributes } => self.start_element(&name, attributes),
            XmlEvent::EndElement { name } => self.end_element(&name),
            XmlEvent::CharacterData(text) => self.characters(&text),
            XmlEvent::Comment(content) => {
                let node = self.doc.create_node(NodeKind::Comment { content });
                self.doc.append(self.current(), node)
            }
            XmlEvent::ProcessingInstruction { target, data } => {
                if self.open.is_none() && target == "xml" {
                    // the XML declaration never becomes a node
                    return Ok(());
                }
                let node = self
                    .doc
                    .create_node(NodeKind::ProcessingInstruction { target, data });
                self.doc.append(self.current(), node)
            }
        }
    }

    fn start_element(
        &mut self,
        name: &QName,
        attributes: Vec<RawAttribute>,
    ) -> Result<(), DomError> {
        if self.depth >= self.options.max_depth {
            return Err(DomError::limit(format!(
                "maximum nesting depth {} exceeded",
                self.options.max_depth
            )));
        }
        if attributes.len() > self.options.max_attributes as usize {
            return Err(DomError::limit(format!(
                "element <{name}> has more than {} attributes",
                self.options.max_attributes
            )));
        }

        // The name is resolved below, once the element's own declarations
        // are in place.
        let element = self.doc.create_node(NodeKind::element(Name::new(
            "",
            name.prefix(),
            name.local.as_str(),
        )));
        self.doc.append(self.current(), element)?;
        self.open = Some(element);
        self.depth += 1;

        for attr in attributes.iter().filter(|a| a.is_namespace_decl()) {
            match attr.name.prefix() {
                Some(_) if attr.value.is_empty() => {
                    return Err(DomError::namespace(format!(
                        "empty namespace is not allowed: {}",
                        attr.name
                    )));
                }
                Some(_) => {
                    self.doc
                        .declare_namespace(element, Some(&attr.name.local), &attr.value)?;
                }
                None => {
                    self.doc.declare_namespace(element, None, &attr.value)?;
                }
            }
        }

        let uri = self.resolve(element, name)?;
        if let NodeKind::Element { name, .. } = &mut self.doc.node_mut(element).kind {
            name.uri = uri;
        }

        let mut resolved = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if attr.is_namespace_decl() {
                continue;
            }
            // Unprefixed attributes are in no namespace, never the default one.
            let uri = if attr.name.prefix.is_some() {
                self.resolve(element, &attr.name)?
            } else {
                String::new()
            };
            let RawAttribute { name, value } = attr;
            resolved.push((Name::new(uri, name.prefix.as_deref(), name.local), value));
        }
        for (name, value) in resolved {
            self.doc.add_attribute(element, name, value)?;
        }
        Ok(())
    }

    fn resolve(&self, element: NodeId, name: &QName) -> Result<String, DomError> {
        self.doc
            .resolve_prefix(element, name.prefix())
            .map(str::to_string)
            .ok_or_else(|| {
                DomError::namespace(format!(
                    "unresolved prefix: {}",
                    name.prefix().unwrap_or_default()
                ))
            })
    }

    fn end_element(&mut self, name: &QName) -> Result<(), DomError> {
        let Some(element) = self.open else {
            return Err(DomError::structure(format!("unexpected </{name}>")));
        };
        let Some(open_name) = self.doc.element_name(element) else {
            return Err(DomError::structure(format!("unexpected </{name}>")));
        };
        // Compared lexically: the end tag must repeat the start tag's prefix.
        if open_name.prefix() != name.prefix() || open_name.local != name.local {
            return Err(DomError::structure(format!("expected </{open_name}>")));
        }

        self.depth -= 1;
        self.open = self
            .doc
            .parent(element)
            .filter(|&parent| matches!(self.doc.kind(parent), NodeKind::Element { .. }));
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), DomError> {
        match self.open {
            Some(element) => self.doc.append_text(element, text),
            None if text.trim().is_empty() => Ok(()),
            None => Err(DomError::structure(
                "character data is not allowed in document",
            )),
        }
    }

    pub(crate) fn finish(self) -> Result<Document, DomError> {
        if let Some(element) = self.open {
            let name = self
                .doc
                .element_name(element)
                .map(ToString::to_string)
                .unwrap_or_default();
            return Err(DomError::structure(format!("expected </{name}>")));
        }
        if self.doc.root_element().is_none() {
            return Err(DomError::structure("document is empty"));
        }
        debug!("built document with {} nodes", self.doc.node_count());
        Ok(self.doc)
    }
}
