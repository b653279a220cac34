//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Document model, markup parsing and asynchronous loading."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
//! Markup parsing on top of the servo parsers.
//!
//! `RcDom` is reference counted and single-threaded, so it is converted into a
//! [`Document`] arena straight after parsing.

use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;
use xml5ever::driver::XmlParseOpts;

use crate::document::{Attribute, Document, DocumentKind, Element, NodeId, NodeKind};
use crate::error::{DomError, Result};

/// Map a content type (parameters allowed) onto the parser that handles it.
pub fn document_kind_for(content_type: &str) -> Result<DocumentKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "text/html" => Ok(DocumentKind::Html),
        "application/xhtml+xml" | "application/xml" | "text/xml" | "image/svg+xml" => {
            Ok(DocumentKind::Xml)
        }
        other if other.ends_with("+xml") => Ok(DocumentKind::Xml),
        _ => Err(DomError::UnsupportedContentType(content_type.to_owned())),
    }
}

/// Parse `markup` according to `content_type`.
///
/// Fails when the content type is not markup or when the result has no
/// document element.
pub fn parse_document(markup: &str, content_type: &str) -> Result<Document> {
    let kind = document_kind_for(content_type)?;
    let dom = match kind {
        DocumentKind::Xml => {
            xml5ever::driver::parse_document(RcDom::default(), XmlParseOpts::default()).one(markup)
        }
        DocumentKind::Html => {
            html5ever::parse_document(RcDom::default(), ParseOpts::default()).one(markup)
        }
    };

    let mut document = Document::new(kind, content_type);
    let root = document.root();
    convert_children(&mut document, &dom.document, root);

    if document.document_element().is_none() {
        return Err(DomError::MissingDocumentElement);
    }
    debug!(
        kind = %kind,
        content_type,
        nodes = document.node_count(),
        "markup parsed"
    );
    Ok(document)
}

fn convert_children(document: &mut Document, handle: &Handle, parent: NodeId) {
    for child in handle.children.borrow().iter() {
        let kind = match &child.data {
            NodeData::Document => continue,
            NodeData::Doctype { name, .. } => NodeKind::Doctype {
                name: name.to_string(),
            },
            NodeData::Text { contents } => NodeKind::Text(contents.borrow().to_string()),
            NodeData::Comment { contents } => NodeKind::Comment(contents.to_string()),
            NodeData::ProcessingInstruction { target, contents } => {
                NodeKind::ProcessingInstruction {
                    target: target.to_string(),
                    data: contents.to_string(),
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| Attribute {
                        local_name: attr.name.local.to_string(),
                        namespace_uri: namespace_of(&attr.name.ns),
                        prefix: attr.name.prefix.as_ref().map(|prefix| prefix.to_string()),
                        value: attr.value.to_string(),
                    })
                    .collect();
                NodeKind::Element(Element::new(
                    name.local.to_string(),
                    namespace_of(&name.ns),
                    name.prefix.as_ref().map(|prefix| prefix.to_string()),
                    attributes,
                ))
            }
        };
        let id = document.append(parent, kind);
        convert_children(document, child, id);
    }
}

fn namespace_of(ns: &str) -> Option<String> {
    (!ns.is_empty()).then(|| ns.to_owned())
}
