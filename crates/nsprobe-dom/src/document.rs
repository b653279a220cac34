//! ---
//! nsp_section: "04-document-model"
//! nsp_subsection: "module"
//! nsp_type: "source"
//! nsp_scope: "code"
//! nsp_description: "Document model, markup parsing and asynchronous loading."
//! nsp_version: "v0.1.0"
//! nsp_owner: "tbd"
//! ---
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Parsing mode the document was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    Xml,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub prefix: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    local_name: String,
    namespace_uri: Option<String>,
    prefix: Option<String>,
    attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(
        local_name: impl Into<String>,
        namespace_uri: Option<String>,
        prefix: Option<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            namespace_uri,
            prefix,
            attributes,
        }
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Namespace URI, `None` for elements in no namespace.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// `prefix:local` when prefixed, otherwise the local name.
    pub fn qualified_name(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}:{}", self.local_name)),
            None => Cow::Borrowed(&self.local_name),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the first attribute whose local name matches `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.local_name == name)
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype { name: String },
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Static snapshot of matching elements, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Immutable parsed document.
///
/// Nodes live in an arena filled in pre-order, so arena order is document
/// order. The first node is always the document node.
#[derive(Debug, Clone)]
pub struct Document {
    kind: DocumentKind,
    content_type: String,
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document holding only the document node.
    pub fn new(kind: DocumentKind, content_type: impl Into<String>) -> Self {
        Self {
            kind,
            content_type: content_type.into(),
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `kind` as the last child of `parent`.
    ///
    /// Appending must follow pre-order for queries to stay in document order,
    /// which is how the parser walks the tree.
    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First element child of the document node.
    pub fn document_element(&self) -> Option<NodeId> {
        self.nodes[0]
            .children
            .iter()
            .copied()
            .find(|id| self.element(*id).is_some())
    }

    /// Elements whose local name equals `local_name`; `"*"` matches all.
    ///
    /// The namespace and prefix of an element play no part in the match.
    pub fn get_elements_by_tag_name(&self, local_name: &str) -> NodeList {
        if local_name == "*" {
            return self.collect(|_| true);
        }
        self.collect(|element| element.local_name() == local_name)
    }

    /// Elements matching both `namespace_uri` and `local_name`.
    ///
    /// `None` or an empty string selects elements in no namespace; `"*"` in
    /// either position matches anything.
    pub fn get_elements_by_tag_name_ns(
        &self,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> NodeList {
        let namespace = namespace_uri.filter(|ns| !ns.is_empty());
        let any_namespace = namespace == Some("*");
        let any_name = local_name == "*";
        self.collect(|element| {
            (any_namespace || element.namespace_uri() == namespace)
                && (any_name || element.local_name() == local_name)
        })
    }

    fn collect<F>(&self, mut predicate: F) -> NodeList
    where
        F: FnMut(&Element) -> bool,
    {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node.as_element() {
                Some(element) if predicate(element) => Some(NodeId(index)),
                _ => None,
            })
            .collect();
        NodeList { nodes }
    }
}

#[cfg(test)]
mod tests {
    use nsprobe_common::XHTML_NAMESPACE;

    use super::*;

    fn element(local: &str, ns: Option<&str>, prefix: Option<&str>) -> NodeKind {
        NodeKind::Element(Element::new(
            local,
            ns.map(str::to_owned),
            prefix.map(str::to_owned),
            Vec::new(),
        ))
    }

    fn mixed_document() -> Document {
        let mut doc = Document::new(DocumentKind::Xml, "application/xml");
        let root = doc.append(doc.root(), element("html", Some(XHTML_NAMESPACE), None));
        let body = doc.append(root, element("body", Some(XHTML_NAMESPACE), None));
        doc.append(body, element("html", Some("urn:example:other"), Some("o")));
        doc.append(body, element("html", None, None));
        doc.append(body, NodeKind::Text("hello".into()));
        doc
    }

    #[test]
    fn document_element_skips_non_elements() {
        let mut doc = Document::new(DocumentKind::Xml, "application/xml");
        doc.append(doc.root(), NodeKind::Doctype { name: "html".into() });
        let root = doc.append(doc.root(), element("svg", None, None));
        assert_eq!(doc.document_element(), Some(root));
    }

    #[test]
    fn plain_lookup_matches_local_names_in_any_namespace() {
        let doc = mixed_document();
        assert_eq!(doc.get_elements_by_tag_name("html").len(), 3);
        assert_eq!(doc.get_elements_by_tag_name("o:html").len(), 0);
        assert_eq!(doc.get_elements_by_tag_name("HTML").len(), 0);
        assert_eq!(doc.get_elements_by_tag_name("*").len(), 4);
    }

    #[test]
    fn namespaced_lookup_filters_on_namespace() {
        let doc = mixed_document();
        assert_eq!(
            doc.get_elements_by_tag_name_ns(Some(XHTML_NAMESPACE), "html")
                .len(),
            1
        );
        assert_eq!(
            doc.get_elements_by_tag_name_ns(Some("urn:example:other"), "html")
                .len(),
            1
        );
        assert_eq!(doc.get_elements_by_tag_name_ns(None, "html").len(), 1);
        assert_eq!(doc.get_elements_by_tag_name_ns(Some(""), "html").len(), 1);
        assert_eq!(doc.get_elements_by_tag_name_ns(Some("*"), "html").len(), 3);
        assert_eq!(
            doc.get_elements_by_tag_name_ns(Some(XHTML_NAMESPACE), "*")
                .len(),
            2
        );
    }

    #[test]
    fn results_are_in_document_order() {
        let doc = mixed_document();
        let ids: Vec<_> = doc.get_elements_by_tag_name("*").into_iter().collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.first().copied(), doc.document_element());
    }
}
