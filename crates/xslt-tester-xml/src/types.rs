//! Arena tree types for line-tracked XML documents.

use crate::error::ParseDiagnostic;

/// Namespace URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Handle to a node stored in an [`XmlDocument`] arena.
///
/// Handles are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Prefix as written in the source (e.g., "xsl" in `<xsl:template>`).
    pub prefix: Option<String>,

    /// Local part of the name.
    ///
    /// When the source used a prefix that was never declared, the whole
    /// written name (`foo:bar`) ends up here and `namespace` is `None`.
    pub local: String,

    /// Namespace URI the prefix (or default namespace) resolved to.
    pub namespace: Option<String>,
}

impl QName {
    /// Create a name with no prefix and no namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
            namespace: None,
        }
    }

    /// The name exactly as it appeared in the source.
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element. Namespace declarations are not attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: QName,

    /// The attribute value after entity unescaping (raw text if unescaping failed).
    pub value: String,
}

/// An `xmlns` / `xmlns:prefix` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// `None` for the default namespace.
    pub prefix: Option<String>,
    pub uri: String,
}

/// Payload of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: QName,

    /// Attributes in source order.
    pub attributes: Vec<XmlAttribute>,

    /// Namespace declarations made on this element, in source order.
    pub namespaces: Vec<NamespaceDeclaration>,
}

impl XmlElement {
    /// Get an attribute value by its written (qualified) name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.qualified() == name)
            .map(|a| a.value.as_str())
    }

    /// Get the first attribute whose local name matches.
    pub fn attribute_by_local_name(&self, local: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name.local == local)
    }
}

/// What a node is, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNodeKind {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    /// Target and data as written between `<?` and `?>`.
    ProcessingInstruction(String),
}

/// Storage for one node of the arena.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub kind: XmlNodeKind,

    /// Parent element. Only the root element has none.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// 1-based line on which the node starts, when known.
    pub source_line: Option<usize>,
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match &self.kind {
            XmlNodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, XmlNodeKind::Element(_))
    }
}

/// A parsed document: the root element's subtree, stored as an arena.
///
/// Nodes are owned by the document; parent links are plain handles, so
/// walking upwards never fights the borrow checker.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    root: NodeId,
    declaration: Option<String>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl XmlDocument {
    pub(crate) fn new(
        nodes: Vec<XmlNode>,
        root: NodeId,
        declaration: Option<String>,
        diagnostics: Vec<ParseDiagnostic>,
    ) -> Self {
        Self {
            nodes,
            root,
            declaration,
            diagnostics,
        }
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id.index())
    }

    /// The element payload of `id`, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&XmlElement> {
        self.node(id).and_then(XmlNode::as_element)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Element children of `id`, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.node(*child).is_some_and(XmlNode::is_element))
    }

    pub fn source_line(&self, id: NodeId) -> Option<usize> {
        self.node(id).and_then(|n| n.source_line)
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            document: self,
            stack: vec![id],
        }
    }

    /// Namespace declarations made on the root element.
    pub fn root_namespaces(&self) -> &[NamespaceDeclaration] {
        match self.element(self.root) {
            Some(element) => &element.namespaces,
            None => &[],
        }
    }

    /// The raw `<?xml ...?>` declaration, if the source had one.
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    /// Defects the parser recovered from.
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator returned by [`XmlDocument::descendants`].
pub struct Descendants<'a> {
    document: &'a XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attributes: Vec<XmlAttribute>) -> XmlNodeKind {
        XmlNodeKind::Element(XmlElement {
            name: QName::local(name),
            attributes,
            namespaces: vec![],
        })
    }

    fn sample() -> XmlDocument {
        // <a><b/>text<c><d/></c></a>
        let nodes = vec![
            XmlNode {
                kind: element("a", vec![]),
                parent: None,
                children: vec![NodeId(1), NodeId(2), NodeId(3)],
                source_line: Some(1),
            },
            XmlNode {
                kind: element(
                    "b",
                    vec![XmlAttribute {
                        name: QName::local("id"),
                        value: "x".to_string(),
                    }],
                ),
                parent: Some(NodeId(0)),
                children: vec![],
                source_line: Some(2),
            },
            XmlNode {
                kind: XmlNodeKind::Text("text".to_string()),
                parent: Some(NodeId(0)),
                children: vec![],
                source_line: Some(2),
            },
            XmlNode {
                kind: element("c", vec![]),
                parent: Some(NodeId(0)),
                children: vec![NodeId(4)],
                source_line: Some(3),
            },
            XmlNode {
                kind: element("d", vec![]),
                parent: Some(NodeId(3)),
                children: vec![],
                source_line: Some(4),
            },
        ];
        XmlDocument::new(nodes, NodeId(0), None, vec![])
    }

    #[test]
    fn test_descendants_are_in_document_order() {
        let doc = sample();
        let order: Vec<usize> = doc.descendants(doc.root()).map(NodeId::index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = sample();
        let children: Vec<usize> = doc
            .element_children(doc.root())
            .map(NodeId::index)
            .collect();
        assert_eq!(children, vec![1, 3]);
    }

    #[test]
    fn test_parent_links() {
        let doc = sample();
        assert_eq!(doc.parent(NodeId(4)), Some(NodeId(3)));
        assert_eq!(doc.parent(doc.root()), None);
        assert_eq!(doc.parent(NodeId(99)), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let doc = sample();
        let b = doc.element(NodeId(1)).unwrap();
        assert_eq!(b.get_attribute("id"), Some("x"));
        assert_eq!(b.attribute_by_local_name("id").unwrap().value, "x");
        assert!(b.get_attribute("name").is_none());
    }

    #[test]
    fn test_qualified_name() {
        let name = QName {
            prefix: Some("xsl".to_string()),
            local: "template".to_string(),
            namespace: Some("http://www.w3.org/1999/XSL/Transform".to_string()),
        };
        assert_eq!(name.qualified(), "xsl:template");
        assert_eq!(QName::local("root").qualified(), "root");
    }
}
