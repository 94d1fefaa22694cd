use crate::error::Error;
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::{Element, Value, ValueType};

/// ## Read-only access
impl XmlData {
    /// The type of a node's value.
    pub fn value_type(&self, node: Node) -> ValueType {
        self.value(node).value_type()
    }

    /// Parent node, if any.
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].parent().map(Node::new)
    }

    /// First child node, if any.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].first_child().map(Node::new)
    }

    /// Last child node, if any.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].last_child().map(Node::new)
    }

    /// Next sibling, if any.
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    /// Iterate over the children of a node, in document order.
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    /// Element value of a node, if it is an element.
    pub fn element(&self, node: Node) -> Option<&Element> {
        match self.value(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable element value of a node, if it is an element.
    pub fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        match self.value_mut(node) {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Nearest ancestor that is an element.
    pub fn parent_element(&self, node: Node) -> Option<Node> {
        self.parent(node)
            .filter(|parent| self.value_type(*parent) == ValueType::Element)
    }

    /// The document element of a document node.
    ///
    /// Fails with [`Error::NotDocument`] if this isn't a document node and
    /// with [`Error::NoDocumentElement`] if the document is still empty.
    pub fn document_element(&self, node: Node) -> Result<Node, Error> {
        if self.value_type(node) != ValueType::Document {
            return Err(Error::NotDocument(node));
        }
        self.children(node)
            .find(|child| self.value_type(*child) == ValueType::Element)
            .ok_or(Error::NoDocumentElement)
    }

    /// Attribute value of an element by local name (no namespace).
    pub fn attribute(&self, node: Node, local: &str) -> Option<&str> {
        let name_id = self.name(local)?;
        self.element(node)?.get_attribute(name_id)
    }
}
