use crate::name::NameId;
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::{Comment, DocType, Element, EntityRef, ProcessingInstruction, Text, Value};

/// ## Creation
///
/// New nodes are unattached; use the manipulation methods to place them in
/// a tree.
impl XmlData {
    pub(crate) fn new_node(&mut self, value: Value) -> Node {
        Node::new(self.arena_mut().new_node(value))
    }

    /// Create a new, empty document node.
    pub fn new_document(&mut self) -> Node {
        self.new_node(Value::Document)
    }

    /// Create a new text node.
    pub fn new_text(&mut self, text: &str) -> Node {
        self.new_node(Value::Text(Text::new(text.to_string())))
    }

    /// Create a new CDATA section.
    pub fn new_cdata(&mut self, text: &str) -> Node {
        self.new_node(Value::CData(Text::new(text.to_string())))
    }

    /// Create a new element node without attributes.
    pub fn new_element(&mut self, name_id: NameId) -> Node {
        self.new_node(Value::Element(Element::new(name_id)))
    }

    /// Create a new comment node.
    pub fn new_comment(&mut self, comment: &str) -> Node {
        self.new_node(Value::Comment(Comment::new(comment.to_string())))
    }

    /// Create a new processing instruction node.
    pub fn new_processing_instruction(&mut self, target: &str, data: Option<&str>) -> Node {
        self.new_node(Value::ProcessingInstruction(ProcessingInstruction::new(
            target.to_string(),
            data.map(|s| s.to_string()),
        )))
    }

    /// Create a new entity reference, given the entity name.
    pub fn new_entity_ref(&mut self, name: &str) -> Node {
        self.new_node(Value::EntityRef(EntityRef::new(name.to_string())))
    }

    /// Create a new doctype node.
    pub fn new_doctype(&mut self, doctype: DocType) -> Node {
        self.new_node(Value::DocType(doctype))
    }
}
