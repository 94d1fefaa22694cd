use crate::error::Error;
use crate::name::NameId;
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::ValueType;

/// Manipulation of the tree structure.
///
/// This maintains a writable XML structure:
/// - A document node holds at most one document element and at most one
///   doctype. The only other nodes that can exist directly under it are
///   comments and processing instructions.
/// - Documents and doctypes never appear inside an element.
/// - You cannot add a node to a node that is not an element or a document.
///
/// Adjacent text nodes are *not* merged: a sequence of text nodes is kept
/// as-is and written as a single run.
impl XmlData {
    /// Append a child to the end of the children of the given parent.
    ///
    /// It is now the new last node of the parent.
    pub fn append(&mut self, parent: Node, child: Node) -> Result<(), Error> {
        self.add_structure_check(parent, child)?;
        parent.get().checked_append(child.get(), self.arena_mut())?;
        Ok(())
    }

    /// Append a text node to a parent node given text.
    pub fn append_text(&mut self, parent: Node, text: &str) -> Result<Node, Error> {
        let node = self.new_text(text);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append a CDATA section to a parent node.
    pub fn append_cdata(&mut self, parent: Node, text: &str) -> Result<Node, Error> {
        let node = self.new_cdata(text);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append an element node to a parent node given a name.
    pub fn append_element(&mut self, parent: Node, name_id: NameId) -> Result<Node, Error> {
        let node = self.new_element(name_id);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append a comment node to a parent node given comment text.
    pub fn append_comment(&mut self, parent: Node, comment: &str) -> Result<Node, Error> {
        let node = self.new_comment(comment);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append a processing instruction node to a parent node given target and data.
    pub fn append_processing_instruction(
        &mut self,
        parent: Node,
        target: &str,
        data: Option<&str>,
    ) -> Result<Node, Error> {
        let node = self.new_processing_instruction(target, data);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Append an entity reference to a parent node.
    pub fn append_entity_ref(&mut self, parent: Node, name: &str) -> Result<Node, Error> {
        let node = self.new_entity_ref(name);
        self.append(parent, node)?;
        Ok(node)
    }

    /// Set an attribute on an element node.
    pub fn set_attribute<S: Into<String>>(
        &mut self,
        node: Node,
        name_id: NameId,
        value: S,
    ) -> Result<(), Error> {
        self.element_mut(node)
            .ok_or(Error::NotElement(node))?
            .set_attribute(name_id, value);
        Ok(())
    }

    /// Remove an attribute from an element node.
    pub fn remove_attribute(&mut self, node: Node, name_id: NameId) -> Result<(), Error> {
        self.element_mut(node)
            .ok_or(Error::NotElement(node))?
            .remove_attribute(name_id);
        Ok(())
    }

    fn add_structure_check(&self, parent: Node, child: Node) -> Result<(), Error> {
        let child_type = self.value_type(child);
        match self.value_type(parent) {
            ValueType::Document => match child_type {
                ValueType::Element => {
                    if self.has_child_of_type(parent, ValueType::Element, child) {
                        return Err(Error::DuplicateDocumentElement);
                    }
                }
                ValueType::DocType => {
                    if self.has_child_of_type(parent, ValueType::DocType, child) {
                        return Err(Error::DuplicateDocType);
                    }
                }
                ValueType::Comment | ValueType::ProcessingInstruction => {}
                ValueType::Document
                | ValueType::Text
                | ValueType::CData
                | ValueType::EntityRef => {
                    return Err(Error::InvalidOperation(format!(
                        "cannot add {:?} to a document",
                        child_type
                    )));
                }
            },
            ValueType::Element => match child_type {
                ValueType::Document | ValueType::DocType => {
                    return Err(Error::InvalidOperation(format!(
                        "cannot add {:?} to an element",
                        child_type
                    )));
                }
                ValueType::Element
                | ValueType::Text
                | ValueType::CData
                | ValueType::Comment
                | ValueType::ProcessingInstruction
                | ValueType::EntityRef => {}
            },
            parent_type => {
                return Err(Error::InvalidOperation(format!(
                    "{:?} cannot have children",
                    parent_type
                )));
            }
        }
        Ok(())
    }

    // re-appending a node that is already in place doesn't count as a duplicate
    fn has_child_of_type(&self, parent: Node, value_type: ValueType, except: Node) -> bool {
        self.children(parent)
            .any(|child| child != except && self.value_type(child) == value_type)
    }
}
