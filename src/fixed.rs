//! Owned descriptions of documents and elements.
//!
//! [`XmlData`] trees live in an arena, but it is useful to have a plain value
//! for a document that you can create, compare and store separately. Turn it
//! into nodes by calling `.build` and passing a mutable [`XmlData`].
//!
//! Example:
//!
//! ```rust
//! use persist_xml::{fixed, Format, XmlData, XmlOutputter};
//!
//! let fixed_element = fixed::Element {
//!   name: fixed::Name::local("foo"),
//!   attributes: vec![],
//!   children: vec![fixed::Content::Text("Example".to_string())],
//! };
//!
//! let mut data = XmlData::new();
//! let node = fixed_element.build(&mut data)?;
//! let outputter = XmlOutputter::new(Format::default())?;
//! assert_eq!(outputter.element_to_string(&data, node)?, "<foo>Example</foo>");
//! # Ok::<(), persist_xml::Error>(())
//! ```

use crate::error::Error;
use crate::name::NameId;
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::DocType;

/// A whole document: optional doctype, the document element and the
/// markup around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    /// Document type declaration, written first
    pub doctype: Option<DocType>,
    /// Written between the doctype and the document element
    pub before: Vec<DocumentContent>,
    /// The root element
    pub document_element: Element,
    /// Written after the document element
    pub after: Vec<DocumentContent>,
}

/// A name, with the prefix it is written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// Prefix the name is written with. Empty string means no prefix
    pub prefix: String,
    /// Namespace URI. Empty string means no namespace
    pub namespace: String,
    /// Local part of the name
    pub localname: String,
}

impl Name {
    /// A name without a namespace.
    pub fn local(localname: &str) -> Self {
        Name {
            prefix: String::new(),
            namespace: String::new(),
            localname: localname.to_string(),
        }
    }

    /// Turn a fixed name into a name id
    pub fn build(&self, data: &mut XmlData) -> NameId {
        let namespace = data.add_namespace(&self.prefix, &self.namespace);
        data.add_name_ns(&self.localname, namespace)
    }
}

/// An element with its attributes and content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
    /// Element name
    pub name: Name,
    /// Attributes, in output order
    pub attributes: Vec<(Name, String)>,
    /// Children
    pub children: Vec<Content>,
}

/// A single item of element content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Content {
    /// A text node
    Text(String),
    /// A CDATA section
    CData(String),
    /// An entity reference, by name
    EntityRef(String),
    /// A comment node
    Comment(String),
    /// A processing instruction node
    ProcessingInstruction(ProcessingInstruction),
    /// An element node
    Element(Element),
}

/// Markup allowed before or after the document element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentContent {
    /// A comment node
    Comment(String),
    /// A processing instruction node
    ProcessingInstruction(ProcessingInstruction),
}

/// A processing instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessingInstruction {
    /// Target, e.g. `xml-stylesheet`
    pub target: String,
    /// Data after the target; `None` or empty writes `<?target?>`
    pub content: Option<String>,
}

impl Document {
    /// Turn a fixed document into a document node
    pub fn build(&self, data: &mut XmlData) -> Result<Node, Error> {
        let document = data.new_document();
        if let Some(doctype) = &self.doctype {
            let node = data.new_doctype(doctype.clone());
            data.append(document, node)?;
        }
        for content in &self.before {
            let node = content.build(data);
            data.append(document, node)?;
        }
        let element = self.document_element.build(data)?;
        data.append(document, element)?;
        for content in &self.after {
            let node = content.build(data);
            data.append(document, node)?;
        }
        Ok(document)
    }
}

impl Element {
    /// Turn a fixed element into an element node
    pub fn build(&self, data: &mut XmlData) -> Result<Node, Error> {
        let name = self.name.build(data);
        let element = data.new_element(name);
        for (name, value) in &self.attributes {
            let name = name.build(data);
            data.set_attribute(element, name, value.clone())?;
        }
        for child in &self.children {
            let node = child.build(data)?;
            data.append(element, node)?;
        }
        Ok(element)
    }
}

impl ProcessingInstruction {
    /// Turn a fixed processing instruction into a node
    pub fn build(&self, data: &mut XmlData) -> Node {
        data.new_processing_instruction(&self.target, self.content.as_deref())
    }
}

impl Content {
    fn build(&self, data: &mut XmlData) -> Result<Node, Error> {
        Ok(match self {
            Content::Text(text) => data.new_text(text),
            Content::CData(text) => data.new_cdata(text),
            Content::EntityRef(name) => data.new_entity_ref(name),
            Content::Comment(comment) => data.new_comment(comment),
            Content::ProcessingInstruction(processing_instruction) => {
                processing_instruction.build(data)
            }
            Content::Element(element) => element.build(data)?,
        })
    }
}

impl DocumentContent {
    fn build(&self, data: &mut XmlData) -> Node {
        match self {
            DocumentContent::Comment(comment) => data.new_comment(comment),
            DocumentContent::ProcessingInstruction(processing_instruction) => {
                processing_instruction.build(data)
            }
        }
    }
}
