use std::fmt::Debug;

use crate::name::NameId;

/// The type of the XML node.
///
/// The `ValueType` can be used if you are interested in
/// the type of the value without needing to match on it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ValueType {
    /// Document node that holds everything. Note that this not the same as
    /// the document element.
    Document,
    /// Element; it has a name and attributes.
    Element,
    /// Text.
    Text,
    /// CDATA section.
    CData,
    /// Comment.
    Comment,
    /// Processing instruction.
    ProcessingInstruction,
    /// Entity reference.
    EntityRef,
    /// Document type declaration.
    DocType,
}

/// An XML value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Document node that holds everything. Note that this not the same as
    /// the document element.
    Document,
    /// Element; it has a name and attributes.
    Element(Element),
    /// Text.
    Text(Text),
    /// CDATA section. Written as-is, never escaped.
    CData(Text),
    /// Comment.
    Comment(Comment),
    /// Processing instruction.
    ProcessingInstruction(ProcessingInstruction),
    /// Entity reference, e.g. `&nbsp;`.
    EntityRef(EntityRef),
    /// Document type declaration.
    DocType(DocType),
}

impl Value {
    /// Returns the type of the XML value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Document => ValueType::Document,
            Value::Element(_) => ValueType::Element,
            Value::Text(_) => ValueType::Text,
            Value::CData(_) => ValueType::CData,
            Value::Comment(_) => ValueType::Comment,
            Value::ProcessingInstruction(_) => ValueType::ProcessingInstruction,
            Value::EntityRef(_) => ValueType::EntityRef,
            Value::DocType(_) => ValueType::DocType,
        }
    }

    /// Character data: text, CDATA and entity references.
    ///
    /// Consecutive runs of these are written as a single unit.
    pub fn is_text_like(&self) -> bool {
        matches!(self, Value::Text(_) | Value::CData(_) | Value::EntityRef(_))
    }
}

/// An attribute: a name and a value.
///
/// Attributes keep the order in which they were set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub(crate) name_id: NameId,
    pub(crate) value: String,
}

impl Attribute {
    /// The name of the attribute.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// XML element value.
///
/// Example: `<foo/>` or `<foo bar="baz"/>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name_id: NameId,
    pub(crate) attributes: Vec<Attribute>,
}

impl Element {
    pub(crate) fn new(name_id: NameId) -> Self {
        Element {
            name_id,
            attributes: Vec::new(),
        }
    }

    /// The name of the element.
    pub fn name(&self) -> NameId {
        self.name_id
    }

    /// The attributes of the element, in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name_id: NameId) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name_id == name_id)
            .map(|attribute| attribute.value.as_str())
    }

    /// Set an attribute value.
    ///
    /// An existing attribute keeps its position; a new one is added at the
    /// end.
    pub fn set_attribute<S: Into<String>>(&mut self, name_id: NameId, value: S) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name_id == name_id)
        {
            Some(attribute) => attribute.value = value,
            None => self.attributes.push(Attribute { name_id, value }),
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, name_id: NameId) {
        self.attributes.retain(|attribute| attribute.name_id != name_id);
    }
}

/// XML text value, also used for the content of CDATA sections.
///
/// Example: `Bar` in `<foo>Bar</foo>`, or `hello` and `world` in `<greeting>hello<sep/>world</greeting>`.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    /// Get the text value.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Set the text value.
    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }
}

/// XML comment.
///
/// Example: `<!-- foo -->`.
#[derive(Debug, Clone)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }
}

/// XML processing instruction value.
///
/// Example: `<?foo?>` or `<?foo bar?>`.
#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: Option<String>,
}

impl ProcessingInstruction {
    pub(crate) fn new(target: String, data: Option<String>) -> Self {
        // empty data is the same as no data
        let data = data.filter(|data| !data.is_empty());
        ProcessingInstruction { target, data }
    }

    /// Get processing instruction target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get processing instruction data.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// Entity reference.
///
/// Example: `&nbsp;` has the name `nbsp`.
#[derive(Debug, Clone)]
pub struct EntityRef {
    pub(crate) name: String,
}

impl EntityRef {
    pub(crate) fn new(name: String) -> Self {
        EntityRef { name }
    }

    /// The entity name, without `&` and `;`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Document type declaration.
///
/// Example: `<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "xhtml1-strict.dtd">`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocType {
    /// Name of the document element this declaration is for.
    pub element_name: String,
    /// Public identifier.
    pub public_id: Option<String>,
    /// System identifier.
    pub system_id: Option<String>,
    /// Internal subset, without the surrounding brackets.
    pub internal_subset: Option<String>,
}

impl DocType {
    /// A doctype with only an element name.
    pub fn new<S: Into<String>>(element_name: S) -> Self {
        DocType {
            element_name: element_name.into(),
            ..Default::default()
        }
    }
}
