use std::borrow::Cow;
use std::io::{self, Write};

use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::macros::{AttributeRef, MacroFilter, NoMacroFilter, PathMacroMap};
use crate::sensitive::{NoGuard, NodeKind, SensitiveDataGuard, OPTION_NAME_PREFIX};
use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::{Attribute, Comment, DocType, Element, ProcessingInstruction, Value};

use super::content::{gen_segments, layout, skip_leading_white, skip_trailing_white, Layout, Segment};
use super::text::{ends_with_whitespace, process, starts_with_whitespace};
use super::Format;

/// Processing instruction targets XSLT processors use to switch output
/// escaping off and on again. They are instructions to a processor, not
/// content, so they are dropped unless [`Format::ignore_escaping_pis`] is set.
pub const DISABLE_OUTPUT_ESCAPING: &str = "javax.xml.transform.disable-output-escaping";
/// See [`DISABLE_OUTPUT_ESCAPING`].
pub const ENABLE_OUTPUT_ESCAPING: &str = "javax.xml.transform.enable-output-escaping";

/// Decides which elements are written at all.
///
/// A rejected element is skipped together with everything inside it. A
/// closure `Fn(&XmlData, Node, usize) -> bool` works as a filter.
pub trait ElementFilter: Send + Sync {
    /// Whether to write `element`, found at `depth` (the element passed to
    /// the outputter is at depth 0).
    fn accept(&self, data: &XmlData, element: Node, depth: usize) -> bool;
}

impl<F> ElementFilter for F
where
    F: Fn(&XmlData, Node, usize) -> bool + Send + Sync,
{
    fn accept(&self, data: &XmlData, element: Node, depth: usize) -> bool {
        self(data, element, depth)
    }
}

/// The filter used when none is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ElementFilter for AcceptAll {
    fn accept(&self, _data: &XmlData, _element: Node, _depth: usize) -> bool {
        true
    }
}

// a piece of character data inside a text run
#[derive(Debug, Clone, Copy)]
enum Fragment<'a> {
    Text(&'a str),
    CData(&'a str),
    EntityRef(&'a str),
}

impl<'a> Fragment<'a> {
    fn new(value: &'a Value) -> Result<Self, Error> {
        match value {
            Value::Text(text) => Ok(Fragment::Text(text.get())),
            Value::CData(text) => Ok(Fragment::CData(text.get())),
            Value::EntityRef(entity) => Ok(Fragment::EntityRef(entity.name())),
            Value::Document
            | Value::Element(_)
            | Value::Comment(_)
            | Value::ProcessingInstruction(_)
            | Value::DocType(_) => Err(Error::UnexpectedContent(value.value_type())),
        }
    }

    // an entity reference is written as `&name;` so it is never empty and
    // never starts or ends with whitespace
    fn is_empty(&self) -> bool {
        match self {
            Fragment::Text(text) | Fragment::CData(text) => text.is_empty(),
            Fragment::EntityRef(_) => false,
        }
    }

    fn starts_with_whitespace(&self) -> bool {
        match self {
            Fragment::Text(text) | Fragment::CData(text) => starts_with_whitespace(text),
            Fragment::EntityRef(_) => false,
        }
    }

    fn ends_with_whitespace(&self) -> bool {
        match self {
            Fragment::Text(text) | Fragment::CData(text) => ends_with_whitespace(text),
            Fragment::EntityRef(_) => false,
        }
    }
}

/// Writes XML trees as text.
///
/// The output follows a fixed set of legacy rules so files written by
/// earlier versions stay byte-for-byte stable:
///
/// - Elements without significant content are always self-closed as
///   `<name />`.
/// - Content that is only character data is written inline; anything else
///   is written one item per line, indented.
/// - When a declaration is written it is always followed by the line
///   separator, and a document always ends with one.
///
/// On the way out, absolute paths can be collapsed into macros (see
/// [`PathMacroMap`]) and names that look like they hold secrets can be
/// reported (see [`SensitiveDataGuard`]).
///
/// An outputter is immutable once built and can be shared between threads.
///
/// ```rust
/// use persist_xml::{Format, XmlData, XmlOutputter};
///
/// let mut data = XmlData::new();
/// let doc = data.new_document();
/// let name_a = data.add_name("a");
/// let name_b = data.add_name("b");
/// let a = data.new_element(name_a);
/// data.append(doc, a)?;
/// data.append_element(a, name_b)?;
///
/// let outputter = XmlOutputter::new(Format::default())?;
/// assert_eq!(
///     outputter.document_to_string(&data, doc)?,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b />\n</a>\n\n"
/// );
/// # Ok::<(), persist_xml::Error>(())
/// ```
pub struct XmlOutputter {
    format: Format,
    element_filter: Box<dyn ElementFilter>,
    path_macros: PathMacroMap,
    macro_filter: Box<dyn MacroFilter>,
    case_sensitive_paths: bool,
    guard: Box<dyn SensitiveDataGuard>,
}

impl XmlOutputter {
    /// Create an outputter for a format.
    ///
    /// Fails if the format's encoding label is empty or contains `"`.
    pub fn new(format: Format) -> Result<Self, Error> {
        format.validate()?;
        Ok(XmlOutputter {
            format,
            element_filter: Box::new(AcceptAll),
            path_macros: PathMacroMap::new(),
            macro_filter: Box::new(NoMacroFilter),
            case_sensitive_paths: true,
            guard: Box::new(NoGuard),
        })
    }

    /// The format in use.
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Only write elements the filter accepts.
    pub fn with_element_filter<F: ElementFilter + 'static>(mut self, filter: F) -> Self {
        self.element_filter = Box::new(filter);
        self
    }

    /// Collapse paths in attribute values and text using these rules.
    pub fn with_path_macros(mut self, path_macros: PathMacroMap) -> Self {
        self.path_macros = path_macros;
        self
    }

    /// Decide per attribute whether and how paths are collapsed.
    pub fn with_macro_filter<F: MacroFilter + 'static>(mut self, filter: F) -> Self {
        self.macro_filter = Box::new(filter);
        self
    }

    /// Whether the host file system is case-sensitive. Path matching folds
    /// case when it isn't. Defaults to `true`.
    pub fn with_case_sensitive_paths(mut self, case_sensitive_paths: bool) -> Self {
        self.case_sensitive_paths = case_sensitive_paths;
        self
    }

    /// Check element and attribute names with this guard.
    pub fn with_sensitive_data_guard<G: SensitiveDataGuard + 'static>(mut self, guard: G) -> Self {
        self.guard = Box::new(guard);
        self
    }

    /// Write a document: declaration, top-level content, and a final line
    /// separator. The sink is flushed at the end.
    pub fn output_document<W: Write>(
        &self,
        data: &XmlData,
        document: Node,
        w: &mut W,
    ) -> Result<(), Error> {
        if !matches!(data.value(document), Value::Document) {
            return Err(Error::NotDocument(document));
        }
        self.write_declaration(w)?;
        for node in data.children(document) {
            match data.value(node) {
                Value::Element(element) => self.write_element(data, w, node, element, 0)?,
                Value::Comment(comment) => self.write_comment(w, comment)?,
                Value::ProcessingInstruction(pi) => self.write_processing_instruction(w, pi)?,
                Value::DocType(doctype) => {
                    self.write_doctype(w, doctype)?;
                    self.write_line_separator(w)?;
                }
                value @ (Value::Document
                | Value::Text(_)
                | Value::CData(_)
                | Value::EntityRef(_)) => {
                    return Err(Error::UnexpectedContent(value.value_type()));
                }
            }
            self.newline(w)?;
            self.indent(w, 0)?;
        }
        self.write_line_separator(w)?;
        w.flush()?;
        Ok(())
    }

    /// Write a single element and its content, at depth 0.
    ///
    /// No declaration or trailing line separator is written and the sink is
    /// not flushed.
    pub fn output_element<W: Write>(
        &self,
        data: &XmlData,
        element: Node,
        w: &mut W,
    ) -> Result<(), Error> {
        let value = data.element(element).ok_or(Error::NotElement(element))?;
        self.write_element(data, w, element, value, 0)
    }

    /// Write a document to a string.
    pub fn document_to_string(&self, data: &XmlData, document: Node) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.output_document(data, document, &mut buf)?;
        into_string(buf)
    }

    /// Write a single element to a string.
    pub fn element_to_string(&self, data: &XmlData, element: Node) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.output_element(data, element, &mut buf)?;
        into_string(buf)
    }

    fn write_declaration<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        if self.format.omit_declaration {
            return Ok(());
        }
        w.write_all(b"<?xml version=\"1.0\"")?;
        if !self.format.omit_encoding {
            write!(w, " encoding=\"{}\"", self.format.encoding)?;
        }
        w.write_all(b"?>")?;
        // even when nothing else gets a line of its own
        self.write_line_separator(w)
    }

    fn write_doctype<W: Write>(&self, w: &mut W, doctype: &DocType) -> Result<(), Error> {
        write!(w, "<!DOCTYPE {}", doctype.element_name)?;
        if let Some(public_id) = &doctype.public_id {
            write!(w, " PUBLIC \"{}\"", public_id)?;
        }
        if let Some(system_id) = &doctype.system_id {
            if doctype.public_id.is_none() {
                w.write_all(b" SYSTEM")?;
            }
            write!(w, " \"{}\"", system_id)?;
        }
        if let Some(internal_subset) = doctype.internal_subset.as_deref() {
            if !internal_subset.is_empty() {
                w.write_all(b" [")?;
                self.write_line_separator(w)?;
                w.write_all(internal_subset.as_bytes())?;
                w.write_all(b"]")?;
            }
        }
        w.write_all(b">")?;
        Ok(())
    }

    fn write_element<W: Write>(
        &self,
        data: &XmlData,
        w: &mut W,
        node: Node,
        element: &Element,
        depth: usize,
    ) -> Result<(), Error> {
        if !self.element_filter.accept(data, node, depth) {
            log::trace!(
                "element filter skipped {} at depth {}",
                data.qualified_name(element.name()),
                depth
            );
            return Ok(());
        }
        let name = data.qualified_name(element.name());
        write!(w, "<{}", name)?;
        self.write_attributes(data, w, node, element, &name)?;

        let content = data.children(node).collect::<Vec<_>>();
        match layout(data, &content, self.format.text_mode) {
            Layout::Empty => {
                w.write_all(b" />")?;
            }
            Layout::Mixed(start) => {
                w.write_all(b">")?;
                self.newline(w)?;
                self.write_content_range(data, w, &content, start, depth + 1)?;
                self.newline(w)?;
                self.indent(w, depth)?;
                write!(w, "</{}>", name)?;
            }
            Layout::Text(start) => {
                w.write_all(b">")?;
                self.write_text_range(data, w, &content[start..])?;
                write!(w, "</{}>", name)?;
            }
        }
        self.check_element(data, node, &name);
        Ok(())
    }

    fn write_attributes<W: Write>(
        &self,
        data: &XmlData,
        w: &mut W,
        node: Node,
        element: &Element,
        element_name: &str,
    ) -> Result<(), Error> {
        for attribute in element.attributes() {
            let attribute_name = data.qualified_name(attribute.name());
            write!(w, " {}=\"", attribute_name)?;
            let value = self.attribute_value(data, node, attribute);
            if self.guard.enabled() {
                self.guard
                    .flag(NodeKind::Attribute, &attribute_name, Some(element_name));
            }
            w.write_all(serialize_attribute(value).as_bytes())?;
            w.write_all(b"\"")?;
        }
        Ok(())
    }

    fn attribute_value<'a>(
        &self,
        data: &'a XmlData,
        node: Node,
        attribute: &'a Attribute,
    ) -> Cow<'a, str> {
        let value = attribute.value();
        if self.path_macros.is_empty() {
            return Cow::Borrowed(value);
        }
        let attribute_ref = AttributeRef {
            data,
            element: node,
            attribute,
        };
        if self.macro_filter.skip_path_macros(&attribute_ref) {
            Cow::Borrowed(value)
        } else if self.macro_filter.recurse_path_macros(&attribute_ref) {
            self.path_macros
                .substitute_recursively(value, self.case_sensitive_paths)
        } else {
            self.path_macros
                .substitute(value, self.case_sensitive_paths)
        }
    }

    // runs after the element is written, so attribute reports come first
    fn check_element(&self, data: &XmlData, node: Node, name: &str) {
        if !self.guard.enabled() {
            return;
        }
        let parent = data
            .parent_element(node)
            .and_then(|parent| data.element(parent))
            .map(|parent| data.qualified_name(parent.name()));
        self.guard.flag(NodeKind::Element, name, parent.as_deref());

        // the generic `<option name="..." value="..."/>` idiom
        let option_name = data.attribute(node, "name");
        let has_value = data.attribute(node, "value").is_some();
        if let (Some(option_name), true) = (option_name, has_value) {
            let reported = format!("{}{}", OPTION_NAME_PREFIX, option_name);
            self.guard.flag(NodeKind::Element, &reported, Some(name));
        }
    }

    fn write_content_range<W: Write>(
        &self,
        data: &XmlData,
        w: &mut W,
        content: &[Node],
        start: usize,
        depth: usize,
    ) -> Result<(), Error> {
        for (i, segment) in gen_segments(data, content, start, self.format.text_mode).enumerate() {
            if i > 0 {
                self.newline(w)?;
            }
            self.indent(w, depth)?;
            match segment {
                Segment::Text(range) => self.write_text_range(data, w, &content[range])?,
                Segment::Node(node) => match data.value(node) {
                    Value::Element(element) => self.write_element(data, w, node, element, depth)?,
                    Value::Comment(comment) => self.write_comment(w, comment)?,
                    Value::ProcessingInstruction(pi) => {
                        self.write_processing_instruction(w, pi)?
                    }
                    value @ (Value::Document
                    | Value::DocType(_)
                    | Value::Text(_)
                    | Value::CData(_)
                    | Value::EntityRef(_)) => {
                        return Err(Error::UnexpectedContent(value.value_type()));
                    }
                },
            }
        }
        Ok(())
    }

    // `content` must hold character data only
    fn write_text_range<W: Write>(
        &self,
        data: &XmlData,
        w: &mut W,
        content: &[Node],
    ) -> Result<(), Error> {
        let text_mode = self.format.text_mode;
        let start = skip_leading_white(data, content, 0, text_mode);
        if start >= content.len() {
            return Ok(());
        }
        let end = skip_trailing_white(data, content, start, content.len(), text_mode);

        let mut previous: Option<Fragment> = None;
        for node in &content[start..end] {
            let fragment = Fragment::new(data.value(*node))?;
            if fragment.is_empty() {
                continue;
            }
            // words separated only by dropped whitespace must not be glued
            // together
            if let Some(previous) = previous {
                if text_mode.pads_fragments()
                    && (previous.ends_with_whitespace() || fragment.starts_with_whitespace())
                {
                    w.write_all(b" ")?;
                }
            }
            self.write_fragment(w, fragment)?;
            previous = Some(fragment);
        }
        Ok(())
    }

    fn write_fragment<W: Write>(&self, w: &mut W, fragment: Fragment) -> Result<(), Error> {
        let text_mode = self.format.text_mode;
        match fragment {
            Fragment::Text(text) => {
                let text = process(text, text_mode);
                let text = self.path_macros.substitute(&text, self.case_sensitive_paths);
                w.write_all(serialize_text(text).as_bytes())?;
            }
            Fragment::CData(text) => {
                write!(w, "<![CDATA[{}]]>", process(text, text_mode))?;
            }
            Fragment::EntityRef(name) => {
                write!(w, "&{};", name)?;
            }
        }
        Ok(())
    }

    fn write_comment<W: Write>(&self, w: &mut W, comment: &Comment) -> Result<(), Error> {
        write!(w, "<!--{}-->", comment.get())?;
        Ok(())
    }

    fn write_processing_instruction<W: Write>(
        &self,
        w: &mut W,
        pi: &ProcessingInstruction,
    ) -> Result<(), Error> {
        let target = pi.target();
        if !self.format.ignore_escaping_pis
            && (target == DISABLE_OUTPUT_ESCAPING || target == ENABLE_OUTPUT_ESCAPING)
        {
            log::debug!("dropped output escaping instruction {}", target);
            return Ok(());
        }
        match pi.data() {
            Some(data) => write!(w, "<?{} {}?>", target, data)?,
            None => write!(w, "<?{}?>", target)?,
        }
        Ok(())
    }

    fn write_line_separator<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        if let Some(line_separator) = &self.format.line_separator {
            w.write_all(line_separator.as_bytes())?;
        }
        Ok(())
    }

    // only when pretty printing
    fn newline<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        if self.format.indent.is_some() {
            self.write_line_separator(w)?;
        }
        Ok(())
    }

    fn indent<W: Write>(&self, w: &mut W, depth: usize) -> Result<(), Error> {
        if let Some(indent) = &self.format.indent {
            if !indent.is_empty() {
                for _ in 0..depth {
                    w.write_all(indent.as_bytes())?;
                }
            }
        }
        Ok(())
    }
}

fn into_string(buf: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
