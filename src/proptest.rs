//! Proptest support
//!
//! Proptests allow you to test for *properties* of your code that must hold
//! for arbitrary data. This module helps you write a proptest by letting you
//! generate an arbitrary XML document, in the shape settings files take:
//! option elements, names that look sensitive, entity references and CDATA.
//!
//! This can be enabled by adding the `proptest` feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! persist-xml = { version = "0.4", features = ["proptest"] }
//! ```
//!
//! See the [`proptest`](https://docs.rs/proptest/latest/proptest/)
//! documentation for more information.

use ahash::HashSet;
use proptest::prelude::*;

use crate::fixed::{Content, Document, DocumentContent, Element, Name, ProcessingInstruction};
use crate::output::{DISABLE_OUTPUT_ESCAPING, ENABLE_OUTPUT_ESCAPING};
use crate::xmlvalue::DocType;

const ELEMENT_NAMES: &[&str] = &["a", "b", "option", "component", "password", "apiKey"];
const ATTRIBUTE_NAMES: &[&str] = &["name", "value", "q", "secret", "path"];
const NAMESPACES: &[(&str, &str)] = &[("", ""), ("x", "http://example.com/x")];
const PI_TARGETS: &[&str] = &["pi1", "pi2", DISABLE_OUTPUT_ESCAPING, ENABLE_OUTPUT_ESCAPING];
const ENTITY_NAMES: &[&str] = &["amp", "lt", "nbsp"];
const XML_STRING: &str = "[\t\n\r\u{20}-\u{D7FF}\u{E000}-\u{FFFD}]{0,16}";
const XML_STRING_WITHOUT_WHITESPACE: &str = "[\u{21}-\u{D7FF}\u{E000}-\u{FFFD}]{1,16}";

fn arb_name(names: &'static [&'static str]) -> impl Strategy<Value = Name> {
    (prop::sample::select(names), prop::sample::select(NAMESPACES)).prop_map(
        |(localname, (prefix, namespace))| Name {
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
            localname: localname.to_string(),
        },
    )
}

fn arb_attribute() -> impl Strategy<Value = (Name, String)> {
    (arb_name(ATTRIBUTE_NAMES), XML_STRING)
}

fn arb_comment() -> impl Strategy<Value = String> {
    XML_STRING.prop_filter("comment", |s| !s.contains('-'))
}

fn arb_processing_instruction() -> impl Strategy<Value = ProcessingInstruction> {
    (
        prop::sample::select(PI_TARGETS),
        prop::option::of(XML_STRING_WITHOUT_WHITESPACE),
    )
        .prop_map(|(target, content)| ProcessingInstruction {
            target: target.to_string(),
            content,
        })
}

fn arb_text(whitespace_in_text: bool) -> BoxedStrategy<String> {
    if whitespace_in_text {
        XML_STRING.boxed()
    } else {
        XML_STRING_WITHOUT_WHITESPACE.boxed()
    }
}

fn arb_content(whitespace_in_text: bool) -> impl Strategy<Value = Content> {
    let text = arb_text(whitespace_in_text);
    let leaf = prop_oneof![
        4 => text.clone().prop_map(Content::Text),
        1 => text.prop_map(Content::CData),
        1 => prop::sample::select(ENTITY_NAMES)
            .prop_map(|name| Content::EntityRef(name.to_string())),
        1 => arb_comment().prop_map(Content::Comment),
        1 => arb_processing_instruction().prop_map(Content::ProcessingInstruction),
    ];

    leaf.prop_recursive(
        6,   // levels deep
        128, // maximum size of 128 nodes
        8,   // up to 8 items per collection
        |inner| {
            (
                arb_name(ELEMENT_NAMES),
                prop::collection::vec(inner, 0..8),
                prop::collection::vec(arb_attribute(), 0..4),
            )
                .prop_map(|(name, children, attributes)| {
                    Content::Element(Element {
                        name,
                        attributes: unduplicate_attributes(attributes),
                        children,
                    })
                })
        },
    )
}

fn arb_element(whitespace_in_text: bool) -> impl Strategy<Value = Element> {
    (
        arb_name(ELEMENT_NAMES),
        prop::collection::vec(arb_content(whitespace_in_text), 0..6),
        prop::collection::vec(arb_attribute(), 0..4),
    )
        .prop_map(|(name, children, attributes)| Element {
            name,
            attributes: unduplicate_attributes(attributes),
            children,
        })
}

fn arb_doctype() -> impl Strategy<Value = DocType> {
    (
        prop::sample::select(ELEMENT_NAMES),
        prop::option::of("-//[A-Z]{1,8}//EN"),
        prop::option::of("[a-z]{1,8}\\.dtd"),
        prop::option::of("<!ENTITY [a-z]{1,4} \"[a-z]{0,4}\">"),
    )
        .prop_map(|(element_name, public_id, system_id, internal_subset)| DocType {
            element_name: element_name.to_string(),
            public_id,
            system_id,
            internal_subset,
        })
}

fn arb_document_content() -> impl Strategy<Value = Vec<DocumentContent>> {
    prop::collection::vec(
        prop_oneof![
            arb_comment().prop_map(DocumentContent::Comment),
            arb_processing_instruction().prop_map(DocumentContent::ProcessingInstruction),
        ],
        0..4,
    )
}

// attributes are keyed by name; keep the first of each
fn unduplicate_attributes(attributes: Vec<(Name, String)>) -> Vec<(Name, String)> {
    let mut seen = HashSet::default();
    attributes
        .into_iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .collect()
}

/// Generate a random XML document.
///
/// This produces a value that can be turned into nodes using its `build`
/// method.
///
/// Example:
///
/// ```notrust
/// use persist_xml::proptest::arb_document;
/// use persist_xml::{Format, XmlData, XmlOutputter};
///
/// proptest! {
///   #[test]
///   fn test_arb_document_can_be_written(document in arb_document()) {
///     let mut data = XmlData::new();
///     let node = document.build(&mut data).unwrap();
///     let outputter = XmlOutputter::new(Format::default()).unwrap();
///     prop_assert!(outputter.document_to_string(&data, node).is_ok());
///   }
/// }
/// ```
pub fn arb_document() -> BoxedStrategy<Document> {
    arb_document_with_config(Config {
        outside_content: true,
        whitespace_in_text: true,
    })
}

/// Configure the generated documents
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Can generate a doctype, and comments and processing instructions
    /// outside the document element
    pub outside_content: bool,
    /// Text and CDATA may contain whitespace
    pub whitespace_in_text: bool,
}

/// Generate a random XML document, with configuration.
pub fn arb_document_with_config(config: Config) -> BoxedStrategy<Document> {
    let element = arb_element(config.whitespace_in_text);
    if config.outside_content {
        (
            prop::option::of(arb_doctype()),
            arb_document_content(),
            element,
            arb_document_content(),
        )
            .prop_map(|(doctype, before, document_element, after)| Document {
                doctype,
                before,
                document_element,
                after,
            })
            .boxed()
    } else {
        element
            .prop_map(|document_element| Document {
                doctype: None,
                before: vec![],
                document_element,
                after: vec![],
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::output::{Format, TextMode, XmlOutputter};
    use crate::sensitive::{Diagnostic, Diagnostics, NameHeuristicGuard};
    use crate::xmldata::XmlData;

    #[derive(Default)]
    struct Count(AtomicUsize);

    impl Diagnostics for Count {
        fn report(&self, _diagnostic: &Diagnostic) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn render(document: &Document, outputter: &XmlOutputter) -> String {
        let mut data = XmlData::new();
        let node = document.build(&mut data).unwrap();
        outputter.document_to_string(&data, node).unwrap()
    }

    proptest! {
        #[test]
        fn test_output_is_deterministic(document in arb_document()) {
            let outputter = XmlOutputter::new(Format::default()).unwrap();
            prop_assert_eq!(render(&document, &outputter), render(&document, &outputter));
        }

        #[test]
        fn test_document_is_framed(document in arb_document()) {
            let outputter = XmlOutputter::new(Format::default()).unwrap();
            let output = render(&document, &outputter);
            prop_assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
            prop_assert!(output.ends_with('\n'));
        }

        #[test]
        fn test_guard_does_not_change_output(document in arb_document()) {
            let count = Arc::new(Count::default());
            let guarded = XmlOutputter::new(Format::default())
                .unwrap()
                .with_sensitive_data_guard(NameHeuristicGuard::new(count.clone()));
            let unguarded = XmlOutputter::new(Format::default()).unwrap();
            prop_assert_eq!(render(&document, &guarded), render(&document, &unguarded));
        }

        #[test]
        fn test_text_modes_agree_without_whitespace(
            document in arb_document_with_config(Config::default())
        ) {
            let render_with = |text_mode| {
                let outputter =
                    XmlOutputter::new(Format::default().with_text_mode(text_mode)).unwrap();
                render(&document, &outputter)
            };
            let trimmed = render_with(TextMode::Trim);
            prop_assert_eq!(&trimmed, &render_with(TextMode::Raw));
            prop_assert_eq!(&trimmed, &render_with(TextMode::Normalize));
            prop_assert_eq!(&trimmed, &render_with(TextMode::TrimFullWhite));
        }
    }
}
