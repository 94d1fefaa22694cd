#![forbid(unsafe_code)]

//! Write XML settings files the way they have always been written.
//!
//! `persist-xml` holds XML trees in an arena ([`XmlData`]) and writes them
//! with [`XmlOutputter`]. The output rules are fixed so that files written
//! by earlier tools stay byte-for-byte stable:
//!
//! - empty elements are written as `<name />`;
//! - whitespace in text is kept, trimmed or normalized depending on the
//!   [`TextMode`];
//! - absolute paths can be collapsed into macros such as `$PROJECT_DIR$`
//!   ([`PathMacroMap`]);
//! - names that look like they hold passwords or tokens can be reported
//!   ([`NameHeuristicGuard`]).
//!
//! ```rust
//! use persist_xml::{Format, PathMacroMap, XmlData, XmlOutputter};
//!
//! let mut data = XmlData::new();
//! let doc = data.new_document();
//! let component = data.add_name("component");
//! let option = data.add_name("option");
//! let name = data.add_name("name");
//! let value = data.add_name("value");
//!
//! let root = data.new_element(component);
//! data.append(doc, root)?;
//! let node = data.append_element(root, option)?;
//! data.set_attribute(node, name, "outputDir")?;
//! data.set_attribute(node, value, "/home/alice/project/out")?;
//!
//! let outputter = XmlOutputter::new(Format::default())?
//!     .with_path_macros(PathMacroMap::new().with("/home/alice/project", "$PROJECT_DIR$"));
//! assert_eq!(
//!     outputter.document_to_string(&data, doc)?,
//!     concat!(
//!         "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
//!         "<component>\n",
//!         "  <option name=\"outputDir\" value=\"$PROJECT_DIR$/out\" />\n",
//!         "</component>\n\n",
//!     )
//! );
//! # Ok::<(), persist_xml::Error>(())
//! ```

mod access;
mod creation;
mod entity;
mod error;
pub mod fixed;
mod idmap;
mod macros;
mod manipulation;
mod name;
mod namespace;
mod output;
mod sensitive;
mod xmldata;
mod xmlvalue;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

pub use error::Error;
pub use macros::{AttributeRef, MacroFilter, NoMacroFilter, PathMacro, PathMacroMap};
pub use name::NameId;
pub use namespace::{Namespace, NamespaceId};
pub use output::{
    AcceptAll, ElementFilter, Format, TextMode, XmlOutputter, DISABLE_OUTPUT_ESCAPING,
    ENABLE_OUTPUT_ESCAPING,
};
pub use sensitive::{
    is_sensitive_name, Diagnostic, Diagnostics, LogDiagnostics, NameHeuristicGuard, NoGuard,
    NodeKind, SensitiveDataGuard,
};
pub use xmldata::{Node, XmlData};
pub use xmlvalue::{
    Attribute, Comment, DocType, Element, EntityRef, ProcessingInstruction, Text, Value,
    ValueType,
};
