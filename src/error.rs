use crate::xmldata::Node;
use crate::xmlvalue::ValueType;

/// Errors raised while building a tree or writing it out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node is not an element.
    #[error("node is not an element: {0:?}")]
    NotElement(Node),
    /// The node is not a document node.
    #[error("node is not a document: {0:?}")]
    NotDocument(Node),
    /// A document can hold only a single document element.
    #[error("document already has a document element")]
    DuplicateDocumentElement,
    /// A document can hold only a single doctype.
    #[error("document already has a doctype")]
    DuplicateDocType,
    /// The document has no document element.
    #[error("document has no document element")]
    NoDocumentElement,
    /// The tree operation would produce a structure that cannot be written.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A content node that is not text, CDATA or an entity reference showed
    /// up where only character data is allowed.
    #[error("unexpected {0:?} in text content; only text, CDATA and entity references are allowed")]
    UnexpectedContent(ValueType),
    /// The encoding label would not fit in a declaration: it is empty or
    /// contains a `"`.
    #[error("invalid encoding label: {0:?}")]
    InvalidEncoding(String),
    /// The underlying tree refused the operation.
    #[error(transparent)]
    NodeError(#[from] indextree::NodeError),
    /// Writing to the sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
