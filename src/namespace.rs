use std::fmt::{Display, Formatter};

use crate::idmap::{IdIndex, IdMap};

/// Id uniquely identifying a namespace (prefix plus URI).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct NamespaceId(u32);

impl IdIndex<NamespaceId> for NamespaceId {
    fn to_id(index: usize) -> NamespaceId {
        NamespaceId(index as u32)
    }

    fn from_id(id: NamespaceId) -> usize {
        id.0 as usize
    }
}

/// A namespace as it is written: a prefix (possibly empty) and a URI.
///
/// The URI is never resolved; only the prefix takes part in rendering
/// qualified names.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Namespace {
    pub(crate) prefix: String,
    pub(crate) uri: String,
}

impl Namespace {
    pub(crate) fn new(prefix: String, uri: String) -> Self {
        Self { prefix, uri }
    }

    /// The namespace prefix. Empty for the default namespace.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The namespace URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.uri)
        } else {
            write!(f, "{}={}", self.prefix, self.uri)
        }
    }
}

pub(crate) type NamespaceLookup = IdMap<NamespaceId, Namespace>;
