use std::borrow::Cow;

use indextree::{Arena, NodeId};

use crate::name::{Name, NameId, NameLookup};
use crate::namespace::{Namespace, NamespaceId, NamespaceLookup};
use crate::xmlvalue::Value;

pub(crate) type XmlArena = Arena<Value>;

/// A node in the XML tree.
/// This is a lightweight value and can be copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// `XmlData` owns the XML trees the outputter writes.
///
/// It holds the nodes of one or more documents and fragments, together with
/// the interned names and namespaces they use. The outputter only ever reads
/// from it.
pub struct XmlData {
    pub(crate) arena: XmlArena,
    pub(crate) namespace_lookup: NamespaceLookup,
    pub(crate) name_lookup: NameLookup,
    pub(crate) no_namespace_id: NamespaceId,
}

impl XmlData {
    /// Create a new, empty `XmlData`.
    pub fn new() -> Self {
        let mut namespace_lookup = NamespaceLookup::new();
        let no_namespace_id =
            namespace_lookup.get_id_mut(Namespace::new(String::new(), String::new()));
        XmlData {
            arena: XmlArena::new(),
            namespace_lookup,
            name_lookup: NameLookup::new(),
            no_namespace_id,
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &XmlArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut XmlArena {
        &mut self.arena
    }

    /// The value of a node.
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        self.arena[node.0].get()
    }

    /// Mutable access to the value of a node.
    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        self.arena[node.0].get_mut()
    }

    /// Add a namespace, given its prefix and URI.
    ///
    /// Adding the same prefix and URI twice gives back the same id.
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) -> NamespaceId {
        self.namespace_lookup
            .get_id_mut(Namespace::new(prefix.to_string(), uri.to_string()))
    }

    /// The id used for names that are not in a namespace.
    pub fn no_namespace(&self) -> NamespaceId {
        self.no_namespace_id
    }

    /// Look up a namespace by id.
    pub fn namespace(&self, namespace_id: NamespaceId) -> &Namespace {
        self.namespace_lookup.get_value(namespace_id)
    }

    /// Add a name without a namespace.
    pub fn add_name(&mut self, local: &str) -> NameId {
        self.add_name_ns(local, self.no_namespace_id)
    }

    /// Add a name in a namespace.
    pub fn add_name_ns(&mut self, local: &str, namespace_id: NamespaceId) -> NameId {
        self.name_lookup
            .get_id_mut(Name::new(local.to_string(), namespace_id))
    }

    /// Look up a name without a namespace, if it was added before.
    pub fn name(&self, local: &str) -> Option<NameId> {
        self.name_lookup
            .get_id(&Name::new(local.to_string(), self.no_namespace_id))
    }

    /// The local part of a name.
    pub fn local_name_str(&self, name_id: NameId) -> &str {
        &self.name_lookup.get_value(name_id).local
    }

    /// The namespace of a name.
    pub fn namespace_for_name(&self, name_id: NameId) -> NamespaceId {
        self.name_lookup.get_value(name_id).namespace_id
    }

    /// The qualified name: `prefix:local`, or just `local` if the namespace
    /// prefix is empty.
    pub fn qualified_name(&self, name_id: NameId) -> Cow<str> {
        let name = self.name_lookup.get_value(name_id);
        let prefix = &self.namespace_lookup.get_value(name.namespace_id).prefix;
        if prefix.is_empty() {
            Cow::Borrowed(&name.local)
        } else {
            Cow::Owned(format!("{}:{}", prefix, name.local))
        }
    }
}

impl Default for XmlData {
    fn default() -> Self {
        Self::new()
    }
}
