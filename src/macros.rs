//! Path macro collapsing.
//!
//! Settings files should be portable between machines, so absolute paths in
//! them are written relative to well-known roots: `/home/user/project/src`
//! becomes `$PROJECT_DIR$/src`. Which roots exist and in which order they
//! are tried is up to the caller; this module only applies the rules.
use std::borrow::Cow;

use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::Attribute;

/// A single substitution rule: a path and the placeholder that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMacro {
    path: String,
    placeholder: String,
}

impl PathMacro {
    /// The path this rule collapses.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The placeholder written instead of the path.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    fn replace_prefix(&self, text: &str, case_sensitive: bool) -> Option<String> {
        let path = self.path.as_str();
        if path.is_empty() || !starts_with(text, path, case_sensitive) {
            return None;
        }
        // only complete path segments count
        let rest = &text[path.len()..];
        if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('!')) {
            return None;
        }
        Some(format!("{}{}", self.placeholder, rest))
    }

    fn replace_all(&self, text: &str, case_sensitive: bool) -> Option<String> {
        let path = self.path.as_str();
        if path.is_empty() || text.len() < path.len() {
            return None;
        }
        let mut out: Option<String> = None;
        let mut copied = 0;
        let mut from = 0;
        while let Some(start) = find_from(text, path, from, case_sensitive) {
            let end = start + path.len();
            if is_bounded(text, start, end) {
                let out = out.get_or_insert_with(|| String::with_capacity(text.len()));
                out.push_str(&text[copied..start]);
                out.push_str(&self.placeholder);
                copied = end;
            }
            from = end;
        }
        out.map(|mut out| {
            out.push_str(&text[copied..]);
            out
        })
    }
}

// an occurrence inside a longer value must not be glued to a preceding word
// and must end where a path segment ends
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let rest = &text[end..];
    let bounded_after = rest.is_empty()
        || rest.starts_with(|c| matches!(c, '/' | '"' | ' '))
        || rest.starts_with("!/");
    let bounded_before = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    bounded_after && bounded_before
}

fn starts_with(text: &str, path: &str, case_sensitive: bool) -> bool {
    match text.get(..path.len()) {
        Some(head) if case_sensitive => head == path,
        Some(head) => head.eq_ignore_ascii_case(path),
        None => false,
    }
}

fn find_from(text: &str, path: &str, from: usize, case_sensitive: bool) -> Option<usize> {
    if case_sensitive {
        return text.get(from..)?.find(path).map(|index| index + from);
    }
    let last = text.len().checked_sub(path.len())?;
    (from..=last).find(|&index| {
        text.get(index..index + path.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(path))
    })
}

/// An ordered list of path substitution rules.
///
/// Rules are tried in the order they were added, each one on the result of
/// the previous one, so callers usually add longer paths first. Case folding
/// (ASCII only) is used when the host file system is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMacroMap {
    rules: Vec<PathMacro>,
}

impl PathMacroMap {
    /// An empty map; substitution leaves all text alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule at the end of the list.
    pub fn add<P: Into<String>, M: Into<String>>(&mut self, path: P, placeholder: M) {
        self.rules.push(PathMacro {
            path: path.into(),
            placeholder: placeholder.into(),
        });
    }

    /// Chainable version of [`PathMacroMap::add`].
    pub fn with<P: Into<String>, M: Into<String>>(mut self, path: P, placeholder: M) -> Self {
        self.add(path, placeholder);
        self
    }

    /// The rules, in the order they are applied.
    pub fn rules(&self) -> &[PathMacro] {
        &self.rules
    }

    /// Whether there are no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Collapse a path at the start of `text`.
    ///
    /// ```rust
    /// use persist_xml::PathMacroMap;
    ///
    /// let map = PathMacroMap::new().with("/home/user/project", "$PROJECT_DIR$");
    /// assert_eq!(map.substitute("/home/user/project/src", true), "$PROJECT_DIR$/src");
    /// assert_eq!(map.substitute("/home/user/project2", true), "/home/user/project2");
    /// ```
    pub fn substitute<'a>(&self, text: &'a str, case_sensitive: bool) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);
        for rule in &self.rules {
            if let Some(replaced) = rule.replace_prefix(&result, case_sensitive) {
                result = Cow::Owned(replaced);
            }
        }
        result
    }

    /// Collapse every occurrence of a mapped path in `text`.
    ///
    /// This is meant for values that embed paths, like command lines.
    pub fn substitute_recursively<'a>(&self, text: &'a str, case_sensitive: bool) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);
        for rule in &self.rules {
            if let Some(replaced) = rule.replace_all(&result, case_sensitive) {
                result = Cow::Owned(replaced);
            }
        }
        result
    }
}

/// An attribute as seen by a [`MacroFilter`], together with the element
/// that carries it.
#[derive(Clone, Copy)]
pub struct AttributeRef<'a> {
    pub(crate) data: &'a XmlData,
    pub(crate) element: Node,
    pub(crate) attribute: &'a Attribute,
}

impl<'a> AttributeRef<'a> {
    /// The tree the attribute lives in.
    pub fn data(&self) -> &'a XmlData {
        self.data
    }

    /// The element carrying the attribute.
    pub fn element(&self) -> Node {
        self.element
    }

    /// The local name of the attribute.
    pub fn local_name(&self) -> &'a str {
        self.data.local_name_str(self.attribute.name())
    }

    /// The qualified name of the attribute.
    pub fn qualified_name(&self) -> Cow<'a, str> {
        self.data.qualified_name(self.attribute.name())
    }

    /// The raw attribute value.
    pub fn value(&self) -> &'a str {
        self.attribute.value()
    }

    /// The qualified name of the element carrying the attribute.
    pub fn element_name(&self) -> Cow<'a, str> {
        match self.data.element(self.element) {
            Some(element) => self.data.qualified_name(element.name()),
            None => Cow::Borrowed(""),
        }
    }
}

/// Decides which attributes take part in path macro collapsing.
///
/// A closure `Fn(&AttributeRef) -> bool` is a filter that exempts an
/// attribute when it returns `true`.
pub trait MacroFilter: Send + Sync {
    /// Leave this attribute's value exactly as it is.
    fn skip_path_macros(&self, attribute: &AttributeRef) -> bool;

    /// Collapse paths anywhere in the value, not only at its start.
    fn recurse_path_macros(&self, _attribute: &AttributeRef) -> bool {
        false
    }
}

impl<F> MacroFilter for F
where
    F: Fn(&AttributeRef) -> bool + Send + Sync,
{
    fn skip_path_macros(&self, attribute: &AttributeRef) -> bool {
        self(attribute)
    }
}

/// The filter used when none is given: nothing is exempt and substitution
/// only looks at the start of values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMacroFilter;

impl MacroFilter for NoMacroFilter {
    fn skip_path_macros(&self, _attribute: &AttributeRef) -> bool {
        false
    }
}
