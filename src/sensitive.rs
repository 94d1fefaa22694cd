//! Sensitive data checks.
//!
//! Settings should never store passwords or tokens in plain text. While
//! writing, every element and attribute name is run through a name
//! heuristic and suspicious names are reported to a [`Diagnostics`] sink.
//! The check is advisory only: it never changes what is written and never
//! fails the write.
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;

static SENSITIVE_FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)password|passwd|secret|credential")
        .expect("SENSITIVE_FRAGMENT is a valid static regex pattern")
});

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z]+[a-z0-9]*|[a-z0-9]+").expect("WORD is a valid static regex pattern")
});

/// Prefix of the name reported for a `name`/`value` option element.
pub(crate) const OPTION_NAME_PREFIX: &str = "@name=";

const SENSITIVE_WORDS: &[&str] = &["token", "key", "pwd", "apikey"];

// settings that talk about passwords without holding one
const KNOWN_SAFE_NAMES: &[&str] = &[
    "rememberPassword",
    "isRememberPasswordByDefault",
    "saveChangedPasswords",
    "showPassword",
    "passwordExpirationDays",
];

/// Whether a name looks like it holds a secret.
///
/// ```rust
/// use persist_xml::is_sensitive_name;
///
/// assert!(is_sensitive_name("password"));
/// assert!(is_sensitive_name("apiKey"));
/// assert!(is_sensitive_name("@name=githubToken"));
/// assert!(!is_sensitive_name("keymap"));
/// assert!(!is_sensitive_name("rememberPassword"));
/// ```
pub fn is_sensitive_name(name: &str) -> bool {
    let bare = name.strip_prefix(OPTION_NAME_PREFIX).unwrap_or(name);
    if KNOWN_SAFE_NAMES.contains(&bare) {
        return false;
    }
    if SENSITIVE_FRAGMENT.is_match(name) {
        return true;
    }
    WORD.find_iter(name).any(|word| {
        let word = word.as_str();
        is_sensitive_word(word) || split_acronym(word).is_some_and(|(acronym, rest)| {
            is_sensitive_word(acronym) || is_sensitive_word(rest)
        })
    })
}

fn is_sensitive_word(word: &str) -> bool {
    SENSITIVE_WORDS
        .iter()
        .any(|sensitive| word.eq_ignore_ascii_case(sensitive))
}

// `SSHKey` is matched as one word; split it into `SSH` and `Key`
fn split_acronym(word: &str) -> Option<(&str, &str)> {
    let capitals = word.bytes().take_while(u8::is_ascii_uppercase).count();
    if capitals < 2 || !word.as_bytes().get(capitals).is_some_and(u8::is_ascii_lowercase) {
        return None;
    }
    Some(word.split_at(capitals - 1))
}

/// The kind of node a sensitive name was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An element name, or the `name` of a `name`/`value` option element.
    Element,
    /// An attribute name.
    Attribute,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Element => write!(f, "Element"),
            NodeKind::Attribute => write!(f, "Attribute"),
        }
    }
}

/// A report about a name that probably holds sensitive data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What kind of node carries the name.
    pub kind: NodeKind,
    /// The offending name.
    pub name: String,
    /// The file being written, with the home directory shown as `~`.
    pub file: Option<String>,
    /// Qualified name of the element the node sits in.
    pub parent: Option<String>,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} probably contains sensitive information",
            self.kind, self.name
        )?;
        if let Some(file) = &self.file {
            write!(f, " (file: {})", file)?;
        }
        if let Some(parent) = &self.parent {
            write!(f, " (parent: {})", parent)?;
        }
        Ok(())
    }
}

/// Where diagnostics go.
pub trait Diagnostics: Send + Sync {
    /// Report a single diagnostic. Must not fail.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Reports diagnostics through the `log` facade at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        log::error!(target: "persist_xml::sensitive", "{}", diagnostic);
    }
}

/// The check the outputter runs for every element and attribute name.
pub trait SensitiveDataGuard: Send + Sync {
    /// Look at a name. `parent` is the qualified name of the enclosing
    /// element, if there is one.
    fn flag(&self, kind: NodeKind, name: &str, parent: Option<&str>);

    /// Whether this guard looks at names at all. When `false` the
    /// outputter skips building the names it would pass to `flag`.
    fn enabled(&self) -> bool {
        true
    }
}

/// A guard that never reports anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGuard;

impl SensitiveDataGuard for NoGuard {
    fn flag(&self, _kind: NodeKind, _name: &str, _parent: Option<&str>) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// A guard that reports names matching [`is_sensitive_name`].
#[derive(Clone)]
pub struct NameHeuristicGuard {
    diagnostics: Arc<dyn Diagnostics>,
    file: Option<String>,
}

impl NameHeuristicGuard {
    /// A guard reporting to the given sink.
    pub fn new(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            diagnostics,
            file: None,
        }
    }

    /// A guard reporting through the `log` facade.
    pub fn logging() -> Self {
        Self::new(Arc::new(LogDiagnostics))
    }

    /// Mention the file being written in every diagnostic.
    ///
    /// The user's home directory is shown as `~`.
    pub fn with_debug_path(self, path: &str) -> Self {
        let home = dirs::home_dir();
        self.with_debug_path_and_home(path, home.as_deref())
    }

    /// Like [`NameHeuristicGuard::with_debug_path`], with an explicit home
    /// directory.
    pub fn with_debug_path_and_home(mut self, path: &str, home: Option<&Path>) -> Self {
        self.file = Some(display_path(path, home));
        self
    }

    /// The file label used in diagnostics, if any.
    pub fn debug_path(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

impl SensitiveDataGuard for NameHeuristicGuard {
    fn flag(&self, kind: NodeKind, name: &str, parent: Option<&str>) {
        if !is_sensitive_name(name) {
            return;
        }
        self.diagnostics.report(&Diagnostic {
            kind,
            name: name.to_string(),
            file: self.file.clone(),
            parent: parent.map(|parent| parent.to_string()),
        });
    }
}

// forward slashes everywhere, home directory collapsed to `~`
fn display_path(path: &str, home: Option<&Path>) -> String {
    let path = path.replace('\\', "/");
    let Some(home) = home else {
        return path;
    };
    let home = home.to_string_lossy().replace('\\', "/");
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return path;
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{}", rest),
        _ => path,
    }
}
