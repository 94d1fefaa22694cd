use crate::error::Error;

/// How whitespace in character data is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TextMode {
    /// Write text exactly as it is.
    Raw,
    /// Drop whitespace-only text and trim the ends of other text.
    #[default]
    Trim,
    /// Like `Trim`, and also collapse internal whitespace runs to a single
    /// space.
    Normalize,
    /// Drop whitespace-only text, leave other text alone.
    TrimFullWhite,
}

impl TextMode {
    /// Whether text nodes that are entirely whitespace are insignificant.
    pub fn skips_whitespace(self) -> bool {
        !matches!(self, TextMode::Raw)
    }

    /// Whether adjacent text fragments may need a separating space, because
    /// their own whitespace was trimmed away.
    pub(crate) fn pads_fragments(self) -> bool {
        matches!(self, TextMode::Trim | TextMode::Normalize)
    }
}

/// Output policy.
///
/// Construct one using [`Format::default`] (or [`Format::pretty`]),
/// [`Format::compact`] or [`Format::raw`] and adjust fields as needed:
///
/// ```rust
/// use persist_xml::{Format, TextMode};
///
/// let format = Format {
///     text_mode: TextMode::Normalize,
///     omit_declaration: true,
///     ..Default::default()
/// };
/// assert_eq!(format.indent.as_deref(), Some("  "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Format {
    /// Whitespace handling for character data.
    pub text_mode: TextMode,
    /// Indentation unit. `None` disables all pretty printing.
    pub indent: Option<String>,
    /// Line separator. `None` means no line separators are written at all,
    /// not even after the declaration or at the end of a document.
    pub line_separator: Option<String>,
    /// Encoding label written in the declaration. Nothing is re-encoded;
    /// output is always UTF-8 text.
    pub encoding: String,
    /// Don't write the `<?xml ...?>` declaration.
    pub omit_declaration: bool,
    /// Don't write the `encoding` pseudo-attribute in the declaration.
    pub omit_encoding: bool,
    /// Write the processing instructions that toggle output escaping like
    /// any other, instead of dropping them.
    pub ignore_escaping_pis: bool,
}

impl Default for Format {
    fn default() -> Self {
        Format {
            text_mode: TextMode::Trim,
            indent: Some("  ".to_string()),
            line_separator: Some("\n".to_string()),
            encoding: "UTF-8".to_string(),
            omit_declaration: false,
            omit_encoding: false,
            ignore_escaping_pis: false,
        }
    }
}

impl Format {
    /// Two space indentation, trimmed text. This is the default.
    pub fn pretty() -> Self {
        Self::default()
    }

    /// No indentation, normalized text.
    pub fn compact() -> Self {
        Format {
            text_mode: TextMode::Normalize,
            indent: None,
            ..Default::default()
        }
    }

    /// No indentation, no line separators, text as-is.
    pub fn raw() -> Self {
        Format {
            text_mode: TextMode::Raw,
            indent: None,
            line_separator: None,
            ..Default::default()
        }
    }

    /// Set the text mode.
    pub fn with_text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = text_mode;
        self
    }

    /// Set the indentation unit.
    pub fn with_indent<S: Into<String>>(mut self, indent: Option<S>) -> Self {
        self.indent = indent.map(Into::into);
        self
    }

    /// Set the line separator.
    pub fn with_line_separator<S: Into<String>>(mut self, line_separator: Option<S>) -> Self {
        self.line_separator = line_separator.map(Into::into);
        self
    }

    /// Set the encoding label.
    pub fn with_encoding<S: Into<String>>(mut self, encoding: S) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set whether to omit the declaration.
    pub fn with_omit_declaration(mut self, omit_declaration: bool) -> Self {
        self.omit_declaration = omit_declaration;
        self
    }

    /// Set whether to omit the encoding in the declaration.
    pub fn with_omit_encoding(mut self, omit_encoding: bool) -> Self {
        self.omit_encoding = omit_encoding;
        self
    }

    /// Set whether escaping toggle processing instructions are written.
    pub fn with_ignore_escaping_pis(mut self, ignore_escaping_pis: bool) -> Self {
        self.ignore_escaping_pis = ignore_escaping_pis;
        self
    }

    /// Check that the format can be used.
    ///
    /// The encoding label is written as given, so any label is accepted as
    /// long as the declaration stays well-formed: it must not be empty and
    /// must not contain `"`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.encoding.is_empty() || self.encoding.contains('"') {
            return Err(Error::InvalidEncoding(self.encoding.clone()));
        }
        Ok(())
    }
}
