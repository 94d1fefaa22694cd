use std::borrow::Cow;

use super::TextMode;

/// XML whitespace: space, tab, carriage return and line feed.
#[inline]
pub(crate) fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Empty text counts as whitespace.
pub(crate) fn is_all_whitespace(text: &str) -> bool {
    text.chars().all(is_xml_whitespace)
}

pub(crate) fn starts_with_whitespace(text: &str) -> bool {
    text.starts_with(is_xml_whitespace)
}

pub(crate) fn ends_with_whitespace(text: &str) -> bool {
    text.ends_with(is_xml_whitespace)
}

pub(crate) fn trim(text: &str) -> &str {
    text.trim_matches(is_xml_whitespace)
}

/// Trim the ends and collapse every internal whitespace run to a single
/// space.
pub(crate) fn normalize(text: &str) -> Cow<str> {
    let trimmed = trim(text);
    let mut chars = trimmed.chars().peekable();
    // nothing to collapse if no whitespace char is ever followed by another
    // one or is anything but a plain space
    let mut needs_collapse = false;
    while let Some(c) = chars.next() {
        if is_xml_whitespace(c)
            && (c != ' ' || chars.peek().is_some_and(|next| is_xml_whitespace(*next)))
        {
            needs_collapse = true;
            break;
        }
    }
    if !needs_collapse {
        return Cow::Borrowed(trimmed);
    }
    let mut result = String::with_capacity(trimmed.len());
    let mut in_whitespace = false;
    for c in trimmed.chars() {
        if is_xml_whitespace(c) {
            if !in_whitespace {
                result.push(' ');
                in_whitespace = true;
            }
        } else {
            result.push(c);
            in_whitespace = false;
        }
    }
    Cow::Owned(result)
}

/// Apply the whitespace handling of a text mode to a single fragment.
pub(crate) fn process(text: &str, text_mode: TextMode) -> Cow<str> {
    match text_mode {
        TextMode::Normalize => normalize(text),
        TextMode::Trim => Cow::Borrowed(trim(text)),
        TextMode::Raw | TextMode::TrimFullWhite => Cow::Borrowed(text),
    }
}
