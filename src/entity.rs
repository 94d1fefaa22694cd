use std::borrow::Cow;

// shared escaping loop; `entity` decides per character what to write instead
// of it, if anything. we hand back the borrowed input when nothing changed.
fn serialize_entities(content: Cow<str>, entity: impl Fn(char) -> Option<&'static str>) -> Cow<str> {
    let mut result = String::new();
    let mut entity_seen = false;
    for c in content.chars() {
        match entity(c) {
            Some(escaped) => {
                entity_seen = true;
                result.push_str(escaped)
            }
            None => result.push(c),
        }
    }

    if !entity_seen {
        content
    } else {
        result.into()
    }
}

/// Escape character data for element content: `&`, `<` and `>`.
pub(crate) fn serialize_text(content: Cow<str>) -> Cow<str> {
    serialize_entities(content, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape an attribute value.
///
/// Besides the text entities this escapes the double quote, and line ends and
/// tabs so they survive attribute value normalization when read back.
pub(crate) fn serialize_attribute(content: Cow<str>) -> Cow<str> {
    serialize_entities(content, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        '\t' => Some("&#9;"),
        _ => None,
    })
}
