// Decides which part of an element's content is significant, and how it is
// laid out: not at all (self-closing), inline (only character data), or one
// item per line (mixed).

use std::ops::Range;

use genawaiter::rc::gen;
use genawaiter::yield_;

use crate::xmldata::{Node, XmlData};
use crate::xmlvalue::Value;

use super::text::is_all_whitespace;
use super::TextMode;

/// How the content of an element is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// No significant content; the element self-closes.
    Empty,
    /// Only character data from this index on; written inline.
    Text(usize),
    /// Something other than character data from this index on; written
    /// one item per line.
    Mixed(usize),
}

/// A unit of mixed content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// A run of character data nodes, as a range into the content.
    Text(Range<usize>),
    /// Any other single node.
    Node(Node),
}

// only text and CDATA can be insignificant; entity references never are
fn is_insignificant(data: &XmlData, node: Node) -> bool {
    match data.value(node) {
        Value::Text(text) | Value::CData(text) => is_all_whitespace(text.get()),
        _ => false,
    }
}

/// Index of the first node at or after `start` that isn't insignificant
/// whitespace.
pub(crate) fn skip_leading_white(
    data: &XmlData,
    content: &[Node],
    start: usize,
    text_mode: TextMode,
) -> usize {
    if !text_mode.skips_whitespace() {
        return start;
    }
    let mut index = start;
    while index < content.len() && is_insignificant(data, content[index]) {
        index += 1;
    }
    index
}

/// End of `start..end` once trailing insignificant whitespace is dropped.
/// Never goes below `start`.
pub(crate) fn skip_trailing_white(
    data: &XmlData,
    content: &[Node],
    start: usize,
    end: usize,
    text_mode: TextMode,
) -> usize {
    let mut index = end.min(content.len());
    if !text_mode.skips_whitespace() {
        return index;
    }
    while index > start && is_insignificant(data, content[index - 1]) {
        index -= 1;
    }
    index
}

/// Index of the first node at or after `start` that isn't character data.
pub(crate) fn next_non_text(data: &XmlData, content: &[Node], start: usize) -> usize {
    content[start.min(content.len())..]
        .iter()
        .position(|node| !data.value(*node).is_text_like())
        .map_or(content.len(), |position| position + start)
}

/// Classify the content of an element.
pub(crate) fn layout(data: &XmlData, content: &[Node], text_mode: TextMode) -> Layout {
    let start = skip_leading_white(data, content, 0, text_mode);
    if start >= content.len() {
        Layout::Empty
    } else if next_non_text(data, content, start) < content.len() {
        Layout::Mixed(start)
    } else {
        Layout::Text(start)
    }
}

/// Split mixed content into the units written on their own line.
///
/// Runs of character data become a single segment with leading
/// whitespace-only nodes removed; a run that is whitespace only produces
/// nothing.
pub(crate) fn gen_segments<'a>(
    data: &'a XmlData,
    content: &'a [Node],
    start: usize,
    text_mode: TextMode,
) -> impl Iterator<Item = Segment> + 'a {
    gen!({
        let mut index = start;
        while index < content.len() {
            let node = content[index];
            if data.value(node).is_text_like() {
                let first = skip_leading_white(data, content, index, text_mode);
                index = next_non_text(data, content, first);
                if first < index {
                    yield_!(Segment::Text(first..index));
                }
                continue;
            }
            yield_!(Segment::Node(node));
            index += 1;
        }
    })
    .into_iter()
}
