//! Writing XML trees as text.
//!
//! [`XmlOutputter`] writes documents and elements according to a [`Format`].
mod content;
mod format;
mod outputter;
mod text;

pub use format::{Format, TextMode};
pub use outputter::{
    AcceptAll, ElementFilter, XmlOutputter, DISABLE_OUTPUT_ESCAPING, ENABLE_OUTPUT_ESCAPING,
};
