//! YAML frontmatter codec for note files.
//!
//! Every note begins with a `---`-delimited YAML block. The codec is a pair of
//! pure functions over strings: [`encode`] produces the block from a typed
//! [`Frontmatter`], [`decode`] recovers one or reports absence. Decoding never
//! fails loudly: a missing or malformed block yields `None` and the store
//! derives defaults instead.
//!
//! Readers are order-independent: keys may appear in any order in the YAML
//! mapping, and unknown keys are ignored.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Typed frontmatter for a note file.
///
/// Parsing is all-or-nothing: either the whole block deserializes into this
/// struct, or [`decode`] returns `None`. No partially-typed mapping is ever
/// passed onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Note title
    #[serde(default)]
    pub title: String,

    /// Creation timestamp (defaults to now when the key is missing)
    #[serde(default = "now")]
    pub created: NaiveDateTime,

    /// Last-updated timestamp (defaults to now when the key is missing)
    #[serde(default = "now")]
    pub updated: NaiveDateTime,

    /// Tags in insertion order
    #[serde(default)]
    pub tags: Vec<String>,

    /// Calendar event link, present only for event-linked notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventBlock>,
}

/// The nested `event` mapping inside frontmatter of an event-linked note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBlock {
    /// Calendar provider's stable event id
    pub id: String,

    /// Event title at the time the note was created
    pub title: String,

    /// Event start timestamp
    pub date: NaiveDateTime,

    /// Calendar name
    pub calendar: String,

    /// Optional location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// All-day flag
    pub all_day: bool,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Frontmatter {
    /// Build frontmatter for a brand-new note, timestamped now.
    pub fn new(title: impl Into<String>, tags: Vec<String>, event: Option<EventBlock>) -> Self {
        let ts = now();
        Frontmatter {
            title: title.into(),
            created: ts,
            updated: ts,
            tags,
            event,
        }
    }
}

/// Serialize frontmatter into a complete `---`-delimited header block.
///
/// The output always ends with the closing marker and a newline, ready to have
/// the note body appended after it.
pub fn encode(fm: &Frontmatter) -> String {
    // serde_yaml cannot fail on this struct: all keys are strings and all
    // values are scalars, sequences, or one nested mapping.
    let yaml = serde_yaml::to_string(fm).unwrap_or_default();
    format!("---\n{}---\n", yaml)
}

/// Parse the frontmatter block from full note content, if one is present.
///
/// The block is recognized only when the content starts with `---`; its end is
/// the next occurrence of `---` searched from offset 3. Returns `None` when no
/// closing marker exists or the enclosed text is not a valid mapping.
pub fn decode(content: &str) -> Option<Frontmatter> {
    let (yaml, _) = split(content);
    serde_yaml::from_str(yaml?).ok()
}

/// Split note content into the raw YAML slice (if a block is present) and the
/// remaining body.
///
/// Used by the search engine to exclude the header from line scoring without
/// paying for a full parse.
pub fn split(content: &str) -> (Option<&str>, &str) {
    if let Some(rest) = content.strip_prefix("---") {
        if let Some(end) = rest.find("---") {
            return (Some(&rest[..end]), &rest[end + 3..]);
        }
    }
    (None, content)
}
