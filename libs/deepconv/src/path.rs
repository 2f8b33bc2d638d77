//! Conversion paths and the path-annotation mini-language.
//!
//! An annotation is a short string whose first character is the key
//! separator, e.g. `/sessionStatus/externalFieldTransfers/0/name`. Segments
//! that parse as integers become integer keys; all others are string keys.
//! As the empty string is a legal key, `/testing`, `/testing/` and
//! `//testing` are three distinct paths.
//!
//! Numeric-looking segments are *always* integer keys, even when the target
//! is a string-keyed mapping. Integer keys convert back to decimal strings, so
//! `/7` still reaches the `"7"` entry, but `/007` and `/+7` reach `"7"` as well.

use std::fmt;

use crate::key::Key;

/// The annotation value that hides a field from conversion.
pub const IGNORE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(Key),
    /// Never resolves to a location.
    Unreachable,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => k.fmt(f),
            Segment::Unreachable => f.write_str(IGNORE),
        }
    }
}

/// Ordered list of keys locating a value inside a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path: the handle itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Single always-unreachable segment.
    pub fn unreachable() -> Self {
        Self {
            segments: vec![Segment::Unreachable],
        }
    }

    /// Default path of a record field: its own name, depth 1.
    pub fn field(name: &str) -> Self {
        Self {
            segments: vec![Segment::Key(Key::Str(name.to_string()))],
        }
    }

    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            segments: keys.into_iter().map(Segment::Key).collect(),
        }
    }

    /// Parse a separator-first annotation.
    ///
    /// `"-"` yields [`Path::unreachable`]. The empty string yields the root
    /// path; record fields never get there because an empty annotation falls
    /// back to the field name.
    pub fn parse(tag: &str) -> Self {
        if tag == IGNORE {
            return Self::unreachable();
        }
        let mut chars = tag.chars();
        let Some(sep) = chars.next() else {
            return Self::root();
        };
        let segments = chars
            .as_str()
            .split(sep)
            .map(|raw| match raw.parse::<i64>() {
                Ok(i) => Segment::Key(Key::Int(i)),
                Err(_) => Segment::Key(Key::Str(raw.to_string())),
            })
            .collect();
        Self { segments }
    }

    /// Path of a record field: the annotation when present and non-empty,
    /// otherwise the field name.
    pub fn for_field(name: &str, annotation: Option<&str>) -> Self {
        match annotation {
            Some(tag) if !tag.is_empty() => Self::parse(tag),
            _ => Self::field(name),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_unreachable(&self) -> bool {
        self.segments.contains(&Segment::Unreachable)
    }

    pub fn push(&mut self, key: Key) {
        self.segments.push(Segment::Key(key));
    }
}

/// Render segments as a `/`-separated location, `/` alone for the root.
pub(crate) fn render(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.to_string());
    }
    out
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}
