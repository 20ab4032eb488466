//! Node storage for [`Document`](super::Document).
//!
//! Nodes live in a flat arena and reference each other by index, so ids
//! stay valid for the life of the document and tree edits never move
//! existing nodes.

use smallvec::SmallVec;

/// Handle to a node inside a [`Document`](super::Document).
///
/// Ids are only meaningful for the document that issued them; they are
/// never reused, so holding one across tree edits is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// What a node is: an element, a run of text, or a comment.
///
/// Comments are carried so that serializing a parsed document does not
/// silently drop them; the localization pipeline never touches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String, attributes: Attributes },
    Text { value: String },
    Comment { text: String },
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) kind: NodeKind,
}

impl NodeData {
    pub(crate) fn element(tag: String, attributes: Attributes) -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            kind: NodeKind::Element { tag, attributes },
        }
    }

    pub(crate) fn text(value: String) -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            kind: NodeKind::Text { value },
        }
    }

    pub(crate) fn comment(text: String) -> Self {
        Self {
            parent: None,
            children: SmallVec::new(),
            kind: NodeKind::Comment { text },
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// An element's attributes, in source order.
///
/// Lookup is linear; real-world elements carry a handful of attributes at
/// most, so a vector beats a map here. Names compare ASCII
/// case-insensitively, matching how HTML treats them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets an attribute, replacing any existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some((_, v)) => *v = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}
