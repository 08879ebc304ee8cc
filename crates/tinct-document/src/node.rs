//! Node storage for the document tree.
//!
//! Nodes live in an arena owned by [`Document`](crate::Document) and are addressed by
//! [`NodeId`]. A node is either an element (tag, attributes, inline style) or a text run.

use std::fmt;

/// Handle to a node in a [`Document`](crate::Document).
///
/// Ids are never reused: a removed node keeps its id and can be re-inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Distinguishes element nodes from text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A tagged container.
    Element,
    /// A run of character data.
    Text,
}

/// Element payload: tag name, attributes in insertion order, inline style declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes other than `style`, in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Inline style declarations, in insertion order.
    pub style: Vec<(String, String)>,
}

impl ElementData {
    /// Creates an element payload with no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Returns the value of a style property.
    pub fn style_property(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a style property, replacing an existing value in place.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        match self.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.style.push((property.to_string(), value.to_string())),
        }
    }

    /// Returns the whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    /// Serializes the style declarations as a CSS declaration block.
    pub fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// An element.
    Element(ElementData),
    /// A text run.
    Text(String),
}

impl NodeData {
    /// Returns the kind of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
        }
    }
}

/// Arena slot: payload plus tree links.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// Node payload.
    pub(crate) data: NodeData,
    /// Parent node, `None` when detached or for the root.
    pub(crate) parent: Option<NodeId>,
    /// Children in document order. Always empty for text nodes.
    pub(crate) children: Vec<NodeId>,
}

impl Slot {
    /// Creates a detached slot.
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}
