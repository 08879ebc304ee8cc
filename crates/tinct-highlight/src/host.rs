//! The tree capabilities highlighting needs.
//!
//! [`HostTree`] is the seam between the highlighting core and a concrete document model.
//! [`tinct_document::Document`] implements it; tests and embedders can supply their own.

use std::{error::Error, fmt::Debug, hash::Hash};

use tinct_document::{Document, NodeId, ObserverId, SelectorError, TreeError};
use tracing::warn;

/// Property set on highlight wrappers.
pub const BACKGROUND_PROPERTY: &str = "background-color";

/// Tag of highlight wrappers.
pub const WRAPPER_TAG: &str = "span";

/// A mutable tree of element and text nodes with child-list observation.
pub trait HostTree {
    /// Node handle.
    type Node: Copy + Eq + Hash + Debug;
    /// Observation handle.
    type Watch: Copy + Eq + Debug;
    /// Error from a structure edit.
    type EditError: Error;
    /// Error from an invalid selector.
    type SelectorError: Error;

    /// Returns true if the node is an element.
    fn is_element(&self, node: Self::Node) -> bool;

    /// Returns the character data of a text node, `None` for elements.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Returns the parent of a node if the parent is an element.
    fn parent_element(&self, node: Self::Node) -> Option<Self::Node>;

    /// Returns true if `node` is `ancestor` or inside it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    /// Returns true if the node is attached under the document root.
    fn is_connected(&self, node: Self::Node) -> bool;

    /// Returns every text node under `root` in document order, `root` included.
    fn text_nodes(&self, root: Self::Node) -> Vec<Self::Node>;

    /// Creates a detached text node.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Creates a detached wrapper holding `text` with the given background color.
    ///
    /// The wrapper carries no attribute other than its style.
    fn create_wrapper(&mut self, text: &str, color: &str) -> Self::Node;

    /// Replaces `node` with `replacements` at the same position.
    fn replace_with(
        &mut self,
        node: Self::Node,
        replacements: &[Self::Node],
    ) -> Result<(), Self::EditError>;

    /// Replaces an element with its children, returning them.
    fn unwrap(&mut self, node: Self::Node) -> Result<Vec<Self::Node>, Self::EditError>;

    /// Merges runs of adjacent text nodes drawn from `nodes`. Other text is left as it is.
    fn merge_text(&mut self, nodes: &[Self::Node]);

    /// Sets an attribute on an element.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Finds the first element matching a selector.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, Self::SelectorError>;

    /// Starts observing child-list changes in the subtree of `root`.
    fn observe(&mut self, root: Self::Node) -> Self::Watch;

    /// Stops an observation, discarding undelivered changes.
    fn disconnect(&mut self, watch: Self::Watch);

    /// Returns true if changes are waiting for delivery.
    fn has_pending(&self, watch: Self::Watch) -> bool;

    /// Drains waiting changes, returning the added nodes in delivery order.
    fn take_added(&mut self, watch: Self::Watch) -> Vec<Self::Node>;
}

impl HostTree for Document {
    type Node = NodeId;
    type Watch = ObserverId;
    type EditError = TreeError;
    type SelectorError = SelectorError;

    fn is_element(&self, node: NodeId) -> bool {
        Self::is_element(self, node)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        Self::text(self, node)
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| Self::is_element(self, p))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        Self::contains(self, ancestor, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        Self::is_connected(self, node)
    }

    fn text_nodes(&self, root: NodeId) -> Vec<NodeId> {
        Self::text_nodes(self, root)
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        Self::create_text(self, text)
    }

    fn create_wrapper(&mut self, text: &str, color: &str) -> NodeId {
        let span = self.create_element(WRAPPER_TAG);
        self.set_style(span, BACKGROUND_PROPERTY, color);
        let inner = Self::create_text(self, text);
        // A fresh element always accepts a fresh child.
        if let Err(err) = self.append_child(span, inner) {
            warn!(%err, "failed to fill highlight wrapper");
        }
        span
    }

    fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> Result<(), TreeError> {
        Self::replace_with(self, node, replacements)
    }

    fn unwrap(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
        Self::unwrap(self, node)
    }

    fn merge_text(&mut self, nodes: &[NodeId]) {
        self.merge_text_runs(nodes);
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        Self::set_attribute(self, node, name, value);
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Self::query_selector(self, selector)
    }

    fn observe(&mut self, root: NodeId) -> ObserverId {
        Self::observe(self, root)
    }

    fn disconnect(&mut self, watch: ObserverId) {
        Self::disconnect(self, watch);
    }

    fn has_pending(&self, watch: ObserverId) -> bool {
        Self::has_pending(self, watch)
    }

    fn take_added(&mut self, watch: ObserverId) -> Vec<NodeId> {
        self.take_records(watch)
            .into_iter()
            .flat_map(|record| record.added_nodes)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_shape() {
        let mut doc = Document::new();
        let span = HostTree::create_wrapper(&mut doc, "hit", "red");
        let el = doc.element(span).unwrap();
        assert_eq!(el.tag, "span");
        assert!(el.attributes.is_empty());
        assert_eq!(doc.style(span, "background-color"), Some("red"));
        assert_eq!(doc.text_content(span), "hit");
    }

    #[test]
    fn test_parent_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = Document::create_text(&mut doc, "x");
        assert_eq!(HostTree::parent_element(&doc, text), None);
        doc.append_child(root, text).unwrap();
        assert_eq!(HostTree::parent_element(&doc, text), Some(root));
    }

    #[test]
    fn test_take_added_flattens_records() {
        let mut doc = Document::new();
        let root = doc.root();
        let watch = HostTree::observe(&mut doc, root);
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();
        doc.remove(a);

        assert!(HostTree::has_pending(&doc, watch));
        assert_eq!(doc.take_added(watch), vec![a, b]);
        assert!(!HostTree::has_pending(&doc, watch));
    }
}
