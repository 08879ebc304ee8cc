//! The document tree.
//!
//! [`Document`] owns every node in an arena and exposes DOM-style structure edits. Each edit
//! that changes a child list is reported to connected observers (see [`crate::observe`]).
//!
//! Passing a [`NodeId`] that did not come from the same document is a logic error and panics.

use std::{collections::HashSet, mem};

use crate::{
    error::{SelectorError, TreeError},
    node::{ElementData, NodeData, NodeId, NodeKind, Slot},
    observe::{MutationRecord, ObserverId, ObserverRegistry},
    selector::SelectorList,
};

/// Tag of the element created as the document root.
pub const ROOT_TAG: &str = "body";

/// An arena-backed tree of element and text nodes.
///
/// Slots are never reused: a removed node keeps its slot, so a stale `NodeId` still refers
/// to the same detached node rather than to an unrelated one.
#[derive(Debug)]
pub struct Document {
    /// Node storage, indexed by `NodeId`.
    slots: Vec<Slot>,
    /// The root element.
    root: NodeId,
    /// Connected mutation observers.
    observers: ObserverRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with a `body` root element.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::new(NodeData::Element(ElementData::new(ROOT_TAG)))],
            root: NodeId(0),
            observers: ObserverRegistry::default(),
        }
    }

    /// Returns the root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_slot(NodeData::Element(ElementData::new(tag)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_slot(NodeData::Text(text.to_string()))
    }

    /// Stores a new detached slot.
    fn push_slot(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot::new(data));
        id
    }

    /// Returns the payload of a node.
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.slots[id.0].data
    }

    /// Returns the kind of a node.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind()
    }

    /// Returns true if the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Element
    }

    /// Returns true if the node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Text
    }

    /// Returns the element payload, or `None` for text nodes.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Mutable access to the element payload.
    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.slots[id.0].data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Returns the tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Returns the character data of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Replaces the character data of a text node. Returns false for elements.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        match &mut self.slots[id.0].data {
            NodeData::Text(current) => {
                text.clone_into(current);
                true
            }
            NodeData::Element(_) => false,
        }
    }

    /// Returns an attribute value of an element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// Sets an attribute on an element. Returns false for text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        self.element_mut(id)
            .map(|el| el.set_attribute(name, value))
            .is_some()
    }

    /// Removes an attribute from an element, returning the previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)?.remove_attribute(name)
    }

    /// Returns an inline style property of an element.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style_property(property)
    }

    /// Sets an inline style property on an element. Returns false for text nodes.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> bool {
        self.element_mut(id)
            .map(|el| el.set_style_property(property, value))
            .is_some()
    }

    /// Returns the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Returns the children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Iterates over the ancestors of a node, nearest first, excluding the node itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns true if the node is attached under the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// Iterates over `root` and its descendants in document (pre-)order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![root],
        }
    }

    /// Returns every text node in the subtree of `root`, in document order.
    ///
    /// `root` itself is included when it is a text node.
    pub fn text_nodes(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root).filter(|&n| self.is_text(n)).collect()
    }

    /// Concatenates the character data of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.text_nodes(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Appends `child` as the last child of `parent`, moving it if it is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` under `parent` before `reference`, or last when `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_insertion(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(TreeError::NotAChild {
                    parent,
                    node: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        self.detach(child);
        let children = &mut self.slots[parent.0].children;
        let index = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        children.insert(index, child);
        self.slots[child.0].parent = Some(parent);

        self.record(MutationRecord {
            target: parent,
            added_nodes: vec![child],
            removed_nodes: Vec::new(),
        });
        Ok(())
    }

    /// Detaches a node from its parent. Returns false if it had no parent.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.detach(id)
    }

    /// Replaces `node` with `replacements`, in order, at the same position.
    ///
    /// Replacements are moved out of their current parents first. The change is reported as
    /// one record on the parent carrying all added nodes and the removed `node`.
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) -> Result<(), TreeError> {
        let parent = self.parent(node).ok_or(TreeError::Detached(node))?;
        for &replacement in replacements {
            if replacement == node {
                return Err(TreeError::Cycle {
                    parent,
                    child: node,
                });
            }
            self.check_insertion(parent, replacement)?;
        }

        for &replacement in replacements {
            self.detach(replacement);
        }

        let children = &mut self.slots[parent.0].children;
        let index = children
            .iter()
            .position(|&c| c == node)
            .ok_or(TreeError::NotAChild { parent, node })?;
        children.splice(index..=index, replacements.iter().copied());
        self.slots[node.0].parent = None;
        for &replacement in replacements {
            self.slots[replacement.0].parent = Some(parent);
        }

        self.record(MutationRecord {
            target: parent,
            added_nodes: replacements.to_vec(),
            removed_nodes: vec![node],
        });
        Ok(())
    }

    /// Replaces an element with its own children, returning them.
    pub fn unwrap(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if self.parent(node).is_none() {
            return Err(TreeError::Detached(node));
        }
        let children = mem::take(&mut self.slots[node.0].children);
        for &child in &children {
            self.slots[child.0].parent = None;
        }
        if !children.is_empty() {
            self.record(MutationRecord {
                target: node,
                added_nodes: Vec::new(),
                removed_nodes: children.clone(),
            });
        }
        self.replace_with(node, &children)?;
        Ok(children)
    }

    /// Merges adjacent text nodes and drops empty ones throughout the subtree of `root`.
    ///
    /// Returns the number of text nodes removed.
    pub fn normalize(&mut self, root: NodeId) -> usize {
        let elements: Vec<NodeId> = self
            .descendants(root)
            .filter(|&n| self.is_element(n))
            .collect();

        let mut total = 0;
        for element in elements {
            let mut removed = Vec::new();
            let mut run_head: Option<NodeId> = None;
            for child in self.slots[element.0].children.clone() {
                let Some(text) = self.text(child).map(str::to_string) else {
                    run_head = None;
                    continue;
                };
                if text.is_empty() {
                    removed.push(child);
                    continue;
                }
                match run_head {
                    Some(head) => {
                        if let NodeData::Text(head_text) = &mut self.slots[head.0].data {
                            head_text.push_str(&text);
                        }
                        removed.push(child);
                    }
                    None => run_head = Some(child),
                }
            }

            total += self.drop_children(element, removed);
        }
        total
    }

    /// Merges runs of adjacent text nodes drawn from `nodes` into the first node of each run.
    ///
    /// Only listed nodes take part: a listed node next to an unlisted text node stays separate.
    /// Empty listed nodes are dropped. Returns the number of text nodes removed.
    pub fn merge_text_runs(&mut self, nodes: &[NodeId]) -> usize {
        let listed: HashSet<NodeId> = nodes.iter().copied().filter(|&n| self.is_text(n)).collect();
        let mut parents: Vec<NodeId> = Vec::new();
        for &node in nodes {
            if listed.contains(&node)
                && let Some(parent) = self.parent(node)
                && !parents.contains(&parent)
            {
                parents.push(parent);
            }
        }

        let mut total = 0;
        for parent in parents {
            let mut removed = Vec::new();
            let mut run_head: Option<NodeId> = None;
            for child in self.slots[parent.0].children.clone() {
                if !listed.contains(&child) {
                    run_head = None;
                    continue;
                }
                let text = self.text(child).unwrap_or_default().to_string();
                if text.is_empty() {
                    removed.push(child);
                    continue;
                }
                match run_head {
                    Some(head) => {
                        if let NodeData::Text(head_text) = &mut self.slots[head.0].data {
                            head_text.push_str(&text);
                        }
                        removed.push(child);
                    }
                    None => run_head = Some(child),
                }
            }
            total += self.drop_children(parent, removed);
        }
        total
    }

    /// Detaches `removed` from `element` in one record. Returns how many were removed.
    fn drop_children(&mut self, element: NodeId, removed: Vec<NodeId>) -> usize {
        if removed.is_empty() {
            return 0;
        }
        self.slots[element.0]
            .children
            .retain(|c| !removed.contains(c));
        for &node in &removed {
            self.slots[node.0].parent = None;
        }
        let count = removed.len();
        self.record(MutationRecord {
            target: element,
            added_nodes: Vec::new(),
            removed_nodes: removed,
        });
        count
    }

    /// Finds the first element in document order matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(self.root)
            .find(|&n| list.matches(self, n)))
    }

    /// Finds every element in document order matching `selector`.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(self.root)
            .filter(|&n| list.matches(self, n))
            .collect())
    }

    /// Starts observing child-list changes in the subtree of `root`.
    pub fn observe(&mut self, root: NodeId) -> ObserverId {
        self.observers.observe(root)
    }

    /// Stops an observer and discards its pending records.
    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers.disconnect(observer)
    }

    /// Returns true if the observer is still connected.
    pub fn is_observing(&self, observer: ObserverId) -> bool {
        self.observers.is_connected(observer)
    }

    /// Returns true if the observer has undelivered records.
    pub fn has_pending(&self, observer: ObserverId) -> bool {
        self.observers.has_pending(observer)
    }

    /// Drains the undelivered records of an observer, oldest first.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers.take_records(observer)
    }

    /// Rejects insertions that would put a node under a text node or inside itself.
    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if !self.is_element(parent) {
            return Err(TreeError::NotAnElement(parent));
        }
        if self.contains(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Removes a node from its parent's child list, reporting the removal.
    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.slots[id.0].parent.take() else {
            return false;
        };
        self.slots[parent.0].children.retain(|&c| c != id);
        self.record(MutationRecord {
            target: parent,
            added_nodes: Vec::new(),
            removed_nodes: vec![id],
        });
        true
    }

    /// Queues a record for every observer watching the target's subtree.
    fn record(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let mut path = vec![record.target];
        path.extend(self.ancestors(record.target));
        self.observers.notify(&record, &path);
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    /// Document being walked.
    doc: &'a Document,
    /// Next ancestor to yield.
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    /// Document being walked.
    doc: &'a Document,
    /// Nodes to visit (rightmost children pushed first).
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so leftmost child is processed first
        self.stack
            .extend(self.doc.children(node).iter().rev().copied());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `<body><p>one<em>two</em></p><p>three</p></body>`.
    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let p1 = doc.create_element("p");
        let one = doc.create_text("one");
        let em = doc.create_element("em");
        let two = doc.create_text("two");
        let p2 = doc.create_element("p");
        let three = doc.create_text("three");
        doc.append_child(root, p1).unwrap();
        doc.append_child(p1, one).unwrap();
        doc.append_child(p1, em).unwrap();
        doc.append_child(em, two).unwrap();
        doc.append_child(root, p2).unwrap();
        doc.append_child(p2, three).unwrap();
        (doc, p1, p2)
    }

    #[test]
    fn test_new_document_has_body_root() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("body"));
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_text_nodes_in_document_order() {
        let (doc, p1, _) = sample();
        let texts: Vec<&str> = doc
            .text_nodes(doc.root())
            .into_iter()
            .filter_map(|n| doc.text(n))
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(doc.text_content(p1), "onetwo");
    }

    #[test]
    fn test_text_nodes_includes_text_root() {
        let mut doc = Document::new();
        let t = doc.create_text("solo");
        assert_eq!(doc.text_nodes(t), vec![t]);
    }

    #[test]
    fn test_append_moves_existing_child() {
        let (mut doc, p1, p2) = sample();
        let em = doc.children(p1)[1];
        doc.append_child(p2, em).unwrap();

        assert_eq!(doc.children(p1).len(), 1);
        assert_eq!(doc.children(p2).last(), Some(&em));
        assert_eq!(doc.parent(em), Some(p2));
    }

    #[test]
    fn test_append_rejects_text_parent_and_cycles() {
        let (mut doc, p1, _) = sample();
        let text = doc.children(p1)[0];
        let extra = doc.create_element("b");

        assert_eq!(
            doc.append_child(text, extra),
            Err(TreeError::NotAnElement(text))
        );
        let root = doc.root();
        assert_eq!(
            doc.append_child(p1, root),
            Err(TreeError::Cycle {
                parent: p1,
                child: root
            })
        );
    }

    #[test]
    fn test_insert_before_reference() {
        let (mut doc, p1, _) = sample();
        let first = doc.children(p1)[0];
        let b = doc.create_element("b");
        doc.insert_before(p1, b, Some(first)).unwrap();
        assert_eq!(doc.children(p1)[0], b);

        let stray = doc.create_text("x");
        let other = doc.create_element("i");
        assert!(matches!(
            doc.insert_before(p1, other, Some(stray)),
            Err(TreeError::NotAChild { .. })
        ));
    }

    #[test]
    fn test_replace_with_keeps_position() {
        let (mut doc, p1, _) = sample();
        let one = doc.children(p1)[0];
        let a = doc.create_text("o");
        let span = doc.create_element("span");
        let b = doc.create_text("ne");
        doc.replace_with(one, &[a, span, b]).unwrap();

        assert_eq!(doc.children(p1)[..3], [a, span, b]);
        assert_eq!(doc.children(p1).len(), 4);
        assert!(doc.parent(one).is_none());
        assert_eq!(doc.parent(span), Some(p1));
    }

    #[test]
    fn test_replace_with_detached_node_fails() {
        let mut doc = Document::new();
        let loose = doc.create_text("loose");
        assert_eq!(
            doc.replace_with(loose, &[]),
            Err(TreeError::Detached(loose))
        );
    }

    #[test]
    fn test_unwrap_and_normalize() {
        let (mut doc, p1, _) = sample();
        let em = doc.children(p1)[1];
        let lifted = doc.unwrap(em).unwrap();
        assert_eq!(lifted.len(), 1);
        assert_eq!(doc.children(p1).len(), 2);

        let empty = doc.create_text("");
        doc.append_child(p1, empty).unwrap();
        let removed = doc.normalize(p1);

        assert_eq!(removed, 2);
        assert_eq!(doc.children(p1).len(), 1);
        assert_eq!(doc.text(doc.children(p1)[0]), Some("onetwo"));
    }

    #[test]
    fn test_merge_text_runs_only_touches_listed_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("p");
        doc.append_child(root, p).unwrap();
        let texts: Vec<NodeId> = ["author ", "a ", "", "b", " c"]
            .iter()
            .map(|t| {
                let node = doc.create_text(t);
                doc.append_child(p, node).unwrap();
                node
            })
            .collect();

        let removed = doc.merge_text_runs(&texts[1..4]);

        assert_eq!(removed, 2);
        let children = doc.children(p).to_vec();
        assert_eq!(children, vec![texts[0], texts[1], texts[4]]);
        assert_eq!(doc.text(texts[0]), Some("author "));
        assert_eq!(doc.text(texts[1]), Some("a b"));
        assert_eq!(doc.text(texts[4]), Some(" c"));
    }

    #[test]
    fn test_attributes_and_style() {
        let (mut doc, p1, _) = sample();
        assert!(doc.set_attribute(p1, "data-highlighted", "true"));
        assert_eq!(doc.attribute(p1, "data-highlighted"), Some("true"));
        assert!(doc.set_style(p1, "background-color", "red"));
        assert_eq!(doc.style(p1, "background-color"), Some("red"));

        let text = doc.children(p1)[0];
        assert!(!doc.set_attribute(text, "x", "y"));
        assert!(doc.attribute(text, "x").is_none());
        assert_eq!(doc.remove_attribute(p1, "data-highlighted").as_deref(), Some("true"));
    }

    #[test]
    fn test_observer_sees_subtree_changes_only() {
        let (mut doc, p1, p2) = sample();
        let watch_p1 = doc.observe(p1);

        let em = doc.children(p1)[1];
        let i = doc.create_element("i");
        doc.append_child(em, i).unwrap();
        let b = doc.create_element("b");
        doc.append_child(p2, b).unwrap();

        let records = doc.take_records(watch_p1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, em);
        assert_eq!(records[0].added_nodes, vec![i]);
        assert!(!doc.has_pending(watch_p1));
    }

    #[test]
    fn test_disconnected_observer_records_nothing() {
        let (mut doc, p1, _) = sample();
        let watch = doc.observe(doc.root());
        assert!(doc.disconnect(watch));
        let b = doc.create_element("b");
        doc.append_child(p1, b).unwrap();
        assert!(!doc.is_observing(watch));
        assert!(doc.take_records(watch).is_empty());
    }

    #[test]
    fn test_replace_with_reports_single_record() {
        let (mut doc, p1, _) = sample();
        let watch = doc.observe(doc.root());
        let one = doc.children(p1)[0];
        let a = doc.create_text("a");
        let b = doc.create_text("b");
        doc.replace_with(one, &[a, b]).unwrap();

        let records = doc.take_records(watch);
        assert_eq!(
            records,
            vec![MutationRecord {
                target: p1,
                added_nodes: vec![a, b],
                removed_nodes: vec![one],
            }]
        );
    }

    #[test]
    fn test_connected_and_contains() {
        let (mut doc, p1, p2) = sample();
        assert!(doc.is_connected(p1));
        assert!(!doc.contains(p1, p2));
        assert!(doc.remove(p2));
        assert!(!doc.remove(p2));
        assert!(!doc.is_connected(p2));
    }
}
