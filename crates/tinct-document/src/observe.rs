//! Mutation observation.
//!
//! Observers subscribe to a subtree root. Every child-list change whose target is the root or
//! one of its descendants is queued on the observer as a [`MutationRecord`] until the owner
//! drains it with [`Document::take_records`](crate::Document::take_records). Disconnecting
//! drops the queue; changes made while no observer is connected are never recorded.

use std::{fmt, mem};

use crate::NodeId;

/// Handle to a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// A single child-list change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The node whose children changed.
    pub target: NodeId,
    /// Nodes inserted under `target`, in order.
    pub added_nodes: Vec<NodeId>,
    /// Nodes removed from `target`, in order.
    pub removed_nodes: Vec<NodeId>,
}

/// A registered observer and its pending queue.
#[derive(Debug)]
struct Observer {
    /// Handle returned to the subscriber.
    id: ObserverId,
    /// Subtree root being watched.
    root: NodeId,
    /// Records not yet taken.
    queue: Vec<MutationRecord>,
}

/// The set of observers attached to one document.
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    /// Next id to hand out.
    next_id: u64,
    /// Connected observers.
    observers: Vec<Observer>,
}

impl ObserverRegistry {
    /// Registers a new observer on `root`.
    pub(crate) fn observe(&mut self, root: NodeId) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            root,
            queue: Vec::new(),
        });
        id
    }

    /// Removes an observer. Returns false if it was not connected.
    pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    /// Returns true if the observer is connected.
    pub(crate) fn is_connected(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|o| o.id == id)
    }

    /// Returns true if any observer is connected.
    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Drains the pending records of an observer.
    pub(crate) fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == id)
            .map(|o| mem::take(&mut o.queue))
            .unwrap_or_default()
    }

    /// Returns true if the observer has records waiting.
    pub(crate) fn has_pending(&self, id: ObserverId) -> bool {
        self.observers
            .iter()
            .any(|o| o.id == id && !o.queue.is_empty())
    }

    /// Queues `record` on every observer whose root is in `target_path`.
    ///
    /// `target_path` holds the record target and all of its ancestors.
    pub(crate) fn notify(&mut self, record: &MutationRecord, target_path: &[NodeId]) {
        for observer in &mut self.observers {
            if target_path.contains(&observer.root) {
                observer.queue.push(record.clone());
            }
        }
    }
}
