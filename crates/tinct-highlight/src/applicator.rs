//! Splicing matches into a tree and keeping them current.
//!
//! The [`Applicator`] owns the matcher, the watch subscription and three registries: the
//! roots that were highlighted (so option changes can re-run on them), the wrappers it
//! created and the plain text nodes it split off around them. The last two are how a pass
//! tells already-matched text apart from fresh text, and how the normalize policy undoes a
//! pass. It never queries the document for any of them.
//!
//! Its own edits are never fed back to itself. Observation is suspended around every edit
//! the applicator makes, and changes that were already queued by someone else are carried
//! across the suspension so they are still delivered.

use std::{collections::HashSet, mem, ops::AddAssign};

use serde::Serialize;
use tinct_config::UpdatePolicy;
use tracing::{debug, trace, warn};

use crate::{Fragment, HostTree, Matcher, SearchSpec, SearchSpecPatch};

/// What an `apply` pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Text nodes examined.
    pub text_nodes: usize,
    /// Text nodes replaced by fragments.
    pub replaced: usize,
    /// Wrappers inserted.
    pub highlights: usize,
}

impl AddAssign for ApplyReport {
    fn add_assign(&mut self, other: Self) {
        self.text_nodes += other.text_nodes;
        self.replaced += other.replaced;
        self.highlights += other.highlights;
    }
}

/// The active subscription.
#[derive(Debug)]
struct Subscription<N, W> {
    /// Root being watched.
    root: N,
    /// Host handle.
    handle: W,
}

/// Applies a [`SearchSpec`] to subtrees of a host tree.
#[derive(Debug)]
pub struct Applicator<H: HostTree> {
    /// Compiled current options.
    matcher: Matcher,
    /// How option changes treat earlier wrappers.
    policy: UpdatePolicy,
    /// Highlighted roots, in first-highlight order, without duplicates.
    marked: Vec<H::Node>,
    /// Wrappers created by this applicator.
    wrappers: HashSet<H::Node>,
    /// Plain text nodes created by this applicator next to its wrappers.
    spliced: HashSet<H::Node>,
    /// Root and handle of the active subscription.
    subscription: Option<Subscription<H::Node, H::Watch>>,
    /// Added nodes drained from the host while observation was suspended.
    carried: Vec<H::Node>,
    /// Set while a notification batch is being processed.
    ///
    /// Nothing in this crate can re-enter [`Self::process_notifications`]; the flag guards
    /// host bindings that deliver batches from inside a callback.
    processing: bool,
    /// Number of batches delivered so far.
    batches: usize,
}

impl<H: HostTree> Applicator<H> {
    /// Creates an applicator with no roots and no subscription.
    pub fn new(spec: SearchSpec, policy: UpdatePolicy) -> Self {
        Self {
            matcher: Matcher::new(spec),
            policy,
            marked: Vec::new(),
            wrappers: HashSet::new(),
            spliced: HashSet::new(),
            subscription: None,
            carried: Vec::new(),
            processing: false,
            batches: 0,
        }
    }

    /// Returns the current options.
    pub fn spec(&self) -> &SearchSpec {
        self.matcher.spec()
    }

    /// Returns the update policy.
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Returns the highlighted roots in registration order.
    pub fn marked_roots(&self) -> &[H::Node] {
        &self.marked
    }

    /// Returns the number of wrappers this applicator created and still tracks.
    pub fn wrapper_count(&self) -> usize {
        self.wrappers.len()
    }

    /// Returns true while a subscription is active.
    pub fn is_watching(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns the number of notification batches delivered so far.
    pub fn batches_delivered(&self) -> usize {
        self.batches
    }

    /// Adds a root to the registry. Returns false if it was already there.
    pub fn mark(&mut self, root: H::Node) -> bool {
        if self.marked.contains(&root) {
            return false;
        }
        self.marked.push(root);
        true
    }

    /// Highlights every text node under `root`.
    ///
    /// The text nodes are collected before any edit, so replacements never shift the walk.
    /// Text this applicator already produced, inside or beside its wrappers, is left alone,
    /// so applying twice gives the same tree as applying once.
    pub fn apply(&mut self, doc: &mut H, root: H::Node) -> ApplyReport {
        let suspended = self.suspend(doc);
        let report = self.splice_subtree(doc, root, false);
        self.resume(doc, suspended);
        report
    }

    /// Shallow-merges `patch` into the options and re-highlights every marked root.
    pub fn apply_options(&mut self, doc: &mut H, patch: SearchSpecPatch) -> ApplyReport {
        let mut spec = self.matcher.spec().clone();
        spec.apply_patch(patch);
        self.matcher = Matcher::new(spec);

        let suspended = self.suspend(doc);
        self.prune_detached(doc);
        let mut report = ApplyReport::default();
        for root in self.marked.clone() {
            if !doc.is_element(root) {
                continue;
            }
            let rescan = match self.policy {
                UpdatePolicy::Normalize => {
                    self.clear_wrappers(doc, root);
                    false
                }
                UpdatePolicy::Accumulate => true,
            };
            report += self.splice_subtree(doc, root, rescan);
        }
        self.resume(doc, suspended);
        debug!(roots = self.marked.len(), ?report, "re-applied options");
        report
    }

    /// Watches `root` for inserted content, replacing any earlier subscription.
    pub fn watch(&mut self, doc: &mut H, root: H::Node) {
        self.stop(doc);
        let handle = doc.observe(root);
        self.subscription = Some(Subscription { root, handle });
    }

    /// Tears down the subscription. Does nothing if there is none.
    ///
    /// Bookkeeping for wrappers that were removed from the document is dropped as well.
    pub fn stop(&mut self, doc: &mut H) {
        if let Some(subscription) = self.subscription.take() {
            doc.disconnect(subscription.handle);
        }
        self.carried.clear();
        self.prune_detached(doc);
    }

    /// Returns true if a notification batch is waiting.
    pub fn has_pending(&self, doc: &H) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|s| !self.carried.is_empty() || doc.has_pending(s.handle))
    }

    /// Delivers one batch of queued changes, if any.
    ///
    /// Every inserted element in the batch is highlighted in delivery order; inserted text
    /// nodes are ignored, and so is an element nested inside another element of the same
    /// batch, since its text is covered when the outer one is highlighted. The subscription is torn down for the duration and re-established
    /// on the same root afterwards. Returns the report, or `None` when nothing was queued.
    pub fn process_notifications(&mut self, doc: &mut H) -> Option<ApplyReport> {
        if self.processing || !self.has_pending(doc) {
            return None;
        }
        let subscription = self.subscription.take()?;
        self.processing = true;

        let mut added = mem::take(&mut self.carried);
        added.extend(doc.take_added(subscription.handle));
        doc.disconnect(subscription.handle);

        let elements: Vec<H::Node> = added.into_iter().filter(|&n| doc.is_element(n)).collect();
        let mut seen = HashSet::new();
        let mut report = ApplyReport::default();
        for &node in &elements {
            if !seen.insert(node) {
                continue;
            }
            if elements
                .iter()
                .any(|&outer| outer != node && doc.contains(outer, node))
            {
                continue;
            }
            report += self.splice_subtree(doc, node, false);
        }

        self.subscription = Some(Subscription {
            root: subscription.root,
            handle: doc.observe(subscription.root),
        });
        self.processing = false;
        self.batches += 1;
        trace!(batch = self.batches, ?report, "processed notification batch");
        Some(report)
    }

    /// Disconnects the subscription for the duration of an edit, keeping queued changes.
    fn suspend(&mut self, doc: &mut H) -> Option<H::Node> {
        let subscription = self.subscription.take()?;
        let pending = doc.take_added(subscription.handle);
        self.carried.extend(pending);
        doc.disconnect(subscription.handle);
        Some(subscription.root)
    }

    /// Re-establishes a subscription suspended by [`Self::suspend`].
    fn resume(&mut self, doc: &mut H, suspended: Option<H::Node>) {
        if let Some(root) = suspended {
            let handle = doc.observe(root);
            self.subscription = Some(Subscription { root, handle });
        }
    }

    /// Unwraps this applicator's wrappers under `root` and merges the freed text.
    ///
    /// Only text this applicator produced is merged: the wrappers' contents and the plain
    /// pieces split off beside them. Text nodes the document already had stay separate.
    fn clear_wrappers(&mut self, doc: &mut H, root: H::Node) {
        let inside: Vec<H::Node> = self
            .wrappers
            .iter()
            .copied()
            .filter(|&w| w != root && doc.contains(root, w))
            .collect();
        let mut ours: Vec<H::Node> = self
            .spliced
            .iter()
            .copied()
            .filter(|&t| doc.contains(root, t))
            .collect();
        for wrapper in inside {
            self.wrappers.remove(&wrapper);
            match doc.unwrap(wrapper) {
                Ok(freed) => ours.extend(freed),
                Err(err) => warn!(?wrapper, %err, "failed to unwrap highlight"),
            }
        }
        for node in &ours {
            self.spliced.remove(node);
        }
        doc.merge_text(&ours);
    }

    /// Forgets wrappers and split-off text that were removed from the document.
    ///
    /// Nodes under a marked root are kept even when that root is itself detached.
    fn prune_detached(&mut self, doc: &H) {
        let marked = &self.marked;
        let keep = |node: H::Node| {
            doc.is_connected(node) || marked.iter().any(|&root| doc.contains(root, node))
        };
        self.wrappers.retain(|&w| keep(w));
        self.spliced.retain(|&t| keep(t));
    }

    /// Replaces matching text nodes under `root` with fragments.
    ///
    /// With `rescan` unset, text this applicator produced is skipped: text whose parent is
    /// one of its wrappers and the plain pieces it split off beside them.
    fn splice_subtree(&mut self, doc: &mut H, root: H::Node, rescan: bool) -> ApplyReport {
        let mut report = ApplyReport::default();
        if self.matcher.is_empty() {
            return report;
        }
        for node in doc.text_nodes(root) {
            report.text_nodes += 1;
            let Some(parent) = doc.parent_element(node) else {
                continue;
            };
            if !rescan && (self.wrappers.contains(&parent) || self.spliced.contains(&node)) {
                continue;
            }
            let Some(content) = doc.text(node) else {
                continue;
            };
            let fragments = self.matcher.fragments(content);
            let highlights = fragments.iter().filter(|f| f.is_highlighted()).count();
            if highlights == 0 {
                continue;
            }

            let replacements: Vec<H::Node> = fragments
                .iter()
                .map(|fragment| match fragment {
                    Fragment::Plain { text } => doc.create_text(text),
                    Fragment::Highlighted { text, color } => doc.create_wrapper(text, color),
                })
                .collect();
            if let Err(err) = doc.replace_with(node, &replacements) {
                warn!(?node, %err, "failed to splice highlights");
                continue;
            }
            for (fragment, &created) in fragments.iter().zip(&replacements) {
                if fragment.is_highlighted() {
                    self.wrappers.insert(created);
                } else {
                    self.spliced.insert(created);
                }
            }
            report.replaced += 1;
            report.highlights += highlights;
        }
        debug!(?root, ?report, "applied highlights");
        report
    }
}
