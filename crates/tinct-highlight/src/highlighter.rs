//! The public entry point.

use tinct_config::{Config, DEFAULT_MARKER_ATTRIBUTE, Settings, UpdatePolicy};
use tinct_document::NodeId;
use tracing::{debug, error};

use crate::{Applicator, ApplyReport, HostTree, SearchSpec, SearchSpecPatch};

/// Value of the marker attribute on highlighted roots.
pub const MARKER_VALUE: &str = "true";

/// Where to highlight: a node, or the first element matching a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<N> {
    /// A node handle.
    Node(N),
    /// A CSS selector.
    Selector(String),
}

impl From<NodeId> for Target<NodeId> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<N> From<&str> for Target<N> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl<N> From<String> for Target<N> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

/// Behavior options that are not part of the search itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlighterOptions {
    /// Watch highlighted roots for inserted content.
    pub observe: bool,
    /// How option changes treat earlier wrappers.
    pub update_policy: UpdatePolicy,
    /// Attribute set to `"true"` on highlighted roots.
    pub marker_attribute: String,
}

impl Default for HighlighterOptions {
    fn default() -> Self {
        Self {
            observe: true,
            update_policy: UpdatePolicy::default(),
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
        }
    }
}

impl From<&Settings> for HighlighterOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            observe: settings.observe,
            update_policy: settings.update_policy,
            marker_attribute: settings.marker_attribute.clone(),
        }
    }
}

/// Highlights literal terms in a host tree and keeps the highlights current.
#[derive(Debug)]
pub struct Highlighter<H: HostTree> {
    /// Matching, splicing and watching.
    applicator: Applicator<H>,
    /// Behavior options.
    options: HighlighterOptions,
}

/// Creates a highlighter with default behavior options.
pub fn create_highlighter<H: HostTree>(spec: SearchSpec) -> Highlighter<H> {
    Highlighter::with_options(spec, HighlighterOptions::default())
}

impl<H: HostTree> Highlighter<H> {
    /// Creates a highlighter with explicit behavior options.
    pub fn with_options(spec: SearchSpec, options: HighlighterOptions) -> Self {
        Self {
            applicator: Applicator::new(spec, options.update_policy),
            options,
        }
    }

    /// Creates a highlighter from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_options(
            SearchSpec::from(&config.highlight),
            HighlighterOptions::from(&config.settings),
        )
    }

    /// Highlights `target` and, if observation is on, watches it for inserted content.
    ///
    /// The target is flagged with the marker attribute and remembered for
    /// [`Self::update_options`]. A target that does not resolve to an element is logged and
    /// ignored; `None` is returned in that case.
    pub fn highlight(
        &mut self,
        doc: &mut H,
        target: impl Into<Target<H::Node>>,
    ) -> Option<ApplyReport> {
        let root = resolve_target(doc, target.into())?;
        doc.set_attribute(root, &self.options.marker_attribute, MARKER_VALUE);
        self.applicator.mark(root);

        let report = self.applicator.apply(doc, root);
        if self.options.observe {
            self.applicator.watch(doc, root);
        }
        debug!(?root, ?report, observe = self.options.observe, "highlighted");
        Some(report)
    }

    /// Merges `patch` into the options and re-highlights every root highlighted so far.
    pub fn update_options(&mut self, doc: &mut H, patch: SearchSpecPatch) -> ApplyReport {
        self.applicator.apply_options(doc, patch)
    }

    /// Stops watching. Highlights already in the tree stay. Safe to call repeatedly.
    pub fn destroy(&mut self, doc: &mut H) {
        self.applicator.stop(doc);
    }

    /// Delivers one batch of queued insertions; see [`Applicator::process_notifications`].
    pub fn process_notifications(&mut self, doc: &mut H) -> Option<ApplyReport> {
        self.applicator.process_notifications(doc)
    }

    /// Returns the current search options.
    pub fn spec(&self) -> &SearchSpec {
        self.applicator.spec()
    }

    /// Returns the behavior options.
    pub fn options(&self) -> &HighlighterOptions {
        &self.options
    }

    /// Returns the roots highlighted so far.
    pub fn marked_roots(&self) -> &[H::Node] {
        self.applicator.marked_roots()
    }

    /// Returns true while a watch is active.
    pub fn is_watching(&self) -> bool {
        self.applicator.is_watching()
    }

    /// Returns the number of notification batches delivered so far.
    pub fn batches_delivered(&self) -> usize {
        self.applicator.batches_delivered()
    }
}

/// Resolves a target to an element, logging why at `error` level when it cannot.
pub fn resolve_target<H: HostTree>(doc: &H, target: Target<H::Node>) -> Option<H::Node> {
    match target {
        Target::Node(node) if doc.is_element(node) => Some(node),
        Target::Node(node) => {
            error!(?node, "highlight target is not an element");
            None
        }
        Target::Selector(selector) => match doc.query_selector(&selector) {
            Ok(Some(node)) => Some(node),
            Ok(None) => {
                error!(%selector, "no element matches highlight target");
                None
            }
            Err(err) => {
                error!(%selector, %err, "invalid highlight target selector");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use tinct_document::{Document, inner_html, parse_markdown};

    use super::*;

    fn spec(terms: &[&str], colors: &[&str]) -> SearchSpec {
        SearchSpec::new(terms.iter().copied(), colors.iter().copied())
    }

    #[test]
    fn test_highlight_by_selector_marks_root() {
        let mut doc = parse_markdown("# Title\n\nA cat and a dog.");
        let mut hl = create_highlighter::<Document>(spec(&["cat", "dog"], &["red", "blue"]));
        let report = hl.highlight(&mut doc, "p").unwrap();

        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(doc.attribute(p, "data-highlighted"), Some("true"));
        assert_eq!(report.highlights, 2);
        assert_eq!(
            inner_html(&doc, p),
            "A <span style=\"background-color: red\">cat</span> and a \
             <span style=\"background-color: blue\">dog</span>."
        );
        assert!(hl.is_watching());
        assert_eq!(hl.marked_roots(), &[p]);
    }

    #[test]
    fn test_invalid_targets_are_noops() {
        let mut doc = parse_markdown("cat");
        let before = inner_html(&doc, doc.root());
        let mut hl = create_highlighter::<Document>(spec(&["cat"], &["red"]));

        assert!(hl.highlight(&mut doc, "section").is_none());
        assert!(hl.highlight(&mut doc, "p[").is_none());
        let text = doc.text_nodes(doc.root())[0];
        assert!(hl.highlight(&mut doc, text).is_none());

        assert_eq!(inner_html(&doc, doc.root()), before);
        assert!(hl.marked_roots().is_empty());
        assert!(!hl.is_watching());
    }

    #[test]
    fn test_resolve_target() {
        let doc = parse_markdown("# Title\n\nbody");
        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(resolve_target(&doc, Target::from("p")), Some(p));
        assert_eq!(resolve_target(&doc, Target::Node(doc.root())), Some(doc.root()));
        assert_eq!(resolve_target(&doc, Target::from("table")), None);
        assert_eq!(resolve_target(&doc, Target::from("p[")), None);
    }

    #[test]
    fn test_highlight_twice_matches_once() {
        let mut doc = parse_markdown("xababa");
        let mut hl = create_highlighter::<Document>(spec(&["xab", "aba"], &["red", "blue"]));
        let root = doc.root();
        hl.highlight(&mut doc, root).unwrap();
        hl.highlight(&mut doc, root).unwrap();
        assert_eq!(
            inner_html(&doc, root),
            "<p><span style=\"background-color: red\">xab</span>aba</p>"
        );
        assert_eq!(hl.marked_roots(), &[root]);
    }

    #[test]
    fn test_observe_disabled() {
        let mut doc = parse_markdown("cat");
        let options = HighlighterOptions {
            observe: false,
            ..HighlighterOptions::default()
        };
        let mut hl = Highlighter::<Document>::with_options(spec(&["cat"], &["red"]), options);
        let root = doc.root();
        hl.highlight(&mut doc, root).unwrap();
        assert!(!hl.is_watching());
    }

    #[test]
    fn test_update_options_uses_registry() {
        let mut doc = parse_markdown("cat\n\ncat");
        let mut hl = create_highlighter::<Document>(spec(&["cat"], &["red"]));
        let first = doc.children(doc.root())[0];
        let second = doc.children(doc.root())[1];
        hl.highlight(&mut doc, first).unwrap();
        // Flagged by hand, not by this highlighter: must not be touched.
        doc.set_attribute(second, "data-highlighted", "true");

        let report = hl.update_options(&mut doc, SearchSpecPatch::default().colors(["blue"]));
        assert_eq!(report.highlights, 1);
        assert_eq!(
            inner_html(&doc, first),
            "<span style=\"background-color: blue\">cat</span>"
        );
        assert_eq!(inner_html(&doc, second), "cat");
    }

    #[test]
    fn test_destroy_stops_watching() {
        let mut doc = parse_markdown("start");
        let root = doc.root();
        let mut hl = create_highlighter::<Document>(spec(&["cat"], &["red"]));
        hl.highlight(&mut doc, root).unwrap();
        hl.destroy(&mut doc);
        hl.destroy(&mut doc);

        let p = doc.create_element("p");
        let t = doc.create_text("cat");
        doc.append_child(p, t).unwrap();
        doc.append_child(root, p).unwrap();
        assert!(hl.process_notifications(&mut doc).is_none());
        assert_eq!(inner_html(&doc, p), "cat");
    }

    #[test]
    fn test_custom_marker_attribute() {
        let mut doc = parse_markdown("cat");
        let options = HighlighterOptions {
            marker_attribute: "data-tinct".into(),
            ..HighlighterOptions::default()
        };
        let mut hl = Highlighter::<Document>::with_options(spec(&["cat"], &["red"]), options);
        let root = doc.root();
        hl.highlight(&mut doc, root).unwrap();
        assert_eq!(doc.attribute(root, "data-tinct"), Some("true"));
        assert!(doc.attribute(root, "data-highlighted").is_none());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.highlight.terms = vec!["x".into()];
        config.settings.observe = false;
        let hl = Highlighter::<Document>::from_config(&config);
        assert_eq!(hl.spec().terms, vec!["x"]);
        assert!(!hl.options().observe);
    }
}
