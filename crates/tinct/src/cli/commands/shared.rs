//! Shared helpers for command implementations.

use tinct_document::{Document, NodeId};
use tinct_highlight::Target;

/// Returns the element to work on: the first match for `selector`, or the document body.
pub fn target(doc: &Document, selector: Option<&str>) -> Target<NodeId> {
    selector.map_or_else(|| Target::Node(doc.root()), Target::from)
}

/// Prints the failure for a target that did not resolve to an element.
pub fn report_unresolved(selector: Option<&str>) {
    match selector {
        Some(selector) => eprintln!("error: selector '{selector}' does not name an element"),
        None => eprintln!("error: document has no root element"),
    }
}

#[cfg(test)]
mod tests {
    use tinct_document::parse_markdown;
    use tinct_highlight::resolve_target;

    use super::*;

    #[test]
    fn test_target_defaults_to_body() {
        let doc = parse_markdown("text");
        assert_eq!(target(&doc, None), Target::Node(doc.root()));
        assert_eq!(resolve_target(&doc, target(&doc, None)), Some(doc.root()));
    }

    #[test]
    fn test_target_by_selector() {
        let doc = parse_markdown("# Title\n\nbody");
        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(target(&doc, Some("p")), Target::Selector("p".into()));
        assert_eq!(resolve_target(&doc, target(&doc, Some("p"))), Some(p));
        assert_eq!(resolve_target(&doc, target(&doc, Some("p["))), None);
    }
}
