//! Implementation of `tinct spans`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use tinct_document::{Document, NodeId};
use tinct_highlight::{Fragment, Matcher, resolve_target, terminal::paint_fragments};

use super::shared::{report_unresolved, target};
use crate::cli::{
    args::SpansCommand,
    context::CommandContext,
    output::{dim, print_json, stdout_is_terminal},
};

/// Fragments computed for one text node.
#[derive(Debug, Serialize)]
struct NodeSpans {
    /// Position among the text nodes under the root.
    node: usize,
    /// Tag of the enclosing element.
    element: String,
    /// The node's fragments, in order.
    fragments: Vec<Fragment>,
}

/// JSON output of `tinct spans`.
#[derive(Debug, Serialize)]
struct SpansReport {
    /// Text nodes examined.
    text_nodes: usize,
    /// Highlighted fragments across all nodes.
    highlights: usize,
    /// Nodes with at least one highlighted fragment.
    nodes: Vec<NodeSpans>,
}

/// Shows which text would be highlighted, without modifying the document.
pub fn run(ctx: &CommandContext, cmd: &SpansCommand) -> ExitCode {
    let doc = match ctx.load_document(&cmd.file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };
    let selector = cmd.highlight.selector.as_deref();
    let Some(root) = resolve_target(&doc, target(&doc, selector)) else {
        report_unresolved(selector);
        return ExitCode::FAILURE;
    };

    let matcher = Matcher::new(ctx.search_spec(&cmd.highlight));
    let report = collect_spans(&doc, root, &matcher);

    if cmd.json {
        return print_json(&report);
    }
    print_report(&report);
    ExitCode::SUCCESS
}

/// Computes fragments for every text node under `root`.
fn collect_spans(doc: &Document, root: NodeId, matcher: &Matcher) -> SpansReport {
    let text_nodes = doc.text_nodes(root);
    let mut highlights = 0;
    let mut nodes = Vec::new();

    for (node, &text_node) in text_nodes.iter().enumerate() {
        let fragments = matcher.fragments(doc.text(text_node).unwrap_or_default());
        let count = fragments.iter().filter(|f| f.is_highlighted()).count();
        if count == 0 {
            continue;
        }
        highlights += count;
        let element = doc
            .parent(text_node)
            .and_then(|parent| doc.tag(parent))
            .unwrap_or_default()
            .to_string();
        nodes.push(NodeSpans {
            node,
            element,
            fragments,
        });
    }

    SpansReport {
        text_nodes: text_nodes.len(),
        highlights,
        nodes,
    }
}

/// Prints the report as a table, with painted previews on a terminal.
fn print_report(report: &SpansReport) {
    if report.nodes.is_empty() {
        println!("{}", dim("No matches."));
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Node", "Element", "Color", "Text"]);
    for spans in &report.nodes {
        for fragment in spans.fragments.iter().filter(|f| f.is_highlighted()) {
            table.add_row(vec![
                Cell::new(spans.node),
                Cell::new(&spans.element),
                Cell::new(fragment.color().unwrap_or_default()),
                Cell::new(fragment.text()),
            ]);
        }
    }
    println!("{table}");

    if stdout_is_terminal() {
        println!();
        for spans in &report.nodes {
            let tag = dim(&format!("<{}>", spans.element));
            println!("{tag} {}", paint_fragments(&spans.fragments));
        }
    }

    println!();
    println!(
        "{} highlights in {} of {} text nodes",
        report.highlights,
        report.nodes.len(),
        report.text_nodes
    );
}
