//! Implementation of `tinct render`.

use std::{fs, path::Path, process::ExitCode};

use tinct_document::{Document, NodeId, append_markdown, inner_html, to_html};
use tracing::debug;

use super::shared::{report_unresolved, target};
use crate::cli::{args::RenderCommand, context::CommandContext, output::colorize};

/// Tag of the element each appended file is loaded into.
const APPEND_TAG: &str = "section";

/// Highlights a document and prints it as HTML.
pub fn run(ctx: &CommandContext, cmd: &RenderCommand) -> ExitCode {
    let mut doc = match ctx.load_document(&cmd.file) {
        Ok(doc) => doc,
        Err(code) => return code,
    };
    let selector = cmd.highlight.selector.as_deref();
    let mut highlighter = ctx.highlighter(&cmd.highlight);
    let root_target = target(&doc, selector);
    if highlighter.highlight(&mut doc, root_target).is_none() {
        report_unresolved(selector);
        return ExitCode::FAILURE;
    }
    let Some(&root) = highlighter.marked_roots().last() else {
        report_unresolved(selector);
        return ExitCode::FAILURE;
    };

    for path in &cmd.append {
        if let Err(code) = append_file(ctx, &mut doc, root, path) {
            return code;
        }
        while let Some(report) = highlighter.process_notifications(&mut doc) {
            debug!(path = %path.display(), ?report, "highlighted appended content");
        }
    }
    highlighter.destroy(&mut doc);

    let body = doc.root();
    let html = if cmd.inner {
        inner_html(&doc, body)
    } else {
        to_html(&doc, body)
    };
    println!("{}", colorize(&html, "html"));
    ExitCode::SUCCESS
}

/// Loads `path` as markdown into a new element appended under `parent`.
fn append_file(
    ctx: &CommandContext,
    doc: &mut Document,
    parent: NodeId,
    path: &Path,
) -> Result<(), ExitCode> {
    let content = fs::read_to_string(ctx.cwd.join(path)).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        ExitCode::FAILURE
    })?;

    // Fill the section while detached so the insertion arrives as one record.
    let section = doc.create_element(APPEND_TAG);
    let inserted =
        append_markdown(doc, section, &content).and_then(|()| doc.append_child(parent, section));
    inserted.map_err(|e| {
        eprintln!("error: failed to append {}: {e}", path.display());
        ExitCode::FAILURE
    })
}
