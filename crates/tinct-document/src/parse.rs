//! High-level loading API.
//!
//! Turns markdown or plain text into a fresh [`Document`] whose `body` root holds the
//! content.

use std::{fs, path::Path};

use tracing::{debug, warn};

use crate::{Document, DocumentError, NodeId, TreeError, build::append_markdown};

/// Parses markdown into a new document.
pub fn parse_markdown(content: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    if let Err(err) = append_markdown(&mut doc, root, content) {
        warn!(%err, "failed to build markdown tree");
    }
    doc
}

/// Parses plain text into a new document.
///
/// Each block of lines separated by blank lines becomes one `p` element holding the block's
/// text verbatim, interior newlines included.
pub fn parse_text(content: &str) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    for block in text_blocks(content) {
        if let Err(err) = append_paragraph(&mut doc, root, &block) {
            warn!(%err, "failed to append paragraph");
        }
    }
    doc
}

/// Appends `<p>text</p>` under `parent`.
fn append_paragraph(doc: &mut Document, parent: NodeId, text: &str) -> Result<(), TreeError> {
    let p = doc.create_element("p");
    let node = doc.create_text(text);
    doc.append_child(p, node)?;
    doc.append_child(parent, p)
}

/// Splits text into blank-line separated blocks.
fn text_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Loads a file from disk, detecting type by extension.
///
/// Supported extensions:
/// - `.md`, `.markdown` - parsed as markdown
/// - `.txt` - parsed as plain text
pub fn parse_file(path: &Path) -> Result<Document, DocumentError> {
    let parse = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("md" | "markdown") => parse_markdown,
        Some("txt") => parse_text,
        _ => {
            return Err(DocumentError::UnsupportedFileType {
                path: path.to_path_buf(),
            });
        }
    };

    let content = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let doc = parse(&content);
    debug!(path = %path.display(), nodes = doc.node_count(), "loaded document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_text_blocks() {
        let doc = parse_text("first line\nsecond line\n\n\n  \nnext block\n");
        let paragraphs = doc.children(doc.root());
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(doc.text_content(paragraphs[0]), "first line\nsecond line");
        assert_eq!(doc.text_content(paragraphs[1]), "next block");
    }

    #[test]
    fn test_parse_text_empty() {
        let doc = parse_text("\n \n");
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn test_parse_markdown_root_is_body() {
        let doc = parse_markdown("# Title\n\nBody text.");
        assert_eq!(doc.tag(doc.root()), Some("body"));
        assert_eq!(doc.children(doc.root()).len(), 2);
        assert_eq!(doc.text_content(doc.root()), "TitleBody text.");
    }

    #[test]
    fn test_parse_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let md = dir.path().join("notes.MD");
        fs::write(&md, "*hello*").unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "*hello*").unwrap();

        let doc = parse_file(&md).unwrap();
        assert!(doc.query_selector("em").unwrap().is_some());

        let doc = parse_file(&txt).unwrap();
        assert!(doc.query_selector("em").unwrap().is_none());
        assert_eq!(doc.text_content(doc.root()), "*hello*");
    }

    #[test]
    fn test_parse_file_errors() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("page.html");
        fs::write(&html, "<p>x</p>").unwrap();
        assert!(matches!(
            parse_file(&html),
            Err(DocumentError::UnsupportedFileType { .. })
        ));

        let missing = dir.path().join("missing.md");
        assert!(matches!(
            parse_file(&missing),
            Err(DocumentError::ReadFile { .. })
        ));
    }
}
