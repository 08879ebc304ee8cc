//! Tree construction from markdown content.
//!
//! Walks the pulldown-cmark event stream and mirrors it as elements and text nodes under a
//! parent element. Adjacent text events are merged into one text node, soft breaks become
//! newlines, and raw HTML is kept as literal text rather than interpreted.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::{Document, NodeId, error::TreeError, slug::Slugifier};

/// Markdown extensions enabled when loading.
fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Converts a pulldown_cmark HeadingLevel to a u8 (1-6).
fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Mutable state while replaying events into the tree.
struct Builder<'a> {
    /// Tree being filled.
    doc: &'a mut Document,
    /// Open elements, innermost last. The first entry is the caller's parent.
    stack: Vec<NodeId>,
    /// For every open markdown tag, how many entries it pushed on `stack`.
    opened: Vec<usize>,
    /// True between the start and end of a table header row.
    in_table_head: bool,
    /// Heading anchors for this document.
    slugs: Slugifier,
}

impl Builder<'_> {
    /// Innermost open element.
    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    /// Appends a new element to the current one without opening it.
    fn leaf(&mut self, tag: &str) -> Result<NodeId, TreeError> {
        let el = self.doc.create_element(tag);
        self.doc.append_child(self.current(), el)?;
        Ok(el)
    }

    /// Opens a chain of nested elements for one markdown tag; returns the innermost.
    fn open(&mut self, tags: &[&str]) -> Result<NodeId, TreeError> {
        for tag in tags {
            let el = self.leaf(tag)?;
            self.stack.push(el);
        }
        self.opened.push(tags.len());
        Ok(self.current())
    }

    /// Closes the elements opened for the innermost markdown tag; returns the outermost.
    fn close(&mut self) -> Option<NodeId> {
        let count = self.opened.pop()?;
        let mut outer = None;
        for _ in 0..count {
            outer = self.stack.pop();
        }
        outer
    }

    /// Appends text to the current element, merging with a trailing text node.
    fn text(&mut self, text: &str) -> Result<(), TreeError> {
        if text.is_empty() {
            return Ok(());
        }
        let parent = self.current();
        if let Some(&last) = self.doc.children(parent).last()
            && let Some(existing) = self.doc.text(last)
        {
            let merged = format!("{existing}{text}");
            self.doc.set_text(last, &merged);
            return Ok(());
        }
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node)
    }

    /// Handles the start of a markdown tag.
    fn start(&mut self, tag: Tag<'_>) -> Result<(), TreeError> {
        match tag {
            Tag::Paragraph => {
                self.open(&["p"])?;
            }
            Tag::Heading { level, .. } => {
                let tag = format!("h{}", heading_level_to_u8(level));
                self.open(&[&tag])?;
            }
            Tag::BlockQuote(_) => {
                self.open(&["blockquote"])?;
            }
            Tag::CodeBlock(kind) => {
                let code = self.open(&["pre", "code"])?;
                if let CodeBlockKind::Fenced(lang) = kind
                    && let Some(lang) = lang.split_whitespace().next()
                {
                    self.doc
                        .set_attribute(code, "class", &format!("language-{lang}"));
                }
            }
            Tag::List(Some(start)) => {
                let ol = self.open(&["ol"])?;
                if start != 1 {
                    self.doc.set_attribute(ol, "start", &start.to_string());
                }
            }
            Tag::List(None) => {
                self.open(&["ul"])?;
            }
            Tag::Item => {
                self.open(&["li"])?;
            }
            Tag::Table(_) => {
                self.open(&["table"])?;
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.open(&["thead", "tr"])?;
            }
            Tag::TableRow => {
                self.open(&["tr"])?;
            }
            Tag::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                self.open(&[tag])?;
            }
            Tag::Emphasis => {
                self.open(&["em"])?;
            }
            Tag::Strong => {
                self.open(&["strong"])?;
            }
            Tag::Strikethrough => {
                self.open(&["del"])?;
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let a = self.open(&["a"])?;
                self.doc.set_attribute(a, "href", &dest_url);
                if !title.is_empty() {
                    self.doc.set_attribute(a, "title", &title);
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let img = self.open(&["img"])?;
                self.doc.set_attribute(img, "src", &dest_url);
                if !title.is_empty() {
                    self.doc.set_attribute(img, "title", &title);
                }
            }
            Tag::HtmlBlock => self.opened.push(0),
            _ => {
                self.open(&["div"])?;
            }
        }
        Ok(())
    }

    /// Handles the end of a markdown tag.
    fn end(&mut self, tag: TagEnd) -> Result<(), TreeError> {
        let Some(outer) = self.close() else {
            return Ok(());
        };
        match tag {
            TagEnd::Heading(_) => {
                let slug = self.slugs.slugify(&self.doc.text_content(outer));
                self.doc.set_attribute(outer, "id", &slug);
            }
            TagEnd::TableHead => self.in_table_head = false,
            TagEnd::Image => {
                // Alt text arrives as inline events; fold it into the attribute.
                let alt = self.doc.text_content(outer);
                for child in self.doc.children(outer).to_vec() {
                    self.doc.remove(child);
                }
                self.doc.set_attribute(outer, "alt", &alt);
            }
            _ => {}
        }
        Ok(())
    }

    /// Handles one event.
    fn event(&mut self, event: Event<'_>) -> Result<(), TreeError> {
        match event {
            Event::Start(tag) => self.start(tag)?,
            Event::End(tag) => self.end(tag)?,
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.text(&text)?;
            }
            Event::Code(text) => {
                let code = self.leaf("code")?;
                let node = self.doc.create_text(&text);
                self.doc.append_child(code, node)?;
            }
            Event::SoftBreak => self.text("\n")?,
            Event::HardBreak => {
                self.leaf("br")?;
            }
            Event::Rule => {
                self.leaf("hr")?;
            }
            Event::TaskListMarker(checked) => {
                let input = self.leaf("input")?;
                self.doc.set_attribute(input, "type", "checkbox");
                self.doc.set_attribute(input, "disabled", "");
                if checked {
                    self.doc.set_attribute(input, "checked", "");
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Appends the markdown `content` as children of `parent`.
///
/// Fails only if `parent` is not an element.
pub fn append_markdown(doc: &mut Document, parent: NodeId, content: &str) -> Result<(), TreeError> {
    if !doc.is_element(parent) {
        return Err(TreeError::NotAnElement(parent));
    }
    let mut builder = Builder {
        doc,
        stack: vec![parent],
        opened: Vec::new(),
        in_table_head: false,
        slugs: Slugifier::new(),
    };
    for event in Parser::new_ext(content, parser_options()) {
        builder.event(event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::inner_html;

    fn build(content: &str) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        append_markdown(&mut doc, root, content).unwrap();
        doc
    }

    fn html(content: &str) -> String {
        let doc = build(content);
        inner_html(&doc, doc.root())
    }

    #[test]
    fn test_paragraphs_and_inline() {
        assert_eq!(
            html("Hello *big* **bold** ~~old~~ `code`\n\nSecond"),
            "<p>Hello <em>big</em> <strong>bold</strong> <del>old</del> <code>code</code></p>\
             <p>Second</p>"
        );
    }

    #[test]
    fn test_headings_get_unique_ids() {
        assert_eq!(
            html("# Intro\n\n## Intro\n\n### `Code` Title"),
            "<h1 id=\"intro\">Intro</h1><h2 id=\"intro-1\">Intro</h2>\
             <h3 id=\"code-title\"><code>Code</code> Title</h3>"
        );
    }

    #[test]
    fn test_soft_break_merges_into_one_text_node() {
        let doc = build("line one\nline two");
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "line one\nline two");
    }

    #[test]
    fn test_code_block_and_lists() {
        assert_eq!(
            html("```rust\nfn main() {}\n```\n\n3. three\n4. four\n\n- a\n- b"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\
             <ol start=\"3\"><li>three</li><li>four</li></ol>\
             <ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            html("[site](https://x.test \"Home\") ![a cat](cat.png)"),
            "<p><a href=\"https://x.test\" title=\"Home\">site</a> \
             <img src=\"cat.png\" alt=\"a cat\"></p>"
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            html("| a | b |\n|---|---|\n| 1 | 2 |"),
            "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tr><td>1</td><td>2</td></tr></table>"
        );
    }

    #[test]
    fn test_task_list_and_rule() {
        assert_eq!(
            html("- [x] done\n\n---"),
            "<ul><li><input type=\"checkbox\" disabled=\"\" checked=\"\">done</li></ul><hr>"
        );
    }

    #[test]
    fn test_raw_html_is_text() {
        let doc = build("<div>hi</div>");
        assert_eq!(doc.text_content(doc.root()).trim_end(), "<div>hi</div>");
        assert!(doc.query_selector("div").unwrap().is_none());
    }

    #[test]
    fn test_text_parent_rejected() {
        let mut doc = Document::new();
        let text = doc.create_text("x");
        assert_eq!(
            append_markdown(&mut doc, text, "hi"),
            Err(TreeError::NotAnElement(text))
        );
    }
}
