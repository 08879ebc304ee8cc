//! HTML serialization.

use crate::{Document, NodeId, node::NodeData};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Serializes a node and its subtree as HTML.
pub fn to_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serializes the children of a node as HTML.
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(node) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Appends the HTML for `node` to `out`.
fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let el = match doc.data(node) {
        NodeData::Text(text) => {
            escape_text(text, out);
            return;
        }
        NodeData::Element(el) => el,
    };

    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        write_attribute(name, value, out);
    }
    if !el.style.is_empty() {
        write_attribute("style", &el.style_text(), out);
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }
    for &child in doc.children(node) {
        write_node(doc, child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

/// Appends ` name="value"` with the value escaped.
fn write_attribute(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// Appends character data with markup characters escaped.
fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("a");
        doc.set_attribute(a, "title", "say \"hi\" & <bye>");
        let text = doc.create_text("1 < 2 & \"ok\"");
        doc.append_child(root, a).unwrap();
        doc.append_child(a, text).unwrap();

        assert_eq!(
            to_html(&doc, root),
            "<body><a title=\"say &quot;hi&quot; &amp; &lt;bye&gt;\">1 &lt; 2 &amp; \"ok\"</a></body>"
        );
    }

    #[test]
    fn test_style_and_void_elements() {
        let mut doc = Document::new();
        let root = doc.root();
        let span = doc.create_element("span");
        doc.set_style(span, "background-color", "yellow");
        doc.set_attribute(span, "data-highlighted", "true");
        let br = doc.create_element("br");
        let child = doc.create_text("x");
        doc.append_child(br, child).unwrap();
        doc.append_child(root, span).unwrap();
        doc.append_child(root, br).unwrap();

        assert_eq!(
            inner_html(&doc, root),
            "<span data-highlighted=\"true\" style=\"background-color: yellow\"></span><br>"
        );
    }

    #[test]
    fn test_text_node_alone() {
        let mut doc = Document::new();
        let text = doc.create_text("a>b");
        assert_eq!(to_html(&doc, text), "a&gt;b");
    }
}
