//! Serialization back to HTML.

use super::html::{escape, is_raw_text_element, is_void_element};
use super::node::NodeKind;
use super::{Document, NodeId};

impl Document {
    /// Serializes the whole document, re-emitting any doctype the source
    /// carried.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
            out.push('\n');
        }
        for &child in self.children(self.root) {
            self.render_node(child, &mut out);
        }
        out
    }

    /// Serializes one subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_node(id, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text { value } => out.push_str(&escape(value)),
            NodeKind::Comment { text } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes.iter() {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape(value));
                        out.push('"');
                    }
                }
                out.push('>');

                if is_void_element(tag) {
                    return;
                }

                // Raw text content goes out exactly as stored.
                let raw = is_raw_text_element(tag);
                for &child in self.children(id) {
                    match self.kind(child) {
                        NodeKind::Text { value } if raw => out.push_str(value),
                        _ => self.render_node(child, out),
                    }
                }

                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    #[test]
    fn test_render_escapes_text() {
        let mut doc = Document::parse("<p></p>").unwrap();
        let p = doc.children(doc.root())[0];
        let text = doc.create_text("a < b & c");
        doc.append_child(p, text).unwrap();
        assert_eq!(doc.to_html(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_render_keeps_raw_text_verbatim() {
        let html = "<style>.a > .b {}</style>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_render_void_elements() {
        let doc = Document::parse("<p>a<br>b</p>").unwrap();
        assert_eq!(doc.to_html(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_render_attributes() {
        let mut doc = Document::parse("<input>").unwrap();
        let input = doc.children(doc.root())[0];
        doc.set_attribute(input, "type", "text");
        doc.set_attribute(input, "placeholder", "Name");
        doc.set_attribute(input, "disabled", "");
        assert_eq!(
            doc.to_html(),
            "<input type=\"text\" placeholder=\"Name\" disabled>"
        );
    }

    #[test]
    fn test_render_comments() {
        let doc = Document::parse("<div><!-- keep me --></div>").unwrap();
        assert_eq!(doc.to_html(), "<div><!-- keep me --></div>");
    }

    #[test]
    fn test_outer_html_serializes_one_subtree() {
        let doc = Document::parse("<div><p>Hi <b>there</b></p><p>skip</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let first = doc.children(div)[0];
        assert_eq!(doc.outer_html(first), "<p>Hi <b>there</b></p>");
        assert_eq!(doc.outer_html(div), "<div><p>Hi <b>there</b></p><p>skip</p></div>");
    }
}
