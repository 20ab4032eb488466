//! HTML parsing on top of `tl`.
//!
//! Nodes are converted straight into the document's arena, detached;
//! the caller decides where they hang. Entity references are decoded
//! here so the tree holds plain text, except inside raw text elements
//! where the source bytes are kept verbatim.

use super::html::{is_raw_text_element, unescape};
use super::node::{Attributes, NodeData};
use super::{Document, DomError, NodeId};

/// Parses `html` and allocates the resulting nodes in `doc`, returning
/// the top-level ids in source order. Nothing is attached and no records
/// are produced.
pub(crate) fn parse_fragment(doc: &mut Document, html: &str) -> Result<Vec<NodeId>, DomError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| DomError::Parse(e.to_string()))?;
    let parser = dom.parser();

    let mut top = Vec::new();
    for handle in dom.children() {
        if let Some(id) = convert(doc, *handle, parser, false) {
            top.push(id);
        }
    }
    Ok(top)
}

/// Converts one `tl` node (and its subtree) into arena nodes.
///
/// `raw_text` is true while descending through `<script>`/`<style>`,
/// whose content must not have entities decoded.
fn convert(
    doc: &mut Document,
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    raw_text: bool,
) -> Option<NodeId> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_lowercase();

            let mut attributes = Attributes::new();
            for (key, value) in tag.attributes().iter() {
                let value = value
                    .map(|v| unescape(v.as_ref()).into_owned())
                    .unwrap_or_default();
                attributes.set(key.as_ref(), value);
            }

            let raw_children = is_raw_text_element(&name);
            let id = doc.alloc(NodeData::element(name, attributes));

            for child_handle in tag.children().top().iter() {
                if let Some(child) = convert(doc, *child_handle, parser, raw_children) {
                    doc.attach(id, child);
                }
            }

            Some(id)
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            let value = if raw_text {
                text.into_owned()
            } else {
                unescape(&text).into_owned()
            };
            Some(doc.alloc(NodeData::text(value)))
        }
        tl::Node::Comment(bytes) => {
            let raw = bytes.as_utf8_str();
            let inner = raw
                .strip_prefix("<!--")
                .and_then(|s| s.strip_suffix("-->"))
                .unwrap_or(&raw);
            Some(doc.alloc(NodeData::comment(inner.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Document;

    #[test]
    fn test_entities_decoded_in_text() {
        let doc = Document::parse("<p>a &amp; b</p>").unwrap();
        let p = doc.children(doc.root())[0];
        assert_eq!(doc.text_content(p), "a & b");
    }

    #[test]
    fn test_entities_kept_in_raw_text() {
        let doc = Document::parse("<style>a &amp; b</style>").unwrap();
        let style = doc.children(doc.root())[0];
        assert_eq!(doc.text_content(style), "a &amp; b");
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let doc = Document::parse("<input placeholder=\"Tom &amp; Jerry\">").unwrap();
        let input = doc.children(doc.root())[0];
        assert_eq!(doc.attribute(input, "placeholder"), Some("Tom & Jerry"));
    }

    #[test]
    fn test_comments_preserved() {
        let doc = Document::parse("<div><!-- note --><p>x</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.children(div).len(), 2);
        assert_eq!(doc.text_content(div), "x");
    }

    #[test]
    fn test_whitespace_text_nodes_kept() {
        let doc = Document::parse("<div>\n  <p>x</p>\n</div>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.children(div).len(), 3);
    }
}
