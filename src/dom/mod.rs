//! An observable HTML document tree.
//!
//! [`Document`] is the host-side stand-in for a live DOM. It owns a node
//! arena plus an observer registry, and every write routes through
//! methods that mint [`MutationRecord`]s and hand them to matching
//! observers synchronously, before the write call returns. That gives
//! deterministic "insert, observe, react" sequencing without an event
//! loop, which is exactly what the localization pipeline needs.

mod html;
mod node;
mod observe;
mod parse;
mod render;
mod walk;

pub use node::{Attributes, NodeId, NodeKind};
pub use observe::{MutationRecord, ObserveOptions, ObserverCallback, ObserverId};
pub use walk::ScanDecision;

use node::NodeData;
use observe::ObserverRegistry;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Errors from building or editing a document.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("failed to parse HTML: {0}")]
    Parse(String),

    #[error("only elements can hold children")]
    NotAnElement,

    #[error("a node cannot be inserted into its own subtree")]
    Cycle,
}

// =============================================================================
// Document
// =============================================================================

/// A mutable HTML tree with synchronous mutation observation.
///
/// Nodes are arena-allocated and addressed by [`NodeId`]; ids remain
/// valid for the document's lifetime and are never reused. The tree
/// hangs off a synthetic `#document` root so that parsed fragments with
/// several top-level nodes still have a single parent.
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    doctype: Option<String>,
    observers: ObserverRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: just the synthetic root.
    pub fn new() -> Self {
        let root_data = NodeData::element("#document".to_string(), Attributes::new());
        Self {
            nodes: vec![root_data],
            root: NodeId(0),
            doctype: None,
            observers: ObserverRegistry::default(),
        }
    }

    /// Parses HTML into a fresh document.
    ///
    /// Accepts full documents and bare fragments alike; a leading
    /// doctype is remembered and re-emitted by [`Document::to_html`].
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut doc = Self::new();
        let (doctype, html) = split_doctype(input);
        doc.doctype = doctype.map(str::to_string);
        let top = parse::parse_fragment(&mut doc, html)?;
        for id in top {
            doc.attach(doc.root, id);
        }
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `<body>` element, when the document has one. Fragments
    /// usually do not; callers fall back to [`Document::root`].
    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    /// First element with the given tag name, in document order.
    pub fn find_element(&self, tag_name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if id != self.root && self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag_name)) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text { .. })
    }

    /// Tag name of an element, always lowercase. `None` for text and
    /// comment nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Value of a text node. `None` for elements and comments.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text { value } => Some(value),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Tag name of the parent element, if the node has one.
    pub fn parent_tag(&self, id: NodeId) -> Option<&str> {
        self.parent(id).and_then(|p| self.tag(p))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attributes, .. } => attributes.get(name),
            _ => None,
        }
    }

    /// Whether `node` sits inside the subtree rooted at `ancestor`
    /// (inclusive: a node contains itself).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Concatenated text of all text nodes under (and including) `id`,
    /// in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(value) = self.text(id) {
                out.push_str(value);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Every element carrying the named attribute, in document order.
    pub fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let NodeKind::Element { attributes, .. } = &self.nodes[id.0].kind {
                if attributes.contains(name) {
                    out.push(id);
                }
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub(crate) fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    // =========================================================================
    // Writes
    // =========================================================================
    //
    // Every method below that changes what an observer could see ends by
    // delivering a record. Node *creation* is silent: detached nodes are
    // invisible until something attaches them.

    /// Creates a detached element. Tag names are normalized to lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::element(tag.to_ascii_lowercase(), Attributes::new()))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::text(value.into()))
    }

    /// Appends `child` under `parent`, detaching it from any previous
    /// parent first, and reports one child-list record.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement);
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle);
        }
        self.attach(parent, child);
        self.deliver(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns false when `child` was
    /// not a child of `parent`; nothing is reported in that case.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        self.deliver(MutationRecord::ChildList {
            target: parent,
            added: Vec::new(),
            removed: vec![child],
        });
        true
    }

    /// Parses `html` and appends the resulting nodes under `parent`,
    /// reporting them all in a single child-list record. Returns the ids
    /// of the top-level inserted nodes.
    pub fn insert_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>, DomError> {
        if !self.is_element(parent) {
            return Err(DomError::NotAnElement);
        }
        let top = parse::parse_fragment(self, html)?;
        for &id in &top {
            self.attach(parent, id);
        }
        if !top.is_empty() {
            self.deliver(MutationRecord::ChildList {
                target: parent,
                added: top.clone(),
                removed: Vec::new(),
            });
        }
        Ok(top)
    }

    /// Overwrites the value of a text node and reports a character-data
    /// record. No-op for elements and comments.
    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        let NodeKind::Text { value: slot } = &mut self.nodes[id.0].kind else {
            return;
        };
        *slot = value.into();
        self.deliver(MutationRecord::CharacterData { target: id });
    }

    /// Sets an attribute on an element and reports an attribute record.
    /// No-op for text and comment nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind else {
            return;
        };
        attributes.set(name, value.into());
        self.deliver(MutationRecord::Attribute {
            target: id,
            name: name.to_ascii_lowercase(),
        });
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Registers an observer over the subtree at `root` and starts
    /// delivering matching records to `callback` immediately.
    pub fn observe(
        &mut self,
        root: NodeId,
        options: ObserveOptions,
        callback: ObserverCallback,
    ) -> ObserverId {
        self.observers.register(root, options, callback)
    }

    /// Stops delivery to an observer. Returns false for unknown ids.
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.set_active(id, false)
    }

    /// Resumes delivery to a disconnected observer. Writes made while it
    /// was disconnected are gone; nothing is replayed.
    pub fn reconnect(&mut self, id: ObserverId) -> bool {
        self.observers.set_active(id, true)
    }

    pub fn is_observing(&self, id: ObserverId) -> bool {
        self.observers.is_active(id)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    /// Links `child` under `parent` without reporting anything.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
    }

    /// Hands one record to every active observer whose root and options
    /// match. Matching is evaluated against the *current* observer state,
    /// so a callback that disconnects itself stops receiving records for
    /// its own writes mid-batch.
    fn deliver(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let subscribers = self.observers.subscribers(self, &record);
        let batch = std::slice::from_ref(&record);
        for (id, callback) in subscribers {
            callback(self, id, batch);
        }
    }
}

fn split_doctype(input: &str) -> (Option<&str>, &str) {
    let trimmed = input.trim_start();
    let starts_doctype = trimmed
        .get(..9)
        .is_some_and(|p| p.eq_ignore_ascii_case("<!doctype"));
    if starts_doctype {
        if let Some(end) = trimmed.find('>') {
            return (Some(&trimmed[..=end]), &trimmed[end + 1..]);
        }
    }
    (None, input)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_parse_builds_tree() {
        let doc = Document::parse("<div id=\"x\"><p>Hi</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.tag(div), Some("div"));
        assert_eq!(doc.attribute(div, "id"), Some("x"));
        let p = doc.children(div)[0];
        assert_eq!(doc.tag(p), Some("p"));
        assert_eq!(doc.text_content(p), "Hi");
    }

    #[test]
    fn test_parse_lowercases_tags() {
        let doc = Document::parse("<DIV><P>x</P></DIV>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.tag(div), Some("div"));
    }

    #[test]
    fn test_body_lookup() {
        let doc = Document::parse("<html><head></head><body><p>x</p></body></html>").unwrap();
        let body = doc.body().unwrap();
        assert_eq!(doc.tag(body), Some("body"));
        assert!(Document::parse("<p>fragment</p>").unwrap().body().is_none());
    }

    #[test]
    fn test_append_detaches_from_old_parent() {
        let mut doc = Document::parse("<div></div><span></span>").unwrap();
        let div = doc.children(doc.root())[0];
        let span = doc.children(doc.root())[1];
        let text = doc.create_text("moved");
        doc.append_child(div, text).unwrap();
        doc.append_child(span, text).unwrap();
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.children(span), [text]);
        assert_eq!(doc.parent(text), Some(span));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = Document::parse("<div><p></p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.children(div)[0];
        assert!(matches!(doc.append_child(p, div), Err(DomError::Cycle)));
    }

    #[test]
    fn test_append_rejects_text_parents() {
        let mut doc = Document::new();
        let text = doc.create_text("leaf");
        let child = doc.create_text("x");
        assert!(matches!(
            doc.append_child(text, child),
            Err(DomError::NotAnElement)
        ));
    }

    #[test]
    fn test_remove_child_detaches_and_reports() {
        let mut doc = Document::parse("<div><p>Hi</p><p>Bye</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let first = doc.children(div)[0];
        let seen: Rc<RefCell<Vec<MutationRecord>>> = Rc::default();
        let sink = Rc::clone(&seen);
        doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |_, _, records| sink.borrow_mut().extend_from_slice(records)),
        );

        assert!(doc.remove_child(div, first));
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.parent(first), None);
        assert_eq!(
            seen.borrow().as_slice(),
            [MutationRecord::ChildList {
                target: div,
                added: vec![],
                removed: vec![first],
            }]
        );

        // Not a child anymore: nothing changes, nothing is reported.
        assert!(!doc.remove_child(div, first));
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_observer_receives_child_list() {
        let mut doc = Document::parse("<div></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let seen: Rc<RefCell<Vec<MutationRecord>>> = Rc::default();
        let sink = Rc::clone(&seen);
        doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |_, _, records| sink.borrow_mut().extend_from_slice(records)),
        );

        let text = doc.create_text("new");
        doc.append_child(div, text).unwrap();

        let records = seen.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            MutationRecord::ChildList {
                target: div,
                added: vec![text],
                removed: vec![],
            }
        );
    }

    #[test]
    fn test_observer_scope_excludes_outside_writes() {
        let mut doc = Document::parse("<div id=\"in\"></div><div id=\"out\"></div>").unwrap();
        let inside = doc.children(doc.root())[0];
        let outside = doc.children(doc.root())[1];
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        doc.observe(
            inside,
            ObserveOptions::content(),
            Rc::new(move |_, _, _| *sink.borrow_mut() += 1),
        );

        let text = doc.create_text("elsewhere");
        doc.append_child(outside, text).unwrap();
        assert_eq!(*count.borrow(), 0);

        let text = doc.create_text("here");
        doc.append_child(inside, text).unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_character_data_record_for_nested_text() {
        let mut doc = Document::parse("<div><p>old</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.children(div)[0];
        let text = doc.children(p)[0];
        let seen: Rc<RefCell<Vec<MutationRecord>>> = Rc::default();
        let sink = Rc::clone(&seen);
        doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |_, _, records| sink.borrow_mut().extend_from_slice(records)),
        );

        doc.set_text(text, "new");
        assert_eq!(doc.text(text), Some("new"));
        assert_eq!(
            seen.borrow().as_slice(),
            [MutationRecord::CharacterData { target: text }]
        );
    }

    #[test]
    fn test_disconnected_observer_sees_nothing() {
        let mut doc = Document::parse("<div>x</div>").unwrap();
        let div = doc.children(doc.root())[0];
        let text = doc.children(div)[0];
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        let id = doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |_, _, _| *sink.borrow_mut() += 1),
        );

        doc.disconnect(id);
        doc.set_text(text, "hidden");
        assert_eq!(*count.borrow(), 0);

        doc.reconnect(id);
        doc.set_text(text, "visible");
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_callback_can_write_while_disconnected() {
        // The reaction pattern the pipeline relies on: disconnect self,
        // write, reconnect. The write must not re-enter the callback.
        let mut doc = Document::parse("<div></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let calls = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&calls);
        doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |doc, me, records| {
                *sink.borrow_mut() += 1;
                doc.disconnect(me);
                for record in records {
                    if let MutationRecord::ChildList { added, .. } = record {
                        for &node in added {
                            doc.set_text(node, "reacted");
                        }
                    }
                }
                doc.reconnect(me);
            }),
        );

        let text = doc.create_text("fresh");
        doc.append_child(div, text).unwrap();

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(doc.text(text), Some("reacted"));
    }

    #[test]
    fn test_insert_html_single_record() {
        let mut doc = Document::parse("<div></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let seen: Rc<RefCell<Vec<MutationRecord>>> = Rc::default();
        let sink = Rc::clone(&seen);
        doc.observe(
            div,
            ObserveOptions::content(),
            Rc::new(move |_, _, records| sink.borrow_mut().extend_from_slice(records)),
        );

        let added = doc.insert_html(div, "<p>a</p><p>b</p>").unwrap();
        assert_eq!(added.len(), 2);
        let records = seen.borrow();
        assert_eq!(records.len(), 1);
        let MutationRecord::ChildList { added: reported, .. } = &records[0] else {
            panic!("expected a child-list record");
        };
        assert_eq!(*reported, added);
    }

    #[test]
    fn test_doctype_survives_round_trip() {
        let doc = Document::parse("<!DOCTYPE html>\n<html><body>x</body></html>").unwrap();
        assert!(doc.to_html().starts_with("<!DOCTYPE html>"));
    }
}
