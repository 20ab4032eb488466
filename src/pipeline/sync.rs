//! Live synchronization of mutations with the localization pass.
//!
//! The synchronizer is the observer callback of an active session. It
//! classifies each record and localizes the delta (only the delta), with
//! its own subscription suspended around every write, so its output never
//! feeds back into itself.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::config::LocalizeConfig;
use crate::debug;
use crate::dom::{Document, MutationRecord, ObserverId};

use super::localize::localize_subtree;

// =============================================================================
// Suspension
// =============================================================================

/// Disconnects an observer for exactly one scope.
///
/// Reconnects on drop, so early exits cannot leave the session parked in
/// the suspended state. Writes made through the guard deliver nothing to
/// the suspended observer; other observers still see them. The inverse
/// also holds: a write some other callback performs while the guard is
/// open is missed by the suspended observer, with no catch-up replay.
struct Suspension<'a> {
    doc: &'a mut Document,
    observer: ObserverId,
}

impl<'a> Suspension<'a> {
    fn begin(doc: &'a mut Document, observer: ObserverId) -> Self {
        doc.disconnect(observer);
        Self { doc, observer }
    }
}

impl Deref for Suspension<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        self.doc
    }
}

impl DerefMut for Suspension<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        self.doc
    }
}

impl Drop for Suspension<'_> {
    fn drop(&mut self) {
        self.doc.reconnect(self.observer);
    }
}

// =============================================================================
// Synchronizer
// =============================================================================

/// Reacts to mutation records by localizing what changed.
pub struct MutationSync {
    config: Rc<LocalizeConfig>,
}

impl MutationSync {
    pub fn new(config: Rc<LocalizeConfig>) -> Self {
        Self { config }
    }

    /// Processes one batch of records, in delivery order.
    ///
    /// `observer` must be the subscription this synchronizer runs under;
    /// it is suspended around each write bracket.
    pub fn handle(&self, doc: &mut Document, observer: ObserverId, records: &[MutationRecord]) {
        for record in records {
            match record {
                MutationRecord::ChildList { added, .. } => {
                    if added.is_empty() {
                        continue;
                    }
                    debug!("sync"; "localizing {} inserted node(s)", added.len());
                    let mut tree = Suspension::begin(doc, observer);
                    for &node in added {
                        localize_subtree(&mut tree, node, &self.config);
                    }
                }
                MutationRecord::CharacterData { target } => {
                    let Some(value) = doc.text(*target) else {
                        continue;
                    };
                    if value.is_empty() {
                        continue;
                    }
                    if doc
                        .parent_tag(*target)
                        .is_some_and(|tag| self.config.is_blacklisted(tag))
                    {
                        continue;
                    }
                    let Cow::Owned(localized) = self.config.strategy.transform(value) else {
                        continue;
                    };
                    let mut tree = Suspension::begin(doc, observer);
                    tree.set_text(*target, localized);
                }
                // Not subscribed; ignored even if a host delivers them.
                MutationRecord::Attribute { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::LocalizeOptions;
    use crate::dom::ObserveOptions;

    fn sync() -> MutationSync {
        MutationSync::new(Rc::new(LocalizeConfig::new(LocalizeOptions::default())))
    }

    /// Registers a counting observer over `root` and returns (id, count).
    fn counting_observer(
        doc: &mut Document,
        root: crate::dom::NodeId,
    ) -> (ObserverId, Rc<RefCell<usize>>) {
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        let id = doc.observe(
            root,
            ObserveOptions::content(),
            Rc::new(move |_, _, _| *sink.borrow_mut() += 1),
        );
        (id, count)
    }

    #[test]
    fn test_character_data_rewritten_under_suspension() {
        let mut doc = Document::parse("<div><p>Hi</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.children(div)[0];
        let text = doc.children(p)[0];
        let (id, count) = counting_observer(&mut doc, div);

        sync().handle(
            &mut doc,
            id,
            &[MutationRecord::CharacterData { target: text }],
        );

        assert_eq!(doc.text(text), Some("Ħī"));
        // The write happened while the observer was suspended.
        assert_eq!(*count.borrow(), 0);
        assert!(doc.is_observing(id));
    }

    #[test]
    fn test_added_subtrees_localized() {
        let mut doc = Document::parse("<div></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.create_element("p");
        let text = doc.create_text("Hello");
        doc.append_child(p, text).unwrap();
        doc.append_child(div, p).unwrap();
        let (id, count) = counting_observer(&mut doc, div);

        sync().handle(
            &mut doc,
            id,
            &[MutationRecord::ChildList {
                target: div,
                added: vec![p],
                removed: vec![],
            }],
        );

        assert_eq!(doc.text(text), Some("Ħḗŀŀǿ"));
        assert_eq!(*count.borrow(), 0);
        assert!(doc.is_observing(id));
    }

    #[test]
    fn test_removals_ignored() {
        let mut doc = Document::parse("<div><p>Hi</p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.children(div)[0];
        let (id, _) = counting_observer(&mut doc, div);

        sync().handle(
            &mut doc,
            id,
            &[MutationRecord::ChildList {
                target: div,
                added: vec![],
                removed: vec![p],
            }],
        );

        assert_eq!(doc.text_content(div), "Hi");
    }

    #[test]
    fn test_blacklisted_parent_change_ignored() {
        let mut doc = Document::parse("<style>.a{}</style>").unwrap();
        let style = doc.children(doc.root())[0];
        let text = doc.children(style)[0];
        let (id, _) = counting_observer(&mut doc, style);

        sync().handle(
            &mut doc,
            id,
            &[MutationRecord::CharacterData { target: text }],
        );

        assert_eq!(doc.text(text), Some(".a{}"));
    }

    #[test]
    fn test_degenerate_records_ignored() {
        let mut doc = Document::parse("<div><p></p></div>").unwrap();
        let div = doc.children(doc.root())[0];
        let p = doc.children(div)[0];
        let (id, _) = counting_observer(&mut doc, div);

        // An element target for a content change is nonsense; nothing
        // should happen, not even a suspension.
        sync().handle(&mut doc, id, &[MutationRecord::CharacterData { target: p }]);
        assert!(doc.is_observing(id));
    }
}
