//! Mutation observation: records, options, and the observer registry.
//!
//! Observers subscribe to a subtree and are called back synchronously
//! after each write that matches their options. Delivery happens inside
//! the write call itself, with no deferred queue, so a callback always
//! sees the tree in the state that produced the record.

use std::rc::Rc;

use super::{Document, NodeId};

// =============================================================================
// Records
// =============================================================================

/// One observed change to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children were added to or removed from `target`.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// The value of the text node `target` was overwritten.
    CharacterData { target: NodeId },
    /// An attribute of the element `target` was set.
    Attribute { target: NodeId, name: String },
}

impl MutationRecord {
    /// The node the record is about. For child-list records this is the
    /// parent whose child list changed, not the children themselves.
    pub fn target(&self) -> NodeId {
        match self {
            Self::ChildList { target, .. }
            | Self::CharacterData { target }
            | Self::Attribute { target, .. } => *target,
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Selects which kinds of mutations an observer receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Deliver child-list records for watched nodes.
    pub child_list: bool,
    /// Deliver character-data records for watched text nodes.
    pub character_data: bool,
    /// Deliver attribute records for watched elements.
    pub attributes: bool,
    /// Watch the whole subtree under the root, not just the root itself.
    pub subtree: bool,
}

impl ObserveOptions {
    /// Child-list and character-data changes across the whole subtree.
    ///
    /// This is what the localization pipeline subscribes with: structural
    /// inserts and text edits matter, attribute churn does not.
    pub const fn content() -> Self {
        Self {
            child_list: true,
            character_data: true,
            attributes: false,
            subtree: true,
        }
    }

    fn matches(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::ChildList { .. } => self.child_list,
            MutationRecord::CharacterData { .. } => self.character_data,
            MutationRecord::Attribute { .. } => self.attributes,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Handle to a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Called with the document, the observer's own id, and the batch of
/// records. The id lets a callback disconnect and reconnect *itself*
/// around writes it makes, which is how the pipeline avoids reacting to
/// its own output.
pub type ObserverCallback = Rc<dyn Fn(&mut Document, ObserverId, &[MutationRecord])>;

pub(crate) struct ObserverEntry {
    id: ObserverId,
    root: NodeId,
    options: ObserveOptions,
    callback: ObserverCallback,
    active: bool,
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    entries: Vec<ObserverEntry>,
    next_id: u64,
}

impl ObserverRegistry {
    pub(crate) fn register(
        &mut self,
        root: NodeId,
        options: ObserveOptions,
        callback: ObserverCallback,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(ObserverEntry {
            id,
            root,
            options,
            callback,
            active: true,
        });
        id
    }

    /// Returns whether the id named a registered observer.
    pub(crate) fn set_active(&mut self, id: ObserverId, active: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.active = active;
                true
            }
            None => false,
        }
    }

    pub(crate) fn is_active(&self, id: ObserverId) -> bool {
        self.entries.iter().any(|e| e.id == id && e.active)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active observers whose root and options match the record.
    ///
    /// Callbacks are cloned out so the caller can invoke them while
    /// holding `&mut Document`.
    pub(crate) fn subscribers(
        &self,
        doc: &Document,
        record: &MutationRecord,
    ) -> Vec<(ObserverId, ObserverCallback)> {
        self.entries
            .iter()
            .filter(|e| e.active && e.options.matches(record))
            .filter(|e| {
                let target = record.target();
                target == e.root || (e.options.subtree && doc.contains(e.root, target))
            })
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect()
    }
}
