//! Eligible-text scanning.
//!
//! Read-only: decides *which* text nodes a localization pass may touch,
//! in document order. Writing is someone else's job.

use crate::config::LocalizeConfig;
use crate::dom::{Document, NodeId, ScanDecision};

/// Text nodes under `root` that a localization pass should rewrite.
///
/// Two filters, applied in order to every candidate:
///
/// 1. whitespace: values with no non-whitespace character are dropped;
/// 2. denylist: values whose parent tag is blacklisted are dropped, and
///    a blacklisted *element* prunes its entire subtree.
///
/// A `root` that is itself a text node short-circuits: it is returned
/// as the single candidate with no filtering at all, mirroring how a
/// caller that already holds a text node has already decided it is
/// interesting.
pub fn text_nodes_under(doc: &Document, root: NodeId, config: &LocalizeConfig) -> Vec<NodeId> {
    if doc.is_text(root) {
        return vec![root];
    }

    doc.walk_text(root, |doc, id| {
        if let Some(tag) = doc.tag(id) {
            if config.is_blacklisted(tag) {
                return ScanDecision::SkipSubtree;
            }
            return ScanDecision::Skip;
        }

        let value = doc.text(id).unwrap_or_default();
        if !value.chars().any(|c| !c.is_whitespace()) {
            return ScanDecision::Skip;
        }
        // Catches text directly under a blacklisted root, which the
        // element arm above never sees.
        if doc.parent_tag(id).is_some_and(|tag| config.is_blacklisted(tag)) {
            return ScanDecision::Skip;
        }

        ScanDecision::Accept
    })
}
