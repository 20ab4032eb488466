//! Bulk localization passes.
//!
//! These write through [`Document`]'s observed mutators, so running them
//! while an observer is connected *will* produce records. Callers that
//! must not see their own writes (the synchronizer) suspend first.

use crate::config::LocalizeConfig;
use crate::debug;
use crate::dom::{Document, NodeId};

use super::scan::text_nodes_under;

/// What a localization pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalizeStats {
    /// Text nodes whose value changed.
    pub text_nodes: usize,
    /// Attribute values that changed.
    pub attributes: usize,
}

impl LocalizeStats {
    pub fn merge(&mut self, other: Self) {
        self.text_nodes += other.text_nodes;
        self.attributes += other.attributes;
    }
}

/// Localizes every eligible text node under `root`.
///
/// Returns how many nodes were rewritten. Nodes the strategy leaves
/// unchanged are not written back, so no-op passes stay silent.
pub fn localize_subtree(doc: &mut Document, root: NodeId, config: &LocalizeConfig) -> usize {
    let candidates = text_nodes_under(doc, root, config);
    let mut rewritten = 0;

    for id in candidates {
        let localized = match doc.text(id) {
            Some(value) if !value.is_empty() => config.strategy.transform(value),
            _ => continue,
        };
        let std::borrow::Cow::Owned(localized) = localized else {
            continue;
        };
        doc.set_text(id, localized);
        rewritten += 1;
    }

    rewritten
}

/// Localizes the value of `attribute` on every element carrying it.
pub fn localize_attribute(doc: &mut Document, attribute: &str, config: &LocalizeConfig) -> usize {
    let mut rewritten = 0;

    for id in doc.elements_with_attribute(attribute) {
        let localized = match doc.attribute(id, attribute) {
            Some(value) => config.strategy.transform(value),
            None => continue,
        };
        let std::borrow::Cow::Owned(localized) = localized else {
            continue;
        };
        doc.set_attribute(id, attribute, localized);
        rewritten += 1;
    }

    rewritten
}

/// The full activation pass: body content first, then each configured
/// attribute document-wide. Fragments without a `<body>` are processed
/// from the root.
pub fn localize_document(doc: &mut Document, config: &LocalizeConfig) -> LocalizeStats {
    let root = doc.body().unwrap_or_else(|| doc.root());

    let mut stats = LocalizeStats {
        text_nodes: localize_subtree(doc, root, config),
        attributes: 0,
    };
    for attribute in &config.attributes {
        stats.attributes += localize_attribute(doc, attribute, config);
    }

    debug!(
        "localize";
        "pass rewrote {} text nodes, {} attributes",
        stats.text_nodes,
        stats.attributes
    );
    stats
}
