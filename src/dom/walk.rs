//! Depth-first text-node traversal with per-node filtering.

use super::{Document, NodeId};

/// Verdict a filter returns for each node during [`Document::walk_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// Collect this node (only text nodes are ever collected).
    Accept,
    /// Pass over this node but keep descending into its children.
    Skip,
    /// Drop this node and everything underneath it.
    SkipSubtree,
}

impl Document {
    /// Walks the subtree under `root` in document order, consulting
    /// `decide` for every descendant, and returns the accepted text nodes.
    ///
    /// The root itself is not visited; callers that need to handle a bare
    /// text node check for it before walking.
    pub fn walk_text<F>(&self, root: NodeId, mut decide: F) -> Vec<NodeId>
    where
        F: FnMut(&Document, NodeId) -> ScanDecision,
    {
        let mut accepted = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let verdict = decide(self, id);
            if verdict == ScanDecision::SkipSubtree {
                continue;
            }
            if verdict == ScanDecision::Accept && self.is_text(id) {
                accepted.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse("<div><p>one</p><style>.a{}</style><p>two<b>three</b></p></div>")
            .unwrap()
    }

    #[test]
    fn test_walk_collects_in_document_order() {
        let doc = sample();
        let texts = doc.walk_text(doc.root(), |_, _| ScanDecision::Accept);
        let values: Vec<&str> = texts.iter().map(|&id| doc.text(id).unwrap()).collect();
        assert_eq!(values, ["one", ".a{}", "two", "three"]);
    }

    #[test]
    fn test_walk_skip_subtree_prunes_descendants() {
        let doc = sample();
        let texts = doc.walk_text(doc.root(), |doc, id| match doc.tag(id) {
            Some("style") => ScanDecision::SkipSubtree,
            Some(_) => ScanDecision::Skip,
            None => ScanDecision::Accept,
        });
        let values: Vec<&str> = texts.iter().map(|&id| doc.text(id).unwrap()).collect();
        assert_eq!(values, ["one", "two", "three"]);
    }

    #[test]
    fn test_walk_does_not_visit_root() {
        let doc = Document::parse("<p>alone</p>").unwrap();
        let p = doc.children(doc.root())[0];
        let mut seen = Vec::new();
        doc.walk_text(p, |_, id| {
            seen.push(id);
            ScanDecision::Accept
        });
        assert!(!seen.contains(&p));
        assert_eq!(seen.len(), 1);
    }
}
