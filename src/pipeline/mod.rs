//! The localization pipeline.
//!
//! Three cooperating pieces, in data-flow order:
//!
//! ```text
//! scan      →  which text nodes qualify (pure, read-only)
//! localize  →  rewrite them through the strategy (bulk passes)
//! sync      →  keep doing it as the document mutates (observer side)
//! ```
//!
//! [`crate::session::Session`] wires them to a document's observer
//! registry; the CLI drives the bulk passes directly for one-shot work.

pub mod localize;
pub mod scan;
pub mod sync;

pub use localize::{LocalizeStats, localize_attribute, localize_document, localize_subtree};
pub use scan::text_nodes_under;
pub use sync::MutationSync;
