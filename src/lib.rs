//! Pseudoloc - live pseudo-localization for HTML documents.
//!
//! Runs every visible text through a pluggable transformation strategy
//! (`"Account Settings"` -> `"Ȧƈƈǿŭƞŧ Şḗŧŧīƞɠş"`) so layout and
//! text-handling bugs surface without waiting for real translations. A
//! [`Session`] localizes the whole document once at start, then keeps it
//! localized as the document changes, without ever re-transforming its own
//! writes.
//!
//! ```
//! use pseudoloc::{Document, LocalizeOptions, Session};
//!
//! let mut doc = Document::parse("<body><p>Hello</p></body>")?;
//! let mut session = Session::new();
//! session.start(&mut doc, LocalizeOptions::default());
//! assert!(doc.to_html().contains("Ħḗŀŀǿ"));
//!
//! // Content inserted later is caught by the live synchronizer.
//! doc.insert_html(doc.body().unwrap(), "<p>Settings</p>")?;
//! assert!(doc.to_html().contains("Şḗŧŧīƞɠş"));
//!
//! session.stop(&mut doc);
//! # Ok::<(), pseudoloc::DomError>(())
//! ```

pub mod config;
pub mod dom;
pub mod logger;
pub mod pipeline;
pub mod session;
pub mod strategy;

pub use config::{ConfigError, FileConfig, LocalizeConfig, LocalizeOptions, Overrides};
pub use dom::{Document, DomError, MutationRecord, NodeId, ObserveOptions, ObserverId};
pub use pipeline::LocalizeStats;
pub use session::Session;
pub use strategy::{Strategy, StrategyKind};
