//! Session lifecycle: start and stop live localization on a document.

use std::rc::Rc;

use crate::config::{LocalizeConfig, LocalizeOptions};
use crate::debug;
use crate::dom::{Document, ObserveOptions, ObserverId};
use crate::pipeline::{LocalizeStats, MutationSync, localize_document};

/// One live pseudo-localization session.
///
/// The session owns nothing but its subscription handle; configuration
/// lives inside the synchronizer registered with the document. Dropping
/// a started session does not unsubscribe it; call [`Session::stop`]
/// (or drop the document) to end delivery.
#[derive(Default)]
pub struct Session {
    observer: Option<ObserverId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) live localization.
    ///
    /// Runs the full activation pass (body text, then each configured
    /// attribute) and subscribes the synchronizer to the body's subtree
    /// (the whole tree for fragments without a `<body>`). A previous
    /// subscription is released first, so calling `start` twice never
    /// double-localizes an insert.
    ///
    /// Returns what the activation pass rewrote.
    pub fn start(&mut self, doc: &mut Document, options: LocalizeOptions) -> LocalizeStats {
        if let Some(previous) = self.observer.take() {
            doc.disconnect(previous);
        }

        let config = Rc::new(LocalizeConfig::new(options));
        let stats = localize_document(doc, &config);

        let root = doc.body().unwrap_or_else(|| doc.root());
        let sync = MutationSync::new(Rc::clone(&config));
        let id = doc.observe(
            root,
            ObserveOptions::content(),
            Rc::new(move |doc, observer, records| sync.handle(doc, observer, records)),
        );
        self.observer = Some(id);

        debug!("session"; "started, observing from {:?}", root);
        stats
    }

    /// Ends the session. Localized content stays as-is; there is no
    /// rollback. No-op when not started.
    pub fn stop(&mut self, doc: &mut Document) {
        if let Some(observer) = self.observer.take() {
            doc.disconnect(observer);
            debug!("session"; "stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.observer.is_some()
    }
}
