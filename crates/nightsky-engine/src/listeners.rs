//! Passive viewport listener bookkeeping

use crate::error::NightskyError;
use crate::platform::{ListenerHost, ListenerId, ListenerOptions, ViewportEventKind};

/// Attaches viewport listeners with passive semantics and detaches them all
/// on teardown
#[derive(Debug, Default)]
pub struct PassiveListenerRegistrar {
    attached: Vec<(ViewportEventKind, ListenerId)>,
}

impl PassiveListenerRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a passive listener for `kind`. Nothing is recorded on failure.
    pub fn attach(
        &mut self,
        host: &mut dyn ListenerHost,
        kind: ViewportEventKind,
    ) -> Result<ListenerId, NightskyError> {
        let id = host.add_listener(kind, ListenerOptions::PASSIVE)?;
        self.attached.push((kind, id));
        Ok(id)
    }

    /// Remove every registered listener. Safe to call repeatedly.
    pub fn detach_all(&mut self, host: &mut dyn ListenerHost) {
        for (_, id) in self.attached.drain(..) {
            host.remove_listener(id);
        }
    }

    pub fn is_attached(&self, kind: ViewportEventKind) -> bool {
        self.attached.iter().any(|(k, _)| *k == kind)
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}
