//! Dispatches framed messages by method tag.

use tokio::sync::mpsc;

use crate::diagnostics;
use crate::imports::ImportTable;
use crate::protocol::{self, ServerMessage};
use crate::types::{ClientEvent, Diagnostic};

/// Routes each framed message to its handler.
///
/// Owned by the session's reader task; every client-side reaction to
/// analyzer output funnels through [`NotificationRouter::route`], one
/// message at a time, in arrival order.
pub(crate) struct NotificationRouter {
    unresolved_marker: String,
    imports: ImportTable,
    event_tx: mpsc::Sender<ClientEvent>,
}

impl NotificationRouter {
    pub fn new(
        unresolved_marker: String,
        imports: ImportTable,
        event_tx: mpsc::Sender<ClientEvent>,
    ) -> Self {
        Self {
            unresolved_marker,
            imports,
            event_tx,
        }
    }

    /// Dispatch one framed message.
    ///
    /// Unknown methods are ignored so new analyzer notification types never
    /// crash the client.
    pub async fn route(&self, frame: &serde_json::Value) {
        match protocol::classify(frame) {
            Some(ServerMessage::PublishDiagnostics(params)) => {
                let items: Vec<Diagnostic> = params
                    .diagnostics
                    .iter()
                    .map(protocol::WireDiagnostic::to_diagnostic)
                    .collect();
                self.on_diagnostics(&items).await;
            }
            Some(ServerMessage::Other { method }) => {
                tracing::trace!("Ignoring analyzer notification: {method}");
            }
            None => {
                tracing::trace!("Ignoring unclassifiable analyzer frame");
            }
        }
    }

    async fn on_diagnostics(&self, items: &[Diagnostic]) {
        let unresolved = diagnostics::find_unresolved(items, &self.unresolved_marker);
        if unresolved.is_empty() {
            return;
        }

        let _ = self
            .event_tx
            .send(ClientEvent::UnresolvedSymbols {
                count: unresolved.len(),
            })
            .await;

        let paths = self.imports.resolve(&unresolved);
        let event = if paths.is_empty() {
            // Tell the UI there is nothing to offer rather than presenting
            // an empty choice list.
            ClientEvent::NoSuggestions
        } else {
            ClientEvent::ImportChoices { paths }
        };
        let _ = self.event_tx.send(event).await;
    }
}
