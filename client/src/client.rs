//! `AnalyzerClient` facade — the single entry point for the embedding
//! editor layer.
//!
//! Construction IS initialization: `start()` spawns the analyzer. No
//! two-phase init, no `started` flag.

use std::path::Path;

use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::imports::ImportEdit;
use crate::protocol::{self, Notification};
use crate::session::AnalyzerSession;
use crate::types::{AnalyzerConfig, ClientEvent, SessionState};

/// Channel capacity for events flowing from the session tasks to the UI.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Supervises one analyzer subprocess and surfaces its decisions as
/// [`ClientEvent`]s for a UI layer to render.
///
/// At most one session exists per client. A stopped or crashed session is
/// dropped when its stop event is observed; there is no restart policy.
pub struct AnalyzerClient {
    config: AnalyzerConfig,
    session: Option<AnalyzerSession>,
    event_rx: mpsc::Receiver<ClientEvent>,
    event_tx: mpsc::Sender<ClientEvent>,
}

impl AnalyzerClient {
    /// Spawn the configured analyzer and return the running client.
    pub fn start(config: AnalyzerConfig) -> Result<Self, ClientError> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session = AnalyzerSession::spawn(&config, event_tx.clone())?;
        Ok(Self {
            config,
            session: Some(session),
            event_rx,
            event_tx,
        })
    }

    /// Ask the analyzer to analyze `path` by opening it as a document.
    pub async fn analyze_file(&mut self, path: &Path) -> Result<(), ClientError> {
        let session = self.session.as_mut().ok_or(ClientError::Write)?;
        let uri = protocol::path_to_file_uri(path)
            .ok_or_else(|| ClientError::InvalidPath(path.to_path_buf()))?;
        let notification = Notification::new(
            "textDocument/didOpen",
            protocol::did_open_params(uri.as_str(), "dart", 1, ""),
        );
        let frame = serde_json::to_value(&notification)?;
        session.send(frame).await
    }

    /// Drain up to `budget` pending events without blocking.
    pub fn poll_events(&mut self, budget: usize) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while events.len() < budget {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    self.observe(&event);
                    events.push(event);
                }
                Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => {
                    break;
                }
            }
        }
        events
    }

    /// Wait for the next event.
    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        let event = self.event_rx.recv().await?;
        self.observe(&event);
        Some(event)
    }

    /// Record the user's explicit import selection.
    ///
    /// Emits [`ClientEvent::ApplyImport`] and returns the edit for the UI
    /// to apply. A cancelled prompt must not call this — cancellation
    /// applies nothing.
    pub fn confirm_import(&mut self, path: &str) -> ImportEdit {
        let edit = ImportEdit::for_path(path);
        if self
            .event_tx
            .try_send(ClientEvent::ApplyImport { edit: edit.clone() })
            .is_err()
        {
            tracing::warn!("Dropping ApplyImport event: channel full");
        }
        edit
    }

    /// Request analyzer termination.
    ///
    /// Idempotent; the exit itself is reported later as
    /// [`ClientEvent::SessionStopped`].
    pub async fn stop(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.stop().await;
        }
    }

    /// Lifecycle state of the current session.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Stopped, AnalyzerSession::state)
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Session bookkeeping for events passing through to the UI. Removal
    /// is the state transition for death; drop closes the pipes and the
    /// child has `kill_on_drop`.
    fn observe(&mut self, event: &ClientEvent) {
        if let ClientEvent::SessionStopped { reason } = event
            && let Some(mut session) = self.session.take()
        {
            match session.exit_code() {
                Some(code) => tracing::info!(code, ?reason, "Analyzer process exited"),
                None => tracing::info!(?reason, "Analyzer session ended"),
            }
        }
    }
}
