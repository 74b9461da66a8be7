//! Wire message serde types for the analyzer's newline-delimited JSON
//! dialect.
//!
//! Outbound frames are bare `method`/`params` objects, one per line.
//! Inbound frames are classified by their method tag into a
//! [`ServerMessage`]; everything unrecognized stays unhandled instead of
//! failing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Diagnostic, DiagnosticSeverity};

pub(crate) const PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

/// Outbound notification frame.
#[derive(Debug, Serialize)]
pub(crate) struct Notification {
    pub method: &'static str,
    pub params: serde_json::Value,
}

impl Notification {
    pub fn new(method: &'static str, params: serde_json::Value) -> Self {
        Self { method, params }
    }
}

pub(crate) fn did_open_params(
    uri: &str,
    language_id: &str,
    version: i32,
    text: &str,
) -> serde_json::Value {
    serde_json::json!({
        "textDocument": {
            "uri": uri,
            "languageId": language_id,
            "version": version,
            "text": text
        }
    })
}

/// An inbound frame, classified by method tag.
///
/// Known methods get a typed payload; everything else lands in `Other` so
/// new analyzer notification types never break the client.
#[derive(Debug)]
pub(crate) enum ServerMessage {
    PublishDiagnostics(PublishDiagnosticsParams),
    Other { method: String },
}

/// Classify one framed message.
///
/// Returns `None` for frames without a method tag (e.g. responses) and for
/// diagnostics payloads that fail to decode.
pub(crate) fn classify(frame: &serde_json::Value) -> Option<ServerMessage> {
    let method = frame.get("method").and_then(|m| m.as_str())?;
    if method == PUBLISH_DIAGNOSTICS {
        let params = frame
            .get("params")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        match serde_json::from_value::<PublishDiagnosticsParams>(params) {
            Ok(params) => Some(ServerMessage::PublishDiagnostics(params)),
            Err(e) => {
                tracing::debug!("Failed to decode publishDiagnostics params: {e}");
                None
            }
        }
    } else {
        Some(ServerMessage::Other {
            method: method.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PublishDiagnosticsParams {
    pub diagnostics: Vec<WireDiagnostic>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDiagnostic {
    #[serde(default)]
    pub range: WireRange,
    pub severity: Option<u64>,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireRange {
    #[serde(default)]
    pub start: WirePosition,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WirePosition {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub character: u32,
}

impl WireDiagnostic {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            self.severity
                .and_then(DiagnosticSeverity::from_lsp)
                .unwrap_or(DiagnosticSeverity::Warning),
            self.message.clone(),
            self.range.start.line,
            self.range.start.character,
        )
    }
}

pub(crate) fn path_to_file_uri(path: &Path) -> Option<url::Url> {
    url::Url::from_file_path(path).ok()
}
