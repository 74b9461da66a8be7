//! Editor-side client for a Dart analysis server.
//!
//! Supervises the analyzer subprocess, frames its newline-delimited JSON
//! output into discrete messages, and turns unresolved-symbol diagnostics
//! into candidate import suggestions for a UI layer to present.

pub mod codec;
pub mod imports;
pub mod types;

pub(crate) mod diagnostics;
pub(crate) mod protocol;
pub(crate) mod router;
pub(crate) mod session;

mod client;
mod error;

pub use client::AnalyzerClient;
pub use error::ClientError;
pub use imports::{ImportEdit, ImportMapping, ImportTable};
pub use types::{
    AnalyzerConfig, ClientEvent, Diagnostic, DiagnosticSeverity, SessionState, StopReason,
};
