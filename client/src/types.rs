//! Public types consumed by the embedding editor layer.
//!
//! The editor constructs an [`AnalyzerConfig`], receives [`ClientEvent`]s,
//! and presents suggestions to the user; everything else stays inside the
//! crate.

use serde::Deserialize;

use crate::imports::{ImportEdit, ImportTable};

/// Configuration for one analyzer client.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Analyzer executable: a path or a command name resolved via `PATH`.
    pub command: String,
    /// Arguments the analyzer is launched with. Deployments differ here
    /// (`--lsp` vs `analyzer --lsp`), so this is data, not a constant.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Substring marking a diagnostic as an unresolved-symbol report.
    #[serde(default = "default_marker")]
    pub unresolved_marker: String,
    /// Symbol-to-import lookup table.
    #[serde(default = "ImportTable::flutter")]
    pub imports: ImportTable,
}

fn default_args() -> Vec<String> {
    vec![String::from("--lsp")]
}

fn default_marker() -> String {
    String::from("is not defined")
}

impl AnalyzerConfig {
    /// Configuration for `command` with the stock arguments, marker, and
    /// import table.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: default_args(),
            unresolved_marker: default_marker(),
            imports: ImportTable::flutter(),
        }
    }
}

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Error = 1,
    Warning = 2,
    Information = 3,
    Hint = 4,
}

impl DiagnosticSeverity {
    /// Convert from the wire's numeric severity (1=Error .. 4=Hint).
    ///
    /// Returns `None` for values outside the defined range; boundary code
    /// decides the fallback.
    #[must_use]
    pub fn from_lsp(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Error),
            2 => Some(Self::Warning),
            3 => Some(Self::Information),
            4 => Some(Self::Hint),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

/// A single diagnostic reported by the analyzer.
///
/// Fields are private; construction happens at the wire boundary and
/// consumers read via accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: DiagnosticSeverity,
    message: String,
    /// 0-indexed line number.
    line: u32,
    /// 0-indexed column.
    col: u32,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: DiagnosticSeverity, message: String, line: u32, col: u32) -> Self {
        Self {
            severity,
            message,
            line,
            col,
        }
    }

    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 0-indexed line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed column.
    #[must_use]
    pub fn col(&self) -> u32 {
        self.col
    }
}

/// Lifecycle state of an analyzer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Running,
    Stopped,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The analyzer closed its stdout (clean exit or kill).
    Exited,
    /// Reading the analyzer's output failed.
    Failed(String),
}

/// An event emitted by the client core for the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A diagnostics batch contained unresolved symbols.
    UnresolvedSymbols { count: usize },
    /// Candidate import paths for the user to choose one of.
    ImportChoices { paths: Vec<String> },
    /// Unresolved symbols were found but none matched the import table.
    NoSuggestions,
    /// The user selected an import; apply this edit.
    ApplyImport { edit: ImportEdit },
    /// The analyzer session ended. Exit is observed, logged, and never
    /// acted upon — there is no restart policy.
    SessionStopped { reason: StopReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_from_lsp_known_values() {
        assert_eq!(
            DiagnosticSeverity::from_lsp(1),
            Some(DiagnosticSeverity::Error)
        );
        assert_eq!(
            DiagnosticSeverity::from_lsp(2),
            Some(DiagnosticSeverity::Warning)
        );
        assert_eq!(
            DiagnosticSeverity::from_lsp(3),
            Some(DiagnosticSeverity::Information)
        );
        assert_eq!(
            DiagnosticSeverity::from_lsp(4),
            Some(DiagnosticSeverity::Hint)
        );
    }

    #[test]
    fn severity_from_lsp_unknown_returns_none() {
        assert_eq!(DiagnosticSeverity::from_lsp(0), None);
        assert_eq!(DiagnosticSeverity::from_lsp(99), None);
    }

    #[test]
    fn severity_labels() {
        assert_eq!(DiagnosticSeverity::Error.label(), "error");
        assert_eq!(DiagnosticSeverity::Warning.label(), "warning");
        assert_eq!(DiagnosticSeverity::Information.label(), "info");
        assert_eq!(DiagnosticSeverity::Hint.label(), "hint");
        assert!(DiagnosticSeverity::Error.is_error());
        assert!(!DiagnosticSeverity::Hint.is_error());
    }

    #[test]
    fn config_defaults_from_minimal_input() {
        let config: AnalyzerConfig = serde_json::from_str(r#"{ "command": "dart" }"#).unwrap();
        assert_eq!(config.command, "dart");
        assert_eq!(config.args, vec!["--lsp"]);
        assert_eq!(config.unresolved_marker, "is not defined");
        assert_eq!(config.imports, ImportTable::flutter());
    }

    #[test]
    fn config_accepts_argument_variant() {
        let config: AnalyzerConfig = serde_json::from_str(
            r#"{ "command": "dart", "args": ["analyzer", "--lsp"] }"#,
        )
        .unwrap();
        assert_eq!(config.args, vec!["analyzer", "--lsp"]);
    }

    #[test]
    fn config_new_matches_serde_defaults() {
        let from_new = AnalyzerConfig::new("dart");
        let from_serde: AnalyzerConfig = serde_json::from_str(r#"{ "command": "dart" }"#).unwrap();
        assert_eq!(from_new.args, from_serde.args);
        assert_eq!(from_new.unresolved_marker, from_serde.unresolved_marker);
        assert_eq!(from_new.imports, from_serde.imports);
    }
}
