//! Symbol-to-import lookup and the edit contract for a confirmed selection.

use serde::Deserialize;

use crate::types::Diagnostic;

/// One `symbol -> import path` table entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportMapping {
    pub symbol: String,
    pub path: String,
}

/// Ordered symbol-to-import lookup table.
///
/// Fixed at startup and read-only afterwards; safe to share across any
/// number of concurrent resolve calls. Entries are unique by symbol — on
/// duplicate input the first entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<ImportMapping>")]
pub struct ImportTable {
    entries: Vec<ImportMapping>,
}

impl From<Vec<ImportMapping>> for ImportTable {
    fn from(raw: Vec<ImportMapping>) -> Self {
        let mut entries: Vec<ImportMapping> = Vec::with_capacity(raw.len());
        for mapping in raw {
            if let Some(existing) = entries.iter().find(|e| e.symbol == mapping.symbol) {
                tracing::warn!(
                    "Duplicate import mapping for '{}': keeping '{}', dropping '{}'",
                    mapping.symbol,
                    existing.path,
                    mapping.path
                );
                continue;
            }
            entries.push(mapping);
        }
        Self { entries }
    }
}

impl ImportTable {
    /// The built-in Flutter table.
    #[must_use]
    pub fn flutter() -> Self {
        Self::from(vec![
            ImportMapping {
                symbol: String::from("Text"),
                path: String::from("package:flutter/material.dart"),
            },
            ImportMapping {
                symbol: String::from("State"),
                path: String::from("package:flutter/widgets.dart"),
            },
        ])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Candidate import paths for a set of unresolved diagnostics.
    ///
    /// An entry's path is included iff at least one diagnostic message
    /// contains the entry's symbol as a substring. Result order is table
    /// order, not diagnostics order.
    #[must_use]
    pub fn resolve(&self, unresolved: &[Diagnostic]) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| {
                unresolved
                    .iter()
                    .any(|diag| diag.message().contains(&entry.symbol))
            })
            .map(|entry| entry.path.clone())
            .collect()
    }
}

/// The edit produced by an explicit import selection: an import declaration
/// inserted at the top of the target document.
///
/// Only a confirmed user choice constructs one of these; a cancelled prompt
/// applies nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdit {
    path: String,
}

impl ImportEdit {
    #[must_use]
    pub fn for_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The declaration text, newline-terminated, for insertion at the very
    /// start of the document.
    #[must_use]
    pub fn insert_text(&self) -> String {
        format!("import '{}';\n", self.path)
    }
}
