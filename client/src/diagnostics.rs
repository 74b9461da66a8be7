//! Scans diagnostics batches for unresolved-symbol reports.

use crate::types::Diagnostic;

/// Filter `diagnostics` down to entries whose message carries `marker`.
///
/// Stable: input order is preserved. Empty input yields empty output, and
/// nothing is reported downstream when there is nothing to report.
pub(crate) fn find_unresolved(diagnostics: &[Diagnostic], marker: &str) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|diag| diag.message().contains(marker))
        .cloned()
        .collect()
}
