//! Recoverable diagnostics raised by the arc core.
//!
//! Nothing in the core is fatal: every condition below means "operation
//! skipped" (or, for widths, "value sanitized"). All of them flow through a
//! single [`DiagnosticSink`] so the host decides whether to log or ignore.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("cannot call methods on arctext prior to initialization; attempted to call method '{op}'")]
    NotInitialized { op: String },

    #[error("no such method '{op}' for arctext instance")]
    UnknownOperation { op: String },

    #[error("invalid arguments for '{op}': {reason}")]
    InvalidArguments { op: String, reason: String },

    #[error("arctext instance is flattened; '{op}' requires a new instance")]
    SessionFlattened { op: String },

    #[error("unit {index} measured to invalid width {width}; treating as 0")]
    InvalidWidth { index: usize, width: f64 },
}

/// The one channel every recoverable condition is reported through.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Logs every diagnostic at `warn` level.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(diagnostic = ?diagnostic, "arctext: {diagnostic}");
    }
}

/// Drops everything.
#[cfg(test)]
pub struct NullSink;

#[cfg(test)]
impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Logs through `tracing` and keeps a copy, so handlers can echo what was
/// skipped back to the caller.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::UnknownOperation { op: "spin".into() });
        sink.report(Diagnostic::NotInitialized { op: "set".into() });

        let got = sink.into_inner();
        assert_eq!(got.len(), 2);
        assert!(matches!(got[0], Diagnostic::UnknownOperation { .. }));
        assert!(matches!(got[1], Diagnostic::NotInitialized { .. }));
    }

    #[test]
    fn test_messages_name_the_operation() {
        let d = Diagnostic::UnknownOperation { op: "spin".into() };
        assert_eq!(d.to_string(), "no such method 'spin' for arctext instance");

        let d = Diagnostic::NotInitialized { op: "set".into() };
        assert!(d.to_string().contains("'set'"));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let d = Diagnostic::SessionFlattened { op: "set".into() };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "session_flattened");
        assert_eq!(json["op"], "set");
    }
}
