//! Side channel for non-fatal events raised while reading definitions.
//!
//! A diagnostic means a usable value was produced through a degrade path.
//! Absence of diagnostics says nothing about success; errors travel in the
//! returned `Result`.

use std::fmt;

use parking_lot::Mutex;

use crate::util::ProviderKind;

/// A non-fatal event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Provider type not in the dispatch table, built as a literal from
    /// its fallback field instead.
    LiteralFallback {
        kind: ProviderKind,
        type_name: String,
        key: String,
    },
    /// Animation channel codec name not recognized; the channel is skipped.
    IgnoredDecoder { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiteralFallback { kind, type_name, key } => {
                let field = match kind {
                    ProviderKind::Number => "m_flLiteralValue",
                    ProviderKind::Vector => "m_vLiteralValue",
                };
                write!(
                    f,
                    "{kind} provider '{key}' of type {type_name} is not directly supported, \
                     falling back to {field}"
                )
            }
            Self::IgnoredDecoder { name } => {
                write!(f, "unknown animation decoder '{name}', channel ignored")
            }
        }
    }
}

/// Receiver of [`Diagnostic`]s.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: emits each diagnostic as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::LiteralFallback { .. } => tracing::warn!("{diagnostic}"),
            Diagnostic::IgnoredDecoder { .. } => tracing::debug!("{diagnostic}"),
        }
    }
}

/// Shared instance of [`TracingSink`].
pub static TRACING_SINK: TracingSink = TracingSink;

/// Sink that stores every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of diagnostics collected so far.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Copy of the collected diagnostics, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Remove and return the collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::trace!("collected: {diagnostic}");
        self.events.lock().push(diagnostic);
    }
}
