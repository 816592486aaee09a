//! Diagnostic events reported by the decoders
//!
//! Decoders never print. They report `(severity, message)` events to a
//! [`DiagnosticSink`] supplied by the caller, and an `Error` event always
//! accompanies a failed decode.

use core::fmt;

use serde::Serialize;

use crate::error::DecodeError;

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single reported event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Receiver for diagnostic events
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn info(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Info, message));
    }

    fn warning(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Warning, message));
    }

    /// Report a fatal error and hand it back for returning
    fn fail(&mut self, error: DecodeError) -> DecodeError
    where
        Self: Sized,
    {
        self.report(Diagnostic::new(Severity::Error, error.to_string()));
        error
    }
}

/// Collects events in order
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => tracing::info!("{}", diagnostic.message),
            Severity::Warning => tracing::warn!("{}", diagnostic.message),
            Severity::Error => tracing::error!("{}", diagnostic.message),
        }
    }
}

impl<S: DiagnosticSink> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
