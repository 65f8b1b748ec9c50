//! Diagnostics for tolerated problems
//! 
//! Fatal problems are reported through each crate's error enum. Problems the
//! translator recovers from (unrecognized instructions, stray operands) are
//! collected here so the driver can report them once translation finishes.

use crate::source_loc::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A warning tied to the source line it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn warning(message: String, location: SourceLocation) -> Self {
        Self { message, location }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: warning: {}", self.location, self.message)
    }
}

/// Collects diagnostics over a whole translation run
#[derive(Debug, Clone, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already-built diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn warning(&mut self, message: String, location: SourceLocation) {
        self.report(Diagnostic::warning(message, location));
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match self.warning_count() {
            0 => "No warnings".to_string(),
            1 => "1 warning".to_string(),
            w => format!("{} warnings", w),
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
